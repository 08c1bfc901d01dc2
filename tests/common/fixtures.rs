//! Reusable test content.

use flate2::write::GzEncoder;
use flate2::Compression;

pub const SECRET: &str = "s3cret";

/// Gzip-compressed tarball containing `files` (path, contents).
pub fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .expect("append tar entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

/// Tarball with every file under the `site-main/` wrapper GitHub adds.
pub fn site_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let wrapped: Vec<(String, &str)> = files
        .iter()
        .map(|(p, c)| (format!("site-main/{p}"), *c))
        .collect();
    let borrowed: Vec<(&str, &str)> = wrapped.iter().map(|(p, c)| (p.as_str(), *c)).collect();
    tarball(&borrowed)
}

/// Config pointing at `site/` and the given archive endpoint.
pub fn config_toml(base_url: &str) -> String {
    format!(
        r#"secret = "{SECRET}"
root = "site"
timeout_secs = 10
archive_base_url = "{base_url}"
exclude = [".git", ".github", "config/secrets.json"]

[source]
owner = "acme"
repo = "site"
ref = "main"

[repos.updater]
owner = "acme"
repo = "updater"
ref = "stable"
"#
    )
}
