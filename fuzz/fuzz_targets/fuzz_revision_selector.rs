#![no_main]

use libfuzzer_sys::fuzz_target;
use sluice::infrastructure::source::archive_url;
use sluice::RevisionSelector;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = content.splitn(3, '/');
    let (Some(owner), Some(repo), Some(reference)) = (parts.next(), parts.next(), parts.next())
    else {
        return;
    };

    if let Some(selector) = RevisionSelector::new(owner, repo, reference) {
        let url = archive_url("https://codeload.github.com", &selector);
        assert!(!url.contains(' '));
        let _ = selector.ref_kind();
    }
});
