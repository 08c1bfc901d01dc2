mod common;

use common::*;

#[test]
fn version_matches_package() {
    let env = TestEnv::builder().build();
    let result = env.run(&["--version"]);

    assert!(result.is_success());
    assert_output_contains!(result, env!("CARGO_PKG_VERSION"));
}

#[test]
fn help_lists_subcommands() {
    let env = TestEnv::builder().build();
    let result = env.run(&["--help"]);

    assert!(result.is_success());
    assert_output_contains!(result, "deploy");
    assert_output_contains!(result, "backups");
}
