mod common;

use std::path::PathBuf;

use auto_external_core::log::enable_tracing_by_env;
use testing_macros::fixture;

use crate::common::test_fixture;

#[fixture("tests/fixtures/*/index.js")]
fn html(path: PathBuf) {
    enable_tracing_by_env();
    test_fixture(&path);
}
