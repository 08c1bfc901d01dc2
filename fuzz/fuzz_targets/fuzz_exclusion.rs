#![no_main]

use libfuzzer_sys::fuzz_target;
use sluice::domain::value_objects::path::normalize_relative;
use sluice::{is_excluded, ExclusionSet};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Some((entry, path)) = content.split_once('\n') else {
        return;
    };

    let set = ExclusionSet::new([entry]);
    let normalized = normalize_relative(path);
    // An entry always excludes everything beneath it
    if is_excluded(&normalized, &set) {
        let child = format!("{normalized}/child");
        assert!(is_excluded(&child, &set));
    }
});
