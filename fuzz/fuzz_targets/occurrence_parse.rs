#![no_main]

//! Fuzz target for occurrence document parsing.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = slicefix_occurrences::parse_document(s);
    let _ = serde_json::from_str::<slicefix_types::ImportOccurrence>(s);
    let _ = serde_json::from_str::<slicefix_types::report::SlicefixReport>(s);
});
