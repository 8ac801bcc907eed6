#![no_main]

//! Fuzz target for the public-surface re-export scanner.
//!
//! Arbitrary (possibly half-written) module text must scan without panicking.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let exports = slicefix_domain::scan_exports(s);
    let _ = exports.names.len();
});
