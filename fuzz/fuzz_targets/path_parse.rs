#![no_main]

//! Path parsing and rewriting must never panic, whatever the host sends.

use libfuzzer_sys::fuzz_target;
use slicefix_domain::{ImportTarget, PathRewriter, parse_file_path};

fuzz_target!(|input: (&str, &str)| {
    let (file, specifier) = input;

    let from = parse_file_path(file, "src");
    let target = ImportTarget::parse_with_alias(specifier, Some("@/"));

    let _ = from.path.layer();
    let _ = from.path.slice();
    if let Some(to) = target.as_absolute() {
        let rewritten = PathRewriter::to_relative(&from.path, to);
        // A rewrite is relative, and relative specifiers pass through unchanged.
        assert_eq!(PathRewriter::rewrite_specifier(&from.path, &rewritten), rewritten);
    }
});
