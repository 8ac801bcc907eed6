#![no_main]

use libfuzzer_sys::fuzz_target;
use slicefix_domain::{EngineConfig, MemorySurfaceReader, PolicyEngine};
use slicefix_types::ImportOccurrence;

fuzz_target!(|input: (String, String, Vec<String>, String)| {
    let (file, specifier, names, index) = input;

    let reader = MemorySurfaceReader::new().with_file("/p/src/entities/User/index.ts", index);
    let config = EngineConfig {
        alias: Some("@/".to_string()),
        test_files_patterns: vec!["**/*.test.*".to_string()],
        ..EngineConfig::default()
    };
    let Ok(engine) = PolicyEngine::new(config, &reader) else {
        return;
    };

    let occ = ImportOccurrence::new(file, specifier).with_names(names);
    let decisions = engine.evaluate(&occ);
    assert!(!decisions.is_empty());
});
