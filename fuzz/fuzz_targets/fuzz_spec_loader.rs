#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use tabforge::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = ConfigLoader::with_defaults();

        // Only panics matter; every error variant is an acceptable outcome
        let _ = loader.load_from_str(yaml_str, Path::new("fuzz.yaml"));
    }
});
