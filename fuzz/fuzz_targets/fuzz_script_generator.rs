#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use tabforge::config::ConfigLoader;
use tabforge_script::ShellKind;

fuzz_target!(|data: &[u8]| {
    let Ok(yaml_str) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(loaded) = ConfigLoader::with_defaults().load_from_str(yaml_str, Path::new("fuzz.yaml"))
    else {
        return;
    };

    for shell in ShellKind::ALL {
        let first = tabforge_script::generate(shell, &loaded.command);
        let second = tabforge_script::generate(shell, &loaded.command);
        assert_eq!(first, second, "{shell} output is not deterministic");
    }
});
