#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // `--version` output from any docker or compose build must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = perfiz_domain::parse_version(s);
    }
});
