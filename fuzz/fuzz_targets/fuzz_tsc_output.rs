#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = tsrig::infrastructure::tools::parse_tsc_output(content, std::path::Path::new("/proj"));
    }
});
