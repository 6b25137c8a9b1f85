#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let valid = afm_check::is_valid_afm(s);
        // Anything that validates must be nine ASCII digits.
        if valid {
            assert_eq!(s.len(), 9);
            assert!(s.bytes().all(|b| b.is_ascii_digit()));
        }
    }
});
