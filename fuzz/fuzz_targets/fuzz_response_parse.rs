#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; errors are fine.
        if let Ok(r) = afm_check::registry::RegistryResult::from_response(s) {
            if r.valid {
                assert!(r.name.is_some() && r.afm.is_some() && r.error_code.is_none());
            }
        }
    }
});
