use afm_check::core::*;

// ---------------------------------------------------------------------------
// Valid identifiers
// ---------------------------------------------------------------------------

#[test]
fn documented_example_is_valid() {
    // 9*128 + 4*2 = 1160, 1160 mod 11 = 5, 5 mod 10 = 5
    assert!(is_valid_afm("090000045"));
    assert_eq!(check_afm("090000045"), Ok(()));
}

#[test]
fn other_valid_identifiers() {
    for afm in ["094019245", "123456783", "000001010"] {
        assert!(is_valid_afm(afm), "{afm}");
    }
}

#[test]
fn crate_root_reexports() {
    assert!(afm_check::is_valid_afm("090000045"));
}

// ---------------------------------------------------------------------------
// Arithmetic failures
// ---------------------------------------------------------------------------

#[test]
fn every_wrong_check_digit_is_rejected() {
    for last in b'0'..=b'9' {
        if last == b'5' {
            continue;
        }
        let afm = format!("09000004{}", last as char);
        assert_eq!(
            check_afm(&afm).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidChecksum),
            "{afm}"
        );
    }
}

#[test]
fn checksum_error_reports_digits() {
    let err = check_afm("123456789").unwrap_err();
    assert_eq!(
        err,
        AfmError::InvalidChecksum {
            expected: 3,
            found: 9
        }
    );
}

// ---------------------------------------------------------------------------
// Shape failures
// ---------------------------------------------------------------------------

#[test]
fn empty_string() {
    assert!(!is_valid_afm(""));
    assert_eq!(check_afm(""), Err(AfmError::InvalidFormat));
}

#[test]
fn whitespace_is_not_trimmed() {
    assert!(!is_valid_afm(" 090000045"));
    assert!(!is_valid_afm("090000045\n"));
    assert!(!is_valid_afm("0900 00045"));
    assert!(is_valid_afm(" 090000045 ".trim()));
}

#[test]
fn wrong_length() {
    assert!(!is_valid_afm("90000045"));
    assert!(!is_valid_afm("0090000045"));
}

#[test]
fn non_digits() {
    assert!(!is_valid_afm("09000004X"));
    assert!(!is_valid_afm("-90000045"));
    assert!(!is_valid_afm("+90000045"));
    assert!(!is_valid_afm("EL0900000"));
}

#[test]
fn error_kinds_have_wire_names() {
    assert_eq!(ErrorKind::InvalidFormat.to_string(), "INVALID_FORMAT");
    assert_eq!(ErrorKind::InvalidChecksum.to_string(), "INVALID_CHECKSUM");
    assert_eq!(ErrorKind::Transport.to_string(), "TRANSPORT_ERROR");
    assert_eq!(ErrorKind::Parse.to_string(), "PARSE_ERROR");
    assert_eq!(ErrorKind::Registry.to_string(), "REGISTRY_ERROR");
}
