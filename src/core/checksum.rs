//! AFM check digit validation.
//!
//! The ninth digit of an AFM is derived from the first eight:
//! each digit is weighted by a power of two (256 down to 2), the weighted
//! sum is reduced modulo 11 and then modulo 10.

use super::error::AfmError;

/// Number of digits in an AFM.
pub const AFM_LENGTH: usize = 9;

/// Compute the check digit for the first eight digits of an AFM.
///
/// `digits` holds numeric values, not ASCII bytes. Any value above 9 is
/// an [`AfmError::InvalidFormat`].
pub fn check_digit(digits: &[u8; AFM_LENGTH - 1]) -> Result<u8, AfmError> {
    if digits.iter().any(|&d| d > 9) {
        return Err(AfmError::InvalidFormat);
    }
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) << (AFM_LENGTH - 1 - i))
        .sum();
    Ok(((sum % 11) % 10) as u8)
}

/// Validate an AFM, reporting why it failed.
///
/// The input is not trimmed; surrounding whitespace is a format error.
pub fn check_afm(afm: &str) -> Result<(), AfmError> {
    let bytes = afm.as_bytes();
    if bytes.len() != AFM_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(AfmError::InvalidFormat);
    }

    let mut prefix = [0u8; AFM_LENGTH - 1];
    for (d, b) in prefix.iter_mut().zip(bytes) {
        *d = b - b'0';
    }
    let expected = check_digit(&prefix)?;
    let found = bytes[AFM_LENGTH - 1] - b'0';
    if expected != found {
        return Err(AfmError::InvalidChecksum { expected, found });
    }
    Ok(())
}

/// Returns `true` if `afm` is nine digits with a matching check digit.
pub fn is_valid_afm(afm: &str) -> bool {
    check_afm(afm).is_ok()
}
