//! AFM checksum validation and shared error kinds.
//!
//! Everything in this module is pure and performs no I/O.

mod checksum;
mod error;

pub use checksum::{AFM_LENGTH, check_afm, check_digit, is_valid_afm};
pub use error::{AfmError, ErrorKind};
