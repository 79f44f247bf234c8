//! # vse-validator
//!
//! Layer-aware validation for VSE packets.
//!
//! Validation never fails: every issue is reported as an entry in
//! [`ValidationResult::errors`] (packet must not be used) or
//! [`ValidationResult::warnings`] (advisory). Strict mode promotes warnings to
//! errors.

#![deny(unsafe_code)]

pub mod result;
pub mod validator;

pub use result::ValidationResult;
pub use validator::{validate, Validator};

/// Validate with the lenient defaults.
pub fn validate_packet(packet: &vse_packet::Packet) -> ValidationResult {
    Validator::lenient().validate(packet)
}
