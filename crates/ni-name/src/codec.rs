//! Textual encodings of truncated digests.
//!
//! `ni` names carry unpadded base64url, `nih` names carry lowercase hex
//! followed by `;` and a Luhn mod 16 check digit.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::name::Scheme;

const NIH_ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Unpadded base64url decoder that ignores non-zero bits past the last octet.
/// Validation only restricts the alphabet, so such digests are legal names.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// URL-safe base64 with the trailing `=` padding removed.
pub fn encode_base64url(bytes: &[u8]) -> String { URL_SAFE_NO_PAD.encode(bytes) }

/// Lowercase hex, then `;` and the Luhn mod 16 check digit of that hex.
pub fn encode_hex_with_check_digit(bytes: &[u8]) -> String {
    let mut out = hex::encode(bytes);
    // hex::encode only emits the alphabet, so the check digit always exists
    let check = luhn_mod16_check_digit(&out).unwrap_or('0');
    out.push(';');
    out.push(check);
    out
}

/// Luhn mod N check digit over `text` using the alphabet `0-9a-f`.
///
/// Returns `None` if `text` contains anything outside that alphabet.
pub fn luhn_mod16_check_digit(text: &str) -> Option<char> {
    let n = NIH_ALPHABET.len() as u32;
    let mut sum = 0u32;
    // the rightmost input character is doubled because the check digit will
    // sit to its right
    for (i, b) in text.bytes().rev().enumerate() {
        let code_point = NIH_ALPHABET.iter().position(|&c| c == b)? as u32;
        let addend = if i % 2 == 0 { 2 * code_point } else { code_point };
        sum += addend / n + addend % n;
    }
    let check = (n - sum % n) % n;
    Some(NIH_ALPHABET[check as usize] as char)
}

/// Encoding used by `scheme`.
pub fn encode_for(scheme: Scheme, bytes: &[u8]) -> String {
    match scheme {
        Scheme::Ni => encode_base64url(bytes),
        Scheme::Nih => encode_hex_with_check_digit(bytes),
    }
}

pub(crate) fn decode_base64url(text: &str) -> Option<Vec<u8>> {
    LENIENT_URL_SAFE.decode(text).ok()
}

pub(crate) fn decode_hex(text: &str) -> Option<Vec<u8>> { hex::decode(text).ok() }
