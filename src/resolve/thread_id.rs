//! Recovers API thread IDs from the forms users paste: hex IDs, legacy
//! `FMfcg...` view tokens and full Gmail web URLs.

use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

use crate::mail::base64url::{LENIENT_STANDARD, with_padding};

/// Vowel-free alphabet of view tokens. Its length is the token radix.
const VIEW_TOKEN_ALPHABET: &[u8] = b"BCDFGHJKLMNPQRSTVWXZbcdfghjklmnpqrstvwxz";
const BASE64_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const HEX_DIGITS: &[u8] = b"0123456789abcdef";
const VIEW_TOKEN_PREFIX: &str = "FMfcg";
const WEB_URL_HOST: &str = "mail.google.com";

static URL_FRAGMENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[^/#]+/)+([A-Za-z0-9]+)$").expect("url fragment pattern is valid")
});
static HEX_THREAD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{12,20}$").expect("hex id pattern is valid"));
static DECODED_THREAD_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:thread-)?[af]:r?(-?[0-9]+)").expect("thread reference pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdSource {
    Hex,
    Fmfcg,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedThreadId {
    pub thread_id: String,
    pub source: IdSource,
    pub original: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("character `{0}` is not part of the view token alphabet")]
    InvalidCharacter(char),
    #[error("view token does not decode as base64")]
    InvalidBase64,
    #[error("decoded view token has unexpected format: {0}")]
    UnexpectedFormat(String),
}

/// Never fails: unrecognized input comes back unchanged with
/// [`IdSource::Unknown`] and the API gets to reject it.
pub fn parse(input: &str) -> ParsedThreadId {
    let original = input.trim();
    let token = extract_from_url(original).unwrap_or(original);

    if is_hex_id(token) {
        return ParsedThreadId {
            thread_id: token.to_ascii_lowercase(),
            source: IdSource::Hex,
            original: original.to_string(),
        };
    }

    if is_view_token(token) {
        match decode_view_token(token) {
            Ok(thread_id) => {
                return ParsedThreadId {
                    thread_id,
                    source: IdSource::Fmfcg,
                    original: original.to_string(),
                };
            }
            Err(err) => tracing::debug!(token, error = %err, "view token decode failed"),
        }
    }

    ParsedThreadId {
        thread_id: token.to_string(),
        source: IdSource::Unknown,
        original: original.to_string(),
    }
}

/// Pulls the trailing ID out of `https://mail.google.com/...#<view>/<id>`.
pub fn extract_from_url(input: &str) -> Option<&str> {
    if !input.contains(WEB_URL_HOST) {
        return None;
    }

    URL_FRAGMENT_ID
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

pub fn is_hex_id(id: &str) -> bool {
    HEX_THREAD_ID.is_match(id)
}

pub fn is_view_token(id: &str) -> bool {
    id.starts_with(VIEW_TOKEN_PREFIX)
}

/// Decodes a legacy view token into the lowercase hex thread ID.
///
/// The token is a big integer written in the vowel-free alphabet. Rewritten
/// in base 64 it spells a string like `thread-f:1851238173656825268`, whose
/// decimal part is the thread ID.
///
/// A character outside the alphabet fails the decode outright instead of
/// being read as digit zero.
pub fn decode_view_token(token: &str) -> Result<String, DecodeError> {
    let digits = token
        .chars()
        .map(|value| {
            VIEW_TOKEN_ALPHABET
                .iter()
                .position(|symbol| char::from(*symbol) == value)
                .map(|index| index as u32)
                .ok_or(DecodeError::InvalidCharacter(value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let base64 = convert_radix(&digits, VIEW_TOKEN_ALPHABET.len() as u32, 64)
        .into_iter()
        .map(|digit| char::from(BASE64_ALPHABET[digit as usize]))
        .collect::<String>();

    let decoded = LENIENT_STANDARD
        .decode(with_padding(&base64))
        .map_err(|_| DecodeError::InvalidBase64)?;
    let decoded = String::from_utf8_lossy(&decoded);

    let decimal = DECODED_THREAD_REF
        .captures(&decoded)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().trim_start_matches('-'))
        .ok_or_else(|| DecodeError::UnexpectedFormat(decoded.to_string()))?;

    Ok(decimal_to_hex(decimal))
}

/// Gmail web link for a thread, pinned to an account with `authuser`.
pub fn web_url(thread_id: &str, email: &str) -> String {
    let hex = thread_id
        .strip_prefix("0x")
        .unwrap_or(thread_id)
        .to_ascii_lowercase();
    let email = form_urlencoded::byte_serialize(email.as_bytes()).collect::<String>();
    format!("https://{WEB_URL_HOST}/mail/u/?authuser={email}#all/{hex}")
}

fn decimal_to_hex(decimal: &str) -> String {
    let digits = decimal
        .bytes()
        .map(|byte| u32::from(byte - b'0'))
        .collect::<Vec<_>>();

    let hex = convert_radix(&digits, 10, 16)
        .into_iter()
        .map(|digit| char::from(HEX_DIGITS[digit as usize]))
        .collect::<String>();

    if hex.is_empty() { "0".to_string() } else { hex }
}

/// Re-expresses a big-endian digit sequence in another radix.
///
/// The accumulator is little-endian; every input digit multiplies it by
/// `from` and adds the digit, propagating carries past the top slot. Leading
/// zero digits vanish, so zero converts to an empty sequence.
fn convert_radix(digits: &[u32], from: u32, to: u32) -> Vec<u32> {
    let mut acc: Vec<u32> = Vec::new();

    for &digit in digits {
        let mut carry = digit;
        for slot in acc.iter_mut() {
            let value = *slot * from + carry;
            *slot = value % to;
            carry = value / to;
        }
        while carry > 0 {
            acc.push(carry % to);
            carry /= to;
        }
    }

    acc.reverse();
    acc
}
