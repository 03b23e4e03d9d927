//! URL-safe base64 without padding, the transport form Gmail uses for `raw`
//! messages, body `data` fields and attachment payloads.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};

/// Standard-alphabet decoder that accepts non-zero trailing bits, which some
/// upstream encoders leave behind.
pub(crate) const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

pub fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes base64url data with 0-3 missing padding characters.
///
/// Malformed input decodes to an empty buffer.
pub fn decode(data: &str) -> Vec<u8> {
    let standard = data
        .trim()
        .chars()
        .map(|value| match value {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect::<String>();

    LENIENT_STANDARD
        .decode(with_padding(&standard))
        .unwrap_or_default()
}

pub fn decode_to_string(data: &str) -> String {
    String::from_utf8_lossy(&decode(data)).into_owned()
}

/// Appends the `(4 - len % 4) % 4` padding characters a standard decoder expects.
pub(crate) fn with_padding(data: &str) -> String {
    let missing = (4 - data.len() % 4) % 4;
    let mut out = String::with_capacity(data.len() + missing);
    out.push_str(data);
    out.extend(std::iter::repeat_n('=', missing));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_multiple_of_four() {
        assert_eq!(with_padding("abcd"), "abcd");
        assert_eq!(with_padding("abc"), "abc=");
        assert_eq!(with_padding("ab"), "ab==");
    }

    #[test]
    fn encode_never_emits_standard_only_characters() {
        let bytes = (0_u8..=255).collect::<Vec<_>>();
        let encoded = encode(&bytes);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
        assert_eq!(decode(&encoded), bytes);
    }

    #[test]
    fn decodes_unpadded_input() {
        assert_eq!(decode_to_string("SGVsbG8"), "Hello");
        assert_eq!(decode_to_string("SGVsbG8gV29ybGQ"), "Hello World");
    }

    #[test]
    fn decodes_url_safe_characters() {
        assert_eq!(decode("-_8"), vec![0xfb, 0xff]);
    }

    #[test]
    fn malformed_input_decodes_to_empty() {
        assert!(decode("!!!not base64!!!").is_empty());
        assert_eq!(decode_to_string("a"), "");
    }
}
