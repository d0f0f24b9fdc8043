//! Token framing: `<hex-ciphertext>*<hex-nonce>`.
//!
//! The nonce suffix has a fixed length ([`NONCE_HEX_LEN`]); a suffix of any
//! other length is not a nonce, so the whole input is returned as the body.

/// Byte length of the secretbox / box nonce (192 bits).
pub const NONCE_LEN: usize = 24;

/// Hex length of an encoded nonce.
pub const NONCE_HEX_LEN: usize = NONCE_LEN * 2;

/// Separates ciphertext from nonce. Never appears in hex.
pub const SEPARATOR: char = '*';

/// Join hex ciphertext and hex nonce into one token.
pub fn format(ciphertext_hex: &str, nonce_hex: &str) -> String {
    let mut token = String::with_capacity(ciphertext_hex.len() + 1 + nonce_hex.len());
    token.push_str(ciphertext_hex);
    token.push(SEPARATOR);
    token.push_str(nonce_hex);
    token
}

/// Split a token into `(ciphertext_hex, Some(nonce_hex))`.
///
/// Returns `(input, None)` unless the whole input matches
/// `<hex>+ * <hex>{48}`.
pub fn parse(input: &str) -> (&str, Option<&str>) {
    match input.rsplit_once(SEPARATOR) {
        Some((body, nonce))
            if !body.is_empty()
                && nonce.len() == NONCE_HEX_LEN
                && is_hex(body)
                && is_hex(nonce) =>
        {
            (body, Some(nonce))
        }
        _ => (input, None),
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}
