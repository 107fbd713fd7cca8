//! Hex conversions.

/// Strip a leading `0x`/`0X` if present.
fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Canonicalize a hex string: drop the `0x` prefix, lowercase, and left-pad
/// with a single `'0'` when the length is odd.
pub fn hex_fix(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let mut fixed = strip_prefix(s).to_ascii_lowercase();
    if fixed.len() % 2 != 0 {
        fixed.insert(0, '0');
    }
    fixed
}

/// Uppercase, two digits per byte.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_upper(bytes)
}

/// Decode a hex string (optional `0x` prefix, any case).
///
/// Returns an empty vector when the input has odd length or contains a
/// non-hex character.
pub fn from_hex(s: &str) -> Vec<u8> {
    hex::decode(strip_prefix(s)).unwrap_or_default()
}

/// Decode a hex string into UTF-8 text. Empty on any decoding failure.
pub fn hex_to_str(s: &str) -> String {
    String::from_utf8(from_hex(s)).unwrap_or_default()
}
