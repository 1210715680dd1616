//! Hex encoding helpers shared by keys and identifiers.
//!
//! External inputs are accepted with or without a `0x` prefix. Length is
//! checked before decoding so a wrong-length value gets a precise message.

/// Strip surrounding whitespace and an optional `0x`/`0X` prefix.
pub fn strip_prefix(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Decode exactly `N` bytes from a hex string.
///
/// Returns a human-readable reason on failure; callers wrap it in the
/// error variant for the field being parsed.
pub fn decode_fixed<const N: usize>(input: &str) -> std::result::Result<[u8; N], String> {
    let digits = strip_prefix(input);
    if digits.len() != N * 2 {
        return Err(format!(
            "expected {} hex characters, got {}",
            N * 2,
            digits.len()
        ));
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| e.to_string())?;
    Ok(out)
}

/// Decode a 32-byte value (64 hex characters).
pub fn parse_hex32(input: &str) -> std::result::Result<[u8; 32], String> {
    decode_fixed::<32>(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_optional() {
        let plain = "11".repeat(32);
        let prefixed = format!("0x{plain}");
        assert_eq!(parse_hex32(&plain).unwrap(), [0x11; 32]);
        assert_eq!(parse_hex32(&prefixed).unwrap(), [0x11; 32]);
        assert_eq!(parse_hex32(&format!("  {prefixed}\n")).unwrap(), [0x11; 32]);
    }

    #[test]
    fn test_wrong_length() {
        let err = parse_hex32("xyz").unwrap_err();
        assert!(err.contains("expected 64"));
        assert!(parse_hex32(&"ab".repeat(33)).is_err());
    }

    #[test]
    fn test_non_hex_digits() {
        let input = "zz".repeat(32);
        assert!(parse_hex32(&input).is_err());
    }
}
