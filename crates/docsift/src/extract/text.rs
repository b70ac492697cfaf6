//! Plain text extraction.

use super::Extracted;

/// Decode plain text with permissive encoding recovery: invalid byte
/// sequences are replaced rather than raising.
pub fn extract(bytes: &[u8]) -> Extracted {
    Extracted::from_text(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8() {
        let out = extract("héllo wörld".as_bytes());
        assert_eq!(out.text, "héllo wörld");
    }

    #[test]
    fn test_invalid_bytes_replaced_not_raised() {
        let out = extract(&[b'o', b'k', 0xC3, 0x28, b'!']);
        assert!(out.text.starts_with("ok"));
        assert!(out.text.contains('\u{FFFD}'));
        assert!(out.text.ends_with('!'));
    }
}
