//! `0x`-prefixed hex strings at the text/binary boundary

/// Prefix carried by every hex string
pub const HEX_PREFIX: &str = "0x";

/// Errors decoding a hex string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    /// The text does not start with `0x`
    #[error("Hex string must start with 0x")]
    MissingPrefix,

    /// The digits are malformed
    #[error("Invalid hex string: {0}")]
    Invalid(String),
}

/// Encode bytes as lowercase `0x` hex
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(HEX_PREFIX.len() + bytes.len() * 2);
    out.push_str(HEX_PREFIX);
    out.push_str(&hex::encode(bytes));
    out
}

/// Decode a `0x` hex string; digits may be either case
pub fn decode(text: &str) -> Result<Vec<u8>, HexError> {
    let digits = text.strip_prefix(HEX_PREFIX).ok_or(HexError::MissingPrefix)?;
    hex::decode(digits).map_err(|e| HexError::Invalid(e.to_string()))
}
