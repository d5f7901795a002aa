//! Document identifiers.
//!
//! A [`DocumentId`] is the store's native 12-byte identifier. On the wire it is
//! always written as 24 lowercase hex digits.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`DocumentId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not exactly 24 characters long.
    #[error("identifier must be {expected} hex characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a character that is not a hex digit.
    #[error("identifier must contain only hex digits")]
    InvalidHex,
}

/// A unique reference to a document within a collection.
///
/// ## Examples
///
/// ```
/// use webstore_core::DocumentId;
///
/// let id = DocumentId::parse("507f1f77bcf86cd799439011").unwrap();
/// assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
///
/// assert!(DocumentId::parse("").is_err());
/// assert!(DocumentId::parse("not-an-object-id").is_err());
/// assert!(DocumentId::parse("507f1f77bcf86cd79943901g").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; 12]);

impl DocumentId {
    /// Number of hex characters in the textual form.
    pub const HEX_LENGTH: usize = 24;

    /// Parse a `DocumentId` from its hex form.
    ///
    /// Upper- and lowercase digits are both accepted; the parsed value always
    /// displays in lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hex digits.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(IdError::InvalidLength {
                expected: Self::HEX_LENGTH,
                actual: s.chars().count(),
            });
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| IdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Create an ID from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "bson")]
impl From<DocumentId> for ::bson::oid::ObjectId {
    fn from(id: DocumentId) -> Self {
        Self::from_bytes(id.0)
    }
}

#[cfg(feature = "bson")]
impl From<::bson::oid::ObjectId> for DocumentId {
    fn from(oid: ::bson::oid::ObjectId) -> Self {
        Self(oid.bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = DocumentId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_uppercase_normalizes() {
        let id = DocumentId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for input in ["", "abc", "65a1b2c3d4e5f60718293a4", "65a1b2c3d4e5f60718293a4b0"] {
            assert!(
                matches!(
                    DocumentId::parse(input),
                    Err(IdError::InvalidLength { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        for input in [
            "zzzzzzzzzzzzzzzzzzzzzzzz",
            "65a1b2c3d4e5f60718293a4g",
            "65a1b2c3-4e5f60718293a4b",
            "                        ",
        ] {
            assert_eq!(DocumentId::parse(input), Err(IdError::InvalidHex));
        }
    }

    #[test]
    fn test_parse_rejects_multibyte_input() {
        // 24 bytes but only 12 characters
        let input = "éééééééééééé";
        assert_eq!(input.len(), 24);
        assert!(DocumentId::parse(input).is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = DocumentId::from_bytes([0xab; 12]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abababababababababababab\"");

        let back: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<DocumentId>("\"nope\"").is_err());
    }
}
