//! Entity identifier.

use crate::error::{StoreError, StoreResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of an identifier in bytes.
pub const ID_LEN: usize = 12;

/// Length of the hex string form of an identifier.
pub const ID_HEX_LEN: usize = 2 * ID_LEN;

/// Unique identifier for an entity.
///
/// Entity IDs are opaque 12-byte values that are:
/// - Globally unique within a store
/// - Immutable once assigned
/// - Totally ordered by their bytes
///
/// Freshly generated IDs are laid out as a 4-byte big-endian UNIX
/// timestamp, a 5-byte per-process random value, and a 3-byte counter,
/// so they sort roughly by creation time and coincide with the
/// document store's native primary key format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId([u8; ID_LEN]);

impl EntityId {
    /// Creates an entity ID from raw bytes.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates a new unique entity ID.
    #[must_use]
    pub fn new() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let count = next_count();

        let mut bytes = [0u8; ID_LEN];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process_random());
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Creates an entity ID from a slice.
    ///
    /// Returns `None` if the slice is not exactly 12 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == ID_LEN {
            let mut bytes = [0u8; ID_LEN];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Parses an entity ID from its 24-character hex form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentifier`] if the input is not
    /// exactly 24 hex digits.
    pub fn parse_str(s: &str) -> StoreResult<Self> {
        if s.len() != ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::invalid_identifier(s));
        }
        let mut bytes = [0u8; ID_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16)
                .map_err(|_| StoreError::invalid_identifier(s))?;
        }
        Ok(Self(bytes))
    }

    /// Returns the fixed-length lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        use fmt::Write;
        let mut out = String::with_capacity(ID_HEX_LEN);
        for byte in self.0 {
            // Writing to a String cannot fail.
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// Returns the creation timestamp embedded in a generated ID, as
    /// seconds since the UNIX epoch.
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

fn process_random() -> &'static [u8; 5] {
    static PROCESS_RANDOM: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_RANDOM.get_or_init(rand::random)
}

fn next_count() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::random()))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00FF_FFFF
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.to_hex())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EntityId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl From<[u8; ID_LEN]> for EntityId {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<EntityId> for [u8; ID_LEN] {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_is_unique() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn from_bytes_roundtrip() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let id = EntityId::from_bytes(bytes);
        assert_eq!(*id.as_bytes(), bytes);
    }

    #[test]
    fn from_slice() {
        assert!(EntityId::from_slice(&[0u8; 12]).is_some());
        assert!(EntityId::from_slice(&[0u8; 11]).is_none());
        assert!(EntityId::from_slice(&[0u8; 13]).is_none());
    }

    #[test]
    fn ordering() {
        let id1 = EntityId::from_bytes([0; 12]);
        let id2 = EntityId::from_bytes([1; 12]);
        assert!(id1 < id2);
    }

    #[test]
    fn hex_form_is_fixed_length() {
        let id = EntityId::from_bytes([0; 12]);
        assert_eq!(id.to_hex(), "000000000000000000000000");
        assert_eq!(id.to_hex().len(), ID_HEX_LEN);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for input in ["", "zzzzzzzzzzzzzzzzzzzzzzzz", "abc", "0123456789abcdef012345678"] {
            let err = EntityId::parse_str(input).unwrap_err();
            assert!(matches!(err, StoreError::InvalidIdentifier { .. }));
        }
    }

    #[test]
    fn parse_accepts_uppercase() {
        let id = EntityId::parse_str("0123456789ABCDEF01234567").unwrap();
        assert_eq!(id.to_hex(), "0123456789abcdef01234567");
    }

    #[test]
    fn timestamp_is_embedded() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as u32;
        let id = EntityId::new();
        assert!(id.timestamp() >= before);
    }

    #[test]
    fn serde_as_hex_string() {
        let id = EntityId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_hex()));
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_malformed() {
        assert!(serde_json::from_str::<EntityId>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn hex_roundtrip(bytes in any::<[u8; 12]>()) {
            let id = EntityId::from_bytes(bytes);
            let parsed = EntityId::parse_str(&id.to_hex()).unwrap();
            prop_assert_eq!(id, parsed);
        }
    }
}
