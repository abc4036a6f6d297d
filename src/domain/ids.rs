//! ULID-based identifiers for blocks, links, recordings and alignment entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an invalid ULID string.
#[derive(Debug, Clone)]
pub struct ParseIdError {
    kind: &'static str,
    value: String,
    reason: String,
}

impl ParseIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} id '{}': {}", self.kind, self.value, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Declares an opaque ULID identifier type.
///
/// Every generated type is 26-character Crockford Base32 on the wire and
/// sorts lexicographically by creation time.
macro_rules! ulid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Ulid);

        impl $name {
            /// Generates a fresh identifier.
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(\"{}\")"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ulid::from_string(s.trim())
                    .map($name)
                    .map_err(|e| ParseIdError {
                        kind: $kind,
                        value: s.to_string(),
                        reason: e.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

ulid_id!(
    /// Identifier of a block. Fresh per block, never derived from content.
    BlockId,
    "block"
);
ulid_id!(
    /// Identifier of a link edge.
    LinkId,
    "link"
);
ulid_id!(
    /// Identifier of a manual block-to-block reference.
    BlockRefId,
    "block reference"
);
ulid_id!(
    /// Identifier of an audio recording.
    RecordingId,
    "recording"
);
ulid_id!(
    /// Identifier of an audio alignment entry.
    AlignmentId,
    "alignment"
);
