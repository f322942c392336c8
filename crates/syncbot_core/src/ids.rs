//! Opaque platform identifiers.
//!
//! Identifiers are kept as strings. The desired-state store may encode a user
//! id as a JSON string or a JSON number; both deserialize to the same id.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{}", _0)]
        pub struct $name(pub String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize_id(deserializer).map(Self)
            }
        }

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

opaque_id!(
    /// Platform-assigned user identifier.
    UserId
);
opaque_id!(
    /// Platform-assigned role identifier.
    RoleId
);
opaque_id!(
    /// Platform-assigned custom emoji identifier.
    EmojiId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_accepts_string_and_number() {
        let from_text: UserId = serde_json::from_str("\"123456789012345678\"").unwrap();
        let from_number: UserId = serde_json::from_str("123456789012345678").unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(from_text.as_str(), "123456789012345678");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = RoleId::from(42u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
    }
}
