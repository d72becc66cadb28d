use serde::{Deserialize, Serialize};

/// Generate a newtype wrapper around `String` with the usual conversions.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// View the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Unique identifier of a document record.
    DocumentId
}

string_id! {
    /// Unique identifier of a notification record.
    NotificationId
}

string_id! {
    /// Opaque identifier of the user that owns a record. Assigned by the
    /// external identity layer; the core treats it as a plain string.
    OwnerId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display_and_as_str() {
        let id = DocumentId::new("doc-1");
        assert_eq!(id.as_str(), "doc-1");
        assert_eq!(id.to_string(), "doc-1");
    }

    #[test]
    fn id_serde_is_transparent() {
        let id = OwnerId::from("user-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user-42\"");
        let back: OwnerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn id_from_string() {
        let id = NotificationId::from(String::from("n-7"));
        assert_eq!(id.as_str(), "n-7");
    }
}
