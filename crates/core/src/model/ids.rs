use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl ParseIdError {
    /// Name of the identifier type that failed to parse.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cannot be blank", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Catalog identifiers are author-chosen strings ("mod-1", "les-1-1"), stable
// across sessions and used verbatim as keys in the persisted progress record.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns `ParseIdError` if `id` is empty or whitespace only.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(id))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Unique identifier for a course module.
    ModuleId
);

string_id!(
    /// Identifier for a lesson, unique across the whole catalog.
    LessonId
);

string_id!(
    /// Identifier for an activity embedded in a lesson.
    ActivityId
);

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display_is_raw_value() {
        let id = LessonId::new("les-1-1").unwrap();
        assert_eq!(id.to_string(), "les-1-1");
        assert_eq!(format!("{id:?}"), "LessonId(\"les-1-1\")");
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = "   ".parse::<ModuleId>().unwrap_err();
        assert_eq!(err.kind(), "ModuleId");
        assert!(LessonId::new("").is_err());
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let ok: ActivityId = serde_json::from_str("\"act-1\"").unwrap();
        assert_eq!(ok, "act-1");
        assert!(serde_json::from_str::<ActivityId>("\"\"").is_err());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ModuleId::new("mod-0").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"mod-0\"");
    }
}
