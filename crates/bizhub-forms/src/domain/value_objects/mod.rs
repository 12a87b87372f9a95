//! Value Objects module
//!
//! Immutable, validated primitives shared by the builder and the renderer.

pub mod email;
pub mod field;
pub mod response;
pub mod settings;

pub use email::{Email, EmailError};
pub use field::{FieldDefinition, FieldOption, FieldPatch, FieldType, OptionPatch};
pub use response::{ResponseValue, Responses};
pub use settings::{
    DisplaySettings, FormSettings, FormTheme, SettingsPatch, ThemePalette, ValidationMessages,
};

use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh identifier
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{}"), uuid::Uuid::new_v4().simple()))
            }

            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

identifier!(
    /// Form identifier
    FormId,
    "form"
);
identifier!(
    /// Step identifier
    StepId,
    "step"
);
identifier!(
    /// Field identifier, unique across the whole form
    FieldId,
    "field"
);
identifier!(
    /// Option identifier, unique within its field
    OptionId,
    "opt"
);

/// Normalize a label into an option value: lowercase, whitespace runs become underscores.
pub fn slugify(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Patch field reader: absent stays `None`, `null` becomes `Some(None)` (clear).
///
/// Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let a = FieldId::generate();
        let b = FieldId::generate();
        assert!(a.as_str().starts_with("field_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Option 3"), "option_3");
        assert_eq!(slugify("  Very   Large  "), "very_large");
        assert_eq!(slugify("Yes"), "yes");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = FieldId::from_string("f1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"f1\"");
    }
}
