//! Saved user identity
//!
//! A single first/last name pair, overwritten wholesale by
//! `/save-user-info` and read back by `/show-user-info`.

use std::fmt;

/// First name placeholder held before any identity has been saved.
pub const INITIAL_FIRST_NAME: i64 = 2;

/// One identity field as the endpoints observe it.
///
/// The initial identity is not a pair of strings: the first name starts out
/// as a number and the last name as an explicit null, and a name that was
/// not supplied on save is remembered as missing rather than empty. The
/// `Display` impl renders each variant the way it appears in responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameField {
    /// A supplied value (possibly empty)
    Text(String),
    /// Numeric placeholder from the initial state
    Placeholder(i64),
    /// Explicit null from the initial state
    Null,
    /// The value was not supplied
    Missing,
}

impl NameField {
    /// Build a field from an optional input value
    pub fn from_input(value: Option<String>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Placeholder(n) => write!(f, "{n}"),
            Self::Null => f.write_str("null"),
            Self::Missing => f.write_str("undefined"),
        }
    }
}

/// Saved first/last name pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub first_name: NameField,
    pub last_name: NameField,
}

impl UserIdentity {
    /// Identity in effect before the first save
    pub const fn initial() -> Self {
        Self {
            first_name: NameField::Placeholder(INITIAL_FIRST_NAME),
            last_name: NameField::Null,
        }
    }

    /// Replace both fields at once
    pub fn set(&mut self, first_name: NameField, last_name: NameField) {
        self.first_name = first_name;
        self.last_name = last_name;
    }

    /// Render as `"{first} {last}"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Default for UserIdentity {
    fn default() -> Self {
        Self::initial()
    }
}
