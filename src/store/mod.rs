//! In-memory application state
//!
//! Holds the two entities the endpoints read and mutate: the saved user
//! identity and the movie registry. Neither type does any locking itself;
//! `AppState` wraps each one in its own lock.

mod identity;
mod movies;

pub use identity::{NameField, UserIdentity};
pub use movies::MovieRegistry;
