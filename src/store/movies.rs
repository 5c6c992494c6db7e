//! Movie registry
//!
//! Ordered list of titles with lookup by exact value. Duplicates are
//! allowed; every by-value operation acts on the first match.

use serde_json::Value;

/// Titles present at startup
pub const SEED_TITLES: [&str; 2] = ["Star Wars", "The Avengers"];

/// Ordered, in-memory list of movie titles
///
/// Slots hold the body value exactly as the client sent it. A request that
/// did not supply a title stores `null`. Only string slots take part in
/// lookups, so `2010` and `"2010"` are different entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRegistry {
    titles: Vec<Value>,
}

impl MovieRegistry {
    /// Create a registry holding the seed titles
    pub fn new() -> Self {
        Self {
            titles: SEED_TITLES.iter().map(|t| Value::from(*t)).collect(),
        }
    }

    /// Append a title at the end
    pub fn add(&mut self, title: Value) {
        self.titles.push(title);
    }

    /// All titles in order
    pub fn titles(&self) -> &[Value] {
        &self.titles
    }

    /// Owned copy of all titles in order
    pub fn snapshot(&self) -> Vec<Value> {
        self.titles.clone()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Position of the first string title exactly equal to `title`
    pub fn position(&self, title: &str) -> Option<usize> {
        self.titles
            .iter()
            .position(|t| t.as_str() == Some(title))
    }

    /// Replace the first occurrence of `old_title` with `new_title`
    ///
    /// Returns `false` and leaves the list untouched when `old_title` is not
    /// present.
    pub fn update(&mut self, old_title: &str, new_title: Value) -> bool {
        let Some(index) = self.position(old_title) else {
            return false;
        };
        self.titles[index] = new_title;
        true
    }

    /// Remove the first occurrence of `title`
    ///
    /// Returns whether a title was removed.
    pub fn delete(&mut self, title: &str) -> bool {
        let Some(index) = self.position(title) else {
            return false;
        };
        self.titles.remove(index);
        true
    }
}

impl Default for MovieRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn title(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_seeded_registry() {
        let registry = MovieRegistry::new();
        assert_eq!(registry.titles(), &[json!("Star Wars"), json!("The Avengers")]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_add_appends_at_end() {
        let mut registry = MovieRegistry::new();
        for t in ["Inception", "", "Star Wars"] {
            let before = registry.len();
            registry.add(title(t));
            assert_eq!(registry.len(), before + 1);
            assert_eq!(registry.titles().last(), Some(&title(t)));
        }
    }

    #[test]
    fn test_add_absent_title() {
        let mut registry = MovieRegistry::new();
        registry.add(Value::Null);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.titles()[2], Value::Null);
        // Null slots never match a lookup
        assert_eq!(registry.position("null"), None);
        assert_eq!(registry.position(""), None);
    }

    #[test]
    fn test_non_string_titles_kept_and_never_matched() {
        let mut registry = MovieRegistry::new();
        registry.add(json!(2010));
        registry.add(json!(true));
        assert_eq!(registry.titles()[2], json!(2010));
        assert_eq!(registry.position("2010"), None);
        assert!(!registry.delete("2010"));
        assert!(!registry.update("true", title("x")));

        registry.add(title("2010"));
        assert_eq!(registry.position("2010"), Some(4));
    }

    #[test]
    fn test_update_found() {
        let mut registry = MovieRegistry::new();
        assert!(registry.update("Star Wars", title("Star Wars: A New Hope")));
        assert_eq!(
            registry.titles(),
            &[json!("Star Wars: A New Hope"), json!("The Avengers")]
        );
    }

    #[test]
    fn test_update_not_found_is_noop() {
        let mut registry = MovieRegistry::new();
        let before = registry.snapshot();
        assert!(!registry.update("Alien", title("Aliens")));
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_update_is_case_sensitive() {
        let mut registry = MovieRegistry::new();
        assert!(!registry.update("star wars", title("x")));
        assert!(!registry.update("Star Wars ", title("x")));
    }

    #[test]
    fn test_update_first_duplicate_only() {
        let mut registry = MovieRegistry::new();
        registry.add(title("Star Wars"));
        assert!(registry.update("Star Wars", title("Rogue One")));
        assert_eq!(
            registry.titles(),
            &[json!("Rogue One"), json!("The Avengers"), json!("Star Wars")]
        );
    }

    #[test]
    fn test_update_to_absent_or_numeric_title() {
        let mut registry = MovieRegistry::new();
        assert!(registry.update("The Avengers", Value::Null));
        assert!(registry.update("Star Wars", json!(1977)));
        assert_eq!(registry.titles(), &[json!(1977), Value::Null]);
    }

    #[test]
    fn test_delete_not_found_leaves_list_unchanged() {
        let mut registry = MovieRegistry::new();
        let before = registry.snapshot();
        assert!(!registry.delete("Jaws"));
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn test_delete_preserves_relative_order() {
        let mut registry = MovieRegistry::new();
        registry.add(title("Inception"));
        registry.add(title("Up"));
        assert!(registry.delete("The Avengers"));
        assert_eq!(
            registry.titles(),
            &[json!("Star Wars"), json!("Inception"), json!("Up")]
        );
    }

    #[test]
    fn test_delete_first_duplicate_only() {
        let mut registry = MovieRegistry::new();
        registry.add(title("Star Wars"));
        assert!(registry.delete("Star Wars"));
        assert_eq!(registry.titles(), &[json!("The Avengers"), json!("Star Wars")]);
        assert!(registry.delete("Star Wars"));
        assert!(!registry.delete("Star Wars"));
        assert_eq!(registry.titles(), &[json!("The Avengers")]);
    }

    #[test]
    fn test_delete_until_empty() {
        let mut registry = MovieRegistry::new();
        assert!(registry.delete("Star Wars"));
        assert!(registry.delete("The Avengers"));
        assert!(registry.is_empty());
        assert!(!registry.delete("Star Wars"));
    }
}
