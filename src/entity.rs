//! Named character entity lookup.
//!
//! The inline engine resolves `&name;` through an [`EntityResolver`] so
//! callers can supply their own table. [`Html5Entities`] is the default and
//! covers the HTML5 named character references.

use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Name-to-text lookup for named character entities.
pub trait EntityResolver {
    /// Replacement text for `&name;`, or `None` to leave it as literal text.
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// HTML5 named character references.
///
/// # Example
/// ```
/// use mdtree::entity::{EntityResolver, Html5Entities};
///
/// assert_eq!(Html5Entities.resolve("copy").as_deref(), Some("\u{a9}"));
/// assert_eq!(Html5Entities.resolve("nonexistent"), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Entities;

impl EntityResolver for Html5Entities {
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        let reference = format!("&{name};");
        match html_escape::decode_html_entities(&reference) {
            Cow::Owned(text) if text != reference => Some(Cow::Owned(text)),
            _ => None,
        }
    }
}

impl<S: BuildHasher> EntityResolver for HashMap<String, String, S> {
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|text| Cow::Borrowed(text.as_str()))
    }
}

impl<T: EntityResolver + ?Sized> EntityResolver for &T {
    fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_html5_named() {
        assert_eq!(Html5Entities.resolve("lt").as_deref(), Some("<"));
        assert_eq!(Html5Entities.resolve("alpha").as_deref(), Some("\u{3b1}"));
    }

    #[test]
    fn test_html5_unknown() {
        assert_eq!(Html5Entities.resolve("nonexistant"), None);
    }

    #[test]
    fn test_custom_tables() {
        let mut std_table = HashMap::new();
        std_table.insert("brand".to_string(), "mdtree".to_string());
        assert_eq!(std_table.resolve("brand").as_deref(), Some("mdtree"));
        assert_eq!(std_table.resolve("copy"), None);

        let mut fx_table: FxHashMap<String, String> = FxHashMap::default();
        fx_table.insert("x".to_string(), "y".to_string());
        assert_eq!((&fx_table).resolve("x").as_deref(), Some("y"));
    }
}
