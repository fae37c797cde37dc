//! Named string-format predicates.
//!
//! A format is an opaque predicate over strings, looked up by name when a
//! schema sets `format`. The engine treats the registry as read-only; custom
//! predicates supplied at validator construction merge over the built-in set.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

/// A shared string predicate.
pub type FormatPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A registry mapping format names to predicates.
///
/// # Example
///
/// ```rust
/// use verdict::FormatRegistry;
///
/// let mut formats = FormatRegistry::defaults();
/// assert_eq!(formats.check("email", "user@example.com"), Some(true));
/// assert_eq!(formats.check("email", "not-an-email"), Some(false));
/// assert_eq!(formats.check("plate", "AB-123"), None);
///
/// formats.register("plate", |s| s.len() == 6 && s.as_bytes()[2] == b'-');
/// assert_eq!(formats.check("plate", "AB-123"), Some(true));
/// ```
#[derive(Clone, Default)]
pub struct FormatRegistry {
    predicates: HashMap<String, FormatPredicate>,
}

impl FormatRegistry {
    /// Creates a registry with no predicates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry populated with the built-in formats:
    /// `date`, `date-time`, `time`, `email`, `hostname`, `ipv4`, `ipv6`,
    /// `regex`, `uri`, `url`, `uuid`.
    pub fn defaults() -> Self {
        let mut registry = Self::empty();

        registry.register_regex("date", r"^\d{4}-\d{2}-\d{2}$");
        registry.register_regex("time", r"^\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})?$");
        registry.register_regex(
            "date-time",
            r"^\d{4}-\d{2}-\d{2}[Tt ]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})?$",
        );
        registry.register_regex("email", r"^[^@\s]+@[^@\s]+\.[^@\s]+$");
        registry.register_regex(
            "hostname",
            r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        );
        registry.register_regex(
            "uuid",
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        );
        // A URI needs a scheme; a URL is the http(s) subset.
        registry.register_regex("uri", r"^[A-Za-z][A-Za-z0-9+.-]*:\S*$");
        registry.register_regex("url", r"^https?://\S+$");

        registry.register("ipv4", |s| s.parse::<std::net::Ipv4Addr>().is_ok());
        registry.register("ipv6", |s| s.parse::<std::net::Ipv6Addr>().is_ok());
        registry.register("regex", |s| Regex::new(s).is_ok());

        registry
    }

    /// Registers (or replaces) a predicate under the given name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) {
        self.predicates.insert(name.into(), Arc::new(predicate));
    }

    fn register_regex(&mut self, name: &str, pattern: &str) {
        let regex = Regex::new(pattern).expect("built-in format pattern must compile");
        self.register(name, move |s: &str| regex.is_match(s));
    }

    /// Returns true if a predicate is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Applies the named predicate.
    ///
    /// Returns `None` for unknown names, `Some(result)` otherwise.
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        self.predicates.get(name).map(|p| p(value))
    }

    /// Returns the registered format names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Merges another registry's predicates over this one.
    pub fn merge(&mut self, other: FormatRegistry) {
        self.predicates.extend(other.predicates);
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("names", &self.names())
            .finish()
    }
}
