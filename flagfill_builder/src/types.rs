mod extended;
mod handler;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::trace;

use crate::api::{Primitive, TextValue};
use crate::constant::DEFAULT_TIME_LAYOUT;
use crate::model::Tags;

pub use extended::{AddressError, HardwareAddr};
pub use ipnet::{IpNet, Ipv4Net, Ipv6Net};
pub(crate) use handler::{builtin, hinted, Handler, Registration};

use handler::{render_display, Converted};

struct Entry {
    type_name: &'static str,
    handler: Arc<dyn Handler>,
}

/// The extensible mapping from field types to the way their flags are registered.
///
/// Types found here take precedence over the built-in kinds, and struct types found here are
/// treated as single flags instead of being walked into.
///
/// ### Example
/// ```
/// # use flagfill_builder as flagfill;
/// use flagfill::TypeRegistry;
/// use std::net::IpAddr;
///
/// #[derive(Debug)]
/// struct Port(u16);
///
/// impl std::fmt::Display for Port {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
///
/// let types = TypeRegistry::new();
/// types.register(|text, _| text.parse::<u16>().map(Port));
///
/// assert!(types.contains::<Port>());
/// assert!(types.contains::<IpAddr>());
/// ```
pub struct TypeRegistry {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry without any registered types.
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(HashMap::default()),
        }
    }

    /// Create a registry with the network, time and log level types registered.
    pub fn new() -> Self {
        Self::with_time_layout(DEFAULT_TIME_LAYOUT)
    }

    /// Create a registry like [`TypeRegistry::new`], parsing timestamps with `layout`
    /// (a `chrono` format string) unless a field sets its own `layout` tag.
    pub fn with_time_layout(layout: &str) -> Self {
        let types = Self::empty();
        extended::register_extended(&types, layout);
        types
    }

    /// The process-wide registry used by fills which are not given one explicitly.
    pub fn global() -> Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())).clone()
    }

    /// Register `T` with a converter from text.
    /// The converter also receives the field's tags, to honour type specific keys.
    ///
    /// Registering a type again replaces its converter.
    pub fn register<T, F, E>(&self, converter: F)
    where
        T: Display + 'static,
        F: Fn(&str, &Tags) -> Result<T, E> + Send + Sync + 'static,
        E: Display,
    {
        let handler = Converted::<T>::new(
            Arc::new(move |text: &str, tags: &Tags| {
                converter(text, tags).map_err(|error| error.to_string())
            }),
            render_display::<T>,
            std::any::type_name::<T>(),
            "value",
        );
        self.insert::<T>(Arc::new(handler), true);
    }

    /// Register a newtype `T` over the built-in kind `P`.
    /// Text is converted as `P`, then stored as `T`.
    pub fn register_via<T, P>(&self)
    where
        T: From<P> + Display + 'static,
        P: Primitive,
    {
        self.insert::<T>(Arc::new(Converted::<T>::via::<P>()), true);
    }

    /// Register a [`TextValue`] type, unless it is already registered.
    /// Returns whether the type was newly registered.
    pub fn register_text<T: TextValue>(&self) -> bool {
        let handler = Converted::<T>::new(
            Arc::new(|text: &str, _: &Tags| T::parse_text(text)),
            render_display::<T>,
            std::any::type_name::<T>(),
            "value",
        );
        self.insert::<T>(Arc::new(handler), false)
    }

    /// Whether `T` is registered.
    pub fn contains<T: Any>(&self) -> bool {
        self.contains_id(TypeId::of::<T>())
    }

    pub(crate) fn contains_id(&self, type_id: TypeId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&type_id)
    }

    pub(crate) fn handler(&self, type_id: TypeId) -> Option<Arc<dyn Handler>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .map(|entry| entry.handler.clone())
    }

    /// The names of all registered types, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|entry| entry.type_name)
            .collect();
        names.sort_unstable();
        names
    }

    fn insert<T: 'static>(&self, handler: Arc<dyn Handler>, replace: bool) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let type_id = TypeId::of::<T>();

        if !replace && entries.contains_key(&type_id) {
            return false;
        }

        let type_name = std::any::type_name::<T>();
        trace!(type_name, "registered type");
        entries.insert(type_id, Entry { type_name, handler });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::fmt;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;
    use tracing::Level;

    #[derive(Debug, PartialEq)]
    struct Celsius(f64);

    impl From<f64> for Celsius {
        fn from(value: f64) -> Self {
            Celsius(value)
        }
    }

    impl fmt::Display for Celsius {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}C", self.0)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Word(String);

    impl fmt::Display for Word {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl TextValue for Word {
        fn parse_text(text: &str) -> Result<Self, String> {
            Ok(Word(text.to_uppercase()))
        }
    }

    #[test]
    fn empty() {
        let types = TypeRegistry::empty();
        assert!(types.type_names().is_empty());
        assert!(!types.contains::<IpAddr>());
    }

    #[test]
    fn new_registers_extended() {
        let types = TypeRegistry::new();
        assert!(types.contains::<IpAddr>());
        assert!(types.contains::<Ipv4Addr>());
        assert!(types.contains::<Ipv6Addr>());
        assert!(types.contains::<IpNet>());
        assert!(types.contains::<Ipv4Net>());
        assert!(types.contains::<Ipv6Net>());
        assert!(types.contains::<HardwareAddr>());
        assert!(types.contains::<NaiveDateTime>());
        assert!(types.contains::<Level>());
        assert!(!types.contains::<String>());
        assert_eq!(types.type_names().len(), 9);
    }

    #[test]
    fn register_text_idempotent() {
        // Setup
        let types = TypeRegistry::empty();

        // Execute
        let first = types.register_text::<Word>();
        let second = types.register_text::<Word>();

        // Verify
        assert!(first);
        assert!(!second);
        assert!(types.contains::<Word>());
        assert_eq!(types.type_names().len(), 1);
    }

    #[test]
    fn register_via() {
        let types = TypeRegistry::empty();
        types.register_via::<Celsius, f64>();
        assert!(types.contains::<Celsius>());
        assert!(types.handler(TypeId::of::<Celsius>()).is_some());
        assert!(types.handler(TypeId::of::<f64>()).is_none());
    }

    #[test]
    fn register_replaces() {
        let types = TypeRegistry::empty();
        types.register(|text, _| Ipv4Addr::from_str(text));
        types.register(|_, _| Ok::<_, String>(Ipv4Addr::LOCALHOST));
        assert_eq!(types.type_names().len(), 1);
    }

    #[test]
    fn global_shared() {
        let left = TypeRegistry::global();
        let right = TypeRegistry::global();
        assert!(Arc::ptr_eq(&left, &right));
        assert!(left.contains::<IpNet>());
    }
}
