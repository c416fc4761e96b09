use std::any::Any;
use std::fmt::Display;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::api::capture::{FlagRegistry, InvalidValue, RegistryError, SetError};
use crate::model::Field;
use crate::options::{FillOption, Options};
use crate::types::TypeRegistry;
use crate::walker::Walker;

/// A type the walker can visit as a field.
///
/// The default [`Visit::visit`] treats the value as a single flag, dispatched on its type through
/// the [`TypeRegistry`] and the built-in kinds.
/// So a custom type registered with [`TypeRegistry::register`] only needs an empty impl.
///
/// Structs deriving `Fill` implement both methods: visiting one walks into its fields.
pub trait Visit: Any {
    /// Visit `self` as the field described by `field`.
    fn visit<'a>(&'a mut self, walker: &mut Walker<'a, '_>, field: &Field) -> Result<(), FillError>
    where
        Self: Sized,
    {
        walker.terminal(field, self)
    }

    /// Walk the fields of `self`.
    /// Only structs have fields; anything else is rejected.
    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), FillError> {
        let _ = walker;
        Err(FillError::NotStruct {
            type_name: std::any::type_name::<Self>(),
        })
    }
}

impl<T: Visit> Visit for Box<T> {
    fn visit<'a>(&'a mut self, walker: &mut Walker<'a, '_>, field: &Field) -> Result<(), FillError> {
        (**self).visit(walker, field)
    }

    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), FillError> {
        (**self).walk(walker)
    }
}

/// A struct whose fields can be filled as flags.
///
/// Implemented by `#[derive(Fill)]`.
pub trait Fill: Visit {}

/// A type which converts itself from text, registered on first use.
///
/// Implemented by `#[derive(TextValue)]` for any `FromStr + Display` type.
pub trait TextValue: Display + Sized + 'static {
    /// Convert text into a value.
    fn parse_text(text: &str) -> Result<Self, String>;
}

/// Errors raised while filling flags from a struct.
#[derive(Debug, Error)]
pub enum FillError {
    /// The fill target is not a struct.
    #[error("can only fill from a struct, but it was {type_name}")]
    NotStruct {
        /// The type of the rejected target.
        type_name: &'static str,
    },
    /// Processing a field failed.
    #[error("failed to process {field} of {container}: {source}")]
    Field {
        /// The field name.
        field: String,
        /// The type containing the field.
        container: &'static str,
        /// The cause.
        #[source]
        source: Box<FillError>,
    },
    /// The `default` tag cannot be converted to the field's type.
    #[error("failed to parse default into {type_name}")]
    Default {
        /// The type converted to.
        type_name: &'static str,
        /// The cause.
        #[source]
        source: InvalidValue,
    },
    /// The environment variable holds a value that cannot be converted to the field's type.
    #[error("failed to set from environment variable {env}")]
    Env {
        /// The environment variable.
        env: String,
        /// The cause.
        #[source]
        source: SetError,
    },
    /// The flag registry refused a registration.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The value split pattern is not a valid regular expression.
    #[error("invalid value split pattern '{pattern}'")]
    SplitPattern {
        /// The pattern.
        pattern: String,
        /// The cause.
        #[source]
        source: regex::Error,
    },
}

/// Fills a [`FlagRegistry`] with one flag per visible field of a struct.
///
/// ### Example
/// ```
/// # use flagfill_builder as flagfill;
/// use flagfill::{no_set_from_env, with_env, FillError, Filler, FlagSet, Visit, Walker, Field};
///
/// #[derive(Default)]
/// struct Config {
///     host: String,
///     port: u32,
/// }
///
/// impl Visit for Config {
///     fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), FillError> {
///         walker.terminal(&Field::new("host").tag("default", "localhost"), &mut self.host)?;
///         walker.terminal(&Field::new("port").tag("default", "80"), &mut self.port)?;
///         Ok(())
///     }
/// }
///
/// let mut config = Config::default();
/// let mut flags = FlagSet::new("program");
/// Filler::new([with_env("APP"), no_set_from_env()])
///     .fill(&mut flags, &mut config)
///     .unwrap();
/// flags.parse(["--port", "8080"]).unwrap();
/// drop(flags);
///
/// assert_eq!(config.host, "localhost");
/// assert_eq!(config.port, 8080);
/// ```
pub struct Filler {
    options: Options,
    types: Arc<TypeRegistry>,
}

impl Default for Filler {
    fn default() -> Self {
        Self::new(Vec::default())
    }
}

impl Filler {
    /// Create a filler from a list of options, using the global type registry.
    pub fn new(options: impl IntoIterator<Item = FillOption>) -> Self {
        Self {
            options: Options::new(options),
            types: TypeRegistry::global(),
        }
    }

    /// Use `types` instead of the global type registry.
    pub fn with_types(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = types;
        self
    }

    /// The options this filler was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Register flags for each field of `target`.
    ///
    /// Stops at the first error; flags registered before it stay registered.
    pub fn fill<'a, T: Visit>(
        &self,
        registry: &mut dyn FlagRegistry<'a>,
        target: &'a mut T,
    ) -> Result<(), FillError> {
        let pattern = self.options.value_split_pattern();
        let splitter = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern).map_err(|source| FillError::SplitPattern {
                pattern: pattern.to_string(),
                source,
            })?)
        };
        let mut walker = Walker::new(
            registry,
            &self.options,
            &self.types,
            splitter.as_ref(),
            std::any::type_name::<T>(),
        );
        target.walk(&mut walker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FlagSet;

    struct NotAStruct(u32);

    impl Visit for NotAStruct {}

    #[test]
    fn fill_non_struct() {
        // Setup
        let mut target = NotAStruct(1);
        let mut flags = FlagSet::new("program");

        // Execute
        let result = Filler::default().fill(&mut flags, &mut target);

        // Verify
        assert_matches!(result, Err(FillError::NotStruct { type_name }) => {
            assert!(type_name.ends_with("NotAStruct"));
        });
        drop(flags);
        assert_eq!(target.0, 1);
    }

    #[test]
    fn fill_invalid_split_pattern() {
        struct Empty;
        impl Visit for Empty {
            fn walk<'a>(&'a mut self, _: &mut Walker<'a, '_>) -> Result<(), FillError> {
                Ok(())
            }
        }

        let mut target = Empty;
        let mut flags = FlagSet::new("program");
        let result = Filler::new([crate::with_value_split_pattern("(")])
            .fill(&mut flags, &mut target);

        assert_matches!(result, Err(FillError::SplitPattern { pattern, .. }) => {
            assert_eq!(pattern, "(");
        });
    }

    #[test]
    fn fill_error_display() {
        let error = FillError::Field {
            field: "count".to_string(),
            container: "Config",
            source: Box::new(FillError::Default {
                type_name: "int",
                source: InvalidValue {
                    text: "x".to_string(),
                    type_name: "int",
                    message: "invalid digit found in string".to_string(),
                },
            }),
        };
        assert_eq!(
            error.to_string(),
            "failed to process count of Config: failed to parse default into int"
        );
    }
}
