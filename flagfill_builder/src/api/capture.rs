use thiserror::Error;

/// The capability of a registered flag value: it can be set from text and rendered back to text.
///
/// Every flag registered by the walker is backed by a `Value` which writes through to a field
/// of the target struct.
pub trait Value {
    /// Convert `text` and store it into the backing field.
    fn set(&mut self, text: &str) -> Result<(), InvalidValue>;

    /// Render the current value of the backing field.
    fn render(&self) -> String;

    /// The placeholder name of the value kind, used when printing flag defaults.
    fn type_name(&self) -> &'static str;

    /// Boolean flags may be specified without a value (`-verbose`).
    fn is_bool_flag(&self) -> bool {
        false
    }
}

/// The target of flag registration.
///
/// Registered values borrow fields of the filled struct for `'a`.
pub trait FlagRegistry<'a> {
    /// Register the flag `name` backed by `value`.
    fn register(
        &mut self,
        name: &str,
        usage: &str,
        value: Box<dyn Value + 'a>,
    ) -> Result<(), RegistryError>;

    /// Look up the flag `name` and set it from `text`.
    fn set(&mut self, name: &str, text: &str) -> Result<(), SetError>;
}

/// Text which cannot be converted into the value of a flag.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot convert '{text}' to {type_name}: {message}.")]
pub struct InvalidValue {
    /// The text which failed to convert.
    pub text: String,
    /// The kind of value being converted to.
    pub type_name: &'static str,
    /// The converter's reason.
    pub message: String,
}

impl InvalidValue {
    pub(crate) fn new(text: &str, type_name: &'static str, message: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            type_name,
            message: message.into(),
        }
    }
}

/// Errors raised by a [`FlagRegistry`] on registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The flag name is already registered.
    #[error("flag redefined: {name}")]
    Redefined {
        /// The duplicate flag name.
        name: String,
    },
}

/// Errors raised by a [`FlagRegistry`] when setting a flag by name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetError {
    /// No flag with the name is registered.
    #[error("no such flag -{name}")]
    UnknownFlag {
        /// The requested flag name.
        name: String,
    },
    /// The flag exists but rejected the text.
    #[error("invalid value \"{text}\" for flag -{name}")]
    InvalidValue {
        /// The flag name.
        name: String,
        /// The rejected text.
        text: String,
        /// The conversion failure.
        #[source]
        source: InvalidValue,
    },
}
