use std::sync::Arc;

use crate::constant::{DEFAULT_SPLIT_PATTERN, PATH_SEPARATOR};
use crate::naming::*;

/// Applies one configuration choice to [`Options`].
pub type FillOption = Box<dyn FnOnce(&mut Options)>;

/// The configuration of a fill, assembled from [`FillOption`]s.
#[derive(Clone)]
pub struct Options {
    field_renamer: Renamer,
    env_renamer: Option<Renamer>,
    set_from_env: bool,
    value_split_pattern: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            field_renamer: kebab_renamer(),
            env_renamer: None,
            set_from_env: true,
            value_split_pattern: DEFAULT_SPLIT_PATTERN.to_string(),
        }
    }
}

impl Options {
    /// Apply `options` in order over the defaults.
    pub fn new(options: impl IntoIterator<Item = FillOption>) -> Self {
        let mut value = Self::default();
        for option in options {
            option(&mut value);
        }
        value
    }

    /// The flag name for a structural path.
    pub fn flag_name(&self, path: &str) -> String {
        (self.field_renamer)(path)
    }

    /// The environment variable name for a structural path, when environment names are enabled.
    pub fn env_name(&self, path: &str) -> Option<String> {
        self.env_renamer.as_ref().map(|renamer| renamer(path))
    }

    /// Whether environment variables are applied to the flags.
    pub fn set_from_env(&self) -> bool {
        self.set_from_env
    }

    /// The pattern that splits list values.
    pub fn value_split_pattern(&self) -> &str {
        &self.value_split_pattern
    }
}

/// Use `renamer` to derive flag names from field paths.
pub fn with_field_renamer(renamer: impl Fn(&str) -> String + Send + Sync + 'static) -> FillOption {
    let renamer: Renamer = Arc::new(renamer);
    Box::new(move |options: &mut Options| options.field_renamer = renamer)
}

/// Map fields to environment variables named by `renamer`.
pub fn with_env_renamer(renamer: impl Fn(&str) -> String + Send + Sync + 'static) -> FillOption {
    let renamer: Renamer = Arc::new(renamer);
    Box::new(move |options: &mut Options| options.env_renamer = Some(renamer))
}

/// Map fields to environment variables named in SCREAMING_SNAKE_CASE after `prefix`.
///
/// A non-empty prefix is joined to the field path as a separate word,
/// so with the prefix `app` the field `port` maps to `APP_PORT`.
pub fn with_env(prefix: impl Into<String>) -> FillOption {
    let prefix = prefix.into();
    let renamer = if prefix.is_empty() {
        screaming_snake_renamer()
    } else {
        composite_renamer([
            prefix_renamer(format!("{prefix}{PATH_SEPARATOR}")),
            screaming_snake_renamer(),
        ])
    };
    Box::new(move |options: &mut Options| options.env_renamer = Some(renamer))
}

/// Keep naming environment variables in usage text, but do not apply their values.
pub fn no_set_from_env() -> FillOption {
    Box::new(|options: &mut Options| options.set_from_env = false)
}

/// Split list values with the regular expression `pattern`.
/// An empty pattern disables splitting.
pub fn with_value_split_pattern(pattern: impl Into<String>) -> FillOption {
    let pattern = pattern.into();
    Box::new(move |options: &mut Options| options.value_split_pattern = pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::new(Vec::default());
        assert_eq!(options.flag_name("some_field"), "some-field");
        assert_eq!(options.env_name("some_field"), None);
        assert!(options.set_from_env());
        assert_eq!(options.value_split_pattern(), ",");
    }

    #[test]
    fn field_renamer() {
        let options = Options::new([with_field_renamer(|name| name.to_uppercase())]);
        assert_eq!(options.flag_name("some_field"), "SOME_FIELD");
    }

    #[test]
    fn env_prefix() {
        let options = Options::new([with_env("app")]);
        assert_eq!(
            options.env_name("inner-some_field"),
            Some("APP_INNER_SOME_FIELD".to_string())
        );
    }

    #[test]
    fn env_without_prefix() {
        let options = Options::new([with_env("")]);
        assert_eq!(options.env_name("host"), Some("HOST".to_string()));
    }

    #[test]
    fn env_renamer() {
        let options = Options::new([with_env_renamer(|name| format!("X_{name}"))]);
        assert_eq!(options.env_name("host"), Some("X_host".to_string()));
    }

    #[test]
    fn later_options_win() {
        let options = Options::new([
            with_value_split_pattern(";"),
            no_set_from_env(),
            with_value_split_pattern(""),
        ]);
        assert!(!options.set_from_env());
        assert_eq!(options.value_split_pattern(), "");
    }
}
