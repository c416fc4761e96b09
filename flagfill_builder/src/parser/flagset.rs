use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::api::{FlagRegistry, InvalidValue, RegistryError, SetError, Value};
use crate::parser::{ConsoleInterface, Printer, UserInterface};

/// Errors raised while parsing command line arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// `-h`, `-help` or `--help` was requested, but is not a defined flag.
    #[error("flag: help requested")]
    Help,
    /// The argument names a flag which is not defined.
    #[error("flag provided but not defined: -{name}")]
    UnknownFlag {
        /// The flag name.
        name: String,
    },
    /// A non-boolean flag is the last argument.
    #[error("flag needs an argument: -{name}")]
    MissingValue {
        /// The flag name.
        name: String,
    },
    /// The flag's value cannot be converted.
    #[error("invalid value \"{text}\" for flag -{name}: {source}")]
    InvalidValue {
        /// The flag name.
        name: String,
        /// The rejected text.
        text: String,
        /// The cause.
        #[source]
        source: InvalidValue,
    },
    /// The argument starts like a flag but is not one (`---name`, `-=value`).
    #[error("bad flag syntax: {token}")]
    BadSyntax {
        /// The offending argument.
        token: String,
    },
}

/// A flag registered with a [`FlagSet`].
pub struct Flag<'a> {
    name: String,
    usage: String,
    default_text: String,
    value: Box<dyn Value + 'a>,
}

impl<'a> Flag<'a> {
    /// The flag name, without leading dashes.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The usage message.
    pub fn usage(&self) -> &str {
        self.usage.as_str()
    }

    /// The value at registration time, as text.
    pub fn default_text(&self) -> &str {
        self.default_text.as_str()
    }

    /// The current value, as text.
    pub fn render(&self) -> String {
        self.value.render()
    }

    /// The value backing this flag.
    pub fn value(&self) -> &(dyn Value + 'a) {
        self.value.as_ref()
    }
}

impl fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default_text", &self.default_text)
            .field("value", &self.value.render())
            .finish()
    }
}

/// A set of named flags, parsed from command line arguments.
///
/// Flags are written as `-name value`, `-name=value`, or with two leading dashes.
/// Boolean flags take no separate value (`-verbose`, `-verbose=false`).
/// Parsing stops at the first non-flag argument or after `--`; the remaining arguments are
/// available from [`FlagSet::args`].
///
/// ### Example
/// ```
/// # use flagfill_builder as flagfill;
/// use flagfill::{FlagRegistry, FlagSet, Scalar};
///
/// let mut count: u32 = 1;
/// let mut flags = FlagSet::new("program");
/// flags
///     .register("count", "how many", Box::new(Scalar::new(&mut count)))
///     .unwrap();
/// flags.parse(["-count=3", "rest"]).unwrap();
///
/// assert_eq!(flags.args(), &["rest".to_string()]);
/// drop(flags);
/// assert_eq!(count, 3);
/// ```
pub struct FlagSet<'a> {
    program: String,
    flags: BTreeMap<String, Flag<'a>>,
    actual: BTreeSet<String>,
    args: Vec<String>,
}

impl<'a> FlagSet<'a> {
    /// Create an empty flag set for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flags: BTreeMap::default(),
            actual: BTreeSet::default(),
            args: Vec::default(),
        }
    }

    /// The program name.
    pub fn program(&self) -> &str {
        self.program.as_str()
    }

    /// Find the flag `name`.
    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.flags.get(name)
    }

    /// Visit every flag, in name order.
    pub fn visit_all(&self, mut visitor: impl FnMut(&Flag<'a>)) {
        self.flags.values().for_each(|flag| visitor(flag));
    }

    /// Visit the flags which have been set, in name order.
    pub fn visit(&self, mut visitor: impl FnMut(&Flag<'a>)) {
        self.flags
            .values()
            .filter(|flag| self.actual.contains(&flag.name))
            .for_each(|flag| visitor(flag));
    }

    /// The arguments remaining after the flags of the last parse.
    pub fn args(&self) -> &[String] {
        self.args.as_slice()
    }

    pub(crate) fn flags(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.flags.values()
    }

    /// Look up the flag `name` and set it from `text`.
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), SetError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| SetError::UnknownFlag {
                name: name.to_string(),
            })?;
        flag.value
            .set(text)
            .map_err(|source| SetError::InvalidValue {
                name: name.to_string(),
                text: text.to_string(),
                source,
            })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Parse flags from `arguments`, which must not include the program name.
    /// May be called repeatedly; values accumulate into the backing fields.
    pub fn parse<I, S>(&mut self, arguments: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens: VecDeque<String> = arguments
            .into_iter()
            .map(|argument| argument.as_ref().to_string())
            .collect();

        while self.parse_one(&mut tokens)? {}

        self.args = tokens.into();
        Ok(())
    }

    fn parse_one(&mut self, tokens: &mut VecDeque<String>) -> Result<bool, ParseError> {
        let token = match tokens.front() {
            Some(token) if token.len() >= 2 && token.starts_with('-') => token.clone(),
            _ => return Ok(false),
        };
        tokens.pop_front();

        let mut minuses = 1;

        if token[1..].starts_with('-') {
            minuses += 1;

            if token.len() == 2 {
                // "--" terminates the flags
                return Ok(false);
            }
        }

        let name = &token[minuses..];

        if name.is_empty() || name.starts_with('-') || name.starts_with('=') {
            return Err(ParseError::BadSyntax {
                token: token.clone(),
            });
        }

        let (name, value) = match name.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (name, None),
        };

        let Some(flag) = self.flags.get_mut(name) else {
            return if name == "help" || name == "h" {
                Err(ParseError::Help)
            } else {
                Err(ParseError::UnknownFlag {
                    name: name.to_string(),
                })
            };
        };

        let text = if flag.value.is_bool_flag() {
            value.unwrap_or_else(|| "true".to_string())
        } else {
            match value.or_else(|| tokens.pop_front()) {
                Some(text) => text,
                None => {
                    return Err(ParseError::MissingValue {
                        name: name.to_string(),
                    })
                }
            }
        };

        flag.value
            .set(&text)
            .map_err(|source| ParseError::InvalidValue {
                name: name.to_string(),
                text: text.clone(),
                source,
            })?;
        trace!(flag = name, value = %text, "parsed flag");
        self.actual.insert(name.to_string());
        Ok(true)
    }

    /// Write the usage entry of every flag, in name order.
    pub fn write_defaults(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let printer = Printer::new(None);

        for flag in self.flags() {
            writeln!(out, "{}", printer.render(flag))?;
        }

        Ok(())
    }

    /// Print the usage entry of every flag to the console, wrapped to its width.
    pub fn print_defaults(&self) {
        Printer::terminal().print_defaults(self.flags(), &ConsoleInterface::default());
    }

    /// Print the program's usage line followed by the flag defaults.
    pub fn print_usage(&self) {
        self.print_usage_to(&ConsoleInterface::default(), Printer::terminal());
    }

    /// Print a parse error followed by the program's usage.
    pub fn print_error(&self, error: &ParseError) {
        let interface = ConsoleInterface::default();
        interface.print_error(error.to_string());
        self.print_usage_to(&interface, Printer::terminal());
    }

    fn print_usage_to(&self, user_interface: &impl UserInterface, printer: Printer) {
        user_interface.print(format!("Usage of {}:", self.program));
        printer.print_defaults(self.flags(), user_interface);
    }
}

impl<'a> FlagRegistry<'a> for FlagSet<'a> {
    fn register(
        &mut self,
        name: &str,
        usage: &str,
        value: Box<dyn Value + 'a>,
    ) -> Result<(), RegistryError> {
        if self.flags.contains_key(name) {
            return Err(RegistryError::Redefined {
                name: name.to_string(),
            });
        }

        let flag = Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default_text: value.render(),
            value,
        };
        self.flags.insert(name.to_string(), flag);
        Ok(())
    }

    fn set(&mut self, name: &str, text: &str) -> Result<(), SetError> {
        FlagSet::set(self, name, text)
    }
}
