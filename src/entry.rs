use std::path::Path;

use flagfill_builder::{Fill, FillError, FillOption, Filler, FlagSet, ParseError};
use thiserror::Error;

/// Errors raised by [`parse`] and [`parse_from`].
#[derive(Debug, Error)]
pub enum Error {
    /// Help was requested; the usage has been printed.
    #[error("help requested")]
    Help,
    /// The flags could not be filled from the struct.
    #[error(transparent)]
    Fill(#[from] FillError),
    /// The command line arguments could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Fill a [`FlagSet`] from `target` and parse the process arguments into it.
/// Returns the arguments remaining after the flags.
///
/// The flag set is named after the program.
/// On help or a parse error, the usage is printed before the error is returned.
pub fn parse<T: Fill>(
    target: &mut T,
    options: impl IntoIterator<Item = FillOption>,
) -> Result<Vec<String>, Error> {
    let mut arguments = std::env::args();
    let program = arguments
        .next()
        .as_deref()
        .map(program_name)
        .unwrap_or_default();
    parse_from(target, options, program, arguments)
}

/// Fill a [`FlagSet`] for `program` from `target` and parse `arguments` into it.
/// Returns the arguments remaining after the flags.
///
/// ### Example
/// ```
/// use flagfill::derive::*;
///
/// #[derive(Default, Fill)]
/// struct Config {
///     #[flag(default = "1")]
///     pub count: u32,
/// }
///
/// let mut config = Config::default();
/// let remaining =
///     flagfill::parse_from(&mut config, Vec::new(), "program", ["-count", "2", "rest"]).unwrap();
///
/// assert_eq!(config.count, 2);
/// assert_eq!(remaining, vec!["rest".to_string()]);
/// ```
pub fn parse_from<T, I, S>(
    target: &mut T,
    options: impl IntoIterator<Item = FillOption>,
    program: impl Into<String>,
    arguments: I,
) -> Result<Vec<String>, Error>
where
    T: Fill,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = FlagSet::new(program);
    Filler::new(options).fill(&mut flags, target)?;

    match flags.parse(arguments) {
        Ok(()) => Ok(flags.args().to_vec()),
        Err(ParseError::Help) => {
            flags.print_usage();
            Err(Error::Help)
        }
        Err(error) => {
            flags.print_error(&error);
            Err(Error::Parse(error))
        }
    }
}

fn program_name(argument: &str) -> String {
    Path::new(argument)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| argument.to_string())
}
