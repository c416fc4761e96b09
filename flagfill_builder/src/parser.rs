mod flagset;
mod interface;
mod printer;

pub use self::flagset::{Flag, FlagSet, ParseError};
pub(crate) use self::interface::{chunk, ConsoleInterface, UserInterface};
pub(crate) use self::printer::Printer;

#[cfg(test)]
pub(crate) use self::interface::util;
