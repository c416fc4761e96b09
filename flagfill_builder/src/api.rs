mod capture;
mod convert;
mod core;
mod field;

pub use self::capture::*;
pub use self::convert::{format_duration, parse_bool, parse_duration, Primitive};
pub use self::core::*;
pub use self::field::{Optional, Scalar, StringList, StringMap};

pub(crate) use self::field::{parse_string_map, split_values};
