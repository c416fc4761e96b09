//! Traits which, typically, may be imported without concern: `use flagfill::prelude::*`.

pub use crate::api::{Fill, FlagRegistry, TextValue, Value, Visit};
