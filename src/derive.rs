//! Derive Api for `flagfill` configuration.
//!
//! ### Getting Started
//! Use the derive Api by instrumenting a struct `S` with `#[derive(Fill)]`.
//! Then fill a [`FlagSet`](../struct.FlagSet.html) from `S` with [`parse`](../fn.parse.html), or
//! with a [`Filler`](../struct.Filler.html) directly.
//!
//! ```no_run
#![doc = include_str!("../demos/basic.rs")]
//! ```
//!
//! ### Field Inference
//! Only `pub` fields are filled; the others are left untouched.
//! The implicit inference uses the following rules:
//! ```console
//! Type                  | Treatment
//! -----------------------------------------------------------------
//! String, bool, numbers | a single flag
//! Duration              | a single flag
//! Vec<..>, HashMap<..>  | a single flag (Vec<String>, HashMap<String, String>)
//! tuples, arrays        | ignored
//! Option<S>, Box<S>     | the group of S, filled with S::default() when absent
//! Option<N>             | a single flag, None until set, for the network, MAC,
//!                       | timestamp and log level types
//! Option<T>, Box<T>     | ignored, for any other T listed above
//! references, pointers  | ignored
//! any other S           | S::visit: a group for structs deriving `Fill`,
//!                       | a single flag for registered types
//! ```
//!
//! ### Field Configuration
//! Fields may be configured with the `#[flag(..)]` attribute:
//! * `#[flag(default = "..")]` defines the value applied before parsing.
//! * `#[flag(usage = "..")]` defines the usage message.
//! A `[placeholder]` span names the value in the usage: `usage = "the [file] to read"` prints as
//! `-input file`.
//! * `#[flag(name = "..")]` (or `flag = ".."`) overrides the flag name; an empty name skips the field.
//! * `#[flag(env = "..")]` overrides the environment variable name; an empty name disables it.
//! * `#[flag(aliases = "a,b")]` registers additional names for the same field.
//! * `#[flag(type = "duration")]` stores a duration into an `i64` or `u64` field as nanoseconds.
//! An `i64` field also accepts negative durations such as `-1.5s`.
//! On fields of other types a hint is ignored, and the field keeps the kind of its own type.
//! `type = "stringSlice"` and `type = "stringMap"` name the list and map kinds explicitly.
//! * `#[flag(flatten)]` keeps the fields of a nested group at the level of its parent.
//! * `#[flag(override_value)]` makes the first use of a list flag replace its default.
//! * `#[flag(layout = "..")]` defines the `chrono` format of a `NaiveDateTime` field.
//! * `#[flag(skip)]` skips the field.
//! Any other `key = ".."` pair is available to converters registered with a
//! [`TypeRegistry`](../struct.TypeRegistry.html).
//!
//! ### Text Values
//! Instrument a `FromStr + Display` type with `#[derive(TextValue)]` to use it as a field type.
//! The type is registered on first use.
//!
//! For example:
//! ```ignore
//! #[derive(TextValue)]
//! enum Mode {
//!     Fast,
//!     Safe,
//! }
//! // the above generates:
//! //  impl TextValue for Mode { .. }  via Mode::from_str
//! //  impl Visit for Mode { .. }      as a single flag
//! ```

pub use flagfill_derive::*;
