//! `flagfill` turns the fields of a struct into command line flags.
//!
//! Each `pub` field of a struct deriving [`Fill`](./derive/derive.Fill.html) becomes a flag, named
//! after the field (kebab case by default) and bound to the field itself: parsing the flags writes
//! straight into the struct.
//! Nested structs become groups of flags, whose names are prefixed by the group's field name.
//!
//! Values are taken, in order of precedence, from:
//! * the command line arguments,
//! * an environment variable, when an environment naming is configured,
//! * the `default` of the field's `#[flag(..)]` attribute,
//! * the value the field held before filling.
//!
//! # Usage
//! via [derive Api](./derive/index.html):
//! ```no_run
#![doc = include_str!("../demos/basic.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ basic -h
//! Usage of basic:
//!   -H host
//!     	the host to listen on (env DEMO_HOST) (default "localhost")
//!   -database-pool-size uint
//!     	connections in the pool (env DEMO_DATABASE_POOL_SIZE) (default 10)
//!   -database-url url
//!     	the database url (env DEMO_DATABASE_URL) (default "postgres://localhost")
//!   -host host
//!     	the host to listen on (env DEMO_HOST) (default "localhost")
//!   -labels value
//!     	labels as key=value pairs (env DEMO_LABELS)
//!   -log-level string
//!     	the log level (env LOG_LEVEL) (default "info")
//!   -mode value
//!     	fast or safe (env DEMO_MODE) (default fast)
//!   -peers peers
//!     	the peers to connect to (env DEMO_PEERS) (default alpha,beta)
//!   -port uint
//!     	the port to listen on (env DEMO_PORT) (default 8080)
//!   -timeout duration
//!     	request timeout (env DEMO_TIMEOUT) (default 30s)
//!   -verbose
//!     	enable verbose output (env DEMO_VERBOSE)
//! ```
//!
//! # Builder Api
//! The derive Api generates an implementation of [`Visit`], which drives a [`Walker`] over the
//! fields of the struct.
//! [`Filler::fill`] walks a struct and registers its flags with any [`FlagRegistry`]; this crate
//! provides the Go-style [`FlagSet`].
//!
//! ### Field types
//! The following field types are supported out of the box:
//! * `String`, `bool`, `f64`, `i32`, `i64`, `isize`, `u32`, `u64`, `usize`.
//! * [`std::time::Duration`], written as `300ms`, `1.5h` or `2h45m`.
//! * `Vec<String>`, appended to by each use of the flag and split on `,` (see
//! [`with_value_split_pattern`]).
//! With `#[flag(override_value)]`, each use of the flag replaces the list instead.
//! * `HashMap<String, String>`, written as `key=value` pairs separated by `,` or new lines.
//! * [`std::net::IpAddr`], [`std::net::Ipv4Addr`], [`std::net::Ipv6Addr`], [`IpNet`],
//! [`Ipv4Net`], [`Ipv6Net`], [`HardwareAddr`], `chrono::NaiveDateTime` and `tracing::Level`.
//! These may also be wrapped in `Option`, which stays `None` until a default, an environment
//! variable or an argument sets it.
//!
//! Other types are registered with a [`TypeRegistry`], or derive
//! [`TextValue`](./derive/derive.TextValue.html) to be converted with their `FromStr`.
//! Fields of any other type are ignored.
//!
//! ### Naming
//! Flag names are derived from the path of a field through its groups, joined by `-`, and passed
//! through the field renamer ([`kebab_renamer`] by default, see [`with_field_renamer`]).
//! Environment variable names are only derived when an env renamer is configured, typically with
//! [`with_env`]: `with_env("APP")` names the variable of `database.pool_size` as
//! `APP_DATABASE_POOL_SIZE`.
//!
//! ### Logging
//! `flagfill` logs through [`tracing`](https://docs.rs/tracing): each registered flag and each
//! environment override is logged at `debug`, each ignored field at `trace`.
//! No subscriber is installed.

pub mod derive;
mod entry;

pub use entry::{parse, parse_from, Error};
pub use flagfill_builder::*;
