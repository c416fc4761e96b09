//! Builder module for `flagfill`.
//! See [documentation root](https://docs.rs/flagfill/latest/flagfill/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod naming;
mod options;
mod parser;
#[allow(missing_docs)]
pub mod prelude;
mod types;
mod walker;

pub use api::*;
pub use model::*;
pub use naming::*;
pub use options::*;
pub use parser::{Flag, FlagSet, ParseError};
pub use types::{AddressError, HardwareAddr, IpNet, Ipv4Net, Ipv6Net, TypeRegistry};
pub use walker::Walker;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
