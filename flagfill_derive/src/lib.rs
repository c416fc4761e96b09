//! Derive macros for `flagfill`.
//! See [documentation root](https://docs.rs/flagfill/latest/flagfill/index.html) for full details.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::{DeriveFill, DeriveTextValue};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Derive `Visit` and `Fill` for a struct with named fields.
/// Each `pub` field becomes a flag, or a group of flags for nested structs.
#[proc_macro_derive(Fill, attributes(flag))]
pub fn fill(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveFill::try_from(derive_input) {
        Ok(fill) => TokenStream2::from(fill).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// Derive `TextValue` and `Visit` for a `FromStr + Display` type, so it can be used as a flag.
#[proc_macro_derive(TextValue)]
pub fn text_value(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);
    TokenStream2::from(DeriveTextValue::from(derive_input)).into()
}
