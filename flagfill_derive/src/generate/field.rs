use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;

use crate::model::{DeriveField, FieldKind};

impl From<DeriveField> for TokenStream2 {
    fn from(value: DeriveField) -> Self {
        let DeriveField {
            field_name,
            tags,
            kind,
        } = value;
        let name = field_name.unraw().to_string();
        let tags = tags.iter().map(|(key, text)| {
            quote! { .tag(#key, #text) }
        });
        let field = quote! { &::flagfill::Field::new(#name) #( #tags )* };

        match kind {
            FieldKind::Terminal => quote! {
                walker.terminal(#field, &mut self.#field_name)?;
            },
            FieldKind::Nested => quote! {
                ::flagfill::Visit::visit(&mut self.#field_name, walker, #field)?;
            },
            FieldKind::Pointer => quote! {
                walker.pointer(#field, &mut self.#field_name)?;
            },
            FieldKind::Optional => quote! {
                walker.optional(#field, &mut self.#field_name)?;
            },
            FieldKind::Skip => TokenStream2::default(),
        }
    }
}
