use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveFill, DeriveTextValue};

impl From<DeriveFill> for TokenStream2 {
    fn from(value: DeriveFill) -> Self {
        let DeriveFill {
            struct_name,
            generics,
            fields,
        } = value;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let fields = fields.into_iter().map(TokenStream2::from);

        quote! {
            impl #impl_generics ::flagfill::Visit for #struct_name #ty_generics #where_clause {
                fn visit<'flagfill>(
                    &'flagfill mut self,
                    walker: &mut ::flagfill::Walker<'flagfill, '_>,
                    field: &::flagfill::Field,
                ) -> ::std::result::Result<(), ::flagfill::FillError> {
                    walker.group(field, self)
                }

                #[allow(unused_variables)]
                fn walk<'flagfill>(
                    &'flagfill mut self,
                    walker: &mut ::flagfill::Walker<'flagfill, '_>,
                ) -> ::std::result::Result<(), ::flagfill::FillError> {
                    #( #fields )*
                    ::std::result::Result::Ok(())
                }
            }

            impl #impl_generics ::flagfill::Fill for #struct_name #ty_generics #where_clause {}
        }
    }
}

impl From<DeriveTextValue> for TokenStream2 {
    fn from(value: DeriveTextValue) -> Self {
        let DeriveTextValue {
            type_name,
            generics,
        } = value;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        quote! {
            impl #impl_generics ::flagfill::TextValue for #type_name #ty_generics #where_clause {
                fn parse_text(text: &str) -> ::std::result::Result<Self, ::std::string::String> {
                    <Self as ::std::str::FromStr>::from_str(text)
                        .map_err(|error| ::std::string::ToString::to_string(&error))
                }
            }

            impl #impl_generics ::flagfill::Visit for #type_name #ty_generics #where_clause {
                fn visit<'flagfill>(
                    &'flagfill mut self,
                    walker: &mut ::flagfill::Walker<'flagfill, '_>,
                    field: &::flagfill::Field,
                ) -> ::std::result::Result<(), ::flagfill::FillError> {
                    walker.text(field, self)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::test::simple_format;
    use crate::model::{DeriveField, FieldKind};
    use proc_macro2::Span;
    use std::collections::BTreeMap;

    #[test]
    fn render_derive_fill_empty() {
        // Setup
        let fill = DeriveFill {
            struct_name: ident("Config"),
            generics: syn::Generics::default(),
            fields: vec![],
        };

        // Execute
        let token_stream = TokenStream2::from(fill);

        // Verify
        assert_eq!(
            simple_format(token_stream.to_string()),
            r#"impl :: flagfill :: Visit for Config {
 fn visit < 'flagfill > (& 'flagfill mut self , walker : & mut :: flagfill :: Walker < 'flagfill , '_ > , field : & :: flagfill :: Field ,) -> :: std :: result :: Result < () , :: flagfill :: FillError > {
 walker . group (field , self) }
 # [allow (unused_variables)] fn walk < 'flagfill > (& 'flagfill mut self , walker : & mut :: flagfill :: Walker < 'flagfill , '_ > ,) -> :: std :: result :: Result < () , :: flagfill :: FillError > {
 :: std :: result :: Result :: Ok (()) }
 }
 impl :: flagfill :: Fill for Config {
 }
"#,
        );
    }

    #[test]
    fn render_derive_fill() {
        // Setup
        let fill = DeriveFill {
            struct_name: ident("Config"),
            generics: syn::Generics::default(),
            fields: vec![
                DeriveField {
                    field_name: ident("port"),
                    tags: BTreeMap::from([("default".to_string(), "80".to_string())]),
                    kind: FieldKind::Terminal,
                },
                DeriveField {
                    field_name: ident("hidden"),
                    tags: BTreeMap::default(),
                    kind: FieldKind::Skip,
                },
                DeriveField {
                    field_name: ident("inner"),
                    tags: BTreeMap::default(),
                    kind: FieldKind::Nested,
                },
            ],
        };

        // Execute
        let token_stream = TokenStream2::from(fill);

        // Verify
        let rendered = simple_format(token_stream.to_string());
        assert!(rendered.contains(
            r#"{
 walker . terminal (& :: flagfill :: Field :: new ("port") . tag ("default" , "80") , & mut self . port) ? ;
 :: flagfill :: Visit :: visit (& mut self . inner , walker , & :: flagfill :: Field :: new ("inner")) ? ;
 :: std :: result :: Result :: Ok (()) }
"#
        ));
        assert!(!rendered.contains("hidden"));
    }

    #[test]
    fn render_derive_text_value() {
        // Setup
        let text_value = DeriveTextValue {
            type_name: ident("Mode"),
            generics: syn::Generics::default(),
        };

        // Execute
        let token_stream = TokenStream2::from(text_value);

        // Verify
        assert_eq!(
            simple_format(token_stream.to_string()),
            r#"impl :: flagfill :: TextValue for Mode {
 fn parse_text (text : & str) -> :: std :: result :: Result < Self , :: std :: string :: String > {
 < Self as :: std :: str :: FromStr > :: from_str (text) . map_err (| error | :: std :: string :: ToString :: to_string (& error)) }
 }
 impl :: flagfill :: Visit for Mode {
 fn visit < 'flagfill > (& 'flagfill mut self , walker : & mut :: flagfill :: Walker < 'flagfill , '_ > , field : & :: flagfill :: Field ,) -> :: std :: result :: Result < () , :: flagfill :: FillError > {
 walker . text (field , self) }
 }
"#,
        );
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
