use crate::load::invalid_error;
use crate::model::{DeriveField, DeriveFill, DeriveTextValue};

impl TryFrom<syn::DeriveInput> for DeriveFill {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let struct_name = value.ident.clone();

        match &value.data {
            syn::Data::Struct(ds) => {
                let fields = match &ds.fields {
                    syn::Fields::Named(fields) => fields
                        .named
                        .iter()
                        .map(DeriveField::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                    syn::Fields::Unit => Vec::default(),
                    syn::Fields::Unnamed(_) => {
                        return Err(invalid_error(
                            struct_name.span(),
                            format!("`Fill` requires named fields, but `{struct_name}` is a tuple struct."),
                        ));
                    }
                };

                Ok(DeriveFill {
                    struct_name,
                    generics: value.generics,
                    fields,
                })
            }
            syn::Data::Enum(_) => Err(invalid_error(
                struct_name.span(),
                format!("can only fill from a struct, but `{struct_name}` is an enum."),
            )),
            syn::Data::Union(_) => Err(invalid_error(
                struct_name.span(),
                format!("can only fill from a struct, but `{struct_name}` is a union."),
            )),
        }
    }
}

impl From<syn::DeriveInput> for DeriveTextValue {
    fn from(value: syn::DeriveInput) -> Self {
        DeriveTextValue {
            type_name: value.ident,
            generics: value.generics,
        }
    }
}
