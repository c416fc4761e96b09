use crate::model::{DeriveValue, IntermediateAttributes};
use quote::ToTokens;
use syn::ext::IdentExt;

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let mut attributes = IntermediateAttributes::default();

        // Keys may be keywords (`type = ".."`), which do not parse as expressions.
        value.parse_nested_meta(|meta| {
            let key = match meta.path.get_ident() {
                Some(ident) => ident.unraw().to_string(),
                None => {
                    return Err(meta.error("Invalid - flag attribute keys must be identifiers."));
                }
            };

            if meta.input.peek(syn::Token![=]) {
                let expression: syn::Expr = meta.value()?.parse()?;
                attributes
                    .pairs
                    .entry(key)
                    .or_default()
                    .push(DeriveValue {
                        tokens: expression.to_token_stream(),
                    });
            } else {
                attributes.singletons.insert(key);
            }

            Ok(())
        })?;

        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Literal;
    use std::collections::{HashMap, HashSet};
    use syn::parse_quote;

    #[test]
    fn construct_derive_attributes_empty() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[flag()]
        };

        // Execute
        let derive_attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            derive_attributes,
            IntermediateAttributes {
                singletons: HashSet::default(),
                pairs: HashMap::default()
            }
        );
    }

    #[test]
    fn construct_derive_attributes() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[flag(flatten, usage = "123", type = "duration")]
        };

        // Execute
        let derive_attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            derive_attributes,
            IntermediateAttributes {
                singletons: HashSet::from(["flatten".to_string()]),
                pairs: HashMap::from([
                    (
                        "usage".to_string(),
                        vec![DeriveValue {
                            tokens: Literal::string("123").into_token_stream(),
                        }]
                    ),
                    (
                        "type".to_string(),
                        vec![DeriveValue {
                            tokens: Literal::string("duration").into_token_stream(),
                        }]
                    ),
                ])
            }
        );
    }

    #[test]
    fn construct_derive_attributes_multiple() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[flag(usage = "123", usage = "456")]
        };

        // Execute
        let derive_attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(derive_attributes.pairs["usage"].len(), 2);
    }

    #[test]
    fn construct_derive_attributes_extend() {
        let first: syn::Attribute = parse_quote! {
            #[flag(skip, usage = "123")]
        };
        let second: syn::Attribute = parse_quote! {
            #[flag(usage = "456", env = "X")]
        };
        let mut derive_attributes = IntermediateAttributes::try_from(&first).unwrap();

        derive_attributes.extend(IntermediateAttributes::try_from(&second).unwrap());

        assert_eq!(derive_attributes.singletons, HashSet::from(["skip".to_string()]));
        assert_eq!(derive_attributes.pairs["usage"].len(), 2);
        assert_eq!(derive_attributes.pairs["env"].len(), 1);
    }

    #[test]
    fn construct_derive_attributes_invalid() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[flag]
        };

        // Execute & verify
        assert!(IntermediateAttributes::try_from(&attribute).is_err());
    }

    #[test]
    fn construct_derive_attributes_invalid_path() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[flag(a::b = "boo")]
        };

        // Execute
        let error = IntermediateAttributes::try_from(&attribute).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - flag attribute keys must be identifiers."
        );
    }
}
