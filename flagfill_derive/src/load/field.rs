use crate::load::invalid_error;
use crate::model::{DeriveField, DeriveValue, FieldKind, IntermediateAttributes};
use std::collections::BTreeMap;
use syn::spanned::Spanned;

// Types the walker dispatches on directly; they never implement `Visit`.
const TERMINAL_TYPES: &[&str] = &[
    "String", "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8",
    "u16", "u32", "u64", "u128", "usize", "Duration", "Vec", "VecDeque", "HashMap", "BTreeMap",
    "HashSet", "BTreeSet", "PathBuf", "OsString",
];

// Registered types: optional flags inside `Option`, never optional groups.
const SCALAR_TYPES: &[&str] = &[
    "IpAddr",
    "Ipv4Addr",
    "Ipv6Addr",
    "IpNet",
    "Ipv4Net",
    "Ipv6Net",
    "HardwareAddr",
    "NaiveDateTime",
    "Level",
];

impl TryFrom<&syn::Field> for DeriveField {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value
            .ident
            .clone()
            .ok_or_else(|| invalid_error(value.span(), "flag fields must be named."))?;
        let mut attributes = IntermediateAttributes::default();

        for attribute in &value.attrs {
            if attribute.path().is_ident("flag") {
                attributes.extend(IntermediateAttributes::try_from(attribute)?);
            }
        }

        let mut tags = BTreeMap::default();
        let mut skip = false;

        for singleton in &attributes.singletons {
            match singleton.as_str() {
                "skip" => skip = true,
                "flatten" => insert_tag(&field_name, &mut tags, "flatten", "true".to_string())?,
                "override_value" => insert_tag(
                    &field_name,
                    &mut tags,
                    "override-value",
                    "true".to_string(),
                )?,
                other => {
                    return Err(invalid_error(
                        field_name.span(),
                        format!("unknown flag attribute `{other}`."),
                    ));
                }
            }
        }

        for (key, values) in &attributes.pairs {
            let [value] = values.as_slice() else {
                return Err(invalid_error(
                    field_name.span(),
                    format!("flag attribute `{key}` may only be specified once."),
                ));
            };
            let text = literal_text(&field_name, key, value)?;
            let tag = match key.as_str() {
                "name" | "flag" => "flag",
                "override_value" => "override-value",
                other => other,
            };
            insert_tag(&field_name, &mut tags, tag, text)?;
        }

        let exported = !matches!(value.vis, syn::Visibility::Inherited);
        let unnamed = matches!(tags.get("flag"), Some(name) if name.is_empty());
        let kind = if skip || unnamed || !exported {
            FieldKind::Skip
        } else {
            classify(&value.ty, tags.contains_key("type"))
        };

        Ok(DeriveField {
            field_name,
            tags,
            kind,
        })
    }
}

fn insert_tag(
    field_name: &syn::Ident,
    tags: &mut BTreeMap<String, String>,
    tag: &str,
    text: String,
) -> Result<(), syn::Error> {
    if tags.insert(tag.to_string(), text).is_some() {
        return Err(invalid_error(
            field_name.span(),
            format!("flag attribute `{tag}` may only be specified once."),
        ));
    }

    Ok(())
}

fn literal_text(
    field_name: &syn::Ident,
    key: &str,
    value: &DeriveValue,
) -> Result<String, syn::Error> {
    match syn::parse2::<syn::Lit>(value.tokens.clone()) {
        Ok(syn::Lit::Str(text)) => Ok(text.value()),
        Ok(syn::Lit::Bool(flag)) => Ok(flag.value.to_string()),
        Ok(syn::Lit::Int(number)) => Ok(number.base10_digits().to_string()),
        Ok(syn::Lit::Float(number)) => Ok(number.base10_digits().to_string()),
        _ => Err(invalid_error(
            field_name.span(),
            format!(
                "flag attribute `{key}` expects a literal, found `{}`.",
                value.tokens
            ),
        )),
    }
}

fn classify(ty: &syn::Type, hinted: bool) -> FieldKind {
    match ty {
        syn::Type::Path(path) if path.qself.is_none() => match path.path.segments.last() {
            Some(segment) => {
                let ident = segment.ident.to_string();

                match ident.as_str() {
                    "Option" => match generic_argument(segment) {
                        Some(inner) if is_registered(inner) => FieldKind::Optional,
                        Some(inner) if !is_scalar(inner) => FieldKind::Pointer,
                        _ => FieldKind::Skip,
                    },
                    "Box" if generic_argument(segment).map_or(true, is_scalar) => FieldKind::Skip,
                    _ if hinted || TERMINAL_TYPES.contains(&ident.as_str()) => FieldKind::Terminal,
                    _ => FieldKind::Nested,
                }
            }
            None => FieldKind::Skip,
        },
        syn::Type::Tuple(_) | syn::Type::Array(_) => FieldKind::Terminal,
        syn::Type::Paren(paren) => classify(&paren.elem, hinted),
        syn::Type::Group(group) => classify(&group.elem, hinted),
        // References, raw pointers, functions and trait objects.
        _ => FieldKind::Skip,
    }
}

fn is_scalar(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => match path.path.segments.last() {
            Some(segment) if segment.ident == "Box" => {
                generic_argument(segment).map_or(true, is_scalar)
            }
            Some(segment) => {
                let ident = segment.ident.to_string();
                TERMINAL_TYPES.contains(&ident.as_str()) || SCALAR_TYPES.contains(&ident.as_str())
            }
            None => true,
        },
        syn::Type::Paren(paren) => is_scalar(&paren.elem),
        syn::Type::Group(group) => is_scalar(&group.elem),
        _ => true,
    }
}

fn is_registered(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .map_or(false, |segment| SCALAR_TYPES.contains(&segment.ident.to_string().as_str())),
        syn::Type::Paren(paren) => is_registered(&paren.elem),
        syn::Type::Group(group) => is_registered(&group.elem),
        _ => false,
    }
}

fn generic_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(arguments) => {
            arguments.args.iter().find_map(|argument| match argument {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use syn::parse_quote;

    #[test]
    fn construct_derive_field() {
        // Setup
        let field: syn::Field = parse_quote! {
            #[flag(default = "localhost", usage = "the [host] to bind", aliases = "h")]
            pub host: String
        };

        // Execute
        let derive_field = DeriveField::try_from(&field).unwrap();

        // Verify
        assert_eq!(
            derive_field,
            DeriveField {
                field_name: ident("host"),
                tags: BTreeMap::from([
                    ("aliases".to_string(), "h".to_string()),
                    ("default".to_string(), "localhost".to_string()),
                    ("usage".to_string(), "the [host] to bind".to_string()),
                ]),
                kind: FieldKind::Terminal,
            }
        );
    }

    #[test]
    fn construct_derive_field_tags() {
        // Setup
        let field: syn::Field = parse_quote! {
            #[flag(name = "renamed", type = "duration", flatten, override_value = true)]
            #[flag(default = 5, layout = "%Y", custom = "kept")]
            pub timeout: i64
        };

        // Execute
        let derive_field = DeriveField::try_from(&field).unwrap();

        // Verify
        assert_eq!(
            derive_field.tags,
            BTreeMap::from([
                ("custom".to_string(), "kept".to_string()),
                ("default".to_string(), "5".to_string()),
                ("flag".to_string(), "renamed".to_string()),
                ("flatten".to_string(), "true".to_string()),
                ("layout".to_string(), "%Y".to_string()),
                ("override-value".to_string(), "true".to_string()),
                ("type".to_string(), "duration".to_string()),
            ])
        );
        assert_eq!(derive_field.kind, FieldKind::Terminal);
    }

    #[test]
    fn construct_derive_field_skipped() {
        let fields: Vec<syn::Field> = vec![
            parse_quote! { hidden: String },
            parse_quote! { #[flag(skip)] pub skipped: String },
            parse_quote! { #[flag(name = "")] pub unnamed: String },
            parse_quote! { #[flag(flag = "")] pub unflagged: String },
            parse_quote! { pub reference: &'static str },
            parse_quote! { pub pointer: *const u8 },
            parse_quote! { pub optional: Option<String> },
            parse_quote! { pub optional_box: Option<Box<u32>> },
            parse_quote! { pub optional_boxed_address: Option<Box<IpAddr>> },
            parse_quote! { pub boxed: Box<u32> },
        ];

        for field in &fields {
            let derive_field = DeriveField::try_from(field).unwrap();
            assert_eq!(
                derive_field.kind,
                FieldKind::Skip,
                "{}",
                derive_field.field_name
            );
        }
    }

    #[test]
    fn construct_derive_field_kinds() {
        let fields: Vec<(syn::Field, FieldKind)> = vec![
            (parse_quote! { pub count: u32 }, FieldKind::Terminal),
            (parse_quote! { pub timeout: std::time::Duration }, FieldKind::Terminal),
            (parse_quote! { pub names: Vec<String> }, FieldKind::Terminal),
            (parse_quote! { pub labels: HashMap<String, String> }, FieldKind::Terminal),
            (parse_quote! { pub pair: (u8, u8) }, FieldKind::Terminal),
            (parse_quote! { pub bytes: [u8; 4] }, FieldKind::Terminal),
            (parse_quote! { #[flag(type = "duration")] pub nanos: Nanos }, FieldKind::Terminal),
            (parse_quote! { pub inner: Inner }, FieldKind::Nested),
            (parse_quote! { pub address: IpAddr }, FieldKind::Nested),
            (parse_quote! { pub boxed: Box<Inner> }, FieldKind::Nested),
            (parse_quote! { pub(crate) restricted: Inner }, FieldKind::Nested),
            (parse_quote! { pub optional: Option<Inner> }, FieldKind::Pointer),
            (parse_quote! { pub optional_box: Option<Box<Inner>> }, FieldKind::Pointer),
            (parse_quote! { pub optional_address: Option<IpAddr> }, FieldKind::Optional),
            (parse_quote! { pub network: Option<ipnet::IpNet> }, FieldKind::Optional),
            (parse_quote! { pub started: Option<NaiveDateTime> }, FieldKind::Optional),
            (parse_quote! { #[flag(default = "info")] pub level: Option<Level> }, FieldKind::Optional),
        ];

        for (field, expected) in &fields {
            let derive_field = DeriveField::try_from(field).unwrap();
            assert_eq!(derive_field.kind, *expected, "{}", derive_field.field_name);
        }
    }

    #[test]
    fn construct_derive_field_invalid() {
        let unknown: syn::Field = parse_quote! { #[flag(bogus)] pub field: String };
        let repeated: syn::Field = parse_quote! { #[flag(usage = "a", usage = "b")] pub field: String };
        let renamed: syn::Field = parse_quote! { #[flag(name = "a", flag = "b")] pub field: String };
        let expression: syn::Field = parse_quote! { #[flag(default = some::path)] pub field: String };

        assert_eq!(
            DeriveField::try_from(&unknown).unwrap_err().to_string(),
            "Invalid - unknown flag attribute `bogus`."
        );
        assert_eq!(
            DeriveField::try_from(&repeated).unwrap_err().to_string(),
            "Invalid - flag attribute `usage` may only be specified once."
        );
        assert_eq!(
            DeriveField::try_from(&renamed).unwrap_err().to_string(),
            "Invalid - flag attribute `flag` may only be specified once."
        );
        assert_eq!(
            DeriveField::try_from(&expression).unwrap_err().to_string(),
            "Invalid - flag attribute `default` expects a literal, found `some :: path`."
        );
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
