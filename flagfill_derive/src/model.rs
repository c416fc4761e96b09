use proc_macro2::TokenStream as TokenStream2;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        let st = &self.tokens.to_string();
        let ot = &other.tokens.to_string();
        st == ot
    }
}

impl Eq for DeriveValue {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

impl IntermediateAttributes {
    pub fn extend(&mut self, other: IntermediateAttributes) {
        self.singletons.extend(other.singletons);

        for (key, values) in other.pairs {
            self.pairs.entry(key).or_default().extend(values);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single flag, dispatched on the field's type at runtime.
    Terminal,
    /// A type which visits itself: a nested struct, or a registered type.
    Nested,
    /// An optional nested struct, filled with its default before being visited.
    Pointer,
    /// An optional registered type, left `None` until its flag is set.
    Optional,
    Skip,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveField {
    pub field_name: syn::Ident,
    pub tags: BTreeMap<String, String>,
    pub kind: FieldKind,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveFill {
    pub struct_name: syn::Ident,
    pub generics: syn::Generics,
    pub fields: Vec<DeriveField>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveTextValue {
    pub type_name: syn::Ident,
    pub generics: syn::Generics,
}
