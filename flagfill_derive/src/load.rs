mod attribute;
mod field;
mod fill;

pub(self) fn invalid_error(span: proc_macro2::Span, message: impl Into<String>) -> syn::Error {
    syn::Error::new(span, format!("Invalid - {}", message.into()))
}
