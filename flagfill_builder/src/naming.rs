use std::sync::Arc;

use convert_case::{Boundary, Case, Casing};

/// Maps a field's structural path (such as `inner-some_field`) to a flag or environment variable name.
pub type Renamer = Arc<dyn Fn(&str) -> String + Send + Sync>;

fn convert(name: &str, case: Case) -> String {
    name.remove_boundaries(&Boundary::digits()).to_case(case)
}

/// Converts names to kebab-case: `SomeGrouping-some_field` becomes `some-grouping-some-field`.
///
/// This is the default flag renamer.
pub fn kebab_renamer() -> Renamer {
    Arc::new(|name: &str| convert(name, Case::Kebab))
}

/// Converts names to SCREAMING_SNAKE_CASE: `inner-some_field` becomes `INNER_SOME_FIELD`.
pub fn screaming_snake_renamer() -> Renamer {
    Arc::new(|name: &str| convert(name, Case::Constant))
}

/// Converts names to snake_case.
pub fn snake_renamer() -> Renamer {
    Arc::new(|name: &str| convert(name, Case::Snake))
}

/// Prepends `prefix` to names.
pub fn prefix_renamer(prefix: impl Into<String>) -> Renamer {
    let prefix = prefix.into();
    Arc::new(move |name: &str| format!("{prefix}{name}"))
}

/// Applies each renamer in turn.
///
/// ### Example
/// ```
/// # use flagfill_builder as flagfill;
/// use flagfill::{composite_renamer, prefix_renamer, screaming_snake_renamer};
///
/// let renamer = composite_renamer([prefix_renamer("app-"), screaming_snake_renamer()]);
/// assert_eq!(renamer("listen_port"), "APP_LISTEN_PORT");
/// ```
pub fn composite_renamer(renamers: impl IntoIterator<Item = Renamer>) -> Renamer {
    let renamers: Vec<Renamer> = renamers.into_iter().collect();
    Arc::new(move |name: &str| {
        renamers
            .iter()
            .fold(name.to_string(), |name, renamer| renamer(&name))
    })
}
