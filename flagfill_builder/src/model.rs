use std::collections::BTreeMap;

use crate::api::parse_bool;
use crate::constant::*;

/// The `#[flag(...)]` metadata of a single field, as flat `key = value` pairs.
///
/// Keys understood by the walker are `default`, `usage`, `flag`, `env`, `aliases`, `type`,
/// `flatten`, `override-value` and `layout`.
/// Any other key is retained so that custom converters may consult it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: BTreeMap<String, String>,
}

impl Tags {
    /// Create an empty set of tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get the value of the tag `key`, if present.
    /// A present but empty tag yields `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the tag `key` is present (with any value).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the tag `key` is present and its value parses as a true boolean.
    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.get(key).map(parse_bool), Some(Ok(true)))
    }

    /// Iterate the tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::default();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

/// Describes one field of a struct being filled: its structural name and its tags.
///
/// Values of this type are produced by `#[derive(Fill)]`, one per visible field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    tags: Tags,
}

impl Field {
    /// Describe the field `name`, without any tags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Tags::default(),
        }
    }

    /// Attach the tag `key = value` to this field.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// The structural (source) name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tags of the field.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// An explicitly empty flag name means the field produces no flag at all.
    pub fn is_skipped(&self) -> bool {
        self.tags.get(TAG_FLAG) == Some("")
    }

    /// A flattened group contributes no segment to the structural path of its fields.
    pub fn is_flattened(&self) -> bool {
        self.tags.get(TAG_FLATTEN) == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn tags_last_insert_wins() {
        // Setup
        let mut tags = Tags::new();

        // Execute
        tags.insert("usage", "first");
        tags.insert("usage", "second");

        // Verify
        assert_eq!(tags.get("usage"), Some("second"));
        assert_eq!(tags.get("default"), None);
    }

    #[test]
    fn tags_empty_value() {
        let tags = Tags::from_iter([("env", "")]);
        assert!(tags.contains("env"));
        assert_eq!(tags.get("env"), Some(""));
    }

    #[rstest]
    #[case("true", true)]
    #[case("T", true)]
    #[case("1", true)]
    #[case("false", false)]
    #[case("yes", false)]
    #[case("", false)]
    fn tags_is_true(#[case] value: &str, #[case] expected: bool) {
        let tags = Tags::from_iter([("override-value", value)]);
        assert_eq!(tags.is_true("override-value"), expected);
    }

    #[test]
    fn tags_iter_ordered() {
        let tags = Tags::from_iter([("usage", "u"), ("default", "d"), ("custom", "c")]);
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec![("custom", "c"), ("default", "d"), ("usage", "u")]
        );
    }

    #[test]
    fn field_skipped() {
        assert!(Field::new("a").tag("flag", "").is_skipped());
        assert!(!Field::new("a").tag("flag", "b").is_skipped());
        assert!(!Field::new("a").is_skipped());
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    #[case(Some(""), false)]
    #[case(None, false)]
    fn field_flattened(#[case] value: Option<&str>, #[case] expected: bool) {
        let mut field = Field::new("inner");
        if let Some(value) = value {
            field = field.tag("flatten", value);
        }
        assert_eq!(field.is_flattened(), expected);
    }
}
