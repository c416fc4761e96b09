pub(crate) const TAG_DEFAULT: &str = "default";
pub(crate) const TAG_USAGE: &str = "usage";
pub(crate) const TAG_FLAG: &str = "flag";
pub(crate) const TAG_ENV: &str = "env";
pub(crate) const TAG_ALIASES: &str = "aliases";
pub(crate) const TAG_TYPE: &str = "type";
pub(crate) const TAG_FLATTEN: &str = "flatten";
pub(crate) const TAG_OVERRIDE_VALUE: &str = "override-value";
pub(crate) const TAG_LAYOUT: &str = "layout";

pub(crate) const HINT_DURATION: &str = "duration";
pub(crate) const HINT_STRING_SLICE: &str = "stringSlice";
pub(crate) const HINT_STRING_MAP: &str = "stringMap";

pub(crate) const PATH_SEPARATOR: &str = "-";
pub(crate) const DEFAULT_SPLIT_PATTERN: &str = ",";
pub(crate) const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d_%H:%M:%S";
