use terminal_size::{terminal_size, Width};

use crate::api::Value;
use crate::parser::{chunk, Flag, UserInterface};

// Renders as 8 columns on a standard tab stop.
const USAGE_INDENT: &str = "    \t";
const USAGE_INDENT_WIDTH: usize = 8;
// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_USAGE_WIDTH: usize = 17;

/// Prints the defaults of a flag set, one entry per flag.
pub(crate) struct Printer {
    terminal_width: Option<usize>,
}

impl Printer {
    /// A printer which wraps usage text to the width of the console, if any.
    pub(crate) fn terminal() -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(terminal_width)
    }

    pub(crate) fn new(terminal_width: Option<usize>) -> Self {
        Self { terminal_width }
    }

    pub(crate) fn print_defaults<'f, 'a: 'f>(
        &self,
        flags: impl IntoIterator<Item = &'f Flag<'a>>,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        for flag in flags {
            user_interface.print(self.render(flag));
        }
    }

    /// Render the entry for a single flag:
    /// ```text
    ///   -name placeholder
    ///     	usage (default value)
    /// ```
    /// A single character name without a placeholder keeps the usage on the same line.
    pub(crate) fn render(&self, flag: &Flag<'_>) -> String {
        let (placeholder, mut usage) = unquote_usage(flag.usage(), flag.value());
        let mut entry = format!("  -{}", flag.name());

        if !placeholder.is_empty() {
            entry.push(' ');
            entry.push_str(placeholder.as_str());
        }

        if entry.len() <= 4 {
            entry.push('\t');
        } else {
            entry.push('\n');
            entry.push_str(USAGE_INDENT);
        }

        if !is_zero_value(flag.value(), flag.default_text()) {
            if flag.value().type_name() == "string" {
                usage.push_str(format!(" (default {:?})", flag.default_text()).as_str());
            } else {
                usage.push_str(format!(" (default {})", flag.default_text()).as_str());
            }
        }

        let lines: Vec<String> = match self.terminal_width {
            Some(width) => {
                let width = std::cmp::max(
                    width.saturating_sub(USAGE_INDENT_WIDTH),
                    MINIMUM_USAGE_WIDTH,
                );
                usage
                    .split('\n')
                    .flat_map(|paragraph| chunk(paragraph, width))
                    .collect()
            }
            None => usage.split('\n').map(str::to_string).collect(),
        };

        entry.push_str(lines.join(&format!("\n{USAGE_INDENT}")).as_str());
        entry
    }
}

/// Extract the value placeholder from a usage message.
/// The first back-quoted span names the placeholder and loses its quotes; otherwise the
/// placeholder is the kind of the value (none for boolean flags).
pub(crate) fn unquote_usage(usage: &str, value: &dyn Value) -> (String, String) {
    if let Some(start) = usage.find('`') {
        if let Some(length) = usage[start + 1..].find('`') {
            let end = start + 1 + length;
            let placeholder = &usage[start + 1..end];
            return (
                placeholder.to_string(),
                format!("{}{placeholder}{}", &usage[..start], &usage[end + 1..]),
            );
        }
    }

    if value.is_bool_flag() {
        (String::default(), usage.to_string())
    } else {
        (value.type_name().to_string(), usage.to_string())
    }
}

fn is_zero_value(value: &dyn Value, default_text: &str) -> bool {
    let zero = match value.type_name() {
        "bool" => "false",
        "int" | "uint" | "float" => "0",
        "duration" => "0s",
        _ => "",
    };

    default_text.is_empty() || default_text == zero
}
