use std::time::Duration;

/// A built-in value kind with a native text conversion.
///
/// Implemented for `String`, `bool`, `f64`, `Duration`, and the signed and unsigned integer types
/// which map onto the "int" and "uint" kinds.
/// Newtypes over a primitive may be registered through [`TypeRegistry::register_via`](crate::TypeRegistry::register_via).
pub trait Primitive: Sized + 'static {
    /// The name of the kind, reported in conversion errors.
    const KIND: &'static str;

    /// The placeholder shown for the kind when printing flag defaults.
    const PLACEHOLDER: &'static str;

    /// Whether flags of this kind may be given without a value.
    const IS_BOOL: bool = false;

    /// Convert text into the primitive.
    fn parse_text(text: &str) -> Result<Self, String>;

    /// Render the primitive back to text.
    fn render_text(&self) -> String;
}

impl Primitive for String {
    const KIND: &'static str = "string";
    const PLACEHOLDER: &'static str = "string";

    fn parse_text(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }

    fn render_text(&self) -> String {
        self.clone()
    }
}

impl Primitive for bool {
    const KIND: &'static str = "bool";
    const PLACEHOLDER: &'static str = "bool";
    const IS_BOOL: bool = true;

    fn parse_text(text: &str) -> Result<Self, String> {
        parse_bool(text)
    }

    fn render_text(&self) -> String {
        self.to_string()
    }
}

impl Primitive for f64 {
    const KIND: &'static str = "float64";
    const PLACEHOLDER: &'static str = "float";

    fn parse_text(text: &str) -> Result<Self, String> {
        text.parse::<f64>().map_err(|error| error.to_string())
    }

    fn render_text(&self) -> String {
        self.to_string()
    }
}

impl Primitive for Duration {
    const KIND: &'static str = "duration";
    const PLACEHOLDER: &'static str = "duration";

    fn parse_text(text: &str) -> Result<Self, String> {
        parse_duration(text)
    }

    fn render_text(&self) -> String {
        format_duration(*self)
    }
}

macro_rules! integer_primitive {
    ($type:ty, $kind:literal, $placeholder:literal) => {
        impl Primitive for $type {
            const KIND: &'static str = $kind;
            const PLACEHOLDER: &'static str = $placeholder;

            fn parse_text(text: &str) -> Result<Self, String> {
                text.parse::<$type>().map_err(|error| error.to_string())
            }

            fn render_text(&self) -> String {
                self.to_string()
            }
        }
    };
}

integer_primitive!(i64, "int64", "int");
integer_primitive!(i32, "int", "int");
integer_primitive!(isize, "int", "int");
integer_primitive!(u64, "uint64", "uint");
integer_primitive!(u32, "uint", "uint");
integer_primitive!(usize, "uint", "uint");

/// Parse a boolean the way flag values are conventionally spelled.
///
/// Accepts `1, t, T, TRUE, true, True` and `0, f, F, FALSE, false, False`.
pub fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("invalid syntax '{text}'")),
    }
}

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parse a duration such as `300ms`, `1.5h` or `2h45m`.
///
/// A duration is a sequence of decimal numbers, each with an optional fraction and a unit suffix.
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
/// The bare `0` needs no unit.
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    if rest.is_empty() {
        return Err(format!("invalid duration '{text}'"));
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let whole_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let whole_digits = &rest[..whole_end];
        rest = &rest[whole_end..];

        let mut fraction_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let fraction_end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            fraction_digits = &after_dot[..fraction_end];
            rest = &after_dot[fraction_end..];
        }

        if whole_digits.is_empty() && fraction_digits.is_empty() {
            return Err(format!("invalid duration '{text}'"));
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        if unit.is_empty() {
            return Err(format!("missing unit in duration '{text}'"));
        }

        let scale = unit_nanos(unit)
            .ok_or_else(|| format!("unknown unit '{unit}' in duration '{text}'"))?;
        let whole: u128 = if whole_digits.is_empty() {
            0
        } else {
            whole_digits
                .parse::<u128>()
                .map_err(|_| format!("invalid duration '{text}'"))?
        };
        let mut fraction: u128 = 0;
        let mut divisor: u128 = 1;

        // Digits beyond nanosecond precision do not contribute.
        for digit in fraction_digits.bytes().take(18) {
            fraction = fraction * 10 + u128::from(digit - b'0');
            divisor *= 10;
        }

        total = whole
            .checked_mul(scale)
            .and_then(|nanos| nanos.checked_add(fraction * scale / divisor))
            .and_then(|nanos| nanos.checked_add(total))
            .ok_or_else(|| format!("invalid duration '{text}'"))?;
    }

    if negative && total != 0 {
        return Err(format!("negative duration '{text}'"));
    }

    let nanos = u64::try_from(total).map_err(|_| format!("invalid duration '{text}'"))?;
    Ok(Duration::from_nanos(nanos))
}

/// Render a duration in the same notation accepted by [`parse_duration`].
///
/// Durations under one second use the largest fitting sub-second unit (`250ms`, `1.5µs`);
/// longer durations are rendered as hours, minutes and seconds (`1h30m0s`, `2.5s`).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < SECOND {
        let (unit, scale) = if nanos < MICROSECOND {
            ("ns", NANOSECOND)
        } else if nanos < MILLISECOND {
            ("µs", MICROSECOND)
        } else {
            ("ms", MILLISECOND)
        };
        return format!("{}{unit}", decimal(nanos, scale));
    }

    let hours = nanos / HOUR;
    let minutes = (nanos % HOUR) / MINUTE;
    let seconds = decimal(nanos % MINUTE, SECOND);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;

    if fraction == 0 {
        return whole.to_string();
    }

    let width = scale.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("t", true)]
    #[case("T", true)]
    #[case("TRUE", true)]
    #[case("true", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("f", false)]
    #[case("F", false)]
    #[case("FALSE", false)]
    #[case("false", false)]
    #[case("False", false)]
    fn parse_bool_accepted(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(parse_bool(text), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("yes")]
    #[case("tRUE")]
    #[case("2")]
    fn parse_bool_rejected(#[case] text: &str) {
        assert_matches!(parse_bool(text), Err(_));
    }

    #[rstest]
    #[case("0", Duration::ZERO)]
    #[case("-0", Duration::ZERO)]
    #[case("5s", Duration::from_secs(5))]
    #[case("+5s", Duration::from_secs(5))]
    #[case("300ms", Duration::from_millis(300))]
    #[case("1.5h", Duration::from_secs(5400))]
    #[case("2h45m", Duration::from_secs(9900))]
    #[case("1m30.5s", Duration::from_millis(90_500))]
    #[case(".5s", Duration::from_millis(500))]
    #[case("10us", Duration::from_micros(10))]
    #[case("10µs", Duration::from_micros(10))]
    #[case("7ns", Duration::from_nanos(7))]
    fn parse_duration_valid(#[case] text: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(text), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("5")]
    #[case("s")]
    #[case(".s")]
    #[case("5x")]
    #[case("-5s")]
    #[case("abc")]
    fn parse_duration_invalid(#[case] text: &str) {
        assert_matches!(parse_duration(text), Err(_));
    }

    #[rstest]
    #[case(Duration::ZERO, "0s")]
    #[case(Duration::from_nanos(1), "1ns")]
    #[case(Duration::from_nanos(1_500), "1.5µs")]
    #[case(Duration::from_millis(250), "250ms")]
    #[case(Duration::from_secs(5), "5s")]
    #[case(Duration::from_millis(2_500), "2.5s")]
    #[case(Duration::from_secs(600), "10m0s")]
    #[case(Duration::from_secs(5400), "1h30m0s")]
    #[case(Duration::from_secs(9900), "2h45m0s")]
    fn format_duration_cases(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(duration), expected);
    }

    #[test]
    fn integer_primitives() {
        assert_eq!(i64::parse_text("-12"), Ok(-12));
        assert_eq!(u32::parse_text("12"), Ok(12));
        assert_matches!(u64::parse_text("-1"), Err(_));
        assert_matches!(i32::parse_text("1.5"), Err(_));
        assert_eq!(<i64 as Primitive>::PLACEHOLDER, "int");
        assert_eq!(<u64 as Primitive>::KIND, "uint64");
    }

    #[test]
    fn float_primitive() {
        assert_eq!(f64::parse_text("1.25"), Ok(1.25));
        assert_eq!(1.5f64.render_text(), "1.5");
        assert_matches!(f64::parse_text("one"), Err(_));
    }
}
