use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::NaiveDateTime;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use thiserror::Error;
use tracing::Level;

use crate::api::Visit;
use crate::constant::TAG_LAYOUT;
use crate::types::TypeRegistry;

/// Errors converting hardware addresses from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Not a valid hardware (MAC) address.
    #[error("invalid MAC address {0}")]
    Hardware(String),
}

/// A hardware (MAC) address of 6, 8 or 20 bytes.
///
/// Parses the colon (`00:00:5e:00:53:01`), hyphen (`00-00-5e-00-53-01`) and
/// dot (`0000.5e00.5301`) separated forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HardwareAddr(Vec<u8>);

impl HardwareAddr {
    /// The raw bytes of the address.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HardwareAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::Hardware(s.to_string());
        let raw = s.as_bytes();

        if raw.len() < 14 {
            return Err(invalid());
        }

        let bytes = if raw[2] == b':' || raw[2] == b'-' {
            let separator = raw[2] as char;
            s.split(separator)
                .map(|group| hex_group(group, 2))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?
                .concat()
        } else if raw[4] == b'.' {
            s.split('.')
                .map(|group| hex_group(group, 4))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?
                .concat()
        } else {
            return Err(invalid());
        };

        match bytes.len() {
            6 | 8 | 20 => Ok(Self(bytes)),
            _ => Err(invalid()),
        }
    }
}

fn hex_group(group: &str, width: usize) -> Option<Vec<u8>> {
    if group.len() != width || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    (0..width)
        .step_by(2)
        .map(|i| u8::from_str_radix(&group[i..i + 2], 16).ok())
        .collect()
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self.0.iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "{}", groups.join(":"))
    }
}

impl Visit for IpAddr {}
impl Visit for Ipv4Addr {}
impl Visit for Ipv6Addr {}
impl Visit for IpNet {}
impl Visit for Ipv4Net {}
impl Visit for Ipv6Net {}
impl Visit for HardwareAddr {}
impl Visit for NaiveDateTime {}
impl Visit for Level {}

/// Register the network, time and log level types.
/// Timestamps parse with `time_layout` unless a field supplies its own `layout` tag.
pub(crate) fn register_extended(types: &TypeRegistry, time_layout: &str) {
    types.register(|text, _| IpAddr::from_str(text));
    types.register(|text, _| Ipv4Addr::from_str(text));
    types.register(|text, _| Ipv6Addr::from_str(text));
    // Networks keep only their prefix bits.
    types.register(|text, _| IpNet::from_str(text).map(|network| network.trunc()));
    types.register(|text, _| Ipv4Net::from_str(text).map(|network| network.trunc()));
    types.register(|text, _| Ipv6Net::from_str(text).map(|network| network.trunc()));
    types.register(|text, _| HardwareAddr::from_str(text));
    types.register(|text, _| Level::from_str(text));

    let time_layout = time_layout.to_string();
    types.register(move |text, tags| {
        let layout = tags.get(TAG_LAYOUT).unwrap_or(&time_layout);
        NaiveDateTime::parse_from_str(text, layout)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FillError, Filler};
    use crate::model::Field;
    use crate::parser::FlagSet;
    use crate::walker::Walker;
    use rstest::rstest;
    use std::any::Any;

    struct Holder<T> {
        value: T,
        text: String,
    }

    impl<T: Any> Visit for Holder<T> {
        fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), FillError> {
            let field = Field::new("value").tag("default", self.text.as_str());
            walker.terminal(&field, &mut self.value)
        }
    }

    fn convert<T: Any>(initial: T, text: &str) -> Result<String, String> {
        let mut holder = Holder {
            value: initial,
            text: text.to_string(),
        };
        let mut flags = FlagSet::new("program");

        match Filler::default().fill(&mut flags, &mut holder) {
            Ok(()) => Ok(flags.lookup("value").unwrap().render()),
            Err(FillError::Field { source, .. }) => match *source {
                FillError::Default { source, .. } => Err(source.message),
                other => Err(other.to_string()),
            },
            Err(other) => Err(other.to_string()),
        }
    }

    fn any_network() -> IpNet {
        "0.0.0.0/0".parse().unwrap()
    }

    #[rstest]
    #[case("192.168.1.7/24", "192.168.1.0/24")]
    #[case("10.0.0.1/32", "10.0.0.1/32")]
    #[case("10.1.2.3/0", "0.0.0.0/0")]
    #[case("2001:db8::1/32", "2001:db8::/32")]
    fn ip_network_masks(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(convert(any_network(), text), Ok(expected.to_string()));
    }

    #[test]
    fn ip_network_families() {
        let v4: Ipv4Net = "0.0.0.0/0".parse().unwrap();
        let v6: Ipv6Net = "::/0".parse().unwrap();
        assert_eq!(
            convert(v4, "172.16.5.4/12"),
            Ok("172.16.0.0/12".to_string())
        );
        assert_eq!(convert(v6, "fd00::1:2/64"), Ok("fd00::/64".to_string()));
        assert!(convert(v4, "fd00::1:2/64").is_err());
    }

    #[rstest]
    #[case("192.168.1.7")]
    #[case("192.168.1.7/33")]
    #[case("192.168.1/24")]
    #[case("::1/129")]
    #[case("a/b")]
    fn ip_network_invalid(#[case] text: &str) {
        assert_eq!(
            convert(any_network(), text),
            Err("invalid IP address syntax".to_string())
        );
    }

    #[rstest]
    #[case("00:00:5e:00:53:01", 6)]
    #[case("00-00-5E-00-53-01", 6)]
    #[case("0000.5e00.5301", 6)]
    #[case("02:00:5e:10:00:00:00:01", 8)]
    #[case("0200.5e10.0000.0001", 8)]
    #[case(
        "00:00:00:00:fe:80:00:00:00:00:00:00:02:00:5e:10:00:00:00:01",
        20
    )]
    fn hardware_addr_forms(#[case] text: &str, #[case] length: usize) {
        let address = HardwareAddr::from_str(text).unwrap();
        assert_eq!(address.bytes().len(), length);
    }

    #[test]
    fn hardware_addr_display() {
        let address = HardwareAddr::from_str("0000.5E00.5301").unwrap();
        assert_eq!(address.to_string(), "00:00:5e:00:53:01");
    }

    #[rstest]
    #[case("00:00:5e:00:53")]
    #[case("00:00:5e:00:53:0g")]
    #[case("00:00:5e-00:53:01")]
    #[case("0000.5e00.530")]
    #[case("00:00:5e:00:53:01:02")]
    #[case("not a mac address")]
    fn hardware_addr_invalid(#[case] text: &str) {
        assert_eq!(
            HardwareAddr::from_str(text),
            Err(AddressError::Hardware(text.to_string()))
        );
    }
}
