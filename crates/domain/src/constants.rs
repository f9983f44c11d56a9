//! Wire tags and the distinguished top-level domains.

use std::fmt;

/// The single-character TLD routing names through the ICANN root.
pub const ICANN: &str = "i";
/// The single-character native TLD.
pub const HSK: &str = "h";

/// `.i` suffix form, as it appears at the tail of a stored name target.
pub const ICANNP: &str = ".i";
/// `.h` suffix form.
pub const HSKP: &str = ".h";

/// `i.` fully-qualified form.
pub const ICANNS: &str = "i.";
/// `h.` fully-qualified form.
pub const HSKS: &str = "h.";

/// Currency symbol of native addresses in `ADDR` records.
pub const HSK_CURRENCY: &str = "hsk";

/// Top-level record tags of the name-record wire format.
///
/// The numeric values are part of the wire format and never change. Tags
/// 1-3 and 5 double as [`Target`](crate::Target) kind bytes: a host entry
/// is written without a separate tag, its kind byte is the tag. Any byte
/// value outside this registry decodes as an
/// [`ExtraRecord`](crate::ExtraRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    Inet4,
    Inet6,
    Onion,
    OnionNg,
    Iname,
    Hname,
    Canonical,
    Delegate,
    Ns,
    Service,
    Url,
    Email,
    Text,
    Location,
    Magnet,
    Ds,
    Tls,
    Ssh,
    Pgp,
    Addr,
}

impl RecordTag {
    pub fn to_u8(self) -> u8 {
        match self {
            RecordTag::Inet4 => 1,
            RecordTag::Inet6 => 2,
            RecordTag::Onion => 3,
            RecordTag::OnionNg => 5,
            RecordTag::Iname => 6,
            RecordTag::Hname => 7,
            RecordTag::Canonical => 8,
            RecordTag::Delegate => 9,
            RecordTag::Ns => 10,
            RecordTag::Service => 11,
            RecordTag::Url => 12,
            RecordTag::Email => 13,
            RecordTag::Text => 14,
            RecordTag::Location => 15,
            RecordTag::Magnet => 16,
            RecordTag::Ds => 17,
            RecordTag::Tls => 18,
            RecordTag::Ssh => 19,
            RecordTag::Pgp => 20,
            RecordTag::Addr => 21,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(RecordTag::Inet4),
            2 => Some(RecordTag::Inet6),
            3 => Some(RecordTag::Onion),
            5 => Some(RecordTag::OnionNg),
            6 => Some(RecordTag::Iname),
            7 => Some(RecordTag::Hname),
            8 => Some(RecordTag::Canonical),
            9 => Some(RecordTag::Delegate),
            10 => Some(RecordTag::Ns),
            11 => Some(RecordTag::Service),
            12 => Some(RecordTag::Url),
            13 => Some(RecordTag::Email),
            14 => Some(RecordTag::Text),
            15 => Some(RecordTag::Location),
            16 => Some(RecordTag::Magnet),
            17 => Some(RecordTag::Ds),
            18 => Some(RecordTag::Tls),
            19 => Some(RecordTag::Ssh),
            20 => Some(RecordTag::Pgp),
            21 => Some(RecordTag::Addr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTag::Inet4 => "INET4",
            RecordTag::Inet6 => "INET6",
            RecordTag::Onion => "ONION",
            RecordTag::OnionNg => "ONIONNG",
            RecordTag::Iname => "INAME",
            RecordTag::Hname => "HNAME",
            RecordTag::Canonical => "CANONICAL",
            RecordTag::Delegate => "DELEGATE",
            RecordTag::Ns => "NS",
            RecordTag::Service => "SERVICE",
            RecordTag::Url => "URL",
            RecordTag::Email => "EMAIL",
            RecordTag::Text => "TEXT",
            RecordTag::Location => "LOCATION",
            RecordTag::Magnet => "MAGNET",
            RecordTag::Ds => "DS",
            RecordTag::Tls => "TLS",
            RecordTag::Ssh => "SSH",
            RecordTag::Pgp => "PGP",
            RecordTag::Addr => "ADDR",
        }
    }

    /// True for the four kinds that land in the `hosts` list.
    pub fn is_host(&self) -> bool {
        matches!(
            self,
            RecordTag::Inet4 | RecordTag::Inet6 | RecordTag::Onion | RecordTag::OnionNg
        )
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_values_are_wire_fixed() {
        assert_eq!(RecordTag::Inet4.to_u8(), 1);
        assert_eq!(RecordTag::OnionNg.to_u8(), 5);
        assert_eq!(RecordTag::Canonical.to_u8(), 8);
        assert_eq!(RecordTag::Addr.to_u8(), 21);
    }

    #[test]
    fn tag_round_trip() {
        for value in 0..=255u8 {
            if let Some(tag) = RecordTag::from_u8(value) {
                assert_eq!(tag.to_u8(), value);
            }
        }
        // 4 was never assigned; it must fall through to Extra.
        assert_eq!(RecordTag::from_u8(4), None);
        assert_eq!(RecordTag::from_u8(0), None);
        assert_eq!(RecordTag::from_u8(22), None);
    }
}
