//! Record targets: the six address shapes a name can point at.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use bytes::{Buf, BufMut};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::compress::{Compressor, Decompressor};
use crate::constants::{RecordTag, HSKP, ICANNP};
use crate::errors::CodecError;
use crate::utils::{base32, base58};
use crate::wire;

/// Raw byte length of a v2 onion service identifier.
pub const ONION_SIZE: usize = 10;
/// Raw byte length of a v3 onion payload (32-byte key plus version byte).
pub const ONION_NG_SIZE: usize = 33;

const ONION_SUFFIX: &str = ".onion";
const ONION_V3_VERSION: u8 = 3;
const ONION_CHECKSUM_PREFIX: &[u8] = b".onion checksum";

/// A polymorphic record target.
///
/// The wire form is `{u8 kind}{body}`; the kind byte doubles as the
/// top-level record tag for host entries and for short-form canonical
/// names. Name payloads always carry their `.i` / `.h` suffix — the
/// suffix is stripped before the name enters the string dictionary and
/// re-appended on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Inet4(Ipv4Addr),
    Inet6(Ipv6Addr),
    Onion([u8; ONION_SIZE]),
    OnionNg([u8; ONION_NG_SIZE]),
    Iname(String),
    Hname(String),
}

impl Target {
    pub fn kind(&self) -> RecordTag {
        match self {
            Target::Inet4(_) => RecordTag::Inet4,
            Target::Inet6(_) => RecordTag::Inet6,
            Target::Onion(_) => RecordTag::Onion,
            Target::OnionNg(_) => RecordTag::OnionNg,
            Target::Iname(_) => RecordTag::Iname,
            Target::Hname(_) => RecordTag::Hname,
        }
    }

    pub fn is_inet(&self) -> bool {
        matches!(self, Target::Inet4(_) | Target::Inet6(_))
    }

    pub fn is_name(&self) -> bool {
        matches!(self, Target::Iname(_) | Target::Hname(_))
    }

    pub fn is_tor(&self) -> bool {
        matches!(self, Target::Onion(_) | Target::OnionNg(_))
    }

    /// The name as written to the wire: the stored value minus its
    /// TLD suffix marker.
    fn wire_name(&self) -> Option<&str> {
        match self {
            Target::Iname(name) => Some(name.strip_suffix(ICANNP).unwrap_or(name)),
            Target::Hname(name) => Some(name.strip_suffix(HSKP).unwrap_or(name)),
            _ => None,
        }
    }

    /// The fully-qualified DNS rendering of this target.
    ///
    /// Native names keep their `.h` TLD; ICANN names drop the `.i`
    /// marker and resolve at the real root. Address kinds render as
    /// their literal, which is only meaningful to callers that
    /// synthesize pointer names for them.
    pub fn to_dns(&self) -> String {
        match self {
            Target::Hname(name) => format!("{name}."),
            Target::Iname(name) => {
                format!("{}.", name.strip_suffix(ICANNP).unwrap_or(name))
            }
            _ => self.to_string(),
        }
    }

    /// Synthesizes the glue name for an inline IP: `_<base58(ip)>.<name>`.
    ///
    /// Returns `None` for non-IP targets.
    pub fn to_pointer(&self, name: &str) -> Option<String> {
        let hash = match self {
            Target::Inet4(ip) => base58::encode(&ip.octets()),
            Target::Inet6(ip) => base58::encode(&ip.octets()),
            _ => return None,
        };
        Some(format!("_{hash}.{name}"))
    }

    pub(crate) fn compress(&self, c: &mut Compressor) {
        if let Some(name) = self.wire_name() {
            c.add(name);
        }
    }

    pub(crate) fn encoded_size(&self, c: &Compressor) -> usize {
        let body = match self {
            Target::Inet4(_) => 4,
            Target::Inet6(ip) => ipv6_size(&ip.octets()),
            Target::Onion(_) => ONION_SIZE,
            Target::OnionNg(_) => ONION_NG_SIZE,
            Target::Iname(_) | Target::Hname(_) => {
                c.size(self.wire_name().unwrap_or_default())
            }
        };
        1 + body
    }

    /// Writes `{u8 kind}{body}`. For host entries and short-form
    /// canonical names the kind byte is also the top-level tag.
    pub(crate) fn write(&self, bw: &mut Vec<u8>, c: &Compressor) -> Result<(), CodecError> {
        bw.put_u8(self.kind().to_u8());
        match self {
            Target::Inet4(ip) => bw.put_slice(&ip.octets()),
            Target::Inet6(ip) => ipv6_write(bw, &ip.octets()),
            Target::Onion(raw) => bw.put_slice(raw),
            Target::OnionNg(raw) => bw.put_slice(raw),
            Target::Iname(_) | Target::Hname(_) => {
                c.write_string(bw, self.wire_name().unwrap_or_default())?;
            }
        }
        Ok(())
    }

    /// Reads a target body whose kind is already known from the tag byte.
    pub(crate) fn read<B: Buf>(
        br: &mut B,
        d: &Decompressor,
        kind: RecordTag,
    ) -> Result<Self, CodecError> {
        match kind {
            RecordTag::Inet4 => Ok(Target::Inet4(Ipv4Addr::from(wire::read_array::<B, 4>(br)?))),
            RecordTag::Inet6 => Ok(Target::Inet6(Ipv6Addr::from(ipv6_read(br)?))),
            RecordTag::Onion => Ok(Target::Onion(wire::read_array::<B, ONION_SIZE>(br)?)),
            RecordTag::OnionNg => Ok(Target::OnionNg(wire::read_array::<B, ONION_NG_SIZE>(br)?)),
            RecordTag::Iname => {
                let name = d.read_string(br)?;
                check_name(&name)?;
                Ok(Target::Iname(format!("{name}{ICANNP}")))
            }
            RecordTag::Hname => {
                let name = d.read_string(br)?;
                check_name(&name)?;
                Ok(Target::Hname(format!("{name}{HSKP}")))
            }
            other => Err(CodecError::InvalidTarget(format!(
                "tag {other} does not carry a target"
            ))),
        }
    }

    /// Reads `{u8 kind}{body}`, the form used by CANONICAL, DELEGATE,
    /// NS and SERVICE payloads.
    pub(crate) fn read_full<B: Buf>(br: &mut B, d: &Decompressor) -> Result<Self, CodecError> {
        let byte = wire::read_u8(br)?;
        let kind = RecordTag::from_u8(byte)
            .ok_or_else(|| CodecError::InvalidTarget(format!("unknown target kind {byte}")))?;
        Self::read(br, d, kind)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Inet4(ip) => ip.fmt(f),
            Target::Inet6(ip) => ip.fmt(f),
            Target::Onion(raw) => write!(f, "{}{ONION_SUFFIX}", base32::encode(raw)),
            Target::OnionNg(raw) => {
                let key = &raw[..32];
                let version = raw[32];
                let checksum = onion_checksum(key, version);
                let mut data = Vec::with_capacity(35);
                data.extend_from_slice(key);
                data.extend_from_slice(&checksum);
                data.push(version);
                write!(f, "{}{ONION_SUFFIX}", base32::encode(&data))
            }
            Target::Iname(name) | Target::Hname(name) => f.write_str(name),
        }
    }
}

impl FromStr for Target {
    type Err = CodecError;

    /// Parses a human target string, dispatching on the inferred address
    /// shape. Plain DNS names with no routing suffix resolve through the
    /// ICANN root and gain a `.i` marker.
    fn from_str(s: &str) -> Result<Self, CodecError> {
        let s = s.trim().trim_end_matches('.').to_ascii_lowercase();
        if s.is_empty() {
            return Err(CodecError::InvalidTarget("empty target".into()));
        }

        if let Ok(ip) = s.parse::<Ipv4Addr>() {
            return Ok(Target::Inet4(ip));
        }
        if let Ok(ip) = s.parse::<Ipv6Addr>() {
            // An IPv4-mapped literal is canonically an IPv4 target.
            if let Some(v4) = ip.to_ipv4_mapped() {
                return Ok(Target::Inet4(v4));
            }
            return Ok(Target::Inet6(ip));
        }

        if let Some(label) = s.strip_suffix(ONION_SUFFIX) {
            return parse_onion(label);
        }

        if let Some(name) = s.strip_suffix(ICANNP) {
            check_name(name)?;
            return Ok(Target::Iname(s.clone()));
        }
        if let Some(name) = s.strip_suffix(HSKP) {
            check_name(name)?;
            return Ok(Target::Hname(s.clone()));
        }

        check_name(&s)?;
        Ok(Target::Iname(format!("{s}{ICANNP}")))
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

fn parse_onion(label: &str) -> Result<Target, CodecError> {
    match label.len() {
        16 => {
            let raw = base32::decode(label)?;
            let raw: [u8; ONION_SIZE] = raw
                .try_into()
                .map_err(|_| CodecError::InvalidTarget(format!("bad onion label: {label}")))?;
            Ok(Target::Onion(raw))
        }
        56 => {
            let raw = base32::decode(label)?;
            if raw.len() != 35 {
                return Err(CodecError::InvalidTarget(format!(
                    "bad onion label: {label}"
                )));
            }
            let key = &raw[..32];
            let checksum = &raw[32..34];
            let version = raw[34];
            if version != ONION_V3_VERSION || checksum != onion_checksum(key, version).as_slice() {
                return Err(CodecError::InvalidTarget(format!(
                    "bad onion checksum: {label}"
                )));
            }
            let mut stored = [0u8; ONION_NG_SIZE];
            stored[..32].copy_from_slice(key);
            stored[32] = version;
            Ok(Target::OnionNg(stored))
        }
        _ => Err(CodecError::InvalidTarget(format!(
            "bad onion label length: {label}"
        ))),
    }
}

fn onion_checksum(key: &[u8], version: u8) -> [u8; 2] {
    let mut hasher = Sha3_256::new();
    hasher.update(ONION_CHECKSUM_PREFIX);
    hasher.update(key);
    hasher.update([version]);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}

/// Light name validation: dot-separated labels of up to 63 bytes from the
/// hostname alphabet (underscore included for service labels).
fn check_name(name: &str) -> Result<(), CodecError> {
    if name.is_empty() || name.len() > 255 {
        return Err(CodecError::InvalidTarget(format!("bad name: {name:?}")));
    }
    for label in name.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(CodecError::InvalidTarget(format!("bad name: {name:?}")));
        }
        let ok = label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if !ok {
            return Err(CodecError::InvalidTarget(format!("bad name: {name:?}")));
        }
    }
    Ok(())
}

/// IPv6 wire form: a 16-bit bitmap of which address bytes are nonzero
/// (bit `15 - i` for byte `i`), then the nonzero bytes in order.
fn ipv6_size(octets: &[u8; 16]) -> usize {
    2 + octets.iter().filter(|&&b| b != 0).count()
}

fn ipv6_write(bw: &mut Vec<u8>, octets: &[u8; 16]) {
    let mut bitmap = 0u16;
    for (i, &byte) in octets.iter().enumerate() {
        if byte != 0 {
            bitmap |= 1 << (15 - i);
        }
    }
    bw.put_u16(bitmap);
    for &byte in octets.iter() {
        if byte != 0 {
            bw.put_u8(byte);
        }
    }
}

fn ipv6_read<B: Buf>(br: &mut B) -> Result<[u8; 16], CodecError> {
    let bitmap = wire::read_u16(br)?;
    let mut octets = [0u8; 16];
    for (i, octet) in octets.iter_mut().enumerate() {
        if bitmap & (1 << (15 - i)) != 0 {
            *octet = wire::read_u8(br)?;
        }
    }
    Ok(octets)
}
