//! The per-name record set and its wire codec.
//!
//! A `Resource` is an immutable value object. Encoding builds a fresh
//! string dictionary, sizes the blob exactly, and writes fields in a
//! fixed canonical order; decoding reads the dictionary once and then
//! dispatches on tag bytes until the buffer is exhausted.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::addr::AddrRecord;
use crate::compress::{Compressor, Decompressor};
use crate::constants::RecordTag;
use crate::ds::DsRecord;
use crate::errors::CodecError;
use crate::extra::ExtraRecord;
use crate::location::LocationRecord;
use crate::magnet::MagnetRecord;
use crate::service::ServiceRecord;
use crate::ssh::{PgpRecord, SshRecord};
use crate::target::Target;
use crate::tls::TlsRecord;
use crate::wire;

/// TTLs travel as a u16 count of 64-second units.
const TTL_SHIFT: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub version: u8,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate: Option<Target>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ns: Vec<Target>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<ServiceRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<LocationRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub magnet: Vec<MagnetRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ds: Vec<DsRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tls: Vec<TlsRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh: Vec<SshRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pgp: Vec<PgpRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addr: Vec<AddrRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ExtraRecord>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The TTL every synthesized DNS record carries: the stored value
    /// quantized to the wire granularity.
    pub fn dns_ttl(&self) -> u32 {
        self.ttl & !((1 << TTL_SHIFT) - 1)
    }

    fn validate(&self) -> Result<(), CodecError> {
        if self.version != 0 {
            return Err(CodecError::UnknownVersion(self.version));
        }
        for host in &self.hosts {
            if !host.is_inet() && !host.is_tor() {
                return Err(CodecError::InvalidTarget(format!(
                    "host target must be an address: {host}"
                )));
            }
        }
        for target in [&self.canonical, &self.delegate].into_iter().flatten() {
            if !target.is_name() {
                return Err(CodecError::InvalidTarget(format!(
                    "canonical and delegate targets must be names: {target}"
                )));
            }
        }
        for (field, list) in [
            ("url", &self.url),
            ("email", &self.email),
            ("text", &self.text),
        ] {
            for s in list {
                if s.len() > 255 {
                    return Err(CodecError::FieldTooLong {
                        field,
                        len: s.len(),
                        max: 255,
                    });
                }
            }
        }
        Ok(())
    }

    /// Learns every string the record will serialize, in write order.
    fn compress(&self, c: &mut Compressor) {
        for host in &self.hosts {
            host.compress(c);
        }
        for target in [&self.canonical, &self.delegate].into_iter().flatten() {
            target.compress(c);
        }
        for target in &self.ns {
            target.compress(c);
        }
        for service in &self.service {
            service.compress(c);
        }
        for s in self.url.iter().chain(&self.email).chain(&self.text) {
            c.add(s);
        }
        for magnet in &self.magnet {
            magnet.compress(c);
        }
        for tls in &self.tls {
            tls.compress(c);
        }
        // Addr currencies stay out of the dictionary: a reference byte
        // would collide with the native-form flag bit on read.
    }

    fn encoded_size(&self, c: &Compressor) -> usize {
        let mut size = 1 + 2 + c.table_size();
        // Hosts and canonical carry no separate tag: the target's kind
        // byte is the tag.
        for host in &self.hosts {
            size += host.encoded_size(c);
        }
        if let Some(target) = &self.canonical {
            size += target.encoded_size(c);
        }
        if let Some(target) = &self.delegate {
            size += 1 + target.encoded_size(c);
        }
        for target in &self.ns {
            size += 1 + target.encoded_size(c);
        }
        for service in &self.service {
            size += 1 + service.encoded_size(c);
        }
        for s in self.url.iter().chain(&self.email).chain(&self.text) {
            size += 1 + c.size(s);
        }
        size += self.location.len() * (1 + LocationRecord::ENCODED_SIZE);
        for magnet in &self.magnet {
            size += 1 + magnet.encoded_size(c);
        }
        for ds in &self.ds {
            size += 1 + ds.encoded_size();
        }
        for tls in &self.tls {
            size += 1 + tls.encoded_size(c);
        }
        for key in self.ssh.iter().chain(&self.pgp) {
            size += 1 + key.encoded_size();
        }
        for addr in &self.addr {
            size += 1 + addr.encoded_size();
        }
        for extra in &self.extra {
            size += 1 + extra.encoded_size();
        }
        size
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        self.validate()?;

        let mut c = Compressor::new();
        self.compress(&mut c);

        let size = self.encoded_size(&c);
        let mut bw = Vec::with_capacity(size);

        bw.put_u8(self.version);
        bw.put_u16((self.ttl >> TTL_SHIFT) as u16);
        c.write_table(&mut bw);

        for host in &self.hosts {
            host.write(&mut bw, &c)?;
        }
        // Canonical is always a name target, so its kind byte is the
        // short-form INAME/HNAME tag.
        if let Some(target) = &self.canonical {
            target.write(&mut bw, &c)?;
        }
        if let Some(target) = &self.delegate {
            bw.put_u8(RecordTag::Delegate.to_u8());
            target.write(&mut bw, &c)?;
        }
        for target in &self.ns {
            bw.put_u8(RecordTag::Ns.to_u8());
            target.write(&mut bw, &c)?;
        }
        for service in &self.service {
            bw.put_u8(RecordTag::Service.to_u8());
            service.write(&mut bw, &c)?;
        }
        for (tag, list) in [
            (RecordTag::Url, &self.url),
            (RecordTag::Email, &self.email),
            (RecordTag::Text, &self.text),
        ] {
            for s in list {
                bw.put_u8(tag.to_u8());
                c.write_string(&mut bw, s)?;
            }
        }
        for location in &self.location {
            bw.put_u8(RecordTag::Location.to_u8());
            location.write(&mut bw);
        }
        for magnet in &self.magnet {
            bw.put_u8(RecordTag::Magnet.to_u8());
            magnet.write(&mut bw, &c)?;
        }
        for ds in &self.ds {
            bw.put_u8(RecordTag::Ds.to_u8());
            ds.write(&mut bw)?;
        }
        for tls in &self.tls {
            bw.put_u8(RecordTag::Tls.to_u8());
            tls.write(&mut bw, &c)?;
        }
        for (tag, list) in [(RecordTag::Ssh, &self.ssh), (RecordTag::Pgp, &self.pgp)] {
            for key in list {
                bw.put_u8(tag.to_u8());
                key.write(&mut bw)?;
            }
        }
        for addr in &self.addr {
            bw.put_u8(RecordTag::Addr.to_u8());
            addr.write(&mut bw)?;
        }
        for extra in &self.extra {
            bw.put_u8(extra.rtype);
            extra.write(&mut bw)?;
        }

        debug_assert_eq!(bw.len(), size);
        Ok(bw)
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut br = data;

        let version = wire::read_u8(&mut br)?;
        if version != 0 {
            return Err(CodecError::UnknownVersion(version));
        }
        let ttl = u32::from(wire::read_u16(&mut br)?) << TTL_SHIFT;
        let d = Decompressor::read(&mut br)?;

        let mut resource = Resource {
            version,
            ttl,
            ..Default::default()
        };

        while br.has_remaining() {
            let byte = wire::read_u8(&mut br)?;
            match RecordTag::from_u8(byte) {
                Some(
                    kind @ (RecordTag::Inet4
                    | RecordTag::Inet6
                    | RecordTag::Onion
                    | RecordTag::OnionNg),
                ) => {
                    resource.hosts.push(Target::read(&mut br, &d, kind)?);
                }
                Some(kind @ (RecordTag::Iname | RecordTag::Hname)) => {
                    let target = Target::read(&mut br, &d, kind)?;
                    resource.set_canonical(target)?;
                }
                Some(RecordTag::Canonical) => {
                    let target = Target::read_full(&mut br, &d)?;
                    if !target.is_name() {
                        return Err(CodecError::InvalidTarget(format!(
                            "canonical target must be a name: {target}"
                        )));
                    }
                    resource.set_canonical(target)?;
                }
                Some(RecordTag::Delegate) => {
                    let target = Target::read_full(&mut br, &d)?;
                    if !target.is_name() {
                        return Err(CodecError::InvalidTarget(format!(
                            "delegate target must be a name: {target}"
                        )));
                    }
                    if resource.delegate.is_some() {
                        return Err(CodecError::DuplicateDelegate);
                    }
                    resource.delegate = Some(target);
                }
                Some(RecordTag::Ns) => {
                    resource.ns.push(Target::read_full(&mut br, &d)?);
                }
                Some(RecordTag::Service) => {
                    resource.service.push(ServiceRecord::read(&mut br, &d)?);
                }
                Some(RecordTag::Url) => resource.url.push(d.read_string(&mut br)?),
                Some(RecordTag::Email) => resource.email.push(d.read_string(&mut br)?),
                Some(RecordTag::Text) => resource.text.push(d.read_string(&mut br)?),
                Some(RecordTag::Location) => {
                    resource.location.push(LocationRecord::read(&mut br)?);
                }
                Some(RecordTag::Magnet) => {
                    resource.magnet.push(MagnetRecord::read(&mut br, &d)?);
                }
                Some(RecordTag::Ds) => resource.ds.push(DsRecord::read(&mut br)?),
                Some(RecordTag::Tls) => resource.tls.push(TlsRecord::read(&mut br, &d)?),
                Some(RecordTag::Ssh) => resource.ssh.push(SshRecord::read(&mut br)?),
                Some(RecordTag::Pgp) => resource.pgp.push(PgpRecord::read(&mut br)?),
                Some(RecordTag::Addr) => resource.addr.push(AddrRecord::read(&mut br)?),
                None => resource.extra.push(ExtraRecord::read(byte, &mut br)?),
            }
        }

        Ok(resource)
    }

    fn set_canonical(&mut self, target: Target) -> Result<(), CodecError> {
        if self.canonical.is_some() {
            return Err(CodecError::DuplicateCanonical);
        }
        self.canonical = Some(target);
        Ok(())
    }

    /// JSON form of this record; `name` is carried alongside the record
    /// data when the caller knows it.
    pub fn to_json(&self, name: Option<&str>) -> Result<serde_json::Value, CodecError> {
        let mut value =
            serde_json::to_value(self).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
        if let (Some(name), Some(object)) = (name, value.as_object_mut()) {
            object.insert("name".into(), serde_json::Value::String(name.into()));
        }
        Ok(value)
    }

    /// Parses the JSON form. A `name` member is accepted and ignored.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CodecError> {
        let resource: Resource =
            serde_json::from_value(value).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
        resource.validate()?;
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_four_zero_bytes() {
        let resource = Resource::new();
        let blob = resource.encode().unwrap();
        assert_eq!(blob, [0, 0, 0, 0]);
        assert_eq!(Resource::decode(&blob).unwrap(), resource);
    }

    #[test]
    fn ttl_is_quantized_to_64_seconds() {
        let resource = Resource {
            ttl: 3600,
            ..Default::default()
        };
        let blob = resource.encode().unwrap();
        assert_eq!(&blob[1..3], &[0x00, 0x38]);
        assert_eq!(Resource::decode(&blob).unwrap().ttl, 3584);
        assert_eq!(resource.dns_ttl(), 3584);
    }

    #[test]
    fn nonzero_version_fails_to_decode() {
        assert_eq!(
            Resource::decode(&[1, 0, 0, 0]),
            Err(CodecError::UnknownVersion(1))
        );
    }

    #[test]
    fn truncated_blob_fails_to_decode() {
        assert_eq!(Resource::decode(&[0, 0]), Err(CodecError::UnexpectedEof));
        assert_eq!(Resource::decode(&[0, 0, 0]), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn name_host_is_rejected_at_encode() {
        let resource = Resource {
            hosts: vec!["example.com".parse().unwrap()],
            ..Default::default()
        };
        assert!(matches!(
            resource.encode(),
            Err(CodecError::InvalidTarget(_))
        ));
    }
}
