//! `MAGNET` records, round-tripped through `magnet:?xt=urn:{nid}:{nin}`.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::compress::{Compressor, Decompressor};
use crate::errors::CodecError;
use crate::wire;

const MAGNET_PREFIX: &str = "magnet:?xt=urn:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnetRecord {
    /// Namespace identifier, e.g. `btih`.
    pub nid: String,
    /// Raw namespace-specific hash; hex in the URI form, bytes on wire.
    pub nin: Vec<u8>,
}

impl MagnetRecord {
    pub(crate) fn compress(&self, c: &mut Compressor) {
        c.add(&self.nid);
    }

    pub(crate) fn encoded_size(&self, c: &Compressor) -> usize {
        c.size(&self.nid) + 1 + self.nin.len()
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>, c: &Compressor) -> Result<(), CodecError> {
        if self.nin.len() > 255 {
            return Err(CodecError::FieldTooLong {
                field: "magnet hash",
                len: self.nin.len(),
                max: 255,
            });
        }
        c.write_string(bw, &self.nid)?;
        bw.put_u8(self.nin.len() as u8);
        bw.put_slice(&self.nin);
        Ok(())
    }

    pub(crate) fn read<B: Buf>(br: &mut B, d: &Decompressor) -> Result<Self, CodecError> {
        let nid = d.read_string(br)?;
        let len = wire::read_u8(br)?;
        let nin = wire::read_bytes(br, len as usize)?;
        Ok(Self { nid, nin })
    }
}

impl fmt::Display for MagnetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MAGNET_PREFIX}{}:{}", self.nid, hex::encode(&self.nin))
    }
}

impl FromStr for MagnetRecord {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        let rest = s
            .strip_prefix(MAGNET_PREFIX)
            .ok_or_else(|| CodecError::InvalidAddress(format!("not a magnet URI: {s}")))?;
        let (nid, nin) = rest
            .split_once(':')
            .ok_or_else(|| CodecError::InvalidAddress(format!("magnet URI without hash: {s}")))?;
        let nin = hex::decode(nin).map_err(|_| CodecError::InvalidHex(nin.to_string()))?;
        Ok(Self {
            nid: nid.to_string(),
            nin,
        })
    }
}

impl Serialize for MagnetRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MagnetRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_round_trip() {
        let uri = "magnet:?xt=urn:btih:c12fe1c06bba254a9dc9f519b335aa7c1367a88a";
        let record: MagnetRecord = uri.parse().unwrap();
        assert_eq!(record.nid, "btih");
        assert_eq!(record.nin.len(), 20);
        assert_eq!(record.to_string(), uri);
    }

    #[test]
    fn rejects_non_hex_hash() {
        assert!("magnet:?xt=urn:btih:zzzz".parse::<MagnetRecord>().is_err());
        assert!("http://example.com".parse::<MagnetRecord>().is_err());
    }

    #[test]
    fn wire_round_trip() {
        let record = MagnetRecord {
            nid: "btih".into(),
            nin: vec![0xab; 20],
        };
        let mut c = Compressor::new();
        record.compress(&mut c);
        let mut table = Vec::new();
        c.write_table(&mut table);
        let mut bw = Vec::new();
        record.write(&mut bw, &c).unwrap();
        assert_eq!(bw.len(), record.encoded_size(&c));

        let mut br: &[u8] = &table;
        let d = Decompressor::read(&mut br).unwrap();
        let mut br: &[u8] = &bw;
        assert_eq!(MagnetRecord::read(&mut br, &d).unwrap(), record);
    }
}
