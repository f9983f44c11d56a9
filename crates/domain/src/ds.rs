//! `DS` records: delegation-signer digests carried for the child zone.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::wire;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    #[serde(with = "crate::hex_serde")]
    pub digest: Vec<u8>,
}

impl DsRecord {
    pub(crate) fn encoded_size(&self) -> usize {
        2 + 1 + 1 + 1 + self.digest.len()
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>) -> Result<(), CodecError> {
        if self.digest.len() > 255 {
            return Err(CodecError::FieldTooLong {
                field: "digest",
                len: self.digest.len(),
                max: 255,
            });
        }
        bw.put_u16(self.key_tag);
        bw.put_u8(self.algorithm);
        bw.put_u8(self.digest_type);
        bw.put_u8(self.digest.len() as u8);
        bw.put_slice(&self.digest);
        Ok(())
    }

    pub(crate) fn read<B: Buf>(br: &mut B) -> Result<Self, CodecError> {
        let key_tag = wire::read_u16(br)?;
        let algorithm = wire::read_u8(br)?;
        let digest_type = wire::read_u8(br)?;
        let len = wire::read_u8(br)?;
        let digest = wire::read_bytes(br, len as usize)?;
        Ok(Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        })
    }

    /// The RFC 4034 rdata bytes of the equivalent DNS DS record.
    pub fn to_rdata(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.digest.len());
        out.put_u16(self.key_tag);
        out.put_u8(self.algorithm);
        out.put_u8(self.digest_type);
        out.extend_from_slice(&self.digest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DsRecord {
        DsRecord {
            key_tag: 30548,
            algorithm: 8,
            digest_type: 2,
            digest: vec![0xde; 32],
        }
    }

    #[test]
    fn wire_round_trip() {
        let mut bw = Vec::new();
        record().write(&mut bw).unwrap();
        assert_eq!(bw.len(), record().encoded_size());

        let mut br: &[u8] = &bw;
        assert_eq!(DsRecord::read(&mut br).unwrap(), record());
        assert!(!br.has_remaining());
    }

    #[test]
    fn rdata_has_no_length_prefix() {
        let rdata = record().to_rdata();
        assert_eq!(rdata.len(), 36);
        assert_eq!(&rdata[..4], &[0x77, 0x54, 8, 2]);
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["keyTag"], 30548);
        assert_eq!(json["digestType"], 2);
        assert_eq!(json["digest"], hex::encode([0xde; 32]));
    }
}
