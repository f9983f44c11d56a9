//! `SSH` and `PGP` key fingerprints.
//!
//! The two record types are byte-identical on the wire and differ only by
//! their top-level tag, so a single struct backs both lists.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::wire;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshRecord {
    pub algorithm: u8,
    #[serde(rename = "type")]
    pub key_type: u8,
    #[serde(with = "crate::hex_serde")]
    pub fingerprint: Vec<u8>,
}

/// PGP fingerprints share the SSH wire form; only the record tag differs.
pub type PgpRecord = SshRecord;

impl SshRecord {
    pub(crate) fn encoded_size(&self) -> usize {
        1 + 1 + 1 + self.fingerprint.len()
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>) -> Result<(), CodecError> {
        if self.fingerprint.len() > 255 {
            return Err(CodecError::FieldTooLong {
                field: "fingerprint",
                len: self.fingerprint.len(),
                max: 255,
            });
        }
        bw.put_u8(self.algorithm);
        bw.put_u8(self.key_type);
        bw.put_u8(self.fingerprint.len() as u8);
        bw.put_slice(&self.fingerprint);
        Ok(())
    }

    pub(crate) fn read<B: Buf>(br: &mut B) -> Result<Self, CodecError> {
        let algorithm = wire::read_u8(br)?;
        let key_type = wire::read_u8(br)?;
        let len = wire::read_u8(br)?;
        let fingerprint = wire::read_bytes(br, len as usize)?;
        Ok(Self {
            algorithm,
            key_type,
            fingerprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        let record = SshRecord {
            algorithm: 4,
            key_type: 2,
            fingerprint: vec![0x5f; 32],
        };
        let mut bw = Vec::new();
        record.write(&mut bw).unwrap();
        assert_eq!(bw.len(), record.encoded_size());

        let mut br: &[u8] = &bw;
        assert_eq!(SshRecord::read(&mut br).unwrap(), record);
        assert!(!br.has_remaining());
    }

    #[test]
    fn json_renames_key_type() {
        let record = SshRecord {
            algorithm: 1,
            key_type: 1,
            fingerprint: vec![0xab, 0xcd],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["fingerprint"], "abcd");
    }

    #[test]
    fn oversized_fingerprint_is_rejected() {
        let record = SshRecord {
            algorithm: 1,
            key_type: 1,
            fingerprint: vec![0; 300],
        };
        assert!(matches!(
            record.write(&mut Vec::new()),
            Err(CodecError::FieldTooLong { .. })
        ));
    }
}
