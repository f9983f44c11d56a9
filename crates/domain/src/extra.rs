//! Opaque records under unrecognized tags.
//!
//! The decode loop preserves anything it does not understand: the tag
//! byte plus one length-prefixed blob. Re-encoding emits the same bytes,
//! which is how forward-compatible extensions survive round-trips.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::wire;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraRecord {
    #[serde(rename = "type")]
    pub rtype: u8,
    #[serde(with = "crate::hex_serde")]
    pub data: Vec<u8>,
}

impl ExtraRecord {
    /// Body size; the tag byte itself is `rtype` and accounted by the
    /// record writer.
    pub(crate) fn encoded_size(&self) -> usize {
        1 + self.data.len()
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>) -> Result<(), CodecError> {
        if self.data.len() > 255 {
            return Err(CodecError::FieldTooLong {
                field: "extra data",
                len: self.data.len(),
                max: 255,
            });
        }
        bw.put_u8(self.data.len() as u8);
        bw.put_slice(&self.data);
        Ok(())
    }

    pub(crate) fn read<B: Buf>(rtype: u8, br: &mut B) -> Result<Self, CodecError> {
        let len = wire::read_u8(br)?;
        let data = wire::read_bytes(br, len as usize)?;
        Ok(Self { rtype, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        let record = ExtraRecord {
            rtype: 200,
            data: vec![1, 2, 3],
        };
        let mut bw = Vec::new();
        record.write(&mut bw).unwrap();

        let mut br: &[u8] = &bw;
        assert_eq!(ExtraRecord::read(200, &mut br).unwrap(), record);
    }

    #[test]
    fn json_shape() {
        let record = ExtraRecord {
            rtype: 200,
            data: vec![0xbe, 0xef],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], 200);
        assert_eq!(json["data"], "beef");
    }
}
