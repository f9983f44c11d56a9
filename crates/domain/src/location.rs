//! `LOCATION` records: RFC 1876 geographic position, stored verbatim.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::wire;

/// Fixed 16-byte wire form; none of the fields touch the string
/// dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub version: u8,
    pub size: u8,
    pub horiz_pre: u8,
    pub vert_pre: u8,
    pub latitude: u32,
    pub longitude: u32,
    pub altitude: u32,
}

impl LocationRecord {
    pub(crate) const ENCODED_SIZE: usize = 16;

    pub(crate) fn write(&self, bw: &mut Vec<u8>) {
        bw.put_u8(self.version);
        bw.put_u8(self.size);
        bw.put_u8(self.horiz_pre);
        bw.put_u8(self.vert_pre);
        bw.put_u32(self.latitude);
        bw.put_u32(self.longitude);
        bw.put_u32(self.altitude);
    }

    pub(crate) fn read<B: Buf>(br: &mut B) -> Result<Self, CodecError> {
        Ok(Self {
            version: wire::read_u8(br)?,
            size: wire::read_u8(br)?,
            horiz_pre: wire::read_u8(br)?,
            vert_pre: wire::read_u8(br)?,
            latitude: wire::read_u32(br)?,
            longitude: wire::read_u32(br)?,
            altitude: wire::read_u32(br)?,
        })
    }

    /// The 16 rdata bytes of the equivalent DNS LOC record.
    pub fn to_rdata(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_SIZE);
        self.write(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        let record = LocationRecord {
            version: 0,
            size: 0x12,
            horiz_pre: 0x16,
            vert_pre: 0x13,
            latitude: 2_332_896_752,
            longitude: 2_146_846_072,
            altitude: 10_000_100,
        };
        let mut bw = Vec::new();
        record.write(&mut bw);
        assert_eq!(bw.len(), LocationRecord::ENCODED_SIZE);

        let mut br: &[u8] = &bw;
        assert_eq!(LocationRecord::read(&mut br).unwrap(), record);
        assert!(!br.has_remaining());
    }

    #[test]
    fn json_uses_camel_case_precision_keys() {
        let record = LocationRecord {
            horiz_pre: 0x16,
            vert_pre: 0x13,
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["horizPre"], 0x16);
        assert_eq!(json["vertPre"], 0x13);
    }
}
