//! `TLS` records: DANE certificate associations keyed by protocol and port.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::compress::{Compressor, Decompressor};
use crate::errors::CodecError;
use crate::wire;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsRecord {
    pub protocol: String,
    pub port: u16,
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    #[serde(with = "crate::hex_serde")]
    pub certificate: Vec<u8>,
}

impl TlsRecord {
    pub(crate) fn compress(&self, c: &mut Compressor) {
        c.add(&self.protocol);
    }

    pub(crate) fn encoded_size(&self, c: &Compressor) -> usize {
        c.size(&self.protocol) + 2 + 1 + 1 + 1 + 1 + self.certificate.len()
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>, c: &Compressor) -> Result<(), CodecError> {
        if self.certificate.len() > 255 {
            return Err(CodecError::FieldTooLong {
                field: "certificate",
                len: self.certificate.len(),
                max: 255,
            });
        }
        c.write_string(bw, &self.protocol)?;
        bw.put_u16(self.port);
        bw.put_u8(self.usage);
        bw.put_u8(self.selector);
        bw.put_u8(self.matching_type);
        bw.put_u8(self.certificate.len() as u8);
        bw.put_slice(&self.certificate);
        Ok(())
    }

    pub(crate) fn read<B: Buf>(br: &mut B, d: &Decompressor) -> Result<Self, CodecError> {
        let protocol = d.read_string(br)?;
        let port = wire::read_u16(br)?;
        let usage = wire::read_u8(br)?;
        let selector = wire::read_u8(br)?;
        let matching_type = wire::read_u8(br)?;
        let len = wire::read_u8(br)?;
        let certificate = wire::read_bytes(br, len as usize)?;
        Ok(Self {
            protocol,
            port,
            usage,
            selector,
            matching_type,
            certificate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TlsRecord {
        TlsRecord {
            protocol: "tcp".into(),
            port: 443,
            usage: 3,
            selector: 1,
            matching_type: 1,
            certificate: vec![0xcc; 32],
        }
    }

    #[test]
    fn wire_round_trip() {
        let mut c = Compressor::new();
        record().compress(&mut c);
        let mut table = Vec::new();
        c.write_table(&mut table);

        let mut bw = Vec::new();
        record().write(&mut bw, &c).unwrap();
        assert_eq!(bw.len(), record().encoded_size(&c));

        let mut br: &[u8] = &table;
        let d = Decompressor::read(&mut br).unwrap();
        let mut br: &[u8] = &bw;
        assert_eq!(TlsRecord::read(&mut br, &d).unwrap(), record());
    }

    #[test]
    fn json_uses_camel_case_matching_type() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["matchingType"], 1);
        assert_eq!(json["certificate"], hex::encode([0xcc; 32]));
    }
}
