//! `SERVICE` records: SRV-shaped service locators.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::compress::{Compressor, Decompressor};
use crate::errors::CodecError;
use crate::target::Target;
use crate::wire;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub service: String,
    pub protocol: String,
    pub priority: u8,
    pub weight: u8,
    pub target: Target,
    pub port: u16,
}

impl ServiceRecord {
    /// Mail service detection: MX answers are synthesized from SMTP
    /// services only.
    pub fn is_smtp(&self) -> bool {
        self.service == "smtp" && self.protocol == "tcp"
    }

    pub(crate) fn compress(&self, c: &mut Compressor) {
        c.add(&self.service);
        c.add(&self.protocol);
        self.target.compress(c);
    }

    pub(crate) fn encoded_size(&self, c: &Compressor) -> usize {
        c.size(&self.service) + c.size(&self.protocol) + 2 + self.target.encoded_size(c) + 2
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>, c: &Compressor) -> Result<(), CodecError> {
        c.write_string(bw, &self.service)?;
        c.write_string(bw, &self.protocol)?;
        bw.put_u8(self.priority);
        bw.put_u8(self.weight);
        self.target.write(bw, c)?;
        bw.put_u16(self.port);
        Ok(())
    }

    pub(crate) fn read<B: Buf>(br: &mut B, d: &Decompressor) -> Result<Self, CodecError> {
        let service = d.read_string(br)?;
        let protocol = d.read_string(br)?;
        let priority = wire::read_u8(br)?;
        let weight = wire::read_u8(br)?;
        let target = Target::read_full(br, d)?;
        let port = wire::read_u16(br)?;
        Ok(Self {
            service,
            protocol,
            priority,
            weight,
            target,
            port,
        })
    }
}
