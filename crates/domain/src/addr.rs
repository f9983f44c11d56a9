//! `ADDR` records: payment addresses, native or foreign.
//!
//! Native addresses are stored structurally (network flag, witness
//! version, hash) and rendered as bech32 on demand; every other currency
//! is an opaque ASCII pair. The wire layout of the native form is fixed:
//! the first byte packs `0x80 | testnet << 6 | hash length`, with the
//! high bit distinguishing it from a plain currency-length byte.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::HSK_CURRENCY;
use crate::errors::CodecError;
use crate::utils::bech32;
use crate::wire;

const MAINNET_HRP: &str = "hs";
const TESTNET_HRP: &str = "ts";

const NATIVE_FLAG: u8 = 0x80;
const TESTNET_FLAG: u8 = 0x40;
const NATIVE_HASH_MAX: usize = 0x3f;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddrRecord {
    Hsk {
        testnet: bool,
        version: u8,
        hash: Vec<u8>,
    },
    Other {
        currency: String,
        address: String,
    },
}

impl AddrRecord {
    pub fn currency(&self) -> &str {
        match self {
            AddrRecord::Hsk { .. } => HSK_CURRENCY,
            AddrRecord::Other { currency, .. } => currency,
        }
    }

    /// The address half of the `currency:address` pair; native addresses
    /// render as bech32 with the network-selecting prefix.
    pub fn address(&self) -> Result<String, CodecError> {
        match self {
            AddrRecord::Hsk {
                testnet,
                version,
                hash,
            } => {
                let hrp = if *testnet { TESTNET_HRP } else { MAINNET_HRP };
                bech32::encode(hrp, *version, hash)
            }
            AddrRecord::Other { address, .. } => Ok(address.clone()),
        }
    }

    pub(crate) fn encoded_size(&self) -> usize {
        match self {
            AddrRecord::Hsk { hash, .. } => 2 + hash.len(),
            AddrRecord::Other { currency, address } => 1 + currency.len() + 1 + address.len(),
        }
    }

    pub(crate) fn write(&self, bw: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            AddrRecord::Hsk {
                testnet,
                version,
                hash,
            } => {
                if hash.len() > NATIVE_HASH_MAX {
                    return Err(CodecError::FieldTooLong {
                        field: "address hash",
                        len: hash.len(),
                        max: NATIVE_HASH_MAX,
                    });
                }
                let mut field = NATIVE_FLAG | hash.len() as u8;
                if *testnet {
                    field |= TESTNET_FLAG;
                }
                bw.put_u8(field);
                bw.put_u8(*version);
                bw.put_slice(hash);
            }
            AddrRecord::Other { currency, address } => {
                // The length byte must keep the native flag clear.
                if currency.is_empty() || currency.len() >= NATIVE_FLAG as usize {
                    return Err(CodecError::FieldTooLong {
                        field: "currency",
                        len: currency.len(),
                        max: NATIVE_FLAG as usize - 1,
                    });
                }
                if address.len() > 255 {
                    return Err(CodecError::FieldTooLong {
                        field: "address",
                        len: address.len(),
                        max: 255,
                    });
                }
                bw.put_u8(currency.len() as u8);
                bw.put_slice(currency.as_bytes());
                bw.put_u8(address.len() as u8);
                bw.put_slice(address.as_bytes());
            }
        }
        Ok(())
    }

    pub(crate) fn read<B: Buf>(br: &mut B) -> Result<Self, CodecError> {
        let field = wire::read_u8(br)?;
        if field & NATIVE_FLAG != 0 {
            let testnet = field & TESTNET_FLAG != 0;
            let len = (field & NATIVE_HASH_MAX as u8) as usize;
            let version = wire::read_u8(br)?;
            let hash = wire::read_bytes(br, len)?;
            return Ok(AddrRecord::Hsk {
                testnet,
                version,
                hash,
            });
        }

        let currency = wire::read_bytes(br, field as usize)?;
        let currency = String::from_utf8(currency).map_err(|_| CodecError::InvalidString)?;
        let len = wire::read_u8(br)?;
        let address = wire::read_bytes(br, len as usize)?;
        let address = String::from_utf8(address).map_err(|_| CodecError::InvalidString)?;
        Ok(AddrRecord::Other { currency, address })
    }
}

impl fmt::Display for AddrRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self.address().map_err(|_| fmt::Error)?;
        write!(f, "{}:{}", self.currency(), address)
    }
}

impl FromStr for AddrRecord {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, CodecError> {
        let (currency, address) = s
            .split_once(':')
            .ok_or_else(|| CodecError::InvalidAddress(format!("missing currency: {s}")))?;

        if currency == HSK_CURRENCY {
            let (hrp, version, hash) = bech32::decode(address)?;
            let testnet = match hrp.as_str() {
                MAINNET_HRP => false,
                TESTNET_HRP => true,
                _ => {
                    return Err(CodecError::InvalidAddress(format!(
                        "unknown address prefix: {hrp}"
                    )))
                }
            };
            return Ok(AddrRecord::Hsk {
                testnet,
                version,
                hash,
            });
        }

        Ok(AddrRecord::Other {
            currency: currency.to_string(),
            address: address.to_string(),
        })
    }
}

impl Serialize for AddrRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let address = self.address().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&format!("{}:{}", self.currency(), address))
    }
}

impl<'de> Deserialize<'de> for AddrRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
