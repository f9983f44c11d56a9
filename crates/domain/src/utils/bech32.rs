//! Bech32 ([BIP-173]) encoding of versioned witness programs.
//!
//! Native payment addresses in `ADDR` records are bech32 strings whose
//! human-readable part selects the network. The wire format stores only
//! the witness version and program; the string form is regenerated on
//! demand, so both directions live here.
//!
//! [BIP-173]: https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki

use crate::errors::CodecError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const GENERATOR: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(hrp.len() * 2 + 1);
    for byte in hrp.bytes() {
        out.push(byte >> 5);
    }
    out.push(0);
    for byte in hrp.bytes() {
        out.push(byte & 0x1f);
    }
    out
}

/// Regroups `data` from `from`-bit to `to`-bit symbols, MSB first.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, CodecError> {
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    let mut out = Vec::with_capacity((data.len() * from as usize).div_ceil(to as usize));
    let max = (1u32 << to) - 1;

    for &value in data {
        if u32::from(value) >> from != 0 {
            return Err(CodecError::InvalidAddress(format!(
                "value {value} out of range for {from}-bit group"
            )));
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return Err(CodecError::InvalidAddress(
            "invalid padding in bech32 data".into(),
        ));
    }
    Ok(out)
}

pub fn encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, CodecError> {
    if version > 31 {
        return Err(CodecError::InvalidAddress(format!(
            "address version {version} out of range"
        )));
    }

    let mut data = vec![version];
    data.extend(convert_bits(program, 8, 5, true)?);

    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    values.extend_from_slice(&[0; 6]);
    let pm = polymod(values) ^ 1;

    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + 6);
    out.push_str(hrp);
    out.push('1');
    for value in data {
        out.push(CHARSET[value as usize] as char);
    }
    for i in 0..6 {
        out.push(CHARSET[((pm >> (5 * (5 - i))) & 0x1f) as usize] as char);
    }
    Ok(out)
}

/// Decodes a bech32 string into `(hrp, version, program)`.
pub fn decode(addr: &str) -> Result<(String, u8, Vec<u8>), CodecError> {
    let invalid = || CodecError::InvalidAddress(format!("invalid bech32 string: {addr}"));

    if addr.len() > 90 || !addr.is_ascii() {
        return Err(invalid());
    }
    let has_lower = addr.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = addr.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(invalid());
    }
    let addr = addr.to_ascii_lowercase();

    let sep = addr.rfind('1').ok_or_else(invalid)?;
    let (hrp, rest) = (&addr[..sep], &addr[sep + 1..]);
    if hrp.is_empty() || rest.len() < 7 {
        return Err(invalid());
    }

    let mut data = Vec::with_capacity(rest.len());
    for ch in rest.bytes() {
        let value = CHARSET
            .iter()
            .position(|&c| c == ch)
            .ok_or_else(invalid)?;
        data.push(value as u8);
    }

    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    if polymod(values) != 1 {
        return Err(CodecError::InvalidAddress(format!(
            "bad bech32 checksum: {addr}"
        )));
    }

    let payload = &data[..data.len() - 6];
    if payload.is_empty() {
        return Err(invalid());
    }
    let version = payload[0];
    let program = convert_bits(&payload[1..], 5, 8, false)?;
    Ok((hrp.to_string(), version, program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let program: Vec<u8> = (0u8..20).collect();
        let addr = encode("hs", 0, &program).unwrap();
        assert!(addr.starts_with("hs1"));
        let (hrp, version, decoded) = decode(&addr).unwrap();
        assert_eq!(hrp, "hs");
        assert_eq!(version, 0);
        assert_eq!(decoded, program);
    }

    #[test]
    fn rejects_bad_checksum() {
        let addr = encode("ts", 0, &[0xab; 20]).unwrap();
        let mut corrupted = addr.into_bytes();
        let last = corrupted.len() - 1;
        corrupted[last] = if corrupted[last] == b'q' { b'p' } else { b'q' };
        assert!(decode(std::str::from_utf8(&corrupted).unwrap()).is_err());
    }

    #[test]
    fn rejects_mixed_case() {
        let addr = encode("hs", 0, &[1, 2, 3]).unwrap();
        let mixed = format!("HS{}", &addr[2..]);
        assert!(decode(&mixed).is_err());
    }

    #[test]
    fn reference_vector() {
        // BIP-173 test vector: BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4
        let (hrp, version, program) =
            decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").unwrap();
        assert_eq!(hrp, "bc");
        assert_eq!(version, 0);
        assert_eq!(
            hex::encode(program),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }
}
