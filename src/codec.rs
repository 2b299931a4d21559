// Boundary conversions: integers as decimal/hex text, fixed-width
// big-endian bytes, and the deterministic block framing used by the
// byte-stream cipher helpers

use num_bigint::BigUint;

use crate::error::{Error, Result};

/// Integer to fixed-width big-endian bytes, zero-padded on the left.
/// Fails when the value does not fit in `len` bytes.
pub fn int_to_bytes(x: &BigUint, len: usize) -> Result<Vec<u8>> {
    let bytes = x.to_bytes_be();
    if bytes.len() > len {
        return Err(Error::InvalidArgument("integer does not fit requested width"));
    }
    let mut out = vec![0u8; len];
    out[len - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// Big-endian bytes to integer.
pub fn bytes_to_int(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Serialize an integer as lowercase hexadecimal text.
pub fn to_hex(x: &BigUint) -> String {
    hex::encode(x.to_bytes_be())
}

/// Parse hexadecimal text produced by [`to_hex`].
pub fn from_hex(text: &str) -> Result<BigUint> {
    let bytes =
        hex::decode(text).map_err(|_| Error::InvalidArgument("malformed hexadecimal integer"))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Serialize an integer as decimal text.
pub fn to_decimal(x: &BigUint) -> String {
    x.to_str_radix(10)
}

/// Parse decimal text produced by [`to_decimal`].
pub fn from_decimal(text: &str) -> Result<BigUint> {
    if text.is_empty() {
        return Err(Error::InvalidArgument("malformed decimal integer"));
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or(Error::InvalidArgument("malformed decimal integer"))
}

/// Bytes usable per block so the block integer stays below n.
fn block_size(n: &BigUint) -> Result<usize> {
    let k = (n.bits().saturating_sub(1) / 8) as usize;
    if k < 1 {
        return Err(Error::InvalidArgument("modulus too small for block framing"));
    }
    Ok(k)
}

/// Split a byte string into plaintext block integers: a 4-byte big-endian
/// length prefix, then `block_size(n)`-byte chunks zero-padded at the tail.
pub fn frame_bytes(plaintext: &[u8], n: &BigUint) -> Result<Vec<BigUint>> {
    if plaintext.len() > u32::MAX as usize {
        return Err(Error::InvalidArgument("plaintext too long to frame"));
    }
    let k = block_size(n)?;

    let mut data = Vec::with_capacity(4 + plaintext.len() + k);
    data.extend_from_slice(&(plaintext.len() as u32).to_be_bytes());
    data.extend_from_slice(plaintext);
    let rem = data.len() % k;
    if rem != 0 {
        data.resize(data.len() + (k - rem), 0);
    }

    Ok(data.chunks(k).map(BigUint::from_bytes_be).collect())
}

/// Reassemble the byte string framed by [`frame_bytes`].
pub fn unframe_blocks(blocks: &[BigUint], n: &BigUint) -> Result<Vec<u8>> {
    let k = block_size(n)?;

    let mut data = Vec::with_capacity(blocks.len() * k);
    for block in blocks {
        data.extend_from_slice(&int_to_bytes(block, k)?);
    }

    if data.len() < 4 {
        return Err(Error::InvalidArgument("framed data shorter than its header"));
    }
    let total_len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < 4 + total_len {
        return Err(Error::InvalidArgument("framed data shorter than its header"));
    }
    Ok(data[4..4 + total_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_bytes_roundtrip() {
        let x = BigUint::from(0xdead_beef_u64);
        let bytes = int_to_bytes(&x, 8).unwrap();
        assert_eq!(bytes, [0, 0, 0, 0, 0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes_to_int(&bytes), x);
    }

    #[test]
    fn test_int_too_wide() {
        let x = BigUint::from(0x1_0000u32);
        assert!(int_to_bytes(&x, 2).is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let x = BigUint::from(90581u32);
        let text = to_hex(&x);
        assert_eq!(text, "0161d5");
        assert_eq!(from_hex(&text).unwrap(), x);
    }

    #[test]
    fn test_hex_malformed() {
        assert!(from_hex("zz").is_err());
    }

    #[test]
    fn test_decimal_roundtrip() {
        let x = BigUint::from(17993u32);
        assert_eq!(to_decimal(&x), "17993");
        assert_eq!(from_decimal("17993").unwrap(), x);
        assert!(from_decimal("12a").is_err());
        assert!(from_decimal("").is_err());
    }

    #[test]
    fn test_frame_roundtrip() {
        let n = BigUint::from(1u8) << 256;
        for msg in [&b""[..], b"x", b"hello world", &[0u8; 100]] {
            let blocks = frame_bytes(msg, &n).unwrap();
            assert_eq!(unframe_blocks(&blocks, &n).unwrap(), msg);
        }
    }

    #[test]
    fn test_frame_blocks_below_modulus() {
        let n = BigUint::from(1u8) << 64;
        let blocks = frame_bytes(&[0xffu8; 64], &n).unwrap();
        assert!(blocks.iter().all(|b| b < &n));
    }

    #[test]
    fn test_unframe_truncated() {
        let n = BigUint::from(1u8) << 256;
        assert!(unframe_blocks(&[], &n).is_err());
    }
}
