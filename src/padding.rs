// OAEP and PSS padding (PKCS#1 v2.1, RFC 8017)
// SHA-256 throughout, MGF1 as the mask generation function

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::arith::pow_mod;
use crate::codec;
use crate::error::{Error, Result};
use crate::keygen::{PrivateKey, PublicKey};

/// SHA-256 output length in bytes.
pub const HASH_LEN: usize = 32;

/// MGF1 mask generation (RFC 8017 B.2.1): concatenated SHA-256 digests of
/// seed || counter, truncated to `length` bytes.
pub fn mgf1(seed: &[u8], length: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(length + HASH_LEN);
    let mut counter: u32 = 0;
    while mask.len() < length {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(counter.to_be_bytes());
        mask.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    mask.truncate(length);
    mask
}

/// lHash for the empty label.
fn l_hash() -> [u8; HASH_LEN] {
    Sha256::digest(b"").into()
}

fn xor_into(dst: &mut [u8], mask: &[u8]) {
    for (a, b) in dst.iter_mut().zip(mask) {
        *a ^= b;
    }
}

/// EME-OAEP encoding (RFC 8017 §7.1.1).
///
/// EM = 0x00 || maskedSeed || maskedDB with DB = lHash || PS || 0x01 || M.
/// The seed is explicit so encryption can be made deterministic in tests;
/// it must be exactly [`HASH_LEN`] bytes of fresh randomness.
pub fn oaep_encode(message: &[u8], n_bits: u64, seed: &[u8]) -> Result<Vec<u8>> {
    let k = ((n_bits + 7) / 8) as usize;
    if k < 2 * HASH_LEN + 2 {
        return Err(Error::InvalidArgument("modulus too small for OAEP"));
    }
    if seed.len() != HASH_LEN {
        return Err(Error::InvalidArgument("OAEP seed must be one hash block"));
    }
    if message.len() > k - 2 * HASH_LEN - 2 {
        return Err(Error::InvalidArgument("message too long for OAEP"));
    }

    // DB = lHash || PS || 0x01 || M
    let db_len = k - HASH_LEN - 1;
    let mut db = Vec::with_capacity(db_len);
    db.extend_from_slice(&l_hash());
    db.resize(db_len - message.len() - 1, 0x00);
    db.push(0x01);
    db.extend_from_slice(message);

    xor_into(&mut db, &mgf1(seed, db_len));
    let mut masked_seed = seed.to_vec();
    xor_into(&mut masked_seed, &mgf1(&db, HASH_LEN));

    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.extend_from_slice(&masked_seed);
    em.extend_from_slice(&db);
    Ok(em)
}

/// EME-OAEP decoding (RFC 8017 §7.1.2).
///
/// All structural failures (length, leading byte, lHash, separator)
/// collapse into the single `PaddingInvalid` error so callers cannot
/// distinguish which check rejected the block.
pub fn oaep_decode(em: &[u8], n_bits: u64) -> Result<Vec<u8>> {
    let k = ((n_bits + 7) / 8) as usize;
    if em.len() != k || k < 2 * HASH_LEN + 2 {
        return Err(Error::PaddingInvalid);
    }

    let y = em[0];
    let masked_seed = &em[1..1 + HASH_LEN];
    let masked_db = &em[1 + HASH_LEN..];
    let db_len = masked_db.len();

    let mut seed = masked_seed.to_vec();
    xor_into(&mut seed, &mgf1(masked_db, HASH_LEN));
    let mut db = masked_db.to_vec();
    xor_into(&mut db, &mgf1(&seed, db_len));

    let lhash_ok = db[..HASH_LEN] == l_hash();

    // DB = lHash || PS || 0x01 || M; PS must be all zero up to the separator
    let mut separator = None;
    let mut ps_ok = true;
    for (i, &byte) in db.iter().enumerate().take(db_len).skip(HASH_LEN) {
        if byte == 0x01 {
            separator = Some(i);
            break;
        }
        if byte != 0x00 {
            ps_ok = false;
            break;
        }
    }

    match separator {
        Some(i) if y == 0x00 && lhash_ok && ps_ok => Ok(db[i + 1..].to_vec()),
        _ => Err(Error::PaddingInvalid),
    }
}

/// EMSA-PSS encoding (RFC 8017 §9.1.1).
///
/// EM = maskedDB || H || 0xbc with DB = PS || 0x01 || salt and
/// H = SHA-256(0x00*8 || mHash || salt). The leftmost `8*emLen - emBits`
/// bits of maskedDB are cleared.
pub fn pss_encode(m_hash: &[u8], em_bits: u64, salt: &[u8]) -> Result<Vec<u8>> {
    if m_hash.len() != HASH_LEN {
        return Err(Error::InvalidArgument("message hash must be one hash block"));
    }
    let em_len = ((em_bits + 7) / 8) as usize;
    if em_len < HASH_LEN + salt.len() + 2 {
        return Err(Error::InvalidArgument("modulus too small for PSS"));
    }

    let mut m_prime = Vec::with_capacity(8 + HASH_LEN + salt.len());
    m_prime.extend_from_slice(&[0u8; 8]);
    m_prime.extend_from_slice(m_hash);
    m_prime.extend_from_slice(salt);
    let h = Sha256::digest(&m_prime);

    // DB = PS || 0x01 || salt
    let db_len = em_len - HASH_LEN - 1;
    let mut db = vec![0u8; db_len - salt.len() - 1];
    db.push(0x01);
    db.extend_from_slice(salt);

    xor_into(&mut db, &mgf1(&h, db_len));
    let unused_bits = (8 * em_len) as u64 - em_bits;
    if unused_bits > 0 {
        db[0] &= 0xff >> unused_bits;
    }

    let mut em = db;
    em.extend_from_slice(&h);
    em.push(0xbc);
    Ok(em)
}

/// EMSA-PSS verification (RFC 8017 §9.1.2).
/// Any structural mismatch is `PaddingInvalid`.
pub fn pss_verify(m_hash: &[u8], em: &[u8], em_bits: u64, salt_len: usize) -> Result<()> {
    if m_hash.len() != HASH_LEN {
        return Err(Error::InvalidArgument("message hash must be one hash block"));
    }
    let em_len = ((em_bits + 7) / 8) as usize;
    if em.len() != em_len
        || em_len < HASH_LEN + salt_len + 2
        || em[em_len - 1] != 0xbc
    {
        return Err(Error::PaddingInvalid);
    }

    let masked_db = &em[..em_len - HASH_LEN - 1];
    let h = &em[em_len - HASH_LEN - 1..em_len - 1];

    let unused_bits = (8 * em_len) as u64 - em_bits;
    let top_mask = if unused_bits > 0 { 0xff >> unused_bits } else { 0xff };
    if masked_db[0] & !top_mask != 0 {
        return Err(Error::PaddingInvalid);
    }

    let db_len = masked_db.len();
    let mut db = masked_db.to_vec();
    xor_into(&mut db, &mgf1(h, db_len));
    if unused_bits > 0 {
        db[0] &= top_mask;
    }

    // DB = PS || 0x01 || salt
    let ps_len = em_len - HASH_LEN - salt_len - 2;
    if db[..ps_len].iter().any(|&b| b != 0x00) || db[ps_len] != 0x01 {
        return Err(Error::PaddingInvalid);
    }
    let salt = &db[db.len() - salt_len..];

    let mut m_prime = Vec::with_capacity(8 + HASH_LEN + salt_len);
    m_prime.extend_from_slice(&[0u8; 8]);
    m_prime.extend_from_slice(m_hash);
    m_prime.extend_from_slice(salt);
    let h_prime = Sha256::digest(&m_prime);

    if h != h_prime.as_slice() {
        return Err(Error::PaddingInvalid);
    }
    Ok(())
}

/// OAEP-padded encryption: encode with a fresh random seed, then apply the
/// public transform. The ciphertext is the fixed modulus width.
pub fn encrypt_oaep<R: Rng + ?Sized>(
    message: &[u8],
    public: &PublicKey,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let n_bits = public.n.bits();
    let mut seed = [0u8; HASH_LEN];
    rng.fill_bytes(&mut seed);

    let em = oaep_encode(message, n_bits, &seed)?;
    let c = pow_mod(&codec::bytes_to_int(&em), &public.e, &public.n);
    codec::int_to_bytes(&c, ((n_bits + 7) / 8) as usize)
}

/// Reverse of [`encrypt_oaep`].
pub fn decrypt_oaep(ciphertext: &[u8], private: &PrivateKey) -> Result<Vec<u8>> {
    let n_bits = private.n.bits();
    let k = ((n_bits + 7) / 8) as usize;
    if k < 2 * HASH_LEN + 2 {
        return Err(Error::InvalidArgument("modulus too small for OAEP"));
    }
    if ciphertext.len() != k {
        return Err(Error::PaddingInvalid);
    }
    let c = codec::bytes_to_int(ciphertext);
    if c >= private.n {
        return Err(Error::PaddingInvalid);
    }

    let m = pow_mod(&c, &private.d, &private.n);
    let em = codec::int_to_bytes(&m, k)?;
    oaep_decode(&em, n_bits)
}

/// PSS signature: hash the message, encode with a fresh salt at
/// emBits = modBits - 1, then apply the private transform.
pub fn sign_pss<R: Rng + ?Sized>(
    message: &[u8],
    private: &PrivateKey,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let n_bits = private.n.bits();
    let m_hash = Sha256::digest(message);
    let mut salt = [0u8; HASH_LEN];
    rng.fill_bytes(&mut salt);

    let em = pss_encode(&m_hash, n_bits - 1, &salt)?;
    let s = pow_mod(&codec::bytes_to_int(&em), &private.d, &private.n);
    codec::int_to_bytes(&s, ((n_bits + 7) / 8) as usize)
}

/// Verify a [`sign_pss`] signature: apply the public transform and check
/// the PSS structure.
pub fn verify_pss(message: &[u8], signature: &[u8], public: &PublicKey) -> Result<()> {
    let n_bits = public.n.bits();
    let em_bits = n_bits - 1;
    let k = ((n_bits + 7) / 8) as usize;
    if signature.len() != k {
        return Err(Error::PaddingInvalid);
    }
    let s = codec::bytes_to_int(signature);
    if s >= public.n {
        return Err(Error::PaddingInvalid);
    }

    let m = pow_mod(&s, &public.e, &public.n);
    let em_len = ((em_bits + 7) / 8) as usize;
    let em = codec::int_to_bytes(&m, em_len).map_err(|_| Error::PaddingInvalid)?;

    let m_hash = Sha256::digest(message);
    pss_verify(&m_hash, &em, em_bits, HASH_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::generate_keypair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const N_BITS: u64 = 1024;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xBADC0DE)
    }

    fn seed() -> [u8; HASH_LEN] {
        [0xA5; HASH_LEN]
    }

    #[test]
    fn test_mgf1_known_vector() {
        // MGF1-SHA256("bar", 50), cross-checked against RFC 8017 test data
        let mask = mgf1(b"bar", 50);
        assert_eq!(
            hex::encode(&mask),
            "382576a7841021cc28fc4c0948753fb8312090cea942ea4c4e735d10dc724b155f9f6069f289d61daca0cb814502ef04eae1"
        );
    }

    #[test]
    fn test_mgf1_lengths() {
        assert_eq!(mgf1(b"seed", 0).len(), 0);
        assert_eq!(mgf1(b"seed", 31).len(), 31);
        assert_eq!(mgf1(b"seed", 32).len(), 32);
        assert_eq!(mgf1(b"seed", 33).len(), 33);
    }

    #[test]
    fn test_oaep_roundtrip() {
        for msg in [&b""[..], b"x", b"attack at dawn", &[0u8; 62]] {
            let em = oaep_encode(msg, N_BITS, &seed()).unwrap();
            assert_eq!(em.len(), 128);
            assert_eq!(em[0], 0x00);
            assert_eq!(oaep_decode(&em, N_BITS).unwrap(), msg);
        }
    }

    #[test]
    fn test_oaep_message_too_long() {
        // max = k - 2*HASH_LEN - 2 = 128 - 66 = 62
        assert!(oaep_encode(&[0u8; 63], N_BITS, &seed()).is_err());
        assert!(oaep_encode(&[0u8; 62], N_BITS, &seed()).is_ok());
    }

    #[test]
    fn test_oaep_bad_seed_length() {
        assert!(matches!(
            oaep_encode(b"m", N_BITS, &[0u8; 16]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_oaep_single_bit_flip() {
        let em = oaep_encode(b"sensitive", N_BITS, &seed()).unwrap();
        for pos in [0, 1, HASH_LEN, HASH_LEN + 1, em.len() - 1] {
            let mut tampered = em.clone();
            tampered[pos] ^= 0x01;
            assert_eq!(
                oaep_decode(&tampered, N_BITS),
                Err(Error::PaddingInvalid),
                "flip at byte {} must be rejected",
                pos
            );
        }
    }

    #[test]
    fn test_oaep_wrong_length() {
        assert_eq!(oaep_decode(&[0u8; 127], N_BITS), Err(Error::PaddingInvalid));
    }

    #[test]
    fn test_pss_roundtrip() {
        let m_hash = Sha256::digest(b"message to sign");
        let salt = [0x5A; HASH_LEN];
        let em = pss_encode(&m_hash, N_BITS - 1, &salt).unwrap();
        assert_eq!(*em.last().unwrap(), 0xbc);
        pss_verify(&m_hash, &em, N_BITS - 1, HASH_LEN).unwrap();
    }

    #[test]
    fn test_pss_roundtrip_short_salt() {
        // A non-default salt width changes the DB split that the verify
        // mask is regenerated over
        let m_hash = Sha256::digest(b"short salt");
        let salt = [0x33; 16];
        let em = pss_encode(&m_hash, N_BITS - 1, &salt).unwrap();
        pss_verify(&m_hash, &em, N_BITS - 1, salt.len()).unwrap();
    }

    #[test]
    fn test_pss_wrong_hash_rejected() {
        let m_hash = Sha256::digest(b"original");
        let em = pss_encode(&m_hash, N_BITS - 1, &[0x5A; HASH_LEN]).unwrap();
        let other = Sha256::digest(b"forged");
        assert_eq!(
            pss_verify(&other, &em, N_BITS - 1, HASH_LEN),
            Err(Error::PaddingInvalid)
        );
    }

    #[test]
    fn test_pss_tampered_em_rejected() {
        let m_hash = Sha256::digest(b"message");
        let em = pss_encode(&m_hash, N_BITS - 1, &[0x11; HASH_LEN]).unwrap();
        for pos in [0, em.len() / 2, em.len() - 1] {
            let mut tampered = em.clone();
            tampered[pos] ^= 0x80;
            assert!(pss_verify(&m_hash, &tampered, N_BITS - 1, HASH_LEN).is_err());
        }
    }

    #[test]
    fn test_encrypt_oaep_roundtrip() {
        let mut rng = rng();
        let kp = generate_keypair(1024, 65537, &mut rng).unwrap();
        let message = b"OAEP over a real key";

        let ct = encrypt_oaep(message, &kp.public, &mut rng).unwrap();
        assert_eq!(ct.len(), 128);
        assert_eq!(decrypt_oaep(&ct, &kp.private).unwrap(), message);
    }

    #[test]
    fn test_encrypt_oaep_randomized() {
        let mut rng = rng();
        let kp = generate_keypair(1024, 65537, &mut rng).unwrap();

        let c1 = encrypt_oaep(b"same message", &kp.public, &mut rng).unwrap();
        let c2 = encrypt_oaep(b"same message", &kp.public, &mut rng).unwrap();
        assert_ne!(c1, c2, "fresh seeds must randomize the ciphertext");
    }

    #[test]
    fn test_decrypt_oaep_tampered_ciphertext() {
        let mut rng = rng();
        let kp = generate_keypair(1024, 65537, &mut rng).unwrap();

        let mut ct = encrypt_oaep(b"payload", &kp.public, &mut rng).unwrap();
        ct[40] ^= 0x01;
        assert_eq!(decrypt_oaep(&ct, &kp.private), Err(Error::PaddingInvalid));
    }

    #[test]
    fn test_sign_verify_pss() {
        let mut rng = rng();
        let kp = generate_keypair(1024, 65537, &mut rng).unwrap();
        let message = b"signed statement";

        let sig = sign_pss(message, &kp.private, &mut rng).unwrap();
        verify_pss(message, &sig, &kp.public).unwrap();

        assert!(verify_pss(b"different statement", &sig, &kp.public).is_err());

        let mut bad_sig = sig.clone();
        bad_sig[10] ^= 0x01;
        assert!(verify_pss(message, &bad_sig, &kp.public).is_err());
    }
}
