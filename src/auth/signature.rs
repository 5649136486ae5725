// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Recoverable signatures
//!
//! A signature is 65 bytes, hex encoded: one header byte carrying the
//! recovery id (`header - 27 - 4`, compressed-key form) followed by `r || s`.
//! The signer's compressed public key is recovered from the digest and
//! compared against the candidate keys.
//!
//! Every failure path of [`verify_any`] collapses to `false` so that callers
//! cannot tell a malformed signature from a wrong key.

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use super::digest::Digest;

/// Length of a well-formed signature in hex characters.
pub const SIGNATURE_HEX_LEN: usize = 130;

/// Offset between the header byte and the recovery id.
const HEADER_OFFSET: u8 = 27 + 4;

/// Largest recovery id accepted before calling into the curve library.
const MAX_RECOVERY_ID: u8 = 4;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature must be {SIGNATURE_HEX_LEN} hex characters, got {0}")]
    Length(usize),

    #[error("failed to decode signature hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("recovery id out of range (header byte {0})")]
    RecoveryId(u8),

    #[error("public key recovery failed")]
    Recovery,

    #[error("public key must be 33 bytes, got {0}")]
    KeyLength(usize),
}

/// 33-byte compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| SignatureError::KeyLength(bytes.len()))
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }
}

impl From<&VerifyingKey> for PublicKey {
    fn from(key: &VerifyingKey) -> Self {
        let point = key.as_affine().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Self(out)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// Recover the compressed public key that produced `signature` over `digest`.
pub fn recover_public_key(digest: &Digest, signature: &str) -> Result<PublicKey, SignatureError> {
    if signature.len() != SIGNATURE_HEX_LEN {
        return Err(SignatureError::Length(signature.len()));
    }

    let raw = hex::decode(signature)?;
    let (header, rs) = raw
        .split_first()
        .ok_or(SignatureError::Length(signature.len()))?;

    let recid = header.wrapping_sub(HEADER_OFFSET);
    if recid > MAX_RECOVERY_ID {
        return Err(SignatureError::RecoveryId(*header));
    }
    let recovery_id = RecoveryId::from_byte(recid).ok_or(SignatureError::RecoveryId(*header))?;

    let signature = Signature::from_slice(rs).map_err(|_| SignatureError::Recovery)?;
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|_| SignatureError::Recovery)?;

    Ok(PublicKey::from(&key))
}

/// Whether `signature` over `digest` was made by any of `keys`.
pub fn verify_any(keys: &[PublicKey], signature: &str, digest: &Digest) -> bool {
    match recover_public_key(digest, signature) {
        Ok(recovered) => keys.contains(&recovered),
        Err(e) => {
            tracing::debug!(error = %e, "signature rejected");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    //! Deterministic signing helpers for tests.

    use k256::ecdsa::SigningKey;

    use super::*;

    /// Decode a WIF private key (`0x80 || key || checksum`).
    pub fn from_wif(wif: &str) -> SigningKey {
        let bytes = bs58::decode(wif).into_vec().unwrap();
        assert_eq!(bytes.len(), 37);
        SigningKey::from_slice(&bytes[1..33]).unwrap()
    }

    /// Deterministic key derived from a seed byte.
    pub fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).unwrap()
    }

    pub fn public_key(key: &SigningKey) -> PublicKey {
        PublicKey::from(key.verifying_key())
    }

    /// Sign `digest` in the 65-byte hex form clients send.
    pub fn sign(key: &SigningKey, digest: &Digest) -> String {
        let (signature, recid) = key.sign_prehash_recoverable(digest).unwrap();
        let mut raw = Vec::with_capacity(65);
        raw.push(HEADER_OFFSET + recid.to_byte());
        raw.extend_from_slice(&signature.to_bytes());
        hex::encode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;

    const WIF_1: &str = "5J7FEcpqc1sZ7ZbKx2kVvBHx2oTjWG2wMU2e2FYX85sGA2qu8KT";
    const PUB_1: &str = "0366b11f2f616e44c59bcf082a3e00e77e6b9c0057161a62af3fc16176eb6ba104";
    const HASH_1: &str = "28e55f6ef3d8010caa64b74c0d4ff2e792f5f158170dcb04a2efec0dfec5e4d0";
    const SIG_1: &str = "1f65116880dd659a9709956e9409095fa0c2e282fefe2c6511d4fad2b8301cf09b1ee9473100a504e08091acdbc8cd1042e857d637a506720d2b35a6976b1afe99";

    const WIF_2: &str = "5KHK69Be8P8NQLy46KXugJWyNkxw8Nw3Mzue4wD8ygx48emMugd";
    const PUB_2: &str = "027090d971c8e01d90fbfe29ce33bcc42a486e5ef3356e93f8e6e2e71497a92b07";
    const HASH_2: &str = "b901e39b9f719c41f4ddefa8b3f0742c88a35ec7adee6e06189f99a2598f56cd";
    const SIG_2: &str = "1f266da35169f8a552a356c3550779fa43df4426327e361896a3a80d06c9ee9a546d966d9feafbcb9f0c864e13ca517e2f90d00230ecd8645b1b2e110198e576ec";

    fn digest(s: &str) -> Digest {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out).unwrap();
        out
    }

    fn key(s: &str) -> PublicKey {
        PublicKey::from_bytes(&hex::decode(s).unwrap()).unwrap()
    }

    #[test]
    fn wif_keys_match_published_public_keys() {
        assert_eq!(public_key(&from_wif(WIF_1)), key(PUB_1));
        assert_eq!(public_key(&from_wif(WIF_2)), key(PUB_2));
    }

    #[test]
    fn recovers_known_signers() {
        assert_eq!(recover_public_key(&digest(HASH_1), SIG_1).unwrap(), key(PUB_1));
        assert_eq!(recover_public_key(&digest(HASH_2), SIG_2).unwrap(), key(PUB_2));
    }

    #[test]
    fn verify_any_accepts_any_matching_key() {
        let keys = [key(PUB_1), key(PUB_2)];
        assert!(verify_any(&keys, SIG_1, &digest(HASH_1)));
        assert!(verify_any(&keys, SIG_2, &digest(HASH_2)));
        assert!(verify_any(&keys[1..], SIG_2, &digest(HASH_2)));
    }

    #[test]
    fn verify_any_rejects_other_digests() {
        let keys = [key(PUB_2)];
        assert!(!verify_any(
            &keys,
            SIG_2,
            &digest("7901e39b9f719c41f4ddefa8b3f0742c88a35ec7adee6e06189f99a2598f56cd")
        ));
        assert!(!verify_any(
            &keys,
            SIG_2,
            &digest("8901e39b9f719c41f4ddefa8b3f0742c88a35ec7adee6e06189f99a2598f56cd")
        ));
        assert!(!verify_any(&[key(PUB_1), key(PUB_2)], SIG_2, &digest(HASH_1)));
    }

    #[test]
    fn verify_any_rejects_wrong_length_without_error() {
        let d = digest(HASH_1);
        let keys = [key(PUB_1)];
        assert!(!verify_any(&keys, "", &d));
        assert!(!verify_any(&keys, &SIG_1[..128], &d));
        assert!(!verify_any(&keys, &format!("{SIG_1}00"), &d));
        assert_eq!(
            recover_public_key(&d, &SIG_1[..128]),
            Err(SignatureError::Length(128))
        );
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        let bad = "zz".repeat(65);
        assert!(!verify_any(&[key(PUB_1)], &bad, &digest(HASH_1)));
        assert!(matches!(
            recover_public_key(&digest(HASH_1), &bad),
            Err(SignatureError::Hex(_))
        ));
    }

    #[test]
    fn recovery_id_out_of_range_is_rejected() {
        let d = digest(HASH_1);
        // header 0x1a underflows the offset
        let low = format!("1a{}", &SIG_1[2..]);
        assert_eq!(
            recover_public_key(&d, &low),
            Err(SignatureError::RecoveryId(0x1a))
        );

        // header 0x24 is recovery id 5
        let high = format!("24{}", &SIG_1[2..]);
        assert_eq!(
            recover_public_key(&d, &high),
            Err(SignatureError::RecoveryId(0x24))
        );

        // recovery id 4 passes the range check but is not a valid curve id
        let four = format!("23{}", &SIG_1[2..]);
        assert!(!verify_any(&[key(PUB_1)], &four, &d));
    }

    #[test]
    fn unrelated_key_does_not_verify() {
        let d = digest(HASH_1);
        let signer = signing_key(7);
        let other = signing_key(8);
        let sig = sign(&signer, &d);

        assert!(verify_any(&[public_key(&signer)], &sig, &d));
        assert!(!verify_any(&[public_key(&other)], &sig, &d));
        assert!(!verify_any(&[], &sig, &d));
    }

    #[test]
    fn sign_helper_produces_wire_format() {
        let d = digest(HASH_2);
        let sig = sign(&from_wif(WIF_2), &d);
        assert_eq!(sig.len(), SIGNATURE_HEX_LEN);
        assert_eq!(recover_public_key(&d, &sig).unwrap(), key(PUB_2));
    }
}
