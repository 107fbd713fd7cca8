//! Message signing with caller-supplied keys.
//!
//! # Security
//! - Keys are passed per call and never stored
//! - Keys and signatures are never logged

use once_cell::sync::Lazy;
use secp256k1::{constants::SECRET_KEY_SIZE, All, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::blockchain::types::{CepError, CepResult};
use crate::codec::{from_hex, hex_fix};

/// Shared context; creating one is comparatively expensive.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Parse a hex private key (`0x` optional, any case) into a secp256k1 scalar.
pub fn parse_private_key(private_key_hex: &str) -> CepResult<SecretKey> {
    let bytes = from_hex(&hex_fix(private_key_hex));
    if bytes.len() != SECRET_KEY_SIZE {
        return Err(CepError::InvalidKey(format!(
            "private key must be {} bytes long, got {}",
            SECRET_KEY_SIZE,
            bytes.len()
        )));
    }

    SecretKey::from_slice(&bytes)
        .map_err(|e| CepError::InvalidKey(format!("key out of curve range: {}", e)))
}

/// Sign `SHA-256(message)` and return the DER signature as lowercase hex.
///
/// Nonces are derived per RFC 6979, so equal inputs give equal signatures.
pub fn sign_data(message: &str, private_key_hex: &str) -> CepResult<String> {
    let secret_key = parse_private_key(private_key_hex)?;

    let digest: [u8; 32] = Sha256::digest(message.as_bytes()).into();
    let message = Message::from_digest(digest);

    let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &secret_key);
    let der = signature.serialize_der();
    if der.is_empty() {
        return Err(CepError::SigningFailed("empty DER signature".into()));
    }

    Ok(hex::encode(&*der))
}

/// Compressed public key (33 bytes, lowercase hex) for a private key.
pub fn public_key_hex(private_key_hex: &str) -> CepResult<String> {
    let secret_key = parse_private_key(private_key_hex)?;
    let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
    Ok(hex::encode(public_key.serialize()))
}
