//! Ed25519 signing identity bound to a reproduced secret.
//!
//! The 32-byte extracted secret is used directly as the Ed25519 seed, so the
//! same keystroke rhythm always yields the same public key. Nothing here is
//! stored: rebuild the identity from a fresh [`Secret`] for each use.

use ring::signature::{self, Ed25519KeyPair, KeyPair};

use crate::error::FuzzyError;
use crate::secret::Secret;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 identity seeded from an extracted secret.
///
/// The seed is held in a [`Secret`] (mlocked, zeroized on drop) and the key
/// pair is rebuilt for each signature. Not `Clone`, not `Serialize`.
pub struct SigningIdentity {
    seed: Secret,
    public_key: [u8; PUBLIC_KEY_LEN],
}

impl SigningIdentity {
    /// Derive the identity from `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::Signature`] if `ring` rejects the seed.
    pub fn from_secret(secret: &Secret) -> Result<Self, FuzzyError> {
        let keypair = Ed25519KeyPair::from_seed_unchecked(secret.expose())
            .map_err(|e| FuzzyError::Signature(format!("Ed25519 key derivation failed: {e}")))?;
        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(keypair.public_key().as_ref());

        let mut seed_bytes = *secret.expose();
        let seed = Secret::from_bytes(&mut seed_bytes);
        Ok(Self { seed, public_key })
    }

    /// Public verification key.
    #[must_use]
    pub const fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.public_key
    }

    /// Sign `message` (deterministic Ed25519).
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::Signature`] if the key pair cannot be rebuilt
    /// from the stored seed.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LEN], FuzzyError> {
        let keypair = Ed25519KeyPair::from_seed_and_public_key(self.seed.expose(), &self.public_key)
            .map_err(|e| {
                FuzzyError::Signature(format!("Ed25519 key reconstruction failed: {e}"))
            })?;
        let mut out = [0u8; SIGNATURE_LEN];
        out.copy_from_slice(keypair.sign(message).as_ref());
        Ok(out)
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningIdentity(***)")
    }
}

/// Verify an Ed25519 signature over `message`.
///
/// # Errors
///
/// Returns [`FuzzyError::Signature`] if the signature does not verify.
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_LEN],
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<(), FuzzyError> {
    signature::UnparsedPublicKey::new(&signature::ED25519, public_key)
        .verify(message, signature)
        .map_err(|_| FuzzyError::Signature("Ed25519 verification failed".to_string()))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
