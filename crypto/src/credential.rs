use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Salt length in bytes before encoding
pub const SALT_LENGTH: usize = 16;

/// Derived digest length in bytes before encoding
pub const DIGEST_LENGTH: usize = 64;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// A freshly derived credential, ready for storage.
///
/// Both fields are base64 strings; the raw key material they encode never
/// leaves this module unprotected.
#[derive(Debug, Clone)]
pub struct DerivedCredential {
    pub digest: String,
    pub salt: String,
}

/// Derives and verifies salted password digests.
///
/// Pure CPU work; no side effects. The iteration count is fixed at
/// construction so stored digests stay verifiable.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    iterations: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the iteration count. Lowering it below the default is only
    /// sensible in tests.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Derive a digest for `password` with a fresh random salt.
    pub fn derive(&self, password: &str) -> CryptoResult<DerivedCredential> {
        let salt = Self::generate_salt()?;
        let digest = self.derive_with_salt(password, &salt)?;
        Ok(DerivedCredential { digest, salt })
    }

    /// Re-derive the digest for `password` using a stored base64 salt.
    pub fn derive_with_salt(&self, password: &str, salt: &str) -> CryptoResult<String> {
        let salt_bytes = BASE64
            .decode(salt)
            .map_err(|e| CryptoError::InvalidEncoding(format!("salt is not valid base64: {e}")))?;

        let mut derived = Zeroizing::new(vec![0u8; DIGEST_LENGTH]);
        pbkdf2_hmac::<Sha256>(
            password.as_bytes(),
            &salt_bytes,
            self.iterations,
            &mut derived,
        );

        Ok(BASE64.encode(&derived))
    }

    /// Verify `password` against a stored digest/salt pair.
    ///
    /// Recomputes the derivation and compares in constant time. Returns
    /// `Ok(false)` for a mismatch; errors only when the stored salt cannot
    /// be decoded.
    pub fn verify(&self, password: &str, digest: &str, salt: &str) -> CryptoResult<bool> {
        let computed = self.derive_with_salt(password, salt)?;
        Ok(computed.as_bytes().ct_eq(digest.as_bytes()).into())
    }

    /// Generate a cryptographically secure salt, base64-encoded.
    fn generate_salt() -> CryptoResult<String> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("OS random source: {e}")))?;
        Ok(BASE64.encode(salt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_verify_roundtrip() {
        let hasher = CredentialHasher::new();
        let cred = hasher.derive("Passw0rd").unwrap();

        assert!(hasher.verify("Passw0rd", &cred.digest, &cred.salt).unwrap());
        assert!(!hasher.verify("passw0rd", &cred.digest, &cred.salt).unwrap());
        assert!(!hasher.verify("", &cred.digest, &cred.salt).unwrap());
    }

    #[test]
    fn test_distinct_salts_distinct_digests() {
        let hasher = CredentialHasher::new();
        let a = hasher.derive("same password").unwrap();
        let b = hasher.derive("same password").unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_derivation_is_deterministic_for_stored_salt() {
        let hasher = CredentialHasher::new();
        let cred = hasher.derive("deterministic").unwrap();

        let recomputed = hasher.derive_with_salt("deterministic", &cred.salt).unwrap();
        assert_eq!(recomputed, cred.digest);
    }

    #[test]
    fn test_encodings_are_printable() {
        let hasher = CredentialHasher::new();
        let cred = hasher.derive("printable").unwrap();

        // 16 raw bytes -> 24 base64 chars, 64 raw bytes -> 88 base64 chars
        assert_eq!(cred.salt.len(), 24);
        assert_eq!(cred.digest.len(), 88);
        assert!(cred.salt.is_ascii());
        assert!(cred.digest.is_ascii());
    }

    #[test]
    fn test_undecodable_salt_is_an_error() {
        let hasher = CredentialHasher::new();
        let result = hasher.verify("whatever", "irrelevant", "not base64 !!!");
        assert!(matches!(result, Err(CryptoError::InvalidEncoding(_))));
    }

    #[test]
    fn test_iteration_count_changes_digest() {
        let fast = CredentialHasher::with_iterations(1_000);
        let cred = fast.derive("password").unwrap();

        let slow = CredentialHasher::new();
        let other = slow.derive_with_salt("password", &cred.salt).unwrap();
        assert_ne!(cred.digest, other);
    }
}
