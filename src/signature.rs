use crate::{PublicKey, Signature};
use ed25519_dalek::Signer;

/// Checks that a signature over a message was produced by the owner of a public key.
///
/// Implementations must be deterministic and side-effect free, and must return false rather
/// than fail for keys or signatures they cannot decode.
pub trait SignatureVerifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        (**self).verify(message, signature, public_key)
    }
}

/// Verifies Ed25519 signatures.
#[derive(Debug, Default, Copy, Clone)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        let verifying_key = match ed25519_dalek::VerifyingKey::from_bytes(public_key.as_bytes()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match ed25519_dalek::Signature::from_slice(signature.as_slice()) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        verifying_key.verify_strict(message, &signature).is_ok()
    }
}

/// An Ed25519 key pair used to sign transaction inputs.
pub struct KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl KeyPair {
    pub fn from_secret_bytes(secret: [u8; ed25519_dalek::SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&secret),
        }
    }

    pub fn from_secret_hex(s: &str) -> Result<Self, String> {
        let bytes = hex::decode(s).map_err(|e| e.to_string())?;
        if bytes.len() != ed25519_dalek::SECRET_KEY_LENGTH {
            return Err(format!(
                "Invalid secret key length. Expected: {} but got: {}",
                ed25519_dalek::SECRET_KEY_LENGTH,
                bytes.len()
            ));
        }
        let mut secret = [0; ed25519_dalek::SECRET_KEY_LENGTH];
        secret.copy_from_slice(&bytes);
        Ok(Self::from_secret_bytes(secret))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::new(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_own_signature() {
        let key_pair = KeyPair::from_secret_bytes([1; 32]);
        let signature = key_pair.sign(b"message");
        assert!(Ed25519Verifier.verify(b"message", &signature, &key_pair.public_key()));
    }

    #[test]
    fn rejects_signature_of_different_message() {
        let key_pair = KeyPair::from_secret_bytes([1; 32]);
        let signature = key_pair.sign(b"message");
        assert!(!Ed25519Verifier.verify(b"messagf", &signature, &key_pair.public_key()));
    }

    #[test]
    fn rejects_signature_from_different_key() {
        let signer = KeyPair::from_secret_bytes([1; 32]);
        let owner = KeyPair::from_secret_bytes([2; 32]);
        let signature = signer.sign(b"message");
        assert!(!Ed25519Verifier.verify(b"message", &signature, &owner.public_key()));
    }

    #[test]
    fn malformed_signature_is_rejected_without_panicking() {
        let key_pair = KeyPair::from_secret_bytes([1; 32]);
        let truncated = Signature::new(vec![0; 10]);
        assert!(!Ed25519Verifier.verify(b"message", &truncated, &key_pair.public_key()));
        assert!(!Ed25519Verifier.verify(b"message", &Signature::empty(), &key_pair.public_key()));
    }

    #[test]
    fn secret_key_from_hex() {
        let key_pair = KeyPair::from_secret_hex(&"01".repeat(32)).unwrap();
        assert_eq!(
            key_pair.public_key(),
            KeyPair::from_secret_bytes([1; 32]).public_key()
        );
        assert!(KeyPair::from_secret_hex("01").is_err());
    }
}
