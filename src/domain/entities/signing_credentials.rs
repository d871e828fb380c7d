use openssl::{
    pkey::{PKey, PKeyRef, Private},
    x509::{X509Ref, X509},
};

use crate::errors::{CredentialError, ReceiptForgeError};

/// Private key and certificate used to sign receipts.
///
/// Immutable once built; share it behind an `Arc` to sign from several
/// threads at once. Whether the key actually matches the certificate is only
/// checked at signing time.
pub struct SigningCredentials {
    private_key: PKey<Private>,
    certificate: X509,
}

impl SigningCredentials {
    pub fn new(private_key: PKey<Private>, certificate: X509) -> Self {
        Self {
            private_key,
            certificate,
        }
    }

    /// Parses a PEM private key (PKCS#1 or PKCS#8) and a PEM certificate.
    pub fn from_pem(key_pem: &[u8], cert_pem: &[u8]) -> Result<Self, ReceiptForgeError> {
        let private_key = PKey::private_key_from_pem(key_pem)
            .map_err(|e| CredentialError::with_debug("failed to parse private key PEM", &e))?;
        let certificate = X509::from_pem(cert_pem)
            .map_err(|e| CredentialError::with_debug("failed to parse certificate PEM", &e))?;
        Ok(Self::new(private_key, certificate))
    }

    pub fn private_key(&self) -> &PKeyRef<Private> {
        &self.private_key
    }

    pub fn certificate(&self) -> &X509Ref {
        &self.certificate
    }
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("key_bits", &self.private_key.bits())
            .field("subject", &self.certificate.subject_name())
            .finish()
    }
}
