use base64::{prelude::BASE64_STANDARD, Engine as _};
use openssl::{
    pkcs7::{Pkcs7, Pkcs7Flags},
    pkey::Id,
    stack::Stack,
    x509::X509,
};
use tracing::debug;

use crate::{
    domain::entities::signing_credentials::SigningCredentials,
    errors::{ReceiptForgeError, SigningError},
};

pub trait EnvelopeSignerDatasource: Send + Sync {
    /// Wraps the payload in a PKCS#7 SignedData envelope (DER), with the
    /// content attached and the signer certificate embedded.
    fn sign(
        &self,
        payload: &[u8],
        credentials: &SigningCredentials,
    ) -> Result<Vec<u8>, ReceiptForgeError>;

    /// Standard base64, padded, without line wrapping.
    fn encode_envelope(&self, envelope: &[u8]) -> String;
}

pub struct EnvelopeSignerDatasourceImpl;

impl EnvelopeSignerDatasource for EnvelopeSignerDatasourceImpl {
    fn sign(
        &self,
        payload: &[u8],
        credentials: &SigningCredentials,
    ) -> Result<Vec<u8>, ReceiptForgeError> {
        let key = credentials.private_key();
        let cert = credentials.certificate();

        if key.id() != Id::RSA {
            return Err(SigningError::with_debug(
                "signing key is not an RSA key",
                &key.id(),
            ));
        }
        let cert_public_key = cert.public_key().map_err(|e| {
            SigningError::with_debug("failed to read certificate public key", &e)
        })?;
        if !key.public_eq(&*cert_public_key) {
            return Err(SigningError::new(
                "signing key does not match certificate",
            ));
        }

        // The signer certificate is embedded by PKCS7_sign itself, so no extra
        // chain certificates are passed.
        let extra_certs = Stack::<X509>::new()
            .map_err(|e| SigningError::with_debug("failed to allocate certificate stack", &e))?;
        // BINARY: sign the payload bytes as-is, without MIME canonicalization.
        let flags = Pkcs7Flags::BINARY | Pkcs7Flags::NOSMIMECAP;
        let envelope = Pkcs7::sign(cert, key, &extra_certs, payload, flags)
            .map_err(|e| SigningError::with_debug("PKCS#7 signing failed", &e))?
            .to_der()
            .map_err(|e| SigningError::with_debug("failed to serialize PKCS#7 envelope", &e))?;

        debug!(
            payload_len = payload.len(),
            envelope_len = envelope.len(),
            key_bits = key.bits(),
            "signed receipt envelope"
        );
        Ok(envelope)
    }

    fn encode_envelope(&self, envelope: &[u8]) -> String {
        BASE64_STANDARD.encode(envelope)
    }
}

impl EnvelopeSignerDatasourceImpl {
    pub fn new() -> Self {
        Self
    }
}
