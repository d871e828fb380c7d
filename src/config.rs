use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    domain::entities::signing_credentials::SigningCredentials,
    errors::{CredentialError, ReceiptForgeError},
};

pub const DEFAULT_KEY_FILE: &str = "key.pem";
pub const DEFAULT_CERT_FILE: &str = "cert.pem";

/// Fallback env vars, read when the corresponding file can't be opened. The
/// values are expected in munged form (see [`revert_pem`]).
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const CERTIFICATE_ENV: &str = "CERTIFICATE";

/// Where to find the signing key and certificate.
#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// PEM private key, PKCS#1 or PKCS#8.
    pub key_file: PathBuf,
    /// PEM X.509 certificate.
    pub cert_file: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            cert_file: PathBuf::from(DEFAULT_CERT_FILE),
        }
    }
}

impl CredentialsConfig {
    /// Reads and parses the credentials. Intended to be called once at
    /// startup; the result is immutable.
    pub fn load(&self) -> Result<SigningCredentials, ReceiptForgeError> {
        let key_pem = read_pem(
            &self.key_file,
            std::env::var(PRIVATE_KEY_ENV).ok(),
            "failed to read private key",
        )?;
        let cert_pem = read_pem(
            &self.cert_file,
            std::env::var(CERTIFICATE_ENV).ok(),
            "failed to read certificate",
        )?;
        let credentials = SigningCredentials::from_pem(&key_pem, &cert_pem)?;
        info!(?credentials, "loaded signing credentials");
        Ok(credentials)
    }
}

fn read_pem(
    path: &Path,
    env_fallback: Option<String>,
    message: &'static str,
) -> Result<Vec<u8>, ReceiptForgeError> {
    match fs::read(path) {
        Ok(pem) => {
            debug!(path = %path.display(), "read PEM from file");
            Ok(pem)
        }
        Err(file_error) => match env_fallback {
            Some(munged) if !munged.trim().is_empty() => {
                debug!(path = %path.display(), "file unavailable, using PEM from environment");
                Ok(revert_pem(&munged).into_bytes())
            }
            _ => Err(CredentialError::with_debug(
                message,
                &format!("{}: {}", path.display(), file_error),
            )),
        },
    }
}

/// Restores PEM text whose newlines were replaced with spaces, as happens
/// when PEM is stored in a single-line environment variable (for example via
/// a YAML `>-` block).
pub fn revert_pem(munged: &str) -> String {
    munged
        .trim()
        .replace(' ', "\n")
        .replace("\nCERTIFICATE", " CERTIFICATE")
        .replace("\nPRIVATE\nKEY", " PRIVATE KEY")
        .replace("\nRSA PRIVATE KEY", " RSA PRIVATE KEY")
}
