use std::sync::Arc;

use crate::{
    config::CredentialsConfig,
    data::{
        datasources::{
            attribute_encoder_datasource::AttributeEncoderDatasourceImpl,
            envelope_signer_datasource::EnvelopeSignerDatasourceImpl,
        },
        repositories::receipt_repository_impl::ReceiptRepositoryImpl,
    },
    domain::{
        entities::{
            purchase_item::PurchaseItem, receipt_record::ReceiptRecord,
            signing_credentials::SigningCredentials,
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::ReceiptForgeError,
};

/// Forges App Store receipts signed with a fixed set of credentials.
///
/// Cheap to clone; clones share the same credentials. All methods are
/// synchronous and CPU-bound.
pub struct ReceiptForgeUtil<R: ReceiptRepository> {
    receipt_repository: Arc<R>,
    credentials: Arc<SigningCredentials>,
}

impl<R: ReceiptRepository> Clone for ReceiptForgeUtil<R> {
    fn clone(&self) -> Self {
        Self {
            receipt_repository: Arc::clone(&self.receipt_repository),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<R: ReceiptRepository> ReceiptForgeUtil<R> {
    /// Base64 receipt data for a `verifyReceipt`-style JSON receipt.
    pub fn forge_json(&self, body: &[u8]) -> Result<String, ReceiptForgeError> {
        self.receipt_repository.forge_json(body, &self.credentials)
    }

    /// Base64 receipt data for the given record.
    pub fn forge(&self, record: &ReceiptRecord) -> Result<String, ReceiptForgeError> {
        self.receipt_repository.forge(record, &self.credentials)
    }

    /// Unsigned ASN.1 payload, as it will be embedded in the envelope.
    pub fn encode_receipt(&self, record: &ReceiptRecord) -> Result<Vec<u8>, ReceiptForgeError> {
        self.receipt_repository.encode_receipt(record)
    }

    pub fn encode_in_app(&self, item: &PurchaseItem) -> Result<Vec<u8>, ReceiptForgeError> {
        self.receipt_repository.encode_in_app(item)
    }

    /// Signed PKCS#7 envelope (DER) around an arbitrary payload.
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, ReceiptForgeError> {
        self.receipt_repository.sign(payload, &self.credentials)
    }
}

impl
    ReceiptForgeUtil<
        ReceiptRepositoryImpl<AttributeEncoderDatasourceImpl, EnvelopeSignerDatasourceImpl>,
    >
{
    pub fn new(credentials: SigningCredentials) -> Self {
        Self {
            receipt_repository: Arc::new(ReceiptRepositoryImpl::new()),
            credentials: Arc::new(credentials),
        }
    }

    pub fn from_config(config: &CredentialsConfig) -> Result<Self, ReceiptForgeError> {
        Ok(Self::new(config.load()?))
    }
}
