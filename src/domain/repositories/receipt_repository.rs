use crate::{
    domain::entities::{
        purchase_item::PurchaseItem, receipt_record::ReceiptRecord,
        signing_credentials::SigningCredentials,
    },
    errors::ReceiptForgeError,
};

pub trait ReceiptRepository: Send + Sync {
    /// Encodes the record into the receipt's ASN.1 attribute payload.
    fn encode_receipt(&self, record: &ReceiptRecord) -> Result<Vec<u8>, ReceiptForgeError>;

    /// Encodes a single in-app purchase into its nested attribute sequence,
    /// as embedded in the payload under tag 17.
    fn encode_in_app(&self, item: &PurchaseItem) -> Result<Vec<u8>, ReceiptForgeError>;

    /// Wraps a payload in a signed PKCS#7 envelope (DER).
    fn sign(
        &self,
        payload: &[u8],
        credentials: &SigningCredentials,
    ) -> Result<Vec<u8>, ReceiptForgeError>;

    /// Encodes and signs the record, returning the base64 receipt data.
    fn forge(
        &self,
        record: &ReceiptRecord,
        credentials: &SigningCredentials,
    ) -> Result<String, ReceiptForgeError>;

    /// Same as `forge`, starting from a `verifyReceipt`-style JSON receipt.
    fn forge_json(
        &self,
        body: &[u8],
        credentials: &SigningCredentials,
    ) -> Result<String, ReceiptForgeError>;
}
