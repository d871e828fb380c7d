use crate::{
    data::{
        datasources::{
            attribute_encoder_datasource::{
                AttributeEncoderDatasource, AttributeEncoderDatasourceImpl,
            },
            envelope_signer_datasource::{EnvelopeSignerDatasource, EnvelopeSignerDatasourceImpl},
        },
        models::app_store_receipt::receipt_model::ReceiptModel,
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

pub struct ReceiptRepositoryImpl<A: AttributeEncoderDatasource, B: EnvelopeSignerDatasource>
{
    attribute_encoder_datasource: A,
    envelope_signer_datasource: B,
}

impl<A: AttributeEncoderDatasource, B: EnvelopeSignerDatasource> ReceiptRepository
    for ReceiptRepositoryImpl<A, B>
{
    fn encode_receipt(&self, record: &ReceiptRecord) -> Result<Vec<u8>, ReceiptForgeError> {
        self.attribute_encoder_datasource.encode_receipt(record)
    }

    fn encode_in_app(&self, item: &PurchaseItem) -> Result<Vec<u8>, ReceiptForgeError> {
        self.attribute_encoder_datasource.encode_in_app(item)
    }

    fn sign(
        &self,
        payload: &[u8],
        credentials: &SigningCredentials,
    ) -> Result<Vec<u8>, ReceiptForgeError> {
        self.envelope_signer_datasource.sign(payload, credentials)
    }

    fn forge(
        &self,
        record: &ReceiptRecord,
        credentials: &SigningCredentials,
    ) -> Result<String, ReceiptForgeError> {
        let payload = self.attribute_encoder_datasource.encode_receipt(record)?;
        let envelope = self.envelope_signer_datasource.sign(&payload, credentials)?;
        Ok(self.envelope_signer_datasource.encode_envelope(&envelope))
    }

    fn forge_json(
        &self,
        body: &[u8],
        credentials: &SigningCredentials,
    ) -> Result<String, ReceiptForgeError> {
        let record: ReceiptRecord = ReceiptModel::from_json(body)?.into();
        self.forge(&record, credentials)
    }
}

impl ReceiptRepositoryImpl<AttributeEncoderDatasourceImpl, EnvelopeSignerDatasourceImpl> {
    pub fn new() -> Self {
        Self {
            attribute_encoder_datasource: AttributeEncoderDatasourceImpl::new(),
            envelope_signer_datasource: EnvelopeSignerDatasourceImpl::new(),
        }
    }
}
