use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    domain::entities::receipt_record::ReceiptRecord,
    errors::{InputDecodeError, ReceiptForgeError},
};

use super::{common::AppStoreDate, in_app_model::InAppModel};

/// Receipt fields of a `verifyReceipt` response body, limited to what gets
/// encoded into a receipt payload. Other fields (`adam_id`, `request_date`,
/// the `*_ms` and `*_pst` variants, ...) are ignored.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptModel {
    /// The type of receipt generated. The value corresponds to the environment
    /// in which the app or VPP purchase was made.
    pub(crate) receipt_type: String,
    /// The bundle identifier for the app to which the receipt belongs.
    pub(crate) bundle_id: String,
    /// The time the App Store generated the receipt.
    #[serde_as(as = "AppStoreDate")]
    pub(crate) receipt_creation_date: DateTime<Utc>,
    /// The time of the original app purchase. Carried on the record but not
    /// encoded.
    #[serde_as(as = "Option<AppStoreDate>")]
    pub(crate) original_purchase_date: Option<DateTime<Utc>>,
    /// The version of the app that the user originally purchased.
    pub(crate) original_application_version: String,
    /// The time the receipt expires for apps purchased through the Volume
    /// Purchase Program.
    #[serde_as(as = "Option<AppStoreDate>")]
    pub(crate) expiration_date: Option<DateTime<Utc>>,
    /// An array that contains the in-app purchase receipt fields for all
    /// in-app purchase transactions.
    #[serde(default)]
    pub(crate) in_app: Vec<InAppModel>,
}

impl ReceiptModel {
    pub(crate) fn from_json(body: &[u8]) -> Result<Self, ReceiptForgeError> {
        serde_json::from_slice(body)
            .map_err(|e| InputDecodeError::with_debug("failed to parse receipt JSON", &e))
    }
}

impl From<ReceiptModel> for ReceiptRecord {
    fn from(m: ReceiptModel) -> Self {
        ReceiptRecord {
            receipt_type: m.receipt_type,
            bundle_id: m.bundle_id,
            creation_date: m.receipt_creation_date,
            original_purchase_date: m.original_purchase_date,
            original_application_version: m.original_application_version,
            expiration_date: m.expiration_date,
            in_app: m.in_app.into_iter().map(Into::into).collect(),
        }
    }
}
