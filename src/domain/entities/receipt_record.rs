use chrono::{DateTime, Utc};

use super::purchase_item::PurchaseItem;

/// Purchase facts of an app receipt, as they should appear once encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptRecord {
    /// The receipt classification, for example `ProductionSandbox`.
    pub receipt_type: String,
    /// The app's bundle identifier.
    pub bundle_id: String,
    pub creation_date: DateTime<Utc>,
    /// Kept for callers; no receipt attribute carries it.
    pub original_purchase_date: Option<DateTime<Utc>>,
    /// The version of the app that was originally purchased.
    pub original_application_version: String,
    /// Only set for apps purchased through the Volume Purchase Program.
    pub expiration_date: Option<DateTime<Utc>>,
    /// In-app purchase line items, in input order.
    pub in_app: Vec<PurchaseItem>,
}
