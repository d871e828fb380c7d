use chrono::{DateTime, Utc};

/// A single in-app purchase line item of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseItem {
    /// The number of items purchased.
    pub quantity: i64,
    /// The product identifier of the item that was purchased.
    pub product_id: String,
    /// The transaction identifier of the item that was purchased.
    pub transaction_id: String,
    /// For a transaction that restores a previous transaction, the transaction
    /// identifier of the original transaction. Otherwise, identical to the
    /// transaction identifier.
    pub original_transaction_id: String,
    pub purchase_date: DateTime<Utc>,
    pub original_purchase_date: DateTime<Utc>,
    /// Only set for auto-renewable subscriptions.
    pub expires_date: Option<DateTime<Utc>>,
    /// The primary key for identifying subscription purchases.
    pub web_order_line_item_id: i64,
    /// Set when the transaction was refunded or revoked.
    pub cancellation_date: Option<DateTime<Utc>>,
    /// Whether the subscription is in an introductory price period.
    pub is_in_intro_price: bool,
}
