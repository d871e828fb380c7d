use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::domain::entities::purchase_item::PurchaseItem;

use super::common::AppStoreDate;

/// In-app purchase fields of a `verifyReceipt` response body.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
///
/// The App Store sends most numeric and boolean fields as strings, so both
/// forms are accepted.
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct InAppModel {
    /// The number of consumable products purchased.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub(crate) quantity: i64,
    /// The unique identifier of the product purchased.
    pub(crate) product_id: String,
    /// A unique identifier for a transaction such as a purchase, restore, or
    /// renewal.
    pub(crate) transaction_id: String,
    /// The transaction identifier of the original purchase.
    pub(crate) original_transaction_id: String,
    /// The time the App Store charged the user's account for a purchased or
    /// restored product.
    #[serde_as(as = "AppStoreDate")]
    pub(crate) purchase_date: DateTime<Utc>,
    /// The time of the original in-app purchase.
    #[serde_as(as = "AppStoreDate")]
    pub(crate) original_purchase_date: DateTime<Utc>,
    /// The time a subscription expires or when it will renew.
    #[serde_as(as = "Option<AppStoreDate>")]
    pub(crate) expires_date: Option<DateTime<Utc>>,
    /// A unique identifier for purchase events across devices, including
    /// subscription-renewal events.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub(crate) web_order_line_item_id: i64,
    /// The time the App Store refunded a transaction or revoked it from family
    /// sharing.
    #[serde_as(as = "Option<AppStoreDate>")]
    pub(crate) cancellation_date: Option<DateTime<Utc>>,
    /// An indicator of whether a subscription is in the introductory price
    /// period. Takes precedence over `is_in_intro_price` when both are sent.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub(crate) is_in_intro_offer_period: Option<bool>,
    /// Older name of `is_in_intro_offer_period`.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub(crate) is_in_intro_price: Option<bool>,
}

impl InAppModel {
    fn in_intro_period(&self) -> bool {
        self.is_in_intro_offer_period
            .or(self.is_in_intro_price)
            .unwrap_or(false)
    }
}

impl From<InAppModel> for PurchaseItem {
    fn from(m: InAppModel) -> Self {
        let is_in_intro_price = m.in_intro_period();
        PurchaseItem {
            quantity: m.quantity,
            product_id: m.product_id,
            transaction_id: m.transaction_id,
            original_transaction_id: m.original_transaction_id,
            purchase_date: m.purchase_date,
            original_purchase_date: m.original_purchase_date,
            expires_date: m.expires_date,
            web_order_line_item_id: m.web_order_line_item_id,
            cancellation_date: m.cancellation_date,
            is_in_intro_price,
        }
    }
}
