use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::{
    data::datasources::utils::{
        der_integer, der_octet_string, der_sequence, der_utf8_string, format_optional_timestamp,
        format_timestamp,
    },
    domain::entities::{purchase_item::PurchaseItem, receipt_record::ReceiptRecord},
    errors::ReceiptForgeError,
};

/// Version number carried by every attribute.
pub(crate) const ATTRIBUTE_VERSION: i64 = 0;

/// Encodes purchase facts into the ASN.1 payload of an app receipt:
///
/// ```text
/// ReceiptAttribute ::= SEQUENCE {
///     type    INTEGER,
///     version INTEGER,
///     value   OCTET STRING
/// }
/// Payload ::= SEQUENCE OF ReceiptAttribute
/// ```
pub trait AttributeEncoderDatasource: Send + Sync {
    /// Top-level payload. One tag-17 attribute is emitted per in-app purchase,
    /// in input order.
    fn encode_receipt(&self, record: &ReceiptRecord) -> Result<Vec<u8>, ReceiptForgeError>;

    /// The value of a single tag-17 (in-app purchase) attribute.
    fn encode_in_app(&self, item: &PurchaseItem) -> Result<Vec<u8>, ReceiptForgeError>;
}

pub struct AttributeEncoderDatasourceImpl;

impl AttributeEncoderDatasource for AttributeEncoderDatasourceImpl {
    fn encode_receipt(&self, record: &ReceiptRecord) -> Result<Vec<u8>, ReceiptForgeError> {
        let attributes = encode_fields(RECEIPT_FIELDS, record)?;
        debug!(
            bundle_id = %record.bundle_id,
            in_app_count = record.in_app.len(),
            attribute_count = attributes.len(),
            "encoded receipt attributes"
        );
        Ok(der_sequence(attributes.iter().map(Attribute::to_der)))
    }

    fn encode_in_app(&self, item: &PurchaseItem) -> Result<Vec<u8>, ReceiptForgeError> {
        encode_in_app(item)
    }
}

impl AttributeEncoderDatasourceImpl {
    pub fn new() -> Self {
        Self
    }
}

fn encode_in_app(item: &PurchaseItem) -> Result<Vec<u8>, ReceiptForgeError> {
    let attributes = encode_fields(IN_APP_FIELDS, item)?;
    Ok(der_sequence(attributes.iter().map(Attribute::to_der)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute {
    pub(crate) kind: i64,
    pub(crate) version: i64,
    /// DER encoding of the typed value.
    pub(crate) value: Vec<u8>,
}

impl Attribute {
    fn new(kind: i64, value: Vec<u8>) -> Self {
        Self {
            kind,
            version: ATTRIBUTE_VERSION,
            value,
        }
    }

    pub(crate) fn to_der(&self) -> Vec<u8> {
        der_sequence([
            der_integer(self.kind),
            der_integer(self.version),
            der_octet_string(&self.value),
        ])
    }
}

/// Typed view of a record field, borrowed for the duration of one encode.
pub(crate) enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    /// Encoded as the integer 1 or 0.
    Flag(bool),
    Timestamp(&'a DateTime<Utc>),
    OptionalTimestamp(Option<&'a DateTime<Utc>>),
    /// Repeated field: one attribute per purchase, each holding a nested
    /// attribute sequence.
    Purchases(&'a [PurchaseItem]),
}

pub(crate) struct FieldSpec<T> {
    pub(crate) tag: i64,
    pub(crate) name: &'static str,
    pub(crate) value: fn(&T) -> FieldValue<'_>,
}

// Tag tables:
// ----------------------------
//
// Order matters: attributes are emitted in table order.

pub(crate) const RECEIPT_FIELDS: &[FieldSpec<ReceiptRecord>] = &[
    FieldSpec {
        tag: 0,
        name: "receipt_type",
        value: |r| FieldValue::Text(&r.receipt_type),
    },
    FieldSpec {
        tag: 2,
        name: "bundle_id",
        value: |r| FieldValue::Text(&r.bundle_id),
    },
    FieldSpec {
        tag: 12,
        name: "receipt_creation_date",
        value: |r| FieldValue::Timestamp(&r.creation_date),
    },
    FieldSpec {
        tag: 17,
        name: "in_app",
        value: |r| FieldValue::Purchases(&r.in_app),
    },
    FieldSpec {
        tag: 19,
        name: "original_application_version",
        value: |r| FieldValue::Text(&r.original_application_version),
    },
    FieldSpec {
        tag: 21,
        name: "expiration_date",
        value: |r| FieldValue::OptionalTimestamp(r.expiration_date.as_ref()),
    },
];

pub(crate) const IN_APP_FIELDS: &[FieldSpec<PurchaseItem>] = &[
    FieldSpec {
        tag: 1701,
        name: "quantity",
        value: |i| FieldValue::Integer(i.quantity),
    },
    FieldSpec {
        tag: 1702,
        name: "product_id",
        value: |i| FieldValue::Text(&i.product_id),
    },
    FieldSpec {
        tag: 1703,
        name: "transaction_id",
        value: |i| FieldValue::Text(&i.transaction_id),
    },
    FieldSpec {
        tag: 1704,
        name: "purchase_date",
        value: |i| FieldValue::Timestamp(&i.purchase_date),
    },
    FieldSpec {
        tag: 1705,
        name: "original_transaction_id",
        value: |i| FieldValue::Text(&i.original_transaction_id),
    },
    FieldSpec {
        tag: 1706,
        name: "original_purchase_date",
        value: |i| FieldValue::Timestamp(&i.original_purchase_date),
    },
    FieldSpec {
        tag: 1708,
        name: "expires_date",
        value: |i| FieldValue::OptionalTimestamp(i.expires_date.as_ref()),
    },
    FieldSpec {
        tag: 1711,
        name: "web_order_line_item_id",
        value: |i| FieldValue::Integer(i.web_order_line_item_id),
    },
    FieldSpec {
        tag: 1712,
        name: "cancellation_date",
        value: |i| FieldValue::OptionalTimestamp(i.cancellation_date.as_ref()),
    },
    FieldSpec {
        tag: 1719,
        name: "is_in_intro_offer_period",
        value: |i| FieldValue::Flag(i.is_in_intro_price),
    },
];

fn encode_fields<T>(
    fields: &[FieldSpec<T>],
    source: &T,
) -> Result<Vec<Attribute>, ReceiptForgeError> {
    let mut attributes = Vec::with_capacity(fields.len());
    for field in fields {
        trace!(tag = field.tag, field = field.name, "encoding attribute");
        let value = match (field.value)(source) {
            FieldValue::Text(s) => der_utf8_string(s),
            FieldValue::Integer(n) => der_integer(n),
            FieldValue::Flag(b) => der_integer(if b { 1 } else { 0 }),
            FieldValue::Timestamp(t) => der_utf8_string(&format_timestamp(t)?),
            FieldValue::OptionalTimestamp(t) => der_utf8_string(&format_optional_timestamp(t)?),
            FieldValue::Purchases(items) => {
                for item in items {
                    attributes.push(Attribute::new(field.tag, encode_in_app(item)?));
                }
                continue;
            }
        };
        attributes.push(Attribute::new(field.tag, value));
    }
    Ok(attributes)
}
