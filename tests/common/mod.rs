#![allow(dead_code)]

use base64::{prelude::BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use openssl::{
    asn1::Asn1Time,
    bn::{BigNum, MsbOption},
    error::ErrorStack,
    hash::MessageDigest,
    pkcs7::{Pkcs7, Pkcs7Flags},
    pkey::{PKey, Private},
    rsa::Rsa,
    stack::Stack,
    x509::{
        extension::{BasicConstraints, KeyUsage},
        store::X509StoreBuilder,
        X509Builder, X509NameBuilder, X509,
    },
};
use x509_parser::der_parser::der::parse_der;

/// Self-signed RSA test issuer.
pub fn generate_key_and_cert(bits: u32) -> (PKey<Private>, X509) {
    let key = PKey::from_rsa(Rsa::generate(bits).unwrap()).unwrap();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", "Test Issuer").unwrap();
    name.append_entry_by_text("O", "Acme Co").unwrap();
    let name = name.build();

    let mut serial = BigNum::new().unwrap();
    serial.rand(32, MsbOption::MAYBE_ZERO, false).unwrap();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&key).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(365).unwrap())
        .unwrap();
    builder
        .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    builder
        .append_extension(
            KeyUsage::new()
                .digital_signature()
                .key_encipherment()
                .key_cert_sign()
                .build()
                .unwrap(),
        )
        .unwrap();
    builder.sign(&key, MessageDigest::sha256()).unwrap();

    (key, builder.build())
}

/// Verifies the signature of a base64 receipt and returns the signed payload.
///
/// With `signer == None` the certificate embedded in the envelope is used.
/// Otherwise only `signer` is considered. Chain trust is not evaluated.
pub fn verify_receipt(receipt: &str, signer: Option<&X509>) -> Result<Vec<u8>, ErrorStack> {
    let der = BASE64_STANDARD.decode(receipt).expect("receipt is not base64");
    let pkcs7 = Pkcs7::from_der(&der)?;

    let mut certs = Stack::<X509>::new()?;
    let mut flags = Pkcs7Flags::NOVERIFY;
    if let Some(signer) = signer {
        certs.push(signer.clone())?;
        flags |= Pkcs7Flags::NOINTERN;
    }
    let store = X509StoreBuilder::new()?.build();

    let mut payload = Vec::new();
    pkcs7.verify(&certs, &store, None, Some(&mut payload), flags)?;
    Ok(payload)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAttribute {
    pub kind: i64,
    pub version: i64,
    pub value: Vec<u8>,
}

/// Decodes a `SEQUENCE OF { INTEGER, INTEGER, OCTET STRING }`.
pub fn decode_attributes(der: &[u8]) -> Vec<DecodedAttribute> {
    let (rest, obj) = parse_der(der).expect("payload is not DER");
    assert!(rest.is_empty(), "trailing bytes after payload");
    obj.as_sequence()
        .expect("payload is not a SEQUENCE")
        .iter()
        .map(|attribute| {
            let fields = attribute.as_sequence().expect("attribute is not a SEQUENCE");
            assert_eq!(fields.len(), 3);
            DecodedAttribute {
                kind: fields[0].as_i64().expect("type is not an INTEGER"),
                version: fields[1].as_i64().expect("version is not an INTEGER"),
                value: fields[2]
                    .as_slice()
                    .expect("value is not an OCTET STRING")
                    .to_vec(),
            }
        })
        .collect()
}

pub fn decode_string(value: &[u8]) -> String {
    assert_eq!(value.first(), Some(&0x0c), "value is not a UTF8String");
    let (_, obj) = parse_der(value).expect("value is not DER");
    obj.as_str().expect("value is not a string").to_owned()
}

pub fn decode_integer(value: &[u8]) -> i64 {
    let (_, obj) = parse_der(value).expect("value is not DER");
    obj.as_i64().expect("value is not an INTEGER")
}

pub fn decode_timestamp(value: &[u8]) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&decode_string(value))
        .expect("value is not an RFC 3339 date")
        .with_timezone(&Utc)
}

pub fn find<'a>(attributes: &'a [DecodedAttribute], kind: i64) -> &'a DecodedAttribute {
    attributes
        .iter()
        .find(|a| a.kind == kind)
        .unwrap_or_else(|| panic!("missing attribute {kind}"))
}

pub const RECEIPT_JSON: &str = r#"
{
  "receipt_type": "ProductionSandbox",
  "adam_id": 0,
  "app_item_id": 0,
  "bundle_id": "jp.aktsk.kalvados.test",
  "application_version": "51",
  "download_id": 0,
  "version_external_identifier": 0,
  "original_application_version": "49",
  "in_app": [
    {
      "quantity": "0",
      "product_id": "jp.aktsk.kalvados.test.iap0",
      "transaction_id": "220000350729970",
      "original_transaction_id": "220000348788557",
      "web_order_line_item_id": 220000071891787,
      "is_trial_period": "false",
      "purchase_date": "2017-07-24 03:17:15 Etc/GMT",
      "purchase_date_ms": "1500866235000",
      "purchase_date_pst": "2017-07-23 20:17:15 America/Los_Angeles",
      "original_purchase_date": "2017-07-17 03:17:16 Etc/GMT",
      "original_purchase_date_ms": "1500261436000",
      "original_purchase_date_pst": "2017-07-16 20:17:16 America/Los_Angeles"
    },
    {
      "quantity": "1",
      "product_id": "jp.aktsk.kalvados.test.iap1",
      "transaction_id": "220000359893979",
      "original_transaction_id": "220000348788557",
      "web_order_line_item_id": 220000072586770,
      "is_trial_period": "false",
      "purchase_date": "2017-08-24 03:17:15 Etc/GMT",
      "purchase_date_ms": "1503544635000",
      "purchase_date_pst": "2017-08-23 20:17:15 America/Los_Angeles",
      "original_purchase_date": "2017-07-17 03:17:16 Etc/GMT",
      "original_purchase_date_ms": "1500261436000",
      "original_purchase_date_pst": "2017-07-16 20:17:16 America/Los_Angeles"
    },
    {
      "quantity": "2",
      "product_id": "jp.aktsk.kalvados.test.iap2",
      "transaction_id": "220000368932558",
      "original_transaction_id": "220000348788557",
      "web_order_line_item_id": 220000075821143,
      "is_trial_period": "false",
      "is_in_intro_offer_period": "true",
      "purchase_date": "2017-09-24 03:17:15 Etc/GMT",
      "purchase_date_ms": "1506223035000",
      "purchase_date_pst": "2017-09-23 20:17:15 America/Los_Angeles",
      "original_purchase_date": "2017-07-17 03:17:16 Etc/GMT",
      "original_purchase_date_ms": "1500261436000",
      "original_purchase_date_pst": "2017-07-16 20:17:16 America/Los_Angeles",
      "expires_date": "2017-10-24 03:17:15 Etc/GMT",
      "cancellation_date": "2017-10-01 00:00:00 Etc/GMT"
    }
  ],
  "receipt_creation_date": "2018-02-10 17:37:00 Etc/GMT",
  "receipt_creation_date_ms": "1518284220000",
  "receipt_creation_date_pst": "2018-02-10 09:37:00 America/Los_Angeles",
  "request_date": "2018-03-26 12:00:27 Etc/GMT",
  "request_date_ms": "1522065627000",
  "request_date_pst": "2018-03-26 05:00:27 America/Los_Angeles",
  "original_purchase_date": "2017-07-07 15:36:07 Etc/GMT",
  "original_purchase_date_ms": "1499441767000",
  "original_purchase_date_pst": "2017-07-07 08:36:07 America/Los_Angeles"
}"#;
