//! Strict BSON decoding for voucher instance documents
//!
//! Every field must be present with the expected BSON type. Extra fields
//! on the document are ignored.

use crate::error::{Error, Result};
use crate::types::{CutOffActor, VoucherInstance};
use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Milliseconds of 0001-01-01T00:00:00Z, the zero time some writers store
/// for "never happened"
const ZERO_TIME_MILLIS: i64 = -62_135_596_800_000;

/// Wire shape of a `subVoucher` document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoucherInstanceDoc {
    #[serde(rename = "_id", deserialize_with = "hex_id")]
    id: String,
    #[serde(deserialize_with = "hex_id")]
    voucher_id: String,
    sub_code: String,
    ref_code: String,
    qr_code: String,
    #[serde(deserialize_with = "instant")]
    collected_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "instant")]
    used_date: Option<DateTime<Utc>>,
    status: String,
    cut_off_status: String,
    #[serde(deserialize_with = "instant")]
    cut_off_date: Option<DateTime<Utc>>,
    student_id: i64,
    email: String,
    student_name: String,
    faculty_id: i64,
    #[serde(deserialize_with = "hex_id")]
    merchant_id: String,
    is_deleted: bool,
    cut_off_by: CutOffByDoc,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CutOffByDoc {
    role_id: i64,
    email: String,
}

impl From<VoucherInstanceDoc> for VoucherInstance {
    fn from(doc: VoucherInstanceDoc) -> Self {
        Self {
            id: doc.id,
            voucher_id: doc.voucher_id,
            sub_code: doc.sub_code,
            ref_code: doc.ref_code,
            qr_code: doc.qr_code,
            collected_date: doc.collected_date,
            used_date: doc.used_date,
            status: doc.status,
            cut_off_status: doc.cut_off_status,
            cut_off_date: doc.cut_off_date,
            student_id: doc.student_id,
            email: doc.email,
            student_name: doc.student_name,
            faculty_id: doc.faculty_id,
            merchant_id: doc.merchant_id,
            is_deleted: doc.is_deleted,
            cut_off_by: CutOffActor {
                role_id: doc.cut_off_by.role_id,
                email: doc.cut_off_by.email,
            },
        }
    }
}

/// Decode one voucher instance document
///
/// Fails with `MalformedRecord` naming the document `_id` when any field is
/// missing or has the wrong type.
pub fn decode_voucher_instance(doc: Document) -> Result<VoucherInstance> {
    let id = document_id(&doc);
    bson::from_document::<VoucherInstanceDoc>(doc)
        .map(VoucherInstance::from)
        .map_err(|e| Error::malformed(id, e.to_string()))
}

/// Parse a voucher identifier as a 24-character hex ObjectId
pub fn parse_voucher_id(hex: &str) -> Result<ObjectId> {
    ObjectId::parse_str(hex.trim())
        .map_err(|e| Error::invalid_value("voucher_id", format!("'{hex}' is not an ObjectId: {e}")))
}

/// Best-effort `_id` for error messages
fn document_id(doc: &Document) -> String {
    match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing _id>".to_string(),
    }
}

/// ObjectId or string, rendered as a string
fn hex_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::String(s) => Ok(s),
        other => Err(D::Error::custom(format!(
            "expected ObjectId or string, found {:?}",
            other.element_type()
        ))),
    }
}

/// Datetime field where null or a zero sentinel means "not yet occurred"
fn instant<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::DateTime(dt) => {
            let millis = dt.timestamp_millis();
            if millis == 0 || millis == ZERO_TIME_MILLIS {
                Ok(None)
            } else {
                Ok(Some(dt.to_chrono()))
            }
        }
        Bson::Null => Ok(None),
        other => Err(D::Error::custom(format!(
            "expected datetime, found {:?}",
            other.element_type()
        ))),
    }
}
