// src/messages.rs
// Builders for the ISCN protocol messages. Pure functions: same payload
// in, byte-identical message out.

use serde_json::{Map, Value};

use crate::error::{Result, SdkError};
use crate::types::{
    ChainMessage, ChangeOwnershipValue, CreateRecordValue, FormattedRecord, MsgValue,
    RecordPayload, UpdateRecordValue,
};

/// Wire-stable type identifiers. Changing any of these breaks chain
/// compatibility.
pub const MSG_CREATE_ISCN_RECORD: &str = "/likechain.iscn.MsgCreateIscnRecord";
pub const MSG_UPDATE_ISCN_RECORD: &str = "/likechain.iscn.MsgUpdateIscnRecord";
pub const MSG_CHANGE_ISCN_RECORD_OWNERSHIP: &str = "/likechain.iscn.MsgChangeIscnRecordOwnership";

pub const DEFAULT_RECORD_VERSION: u64 = 1;

/// Shape a payload into the wire form: one JSON blob per stakeholder (in
/// payload order) and a single canonical JSON-LD content-metadata blob.
///
/// The metadata object is a strict merge: derived fields first, then the
/// payload's extra fields, then explicit `content_metadata` overrides;
/// later sources win on key collision. Fingerprints and stakeholders are
/// passed through unvalidated.
pub fn format_record(payload: &RecordPayload, version: u64) -> Result<FormattedRecord> {
    let mut stakeholders = Vec::with_capacity(payload.stakeholders.len());
    for stakeholder in &payload.stakeholders {
        stakeholders.push(serde_json::to_vec(stakeholder).map_err(SdkError::Serialize)?);
    }

    let mut metadata = Map::new();
    metadata.insert("@context".into(), Value::from("http://schema.org/"));
    metadata.insert("@type".into(), Value::from(payload.record_type.clone()));
    metadata.insert("name".into(), Value::from(payload.name.clone()));
    if let Some(description) = &payload.description {
        metadata.insert("description".into(), Value::from(description.clone()));
    }
    metadata.insert("version".into(), Value::from(version));
    if let Some(url) = &payload.url {
        metadata.insert("url".into(), Value::from(url.clone()));
    }
    metadata.insert("keywords".into(), Value::from(payload.keywords.join(",")));
    if let Some(usage_info) = &payload.usage_info {
        metadata.insert("usageInfo".into(), Value::from(usage_info.clone()));
    }
    for (key, value) in &payload.extra {
        metadata.insert(key.clone(), value.clone());
    }
    if let Some(overrides) = &payload.content_metadata {
        for (key, value) in overrides {
            metadata.insert(key.clone(), value.clone());
        }
    }

    Ok(FormattedRecord {
        record_notes: payload.record_notes.clone(),
        content_fingerprints: payload.content_fingerprints.clone(),
        stakeholders,
        content_metadata: serde_json::to_vec(&Value::Object(metadata))
            .map_err(SdkError::Serialize)?,
    })
}

/// Build a create-record message. A nonce of zero means "unset" on the
/// wire (the chain's marshaler drops it), so `Some(0)` and `None` both
/// omit the field.
pub fn build_create_message(
    sender_address: &str,
    payload: &RecordPayload,
    nonce: Option<u64>,
) -> Result<ChainMessage> {
    let record = format_record(payload, DEFAULT_RECORD_VERSION)?;
    Ok(ChainMessage {
        type_url: MSG_CREATE_ISCN_RECORD.into(),
        value: MsgValue::CreateRecord(CreateRecordValue {
            from: sender_address.into(),
            record,
            nonce: nonce.filter(|n| *n != 0),
        }),
    })
}

/// Build an update-record message for an existing ISCN id.
pub fn build_update_message(
    sender_address: &str,
    iscn_id: &str,
    payload: &RecordPayload,
) -> Result<ChainMessage> {
    let record = format_record(payload, DEFAULT_RECORD_VERSION)?;
    Ok(ChainMessage {
        type_url: MSG_UPDATE_ISCN_RECORD.into(),
        value: MsgValue::UpdateRecord(UpdateRecordValue {
            from: sender_address.into(),
            iscn_id: iscn_id.into(),
            record,
        }),
    })
}

/// Build an ownership-change message. No record payload is involved.
pub fn build_ownership_change_message(
    sender_address: &str,
    iscn_id: &str,
    new_owner_address: &str,
) -> Result<ChainMessage> {
    Ok(ChainMessage {
        type_url: MSG_CHANGE_ISCN_RECORD_OWNERSHIP.into(),
        value: MsgValue::ChangeOwnership(ChangeOwnershipValue {
            from: sender_address.into(),
            iscn_id: iscn_id.into(),
            new_owner: new_owner_address.into(),
        }),
    })
}
