// src/types.rs
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::proto;

/// User-supplied description of a content record. Immutable input; the
/// formatter never mutates it.
///
/// Fields the caller leaves out are omitted from the serialized record,
/// not emitted as null. Any extra top-level keys land in `extra` and are
/// merged into the content metadata after the named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub content_fingerprints: Vec<String>,
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_notes: Option<String>,
    /// Explicit content-metadata overrides, merged last (they win on
    /// key collision).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A party with a role/contribution/reward share in a record. Serialized
/// as an independent JSON blob per stakeholder; the chain stores and
/// charges each blob separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_proportion: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire-shaped record produced by the formatter: stakeholder order is
/// preserved from the payload, and `content_metadata` holds the canonical
/// JSON-LD object as bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_notes: Option<String>,
    pub content_fingerprints: Vec<String>,
    pub stakeholders: Vec<Vec<u8>>,
    pub content_metadata: Vec<u8>,
}

impl FormattedRecord {
    pub fn into_proto(self) -> proto::IscnRecord {
        proto::IscnRecord {
            record_notes: self.record_notes.unwrap_or_default(),
            content_fingerprints: self.content_fingerprints,
            stakeholders: self.stakeholders,
            content_metadata: self.content_metadata,
        }
    }
}

/// A message ready for signing: the wire-stable type identifier plus the
/// typed value. Signing and broadcast are external; [`ChainMessage::to_any`]
/// hands the signer the protobuf-encoded form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMessage {
    pub type_url: String,
    pub value: MsgValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MsgValue {
    CreateRecord(CreateRecordValue),
    UpdateRecord(UpdateRecordValue),
    ChangeOwnership(ChangeOwnershipValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordValue {
    pub from: String,
    pub record: FormattedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordValue {
    pub from: String,
    pub iscn_id: String,
    pub record: FormattedRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOwnershipValue {
    pub from: String,
    pub iscn_id: String,
    pub new_owner: String,
}

impl ChainMessage {
    /// Protobuf-encode the message value under its type identifier.
    pub fn to_any(&self) -> proto::Any {
        let value = match &self.value {
            MsgValue::CreateRecord(v) => proto::MsgCreateIscnRecord {
                from: v.from.clone(),
                record: Some(v.record.clone().into_proto()),
                nonce: v.nonce,
            }
            .encode_to_vec(),
            MsgValue::UpdateRecord(v) => proto::MsgUpdateIscnRecord {
                from: v.from.clone(),
                iscn_id: v.iscn_id.clone(),
                record: Some(v.record.clone().into_proto()),
            }
            .encode_to_vec(),
            MsgValue::ChangeOwnership(v) => proto::MsgChangeIscnRecordOwnership {
                from: v.from.clone(),
                iscn_id: v.iscn_id.clone(),
                new_owner: v.new_owner.clone(),
            }
            .encode_to_vec(),
        };
        proto::Any {
            type_url: self.type_url.clone(),
            value,
        }
    }
}

/// A fee amount as the chain expresses it: a non-negative integer amount
/// in decimal-string form plus a denomination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub amount: String,
    pub denom: String,
}

/// Gas limit plus the fee derived from a gas price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GasFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

/// Record fields with the stakeholder and metadata blobs decoded back to
/// structured JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordData {
    pub record_notes: String,
    pub content_fingerprints: Vec<String>,
    pub stakeholders: Vec<StakeholderData>,
    pub content_metadata: Value,
}

/// A decoded stakeholder entry. Empty placeholder blobs pass through
/// unparsed as `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum StakeholderData {
    Json(Value),
    Raw(Vec<u8>),
}

/// A decoded transaction: the envelope fields, the decoded messages
/// (unrecognized types are dropped), and the structured log entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub body: ParsedTxBody,
    pub auth_info_bytes: Vec<u8>,
    pub signatures: Vec<Vec<u8>>,
    pub logs: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTxBody {
    pub messages: Vec<ParsedMessage>,
    pub memo: String,
    pub timeout_height: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessage {
    CreateRecord {
        from: String,
        record: Option<RecordData>,
        nonce: Option<u64>,
    },
    UpdateRecord {
        from: String,
        iscn_id: String,
        record: Option<RecordData>,
    },
    ChangeOwnership {
        from: String,
        iscn_id: String,
        new_owner: String,
    },
    /// Decoded via an externally registered decoder.
    Custom { type_url: String, value: Value },
}

/// One raw result from the chain's record query: a content-addressing
/// identifier plus the record's JSON bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryRecordResponse {
    pub ipld: String,
    pub data: Vec<u8>,
}

/// A query result with the record bytes decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct IscnQueryRecord {
    pub ipld: String,
    pub data: Value,
}
