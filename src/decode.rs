// src/decode.rs
// Decoding of chain transactions and query results back into structured
// records. Dispatch on the message type identifier is a table lookup:
// three built-in variants, then an externally injected registry for
// everything else. Messages nothing can decode are dropped, not errors.

use std::collections::HashMap;

use log::debug;
use prost::Message;
use serde_json::Value;

use crate::error::{Result, SdkError};
use crate::messages::{
    MSG_CHANGE_ISCN_RECORD_OWNERSHIP, MSG_CREATE_ISCN_RECORD, MSG_UPDATE_ISCN_RECORD,
};
use crate::proto;
use crate::types::{
    IscnQueryRecord, ParsedMessage, ParsedTransaction, ParsedTxBody, QueryRecordResponse,
    RecordData, StakeholderData,
};

type DecodeFn = Box<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

/// Caller-injected decoders for message types beyond the three built-in
/// ISCN variants, keyed by type identifier.
#[derive(Default)]
pub struct MessageRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, type_url: impl Into<String>, decoder: F)
    where
        F: Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        self.decoders.insert(type_url.into(), Box::new(decoder));
    }

    /// Look up and run the decoder for a type identifier, if one exists.
    pub fn decode(&self, type_url: &str, value: &[u8]) -> Option<Result<Value>> {
        self.decoders.get(type_url).map(|decode| decode(value))
    }
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRegistry")
            .field("type_urls", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Decode the stakeholder and content-metadata blobs of a record.
///
/// Empty stakeholder blobs pass through unparsed; a malformed non-empty
/// blob is fatal. Content metadata is never optional at this layer, so a
/// decode failure there is fatal too.
pub fn decode_record_fields(record: &proto::IscnRecord) -> Result<RecordData> {
    let mut stakeholders = Vec::with_capacity(record.stakeholders.len());
    for blob in &record.stakeholders {
        if blob.is_empty() {
            stakeholders.push(StakeholderData::Raw(blob.clone()));
            continue;
        }
        let text = std::str::from_utf8(blob).map_err(|source| SdkError::MalformedUtf8 {
            context: "stakeholder",
            source,
        })?;
        let value = serde_json::from_str(text).map_err(|source| SdkError::MalformedJson {
            context: "stakeholder",
            source,
        })?;
        stakeholders.push(StakeholderData::Json(value));
    }

    let metadata_text =
        std::str::from_utf8(&record.content_metadata).map_err(|source| SdkError::MalformedUtf8 {
            context: "content metadata",
            source,
        })?;
    let content_metadata =
        serde_json::from_str(metadata_text).map_err(|source| SdkError::MalformedJson {
            context: "content metadata",
            source,
        })?;

    Ok(RecordData {
        record_notes: record.record_notes.clone(),
        content_fingerprints: record.content_fingerprints.clone(),
        stakeholders,
        content_metadata,
    })
}

/// Decode a raw transaction and its raw log string.
///
/// Each message dispatches on its type identifier; create/update messages
/// additionally decode the embedded record. Unknown identifiers (and
/// registered decoders that fail) drop the message from the output list.
/// A malformed raw log is fatal.
pub fn decode_transaction(
    tx_bytes: &[u8],
    raw_log: &str,
    registry: &MessageRegistry,
) -> Result<ParsedTransaction> {
    let raw = proto::TxRaw::decode(tx_bytes)?;
    let body = proto::TxBody::decode(raw.body_bytes.as_slice())?;

    let mut messages = Vec::with_capacity(body.messages.len());
    for any in &body.messages {
        match any.type_url.as_str() {
            MSG_CREATE_ISCN_RECORD => {
                let msg = proto::MsgCreateIscnRecord::decode(any.value.as_slice())?;
                let record = msg.record.as_ref().map(decode_record_fields).transpose()?;
                messages.push(ParsedMessage::CreateRecord {
                    from: msg.from,
                    record,
                    nonce: msg.nonce,
                });
            }
            MSG_UPDATE_ISCN_RECORD => {
                let msg = proto::MsgUpdateIscnRecord::decode(any.value.as_slice())?;
                let record = msg.record.as_ref().map(decode_record_fields).transpose()?;
                messages.push(ParsedMessage::UpdateRecord {
                    from: msg.from,
                    iscn_id: msg.iscn_id,
                    record,
                });
            }
            MSG_CHANGE_ISCN_RECORD_OWNERSHIP => {
                let msg = proto::MsgChangeIscnRecordOwnership::decode(any.value.as_slice())?;
                messages.push(ParsedMessage::ChangeOwnership {
                    from: msg.from,
                    iscn_id: msg.iscn_id,
                    new_owner: msg.new_owner,
                });
            }
            other => match registry.decode(other, &any.value) {
                Some(Ok(value)) => messages.push(ParsedMessage::Custom {
                    type_url: other.to_string(),
                    value,
                }),
                Some(Err(err)) => {
                    debug!("registered decoder for {} failed, dropping message: {}", other, err);
                }
                None => {
                    debug!("no decoder for {}, dropping message", other);
                }
            },
        }
    }

    let logs = serde_json::from_str(raw_log).map_err(|source| SdkError::MalformedJson {
        context: "transaction raw log",
        source,
    })?;

    Ok(ParsedTransaction {
        body: ParsedTxBody {
            messages,
            memo: body.memo,
            timeout_height: body.timeout_height,
        },
        auth_info_bytes: raw.auth_info_bytes,
        signatures: raw.signatures,
        logs,
    })
}

/// Decode raw record-query results. A blob that fails to parse is fatal
/// for the whole call; there is no partial-record fallback.
pub fn decode_query_records(results: &[QueryRecordResponse]) -> Result<Vec<IscnQueryRecord>> {
    results
        .iter()
        .map(|result| {
            let text =
                std::str::from_utf8(&result.data).map_err(|source| SdkError::MalformedUtf8 {
                    context: "query record",
                    source,
                })?;
            let data = serde_json::from_str(text).map_err(|source| SdkError::MalformedJson {
                context: "query record",
                source,
            })?;
            Ok(IscnQueryRecord {
                ipld: result.ipld.clone(),
                data,
            })
        })
        .collect()
}
