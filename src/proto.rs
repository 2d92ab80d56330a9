// src/proto.rs
// Protobuf wire structs, written out with prost derives so the crate does
// not need a build-time protoc step. Tags and field layout must stay in
// sync with the chain's tx.proto; any change breaks chain compatibility.

use prost::Message;

/// Cosmos `TxRaw`: the outer transaction envelope as stored on chain.
#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

/// Cosmos `TxBody`: memo plus the packed messages.
#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
}

/// `google.protobuf.Any`: a type identifier plus the encoded message.
#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// `likechain.iscn.IscnRecord`: stakeholders and content metadata travel
/// as opaque JSON byte blobs, one blob per stakeholder.
#[derive(Clone, PartialEq, Message)]
pub struct IscnRecord {
    #[prost(string, tag = "1")]
    pub record_notes: String,
    #[prost(string, repeated, tag = "2")]
    pub content_fingerprints: Vec<String>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub stakeholders: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "4")]
    pub content_metadata: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgCreateIscnRecord {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(message, optional, tag = "2")]
    pub record: Option<IscnRecord>,
    /// The chain's Go marshaler drops a zero nonce, so absence and zero
    /// are the same thing on the wire; builders normalize zero to `None`.
    #[prost(uint64, optional, tag = "3")]
    pub nonce: Option<u64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgUpdateIscnRecord {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(string, tag = "2")]
    pub iscn_id: String,
    #[prost(message, optional, tag = "3")]
    pub record: Option<IscnRecord>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgChangeIscnRecordOwnership {
    #[prost(string, tag = "1")]
    pub from: String,
    #[prost(string, tag = "2")]
    pub iscn_id: String,
    #[prost(string, tag = "3")]
    pub new_owner: String,
}
