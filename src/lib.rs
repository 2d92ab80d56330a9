pub mod canonical;
pub mod decode;
pub mod error;
pub mod fees;
pub mod messages;
pub mod proto;
pub mod query;
pub mod types;

pub use decode::{decode_query_records, decode_record_fields, decode_transaction, MessageRegistry};
pub use error::{Result, SdkError};
pub use fees::{format_gas_fee, EstimatorConfig, FeeEstimator, GasEstimateOptions};
pub use messages::{
    build_create_message, build_ownership_change_message, build_update_message, format_record,
};
pub use query::{FeePerByteQuery, IscnQueryClient};
pub use types::{
    ChainMessage, Coin, FormattedRecord, GasFee, ParsedMessage, ParsedTransaction, RecordData,
    RecordPayload, Stakeholder,
};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::decode::{
        decode_query_records, decode_record_fields, decode_transaction, MessageRegistry,
    };
    pub use crate::error::{Result, SdkError};
    pub use crate::fees::{EstimatorConfig, FeeEstimator, GasEstimateOptions};
    pub use crate::messages::{
        build_create_message, build_ownership_change_message, build_update_message, format_record,
    };
    pub use crate::query::{FeePerByteQuery, IscnQueryClient};
    pub use crate::types::*;
}
