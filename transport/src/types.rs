//! Wire types for the node's REST API.
//!
//! Field names mirror the node's JSON exactly (camelCase where the API uses
//! it); unknown fields are ignored so new node versions don't break parsing.

use serde::{Deserialize, Serialize};

/// Transaction kind code for a base transfer.
pub const TRANSFER_KIND: u32 = 257;
/// Transaction kind code for a multisig wrapper.
pub const MULTISIG_KIND: u32 = 4100;
/// Message kind code for an unencrypted payload.
pub const PLAIN_MESSAGE_KIND: u32 = 1;
/// Message kind code for an encrypted payload.
pub const SECURE_MESSAGE_KIND: u32 = 2;

/// Response envelope of `/account/transfers/all`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferPage {
    pub data: Vec<TransferEntry>,
}

/// One transaction plus its chain metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferEntry {
    pub meta: TransferMeta,
    pub transaction: TransactionData,
}

/// Chain metadata for a confirmed transaction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TransferMeta {
    /// Node-local pagination id. Descending ids order pages newest-first.
    pub id: u64,
    /// Height of the block that committed the transaction.
    pub height: u64,
}

/// Transaction body as the node reports it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionData {
    #[serde(rename = "type")]
    pub kind: u32,
    /// Transferred amount in the smallest native unit. Absent for
    /// non-transfer kinds.
    #[serde(default)]
    pub amount: u64,
    /// Signer public key, hex.
    pub signer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<WireMessage>,
    /// Attached mosaics (non-native assets). Absent on plain transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mosaics: Option<Vec<serde_json::Value>>,
    /// Inner transaction of a multisig wrapper.
    #[serde(rename = "otherTrans", default, skip_serializing_if = "Option::is_none")]
    pub other_trans: Option<Box<TransactionData>>,
}

impl TransactionData {
    /// Follow a multisig wrapper to its inner transaction. Identity for
    /// every other kind.
    pub fn unwrap_multisig(&self) -> &TransactionData {
        match (&self.other_trans, self.kind) {
            (Some(inner), MULTISIG_KIND) => inner,
            _ => self,
        }
    }
}

/// A raw transaction message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: u32,
    /// Hex-encoded payload bytes.
    #[serde(default)]
    pub payload: Option<String>,
}

/// The block fields the auditor reads from `/block/at/public`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Commit time in chain seconds (seconds since the chain epoch).
    #[serde(rename = "timeStamp")]
    pub time_stamp: i64,
    #[serde(default)]
    pub height: u64,
}

impl TransferEntry {
    /// A plain transfer with no message. Fixture constructor used by the
    /// nullable ledger and tests.
    pub fn transfer(id: u64, height: u64, signer_hex: &str, amount: u64) -> Self {
        Self {
            meta: TransferMeta { id, height },
            transaction: TransactionData {
                kind: TRANSFER_KIND,
                amount,
                signer: signer_hex.to_string(),
                message: None,
                mosaics: None,
                other_trans: None,
            },
        }
    }

    /// Attach an unencrypted UTF-8 message.
    pub fn with_plain_message(mut self, text: &str) -> Self {
        self.transaction.message = Some(WireMessage {
            kind: PLAIN_MESSAGE_KIND,
            payload: Some(hex::encode(text.as_bytes())),
        });
        self
    }

    /// Attach a raw hex payload with an explicit message kind.
    pub fn with_raw_message(mut self, kind: u32, payload_hex: &str) -> Self {
        self.transaction.message = Some(WireMessage {
            kind,
            payload: Some(payload_hex.to_string()),
        });
        self
    }

    /// Attach `count` placeholder mosaics.
    pub fn with_mosaics(mut self, count: usize) -> Self {
        self.transaction.mosaics = Some(vec![serde_json::json!({}); count]);
        self
    }

    /// Wrap this entry's transaction in a multisig envelope signed by
    /// `cosigner_hex`.
    pub fn wrapped_in_multisig(mut self, cosigner_hex: &str) -> Self {
        let inner = self.transaction;
        self.transaction = TransactionData {
            kind: MULTISIG_KIND,
            amount: 0,
            signer: cosigner_hex.to_string(),
            message: None,
            mosaics: None,
            other_trans: Some(Box::new(inner)),
        };
        self
    }
}
