//! Exhaustive transfer-history scanning.
//!
//! The node serves transfer history in bounded pages, newest first, keyed by
//! a node-local meta id. The scan walks pages strictly sequentially (each
//! request depends on the previous page's last id), filters as it goes, and
//! returns matches in explicit ascending (height, id) order — callers wanting
//! the "first" message take the head.

use crate::error::AuditError;
use pollscan_transport::{Ledger, TransferEntry, WireMessage, PLAIN_MESSAGE_KIND, TRANSFER_KIND};
use pollscan_types::{Address, PublicKey};

/// Leading payload byte marking "render as hex, do not decode".
const HEX_LITERAL_MARKER: &str = "fe";

/// A transfer whose decoded message matched the scan. Immutable once
/// returned.
#[derive(Clone, Debug)]
pub struct ScannedTransaction {
    /// Public key of the account that signed the (inner) transfer.
    pub signer: PublicKey,
    /// Decoded plaintext message.
    pub message: String,
    /// Height of the committing block.
    pub height: u64,
    /// Transferred amount in the smallest native unit.
    pub amount: u64,
    /// Whether any non-native asset rode along.
    pub has_mosaics: bool,
    /// Node-local meta id (tiebreaker for same-block ordering).
    pub id: u64,
}

/// Every transfer touching `account` whose decoded message contains
/// `needle`, oldest first.
///
/// Multisig wrappers are unwrapped before inspection; only base transfers
/// are eligible; encrypted or absent messages never match. A transport
/// error aborts the scan — no partial results.
pub async fn transactions_with<L: Ledger>(
    ledger: &L,
    account: &Address,
    needle: &str,
) -> Result<Vec<ScannedTransaction>, AuditError> {
    let mut matches = Vec::new();
    let mut after_id = None;
    loop {
        let page = ledger.transfers(account, after_id).await?;
        let Some(last) = page.last() else {
            break;
        };
        // Ids arrive descending; the page's last entry is the oldest and
        // keys the next request.
        after_id = Some(last.meta.id);
        collect_matches(&page, needle, &mut matches);
    }
    matches.sort_by_key(|tx| (tx.height, tx.id));
    Ok(matches)
}

/// The earliest matching message, if any.
pub async fn first_message_with<L: Ledger>(
    ledger: &L,
    account: &Address,
    needle: &str,
) -> Result<Option<String>, AuditError> {
    let transactions = transactions_with(ledger, account, needle).await?;
    Ok(transactions.into_iter().next().map(|tx| tx.message))
}

fn collect_matches(page: &[TransferEntry], needle: &str, matches: &mut Vec<ScannedTransaction>) {
    for entry in page {
        let tx = entry.transaction.unwrap_multisig();
        if tx.kind != TRANSFER_KIND {
            continue;
        }
        let Some(message) = decode_plain_message(tx.message.as_ref()) else {
            continue;
        };
        if !message.contains(needle) {
            continue;
        }
        let signer = match PublicKey::from_hex(&tx.signer) {
            Ok(key) => key,
            Err(_) => {
                tracing::warn!(
                    "skipping transaction {} with malformed signer key", entry.meta.id
                );
                continue;
            }
        };
        matches.push(ScannedTransaction {
            signer,
            message,
            height: entry.meta.height,
            amount: tx.amount,
            has_mosaics: tx.mosaics.is_some(),
            id: entry.meta.id,
        });
    }
}

/// Decode an unencrypted message payload to text. `None` for encrypted or
/// absent messages — those never match a scan.
fn decode_plain_message(message: Option<&WireMessage>) -> Option<String> {
    let message = message?;
    if message.kind != PLAIN_MESSAGE_KIND {
        return None;
    }
    let payload = message.payload.as_deref()?;
    Some(decode_payload(payload))
}

/// Hex payload → text, best effort: the `fe` marker short-circuits to a hex
/// literal; invalid UTF-8 falls back to byte-per-char rendering; undecodable
/// hex falls back to the raw payload.
fn decode_payload(payload: &str) -> String {
    if payload.len() > 2 {
        if let Some(rest) = payload.strip_prefix(HEX_LITERAL_MARKER) {
            return format!("HEX: {rest}");
        }
    }
    match hex::decode(payload) {
        Ok(bytes) => match String::from_utf8(bytes.clone()) {
            Ok(text) => text,
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        },
        Err(_) => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollscan_transport::{LedgerRequest, NullLedger, SECURE_MESSAGE_KIND};

    fn account() -> Address {
        Address::new("TAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
    }

    fn key_hex(fill: u8) -> String {
        hex::encode([fill; 32])
    }

    #[tokio::test]
    async fn paginates_with_last_meta_id_until_empty() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![
                TransferEntry::transfer(30, 300, &key_hex(1), 0).with_plain_message("vote"),
                TransferEntry::transfer(20, 200, &key_hex(2), 0).with_plain_message("vote"),
            ],
        );
        ledger.add_page(
            &a,
            vec![TransferEntry::transfer(10, 100, &key_hex(3), 0).with_plain_message("vote")],
        );

        let found = transactions_with(&ledger, &a, "vote").await.unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(
            ledger.requests(),
            vec![
                LedgerRequest::Transfers { account: a.as_str().to_string(), after_id: None },
                LedgerRequest::Transfers { account: a.as_str().to_string(), after_id: Some(20) },
                LedgerRequest::Transfers { account: a.as_str().to_string(), after_id: Some(10) },
            ]
        );
    }

    #[tokio::test]
    async fn returns_ascending_height_order() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![
                TransferEntry::transfer(9, 900, &key_hex(1), 0).with_plain_message("x"),
                TransferEntry::transfer(5, 500, &key_hex(2), 0).with_plain_message("x"),
            ],
        );
        ledger.add_page(
            &a,
            vec![TransferEntry::transfer(1, 100, &key_hex(3), 0).with_plain_message("x")],
        );
        let found = transactions_with(&ledger, &a, "").await.unwrap();
        let heights: Vec<u64> = found.iter().map(|t| t.height).collect();
        assert_eq!(heights, vec![100, 500, 900]);
    }

    #[tokio::test]
    async fn unwraps_multisig_to_inner_signer() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![TransferEntry::transfer(1, 10, &key_hex(7), 0)
                .with_plain_message("vote")
                .wrapped_in_multisig(&key_hex(9))],
        );
        let found = transactions_with(&ledger, &a, "vote").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].signer, PublicKey::new([7; 32]));
    }

    #[tokio::test]
    async fn skips_non_transfer_kinds() {
        let ledger = NullLedger::new();
        let a = account();
        let mut entry = TransferEntry::transfer(1, 10, &key_hex(1), 0).with_plain_message("vote");
        entry.transaction.kind = 4097;
        ledger.add_page(&a, vec![entry]);
        assert!(transactions_with(&ledger, &a, "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn encrypted_and_absent_messages_never_match() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![
                TransferEntry::transfer(2, 20, &key_hex(1), 0)
                    .with_raw_message(SECURE_MESSAGE_KIND, "74657374"),
                TransferEntry::transfer(1, 10, &key_hex(2), 0),
            ],
        );
        // The empty needle matches any decoded message, so nothing decodable
        // means nothing found.
        assert!(transactions_with(&ledger, &a, "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hex_marker_payload_passes_through() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![TransferEntry::transfer(1, 10, &key_hex(1), 0)
                .with_raw_message(PLAIN_MESSAGE_KIND, "fecafe")],
        );
        let found = transactions_with(&ledger, &a, "").await.unwrap();
        assert_eq!(found[0].message, "HEX: cafe");
    }

    #[test]
    fn invalid_utf8_falls_back_to_raw_chars() {
        // 0xFF is not valid UTF-8; the fallback maps bytes to chars directly.
        assert_eq!(decode_payload("ff"), "\u{ff}");
        // Not even hex: the raw payload comes back.
        assert_eq!(decode_payload("zzz"), "zzz");
        // A bare "fe" is too short to be a marker and decodes as a byte.
        assert_eq!(decode_payload("fe"), "\u{fe}");
    }

    #[tokio::test]
    async fn transport_failure_aborts_scan() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.fail_transfers(&a);
        assert!(transactions_with(&ledger, &a, "").await.is_err());
    }

    #[tokio::test]
    async fn first_message_is_the_earliest() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![
                TransferEntry::transfer(2, 20, &key_hex(1), 0).with_plain_message("tag:new"),
                TransferEntry::transfer(1, 10, &key_hex(2), 0).with_plain_message("tag:old"),
            ],
        );
        let first = first_message_with(&ledger, &a, "tag:").await.unwrap();
        assert_eq!(first.as_deref(), Some("tag:old"));
    }

    #[tokio::test]
    async fn malformed_signer_is_skipped() {
        let ledger = NullLedger::new();
        let a = account();
        ledger.add_page(
            &a,
            vec![
                TransferEntry::transfer(2, 20, "nothex", 0).with_plain_message("vote"),
                TransferEntry::transfer(1, 10, &key_hex(1), 0).with_plain_message("vote"),
            ],
        );
        let found = transactions_with(&ledger, &a, "vote").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].height, 10);
    }
}
