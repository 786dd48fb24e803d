//! End-to-end poll audit: metadata → cutoff → scans → tally.

use crate::error::AuditError;
use crate::height;
use crate::poll::{
    PollDefinition, DESCRIPTION_TAG, FORM_DATA_TAG, OPTIONS_TAG, WHITELIST_TAG,
};
use crate::scanner::{self, ScannedTransaction};
use crate::tally::{self, TallyResult};
use futures_util::future::try_join_all;
use pollscan_transport::Ledger;
use pollscan_types::{Address, BlockHeight, NetworkId, Timestamp};

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct PollAudit {
    pub definition: PollDefinition,
    /// Height of the last counted block; `None` while the poll is open.
    pub cutoff: Option<BlockHeight>,
    /// True when the poll had not closed at audit time — the result can
    /// still change.
    pub provisional: bool,
    pub result: TallyResult,
}

/// Reconstruct the poll definition from the poll account's messages.
///
/// One scan of the account; every tag is extracted from it locally, earliest
/// message first. The whitelist is only required (and only looked for) on
/// equal-weight polls.
pub async fn poll_definition<L: Ledger>(
    ledger: &L,
    poll_account: &Address,
) -> Result<PollDefinition, AuditError> {
    let messages = scanner::transactions_with(ledger, poll_account, "").await?;

    let form_data = tagged_payload(&messages, FORM_DATA_TAG)?;
    let description = tagged_payload(&messages, DESCRIPTION_TAG)?;
    let options = tagged_payload(&messages, OPTIONS_TAG)?;

    // Peek at the kind before deciding whether a whitelist must exist.
    let needs_whitelist = serde_json::from_str::<serde_json::Value>(&form_data)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_u64()))
        == Some(1);
    let whitelist = if needs_whitelist {
        Some(tagged_payload(&messages, WHITELIST_TAG)?)
    } else {
        None
    };

    PollDefinition::from_payloads(&form_data, &description, &options, whitelist.as_deref())
}

/// Audit a poll top to bottom and assemble the result.
pub async fn audit_poll<L: Ledger>(
    ledger: &L,
    poll_account: &Address,
    network: NetworkId,
    now: Timestamp,
) -> Result<PollAudit, AuditError> {
    let definition = poll_definition(ledger, poll_account).await?;
    definition.validate()?;

    let deadline = definition.form_data.deadline();
    let (cutoff, provisional) = if deadline < now {
        let cutoff = height::height_at(ledger, deadline, now).await?;
        tracing::debug!("deadline {deadline} resolved to cutoff height {cutoff}");
        (Some(cutoff), false)
    } else {
        tracing::info!("poll has not finished yet; results are provisional");
        (None, true)
    };

    let accounts = definition.option_accounts()?;
    let scans: Vec<Vec<ScannedTransaction>> = try_join_all(
        accounts
            .iter()
            .map(|account| scanner::transactions_with(ledger, account, "")),
    )
    .await?;

    let result = tally::tally_votes(ledger, &definition, &scans, cutoff, network).await?;
    Ok(PollAudit {
        definition,
        cutoff,
        provisional,
        result,
    })
}

/// The earliest message containing `tag`, with the tag stripped.
fn tagged_payload(
    messages: &[ScannedTransaction],
    tag: &'static str,
) -> Result<String, AuditError> {
    messages
        .iter()
        .find(|tx| tx.message.contains(tag))
        .map(|tx| tx.message.replacen(tag, "", 1))
        .ok_or(AuditError::MissingPollMessage(tag))
}
