//! The vote tally: deduplication, multi-vote policy, weighting.
//!
//! Both weighting modes run the same skeleton and differ only in where a
//! voter's weight comes from: a constant 1 (equal-weight) or the account's
//! importance score at the cutoff (reputation-weighted). All filtering is
//! per option and pure; the only ledger round-trip is the single batched
//! importance lookup.

use crate::error::AuditError;
use crate::poll::{PollDefinition, WeightingMode};
use crate::scanner::ScannedTransaction;
use pollscan_crypto::derive_address;
use pollscan_types::{Address, BlockHeight, NetworkId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use pollscan_transport::Ledger;

/// Result line for a single option.
#[derive(Clone, Debug, Serialize)]
pub struct OptionResult {
    pub label: String,
    /// Surviving votes for this option.
    pub votes: usize,
    /// Sum of the surviving voters' weights.
    pub weighted: f64,
    pub percentage: f64,
}

/// The terminal artifact of a run. Immutable after construction.
#[derive(Clone, Debug, Serialize)]
pub struct TallyResult {
    /// Valid votes across all options, after multi-vote invalidation.
    pub total_votes: usize,
    pub options: Vec<OptionResult>,
}

impl TallyResult {
    fn zeroed(labels: &[String]) -> Self {
        Self {
            total_votes: 0,
            options: labels
                .iter()
                .map(|label| OptionResult {
                    label: label.clone(),
                    votes: 0,
                    weighted: 0.0,
                    percentage: 0.0,
                })
                .collect(),
        }
    }
}

/// Tally the scanned transactions of every option under the poll's rules.
///
/// `option_transactions` is ordered like `poll.options.strings`; `cutoff`
/// is the resolved deadline height, or `None` for a still-open poll.
pub async fn tally_votes<L: Ledger>(
    ledger: &L,
    poll: &PollDefinition,
    option_transactions: &[Vec<ScannedTransaction>],
    cutoff: Option<BlockHeight>,
    network: NetworkId,
) -> Result<TallyResult, AuditError> {
    let mode = poll.form_data.weighting_mode()?;
    let labels = &poll.options.strings;

    let whitelist = match (mode, poll.whitelist.as_ref()) {
        (WeightingMode::EqualWeight, None) => return Err(AuditError::MissingWhitelist),
        (WeightingMode::EqualWeight, Some(list)) => Some(list),
        _ => None,
    };

    // Steps 1-5: filter each option's transactions, derive voter addresses,
    // dedup within the option (voting twice for one option counts once).
    let mut option_voters: Vec<Vec<Address>> = Vec::with_capacity(option_transactions.len());
    for transactions in option_transactions {
        let voters = transactions
            .iter()
            .filter(|tx| cutoff.map_or(true, |h| tx.height <= h))
            .filter(|tx| {
                // Reputation polls ignore transfers carrying value or
                // mosaics: exchange and deposit traffic, not ballots.
                mode != WeightingMode::Reputation || (tx.amount == 0 && !tx.has_mosaics)
            })
            .map(|tx| derive_address(&tx.signer, network))
            .filter(|voter| whitelist.map_or(true, |list| list.contains(voter)))
            .collect();
        option_voters.push(dedup_sorted(voters));
    }

    // Step 6: merge the per-option sorted lists into one sorted sequence
    // (duplicates across options survive the merge — they are the multi-vote
    // signal).
    let all_voters = option_voters
        .iter()
        .fold(Vec::new(), |merged, voters| merge_sorted(&merged, voters));

    if all_voters.is_empty() {
        return Ok(TallyResult::zeroed(labels));
    }

    // Step 7: multi-vote policy.
    let (option_voters, all_voters, occurrences) = if poll.form_data.multiple {
        let mut occurrences: HashMap<Address, usize> = HashMap::new();
        for voter in &all_voters {
            *occurrences.entry(voter.clone()).or_insert(0) += 1;
        }
        (option_voters, all_voters, occurrences)
    } else {
        // Within-option repeats are already gone, so any repeat in the
        // merged sequence means votes for two or more distinct options:
        // that voter is invalidated everywhere.
        let nullified: HashSet<Address> = all_voters
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0].clone())
            .collect();
        let option_voters: Vec<Vec<Address>> = option_voters
            .into_iter()
            .map(|voters| {
                voters
                    .into_iter()
                    .filter(|v| !nullified.contains(v))
                    .collect()
            })
            .collect();
        let all_voters: Vec<Address> = all_voters
            .into_iter()
            .filter(|v| !nullified.contains(v))
            .collect();
        let occurrences = all_voters.iter().map(|v| (v.clone(), 1)).collect();
        (option_voters, all_voters, occurrences)
    };

    if all_voters.is_empty() {
        return Ok(TallyResult::zeroed(labels));
    }

    // Step 8: per-voter weights.
    let unique_voters = dedup_sorted(all_voters.clone());
    let weights: HashMap<Address, f64> = match mode {
        WeightingMode::EqualWeight => unique_voters
            .into_iter()
            .map(|voter| {
                let occ = occurrences[&voter] as f64;
                (voter, 1.0 / occ)
            })
            .collect(),
        WeightingMode::Reputation => {
            let scores = match cutoff {
                Some(height) => ledger.importances_at(&unique_voters, height).await?,
                None => ledger.importances(&unique_voters).await?,
            };
            unique_voters
                .into_iter()
                .zip(scores)
                .map(|(voter, score)| {
                    let occ = occurrences[&voter] as f64;
                    (voter, score / occ)
                })
                .collect()
        }
    };

    // Step 9: aggregate. The normalizer is the total vote count for
    // equal-weight polls and the summed importance of unique voters for
    // reputation polls.
    let total_votes = all_voters.len();
    let normalizer = match mode {
        WeightingMode::EqualWeight => total_votes as f64,
        WeightingMode::Reputation => weights.values().sum(),
    };

    let options = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let voters = option_voters.get(i).map(Vec::as_slice).unwrap_or(&[]);
            let weighted: f64 = voters
                .iter()
                .map(|v| weights.get(v).copied().unwrap_or(0.0))
                .sum();
            let percentage = if normalizer == 0.0 {
                0.0
            } else {
                weighted * 100.0 / normalizer
            };
            OptionResult {
                label: label.clone(),
                votes: voters.len(),
                weighted,
                percentage,
            }
        })
        .collect();

    Ok(TallyResult {
        total_votes,
        options,
    })
}

/// Sort and drop repeats.
fn dedup_sorted(mut voters: Vec<Address>) -> Vec<Address> {
    voters.sort();
    voters.dedup();
    voters
}

/// Merge two sorted lists into one sorted list, keeping duplicates.
fn merge_sorted(a: &[Address], b: &[Address]) -> Vec<Address> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            merged.push(a[i].clone());
            i += 1;
        } else {
            merged.push(b[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}
