//! Poll metadata, reconstructed from tagged messages on the poll account.
//!
//! A well-formed poll account carries one message for each of the `formData:`,
//! `description:` and `options:` tags (plus `whitelist:` for equal-weight
//! polls); the payload after the tag is JSON. The earliest message wins for
//! every tag, so later spam cannot rewrite a poll.

use crate::error::AuditError;
use pollscan_types::{Address, Timestamp};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

pub const FORM_DATA_TAG: &str = "formData:";
pub const DESCRIPTION_TAG: &str = "description:";
pub const OPTIONS_TAG: &str = "options:";
pub const WHITELIST_TAG: &str = "whitelist:";

/// How ballots are weighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightingMode {
    /// One account, weight = its importance score (poll kind 0).
    Reputation,
    /// One whitelisted account, one vote (poll kind 1).
    EqualWeight,
}

impl WeightingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reputation => "reputation-weighted",
            Self::EqualWeight => "equal-weight (whitelist)",
        }
    }
}

/// The `formData:` payload.
#[derive(Clone, Debug, Deserialize)]
pub struct PollFormData {
    /// Poll kind: 0 reputation-weighted, 1 equal-weight-whitelisted. Other
    /// kinds exist on chain but are not auditable here.
    #[serde(rename = "type")]
    pub kind: u32,
    /// Deadline ("date of ending") as Unix milliseconds.
    pub doe: u64,
    /// Whether a voter may split their ballot across several options.
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub title: Option<String>,
}

impl PollFormData {
    pub fn weighting_mode(&self) -> Result<WeightingMode, AuditError> {
        match self.kind {
            0 => Ok(WeightingMode::Reputation),
            1 => Ok(WeightingMode::EqualWeight),
            k => Err(AuditError::UnsupportedPollKind(k)),
        }
    }

    pub fn deadline(&self) -> Timestamp {
        Timestamp::from_unix_millis(self.doe)
    }
}

/// The `options:` payload.
///
/// Two structures exist on chain: the old one carries a positional
/// `addresses` list aligned with `strings`; the new one maps each label to
/// its account through `link`. The map takes precedence when both appear.
#[derive(Clone, Debug, Deserialize)]
pub struct PollOptions {
    pub strings: Vec<String>,
    #[serde(default)]
    pub addresses: Option<Vec<String>>,
    #[serde(default)]
    pub link: Option<HashMap<String, String>>,
}

/// A poll, fetched once per run and never mutated.
#[derive(Clone, Debug)]
pub struct PollDefinition {
    pub form_data: PollFormData,
    pub description: String,
    pub options: PollOptions,
    /// Accounts eligible to vote; present iff the poll is equal-weight.
    pub whitelist: Option<HashSet<Address>>,
}

impl PollDefinition {
    /// Assemble a poll from its tagged payloads (tags already stripped).
    pub fn from_payloads(
        form_data: &str,
        description: &str,
        options: &str,
        whitelist: Option<&str>,
    ) -> Result<Self, AuditError> {
        let form_data: PollFormData = serde_json::from_str(form_data)
            .map_err(|e| AuditError::InvalidPollData(format!("formData: {e}")))?;
        let options: PollOptions = serde_json::from_str(options)
            .map_err(|e| AuditError::InvalidPollData(format!("options: {e}")))?;
        let whitelist = whitelist
            .map(|payload| {
                serde_json::from_str::<Vec<String>>(payload)
                    .map_err(|e| AuditError::InvalidPollData(format!("whitelist: {e}")))
            })
            .transpose()?
            .map(|list| list.iter().map(Address::new).collect());
        Ok(Self {
            form_data,
            description: description.to_string(),
            options,
            whitelist,
        })
    }

    /// The option accounts, ordered like `options.strings`.
    pub fn option_accounts(&self) -> Result<Vec<Address>, AuditError> {
        if let Some(link) = &self.options.link {
            self.options
                .strings
                .iter()
                .map(|label| {
                    link.get(label)
                        .map(Address::new)
                        .ok_or_else(|| AuditError::UnmappedOption(label.clone()))
                })
                .collect()
        } else if let Some(addresses) = &self.options.addresses {
            Ok(addresses.iter().map(Address::new).collect())
        } else {
            Err(AuditError::MissingOptionAccounts)
        }
    }

    /// Reject polls that must not be tallied: unsupported kinds, duplicate
    /// option accounts (one account collecting votes for two options), and
    /// equal-weight polls without a whitelist.
    pub fn validate(&self) -> Result<(), AuditError> {
        let mode = self.form_data.weighting_mode()?;
        let accounts = self.option_accounts()?;
        let mut seen = HashSet::new();
        for account in &accounts {
            if !seen.insert(account) {
                return Err(AuditError::DuplicateOptionAccount(account.clone()));
            }
        }
        if mode == WeightingMode::EqualWeight && self.whitelist.is_none() {
            return Err(AuditError::MissingWhitelist);
        }
        Ok(())
    }
}
