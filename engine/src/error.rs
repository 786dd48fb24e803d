use pollscan_transport::TransportError;
use pollscan_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("poll account has no `{0}` message")]
    MissingPollMessage(&'static str),

    #[error("poll metadata is not valid JSON: {0}")]
    InvalidPollData(String),

    #[error("poll options carry no account mapping")]
    MissingOptionAccounts,

    #[error("option `{0}` is not mapped to an account")]
    UnmappedOption(String),

    #[error("two poll options share the account {0}")]
    DuplicateOptionAccount(Address),

    #[error("equal-weight poll has no whitelist")]
    MissingWhitelist,

    #[error("unsupported poll kind {0}")]
    UnsupportedPollKind(u32),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
