use std::fmt;

use tokio::task::JoinError;
use tracing::warn;

use crate::providers::{Contribution, FetchStatus};

/// The five provider calls made for every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCall {
    Dictionary,
    DatamuseSynonyms,
    DatamuseAssociations,
    ConceptNet,
    Wikipedia,
}

impl ProviderCall {
    pub fn label(self) -> &'static str {
        match self {
            ProviderCall::Dictionary => "dictionaryapi",
            ProviderCall::DatamuseSynonyms => "datamuse (means-like)",
            ProviderCall::DatamuseAssociations => "datamuse (triggers)",
            ProviderCall::ConceptNet => "conceptnet",
            ProviderCall::Wikipedia => "wikipedia",
        }
    }
}

/// How one provider call settled. `Rejected` means the task itself died
/// (panicked or was cancelled) rather than the provider answering badly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Fulfilled,
    NotFound,
    Failed(String),
    Rejected(String),
}

impl Outcome {
    pub fn contributed_nothing(&self) -> bool {
        !matches!(self, Outcome::Fulfilled)
    }
}

/// Per-call diagnostics. Not part of the bundle; nothing downstream branches on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReport {
    pub call: ProviderCall,
    pub outcome: Outcome,
}

impl fmt::Display for ProviderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.call.label();
        match &self.outcome {
            Outcome::Fulfilled => write!(f, "{label}: ok"),
            Outcome::NotFound => write!(f, "{label}: not found"),
            Outcome::Failed(reason) => write!(f, "{label}: failed ({reason})"),
            Outcome::Rejected(reason) => write!(f, "{label}: rejected ({reason})"),
        }
    }
}

/// Read one task's result slot: a fulfilled contribution yields its value, a
/// rejected task yields the empty shape.
pub(super) fn settle<T: Default>(
    call: ProviderCall,
    joined: Result<Contribution<T>, JoinError>,
) -> (T, ProviderReport) {
    let (value, outcome) = match joined {
        Ok(Contribution { value, status }) => {
            let outcome = match status {
                FetchStatus::Ok => Outcome::Fulfilled,
                FetchStatus::NotFound => Outcome::NotFound,
                FetchStatus::Failed(e) => Outcome::Failed(e.to_string()),
            };
            (value, outcome)
        }
        Err(e) => {
            warn!(
                call = call.label(),
                error = %e,
                "provider task rejected; substituting empty result"
            );
            (T::default(), Outcome::Rejected(e.to_string()))
        }
    };
    (value, ProviderReport { call, outcome })
}
