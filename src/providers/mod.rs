//! Source adapters: one per external provider, each normalizing a native
//! response into slices of the unified bundle.
//!
//! Every adapter call resolves to a [`Contribution`]. Failures never escape:
//! network errors, timeouts, bad statuses and malformed payloads all collapse
//! into the adapter's empty shape, with the reason kept in [`FetchStatus`]
//! for diagnostics.

pub mod conceptnet;
pub mod datamuse;
pub mod dictionary;
pub(crate) mod http;
pub mod wikipedia;

pub use http::ProviderError;

use tracing::{debug, warn};

use crate::model::SourceTag;

/// How a provider call ended.
#[derive(Debug)]
pub enum FetchStatus {
    Ok,
    NotFound,
    Failed(ProviderError),
}

/// An adapter's output plus how it was obtained. `value` is the empty shape
/// whenever `status` is not `Ok`.
#[derive(Debug)]
pub struct Contribution<T> {
    pub value: T,
    pub status: FetchStatus,
}

impl<T: Default> Contribution<T> {
    /// Collapse a provider result into a contribution, logging what was absorbed.
    pub(crate) fn absorb(source: SourceTag, result: Result<Option<T>, ProviderError>) -> Self {
        match result {
            Ok(Some(value)) => Self {
                value,
                status: FetchStatus::Ok,
            },
            Ok(None) => {
                debug!(%source, "provider has no entry for term");
                Self {
                    value: T::default(),
                    status: FetchStatus::NotFound,
                }
            }
            Err(e) => {
                warn!(%source, error = %e, "provider call failed; contributing nothing");
                Self {
                    value: T::default(),
                    status: FetchStatus::Failed(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_keeps_value_on_success() {
        let c = Contribution::absorb(SourceTag::Datamuse, Ok(Some(vec![1, 2])));
        assert_eq!(c.value, vec![1, 2]);
        assert!(matches!(c.status, FetchStatus::Ok));
    }

    #[test]
    fn absorb_not_found_is_empty() {
        let c: Contribution<Vec<u8>> = Contribution::absorb(SourceTag::DictionaryApi, Ok(None));
        assert!(c.value.is_empty());
        assert!(matches!(c.status, FetchStatus::NotFound));
    }

    #[test]
    fn absorb_error_is_empty_with_reason() {
        let c: Contribution<Vec<u8>> =
            Contribution::absorb(SourceTag::ConceptNet, Err(ProviderError::Status(502)));
        assert!(c.value.is_empty());
        assert!(matches!(c.status, FetchStatus::Failed(ProviderError::Status(502))));
    }
}
