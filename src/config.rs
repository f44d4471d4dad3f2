use std::env;
use std::time::Duration;

use url::Url;

/// Per-call bound for every outbound provider request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_LANG: &str = "en";

const DICTIONARY_BASE: &str = "https://api.dictionaryapi.dev/api/v2";
const DATAMUSE_BASE: &str = "https://api.datamuse.com";
const CONCEPTNET_BASE: &str = "https://api.conceptnet.io";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },

    #[error("invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("invalid language code '{0}': expected 2-3 lowercase ASCII letters")]
    InvalidLang(String),
}

/// Provider endpoints. Defaults point at the public services; every one can be
/// overridden (tests point them at local mock servers).
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub dictionary: Url,
    pub datamuse: Url,
    pub conceptnet: Url,
    /// Full MediaWiki API endpoint, e.g. `https://en.wikipedia.org/w/api.php`.
    pub wikipedia: Url,
}

impl Endpoints {
    pub fn for_lang(lang: &str) -> Result<Self, ConfigError> {
        let parse = |var, raw: &str| {
            Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { var, source })
        };
        Ok(Self {
            dictionary: parse("WORDSCOUT_DICTIONARY_URL", DICTIONARY_BASE)?,
            datamuse: parse("WORDSCOUT_DATAMUSE_URL", DATAMUSE_BASE)?,
            conceptnet: parse("WORDSCOUT_CONCEPTNET_URL", CONCEPTNET_BASE)?,
            wikipedia: parse(
                "WORDSCOUT_WIKIPEDIA_URL",
                &format!("https://{lang}.wikipedia.org/w/api.php"),
            )?,
        })
    }
}

/// Runtime configuration for the aggregator.
///
/// Environment variables (all optional):
/// - `WORDSCOUT_LANG`: provider language, default `en`
/// - `WORDSCOUT_TIMEOUT_SECS`: per-call timeout, default 8
/// - `WORDSCOUT_{DICTIONARY,DATAMUSE,CONCEPTNET,WIKIPEDIA}_URL`: endpoint overrides
#[derive(Debug, Clone)]
pub struct Config {
    pub lang: String,
    pub timeout: Duration,
    pub endpoints: Endpoints,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            get(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let lang = get("WORDSCOUT_LANG").unwrap_or_else(|| DEFAULT_LANG.to_string());
        validate_lang(&lang)?;

        let timeout = get("WORDSCOUT_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);

        let mut endpoints = Endpoints::for_lang(&lang)?;
        let overrides: [(&'static str, &mut Url); 4] = [
            ("WORDSCOUT_DICTIONARY_URL", &mut endpoints.dictionary),
            ("WORDSCOUT_DATAMUSE_URL", &mut endpoints.datamuse),
            ("WORDSCOUT_CONCEPTNET_URL", &mut endpoints.conceptnet),
            ("WORDSCOUT_WIKIPEDIA_URL", &mut endpoints.wikipedia),
        ];
        for (var, slot) in overrides {
            if let Some(raw) = get(var) {
                *slot = Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var, source })?;
            }
        }

        Ok(Self {
            lang,
            timeout,
            endpoints,
        })
    }

    /// Apply CLI overrides. Changing the language re-derives the Wikipedia host
    /// unless it was explicitly overridden.
    pub fn with_overrides(
        mut self,
        lang: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(lang) = lang {
            validate_lang(lang)?;
            let default_wiki = Endpoints::for_lang(&self.lang)?.wikipedia;
            if self.endpoints.wikipedia == default_wiki {
                self.endpoints.wikipedia = Endpoints::for_lang(lang)?.wikipedia;
            }
            self.lang = lang.to_string();
        }
        if let Some(raw) = timeout_secs {
            self.timeout = parse_timeout(raw)?;
        }
        Ok(self)
    }

    #[cfg(test)]
    pub(crate) fn for_mock(base: &str) -> Self {
        let url = |suffix: &str| Url::parse(&format!("{base}{suffix}")).unwrap();
        Self {
            lang: DEFAULT_LANG.to_string(),
            timeout: Duration::from_secs(2),
            endpoints: Endpoints {
                dictionary: url(""),
                datamuse: url(""),
                conceptnet: url(""),
                wikipedia: url("/w/api.php"),
            },
        }
    }
}

fn validate_lang(lang: &str) -> Result<(), ConfigError> {
    if (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_lowercase()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLang(lang.to_string()))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}
