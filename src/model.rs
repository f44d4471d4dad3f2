//! Unified word bundle and the attribution contract every provider record carries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of producers a record can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    DictionaryApi,
    Datamuse,
    ConceptNet,
    Wikipedia,
    Gemini,
    Internal,
}

impl SourceTag {
    pub const ALL: [SourceTag; 6] = [
        SourceTag::DictionaryApi,
        SourceTag::Datamuse,
        SourceTag::ConceptNet,
        SourceTag::Wikipedia,
        SourceTag::Gemini,
        SourceTag::Internal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::DictionaryApi => "dictionaryapi",
            SourceTag::Datamuse => "datamuse",
            SourceTag::ConceptNet => "conceptnet",
            SourceTag::Wikipedia => "wikipedia",
            SourceTag::Gemini => "gemini",
            SourceTag::Internal => "internal",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a single leaf record. Exactly one per record; records from
/// different providers are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttribution {
    pub source: SourceTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl SourceAttribution {
    pub fn new(source: SourceTag, url: Option<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source,
            url,
            fetched_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phonetic {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    pub attribution: SourceAttribution,
}

/// Relation kinds a bundle may carry. Serialized as the lowercase tag
/// (`relatedto`, `usedfor`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Synonym,
    Antonym,
    Hypernym,
    Hyponym,
    Meronym,
    Holonym,
    IsA,
    UsedFor,
    RelatedTo,
    AtLocation,
    DerivedFrom,
    Triggers,
    HasSubevent,
    HasContext,
    MannerOf,
    Causes,
    CapableOf,
}

impl RelationType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::Synonym => "synonym",
            RelationType::Antonym => "antonym",
            RelationType::Hypernym => "hypernym",
            RelationType::Hyponym => "hyponym",
            RelationType::Meronym => "meronym",
            RelationType::Holonym => "holonym",
            RelationType::IsA => "isa",
            RelationType::UsedFor => "usedfor",
            RelationType::RelatedTo => "relatedto",
            RelationType::AtLocation => "atlocation",
            RelationType::DerivedFrom => "derivedfrom",
            RelationType::Triggers => "triggers",
            RelationType::HasSubevent => "hassubevent",
            RelationType::HasContext => "hascontext",
            RelationType::MannerOf => "mannerof",
            RelationType::Causes => "causes",
            RelationType::CapableOf => "capableof",
        }
    }

    /// Parse a lowercase relation tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let rel = match tag {
            "synonym" => RelationType::Synonym,
            "antonym" => RelationType::Antonym,
            "hypernym" => RelationType::Hypernym,
            "hyponym" => RelationType::Hyponym,
            "meronym" => RelationType::Meronym,
            "holonym" => RelationType::Holonym,
            "isa" => RelationType::IsA,
            "usedfor" => RelationType::UsedFor,
            "relatedto" => RelationType::RelatedTo,
            "atlocation" => RelationType::AtLocation,
            "derivedfrom" => RelationType::DerivedFrom,
            "triggers" => RelationType::Triggers,
            "hassubevent" => RelationType::HasSubevent,
            "hascontext" => RelationType::HasContext,
            "mannerof" => RelationType::MannerOf,
            "causes" => RelationType::Causes,
            "capableof" => RelationType::CapableOf,
            _ => return None,
        };
        Some(rel)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub rel: RelationType,
    pub target: String,
    /// Provider-defined strength; scales differ between providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub attribution: SourceAttribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub attribution: SourceAttribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphKind {
    Prefix,
    Suffix,
    Inflection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphVariant {
    pub form: String,
    pub kind: MorphKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub attribution: SourceAttribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiTocItem {
    /// Provider-assigned section path, e.g. `"2.1"` (MediaWiki `number`).
    pub index: String,
    pub title: String,
    /// 1-based heading depth.
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub attribution: SourceAttribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WikiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub toc: Vec<WikiTocItem>,
}

/// Everything known about one searched word.
///
/// Built once per search by the aggregator and handed to the caller; nothing
/// in the crate mutates a bundle after assembly. `morphology` is always
/// present (currently empty) so producers can fill it later without a schema
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBundle {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetics: Option<Vec<Phonetic>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub relations: Vec<RelationEdge>,
    #[serde(default)]
    pub associations: Vec<Association>,
    #[serde(default)]
    pub morphology: Vec<MorphVariant>,
    #[serde(default)]
    pub wiki: WikiSection,
}

impl WordBundle {
    /// True when none of the three primary collections carries anything.
    /// Callers treat this as "no data found"; the aggregator itself never does.
    pub fn has_no_data(&self) -> bool {
        self.definitions.is_empty() && self.relations.is_empty() && self.associations.is_empty()
    }

    /// Distinct source tags across definitions and relations, in first-seen order.
    pub fn definition_and_relation_sources(&self) -> Vec<SourceTag> {
        let mut seen = Vec::new();
        let tags = self
            .definitions
            .iter()
            .map(|d| d.attribution.source)
            .chain(self.relations.iter().map(|r| r.attribution.source));
        for tag in tags {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        seen
    }
}
