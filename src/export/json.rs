use crate::model::WordBundle;

/// Pretty-printed JSON; parsing it back with [`from_json`] yields an equal bundle.
pub fn to_json(bundle: &WordBundle) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(bundle)
}

pub fn from_json(raw: &str) -> Result<WordBundle, serde_json::Error> {
    serde_json::from_str(raw)
}
