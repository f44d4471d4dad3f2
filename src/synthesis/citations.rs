use crate::model::SourceTag;

/// Source tags cited inline as `[tag]`, deduplicated in order of first use.
/// Bracketed text that is not a known tag is ignored.
pub fn cited_sources(text: &str) -> Vec<SourceTag> {
    let mut cited = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find(']') else {
            break;
        };
        let candidate = &rest[..close];
        if let Some(tag) = SourceTag::from_tag(&candidate.trim().to_ascii_lowercase())
            && !cited.contains(&tag)
        {
            cited.push(tag);
        }
        rest = &rest[close + 1..];
    }
    cited
}
