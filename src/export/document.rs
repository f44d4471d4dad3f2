use chrono::{DateTime, SecondsFormat, Utc};

use crate::markdown::{escape_yaml, sanitize_inline};
use crate::model::WordBundle;

/// Human-readable export. Lossy: attributions other than the front-matter
/// source list, audio links and weights are not rendered.
pub fn to_markdown(bundle: &WordBundle, exported_at: DateTime<Utc>) -> String {
    let mut parts = vec![front_matter(bundle, exported_at)];
    parts.push(format!("# {}", sanitize_inline(&bundle.query)));

    if let Some(phonetics) = bundle.phonetics.as_ref().filter(|p| !p.is_empty()) {
        let line: Vec<_> = phonetics.iter().map(|p| sanitize_inline(&p.text)).collect();
        parts.push(line.join(" | "));
    }

    if let Some(etymology) = &bundle.etymology {
        parts.push(format!("## Etymology\n\n{}", etymology.trim()));
    }

    let mut definitions = String::from("## Definitions\n");
    for d in &bundle.definitions {
        definitions.push('\n');
        let text = sanitize_inline(&d.text);
        match &d.part_of_speech {
            Some(pos) => definitions.push_str(&format!("- **({pos})** {text}")),
            None => definitions.push_str(&format!("- {text}")),
        }
        for example in &d.examples {
            definitions.push_str(&format!("\n  - _e.g._ \"{}\"", sanitize_inline(example)));
        }
    }
    parts.push(definitions);

    let mut relations = String::from("## Relations\n");
    for r in &bundle.relations {
        relations.push_str(&format!("\n- **[{}]** {}", r.rel, sanitize_inline(&r.target)));
    }
    parts.push(relations);

    let mut associations = String::from("## Associations\n");
    for a in &bundle.associations {
        let score = a.score.map_or_else(|| "N/A".to_string(), |s| s.to_string());
        associations.push_str(&format!("\n- {} (score: {score})", sanitize_inline(&a.term)));
    }
    parts.push(associations);

    if let Some(summary) = &bundle.wiki.summary {
        parts.push(format!("## Wikipedia Summary\n\n{}", summary.trim()));
    }

    let mut toc = String::from("## Wikipedia Subtopics\n");
    for item in &bundle.wiki.toc {
        let indent = "  ".repeat(item.level.saturating_sub(1) as usize);
        toc.push_str(&format!("\n{indent}- {}", sanitize_inline(&item.title)));
    }
    parts.push(toc);

    let mut out = parts.join("\n\n");
    out.push('\n');
    out
}

fn front_matter(bundle: &WordBundle, exported_at: DateTime<Utc>) -> String {
    let mut fm = String::from("---\n");
    fm.push_str(&format!("word: \"{}\"\n", escape_yaml(&bundle.query)));
    fm.push_str(&format!(
        "exportedAt: \"{}\"\n",
        exported_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    let sources = bundle.definition_and_relation_sources();
    if sources.is_empty() {
        fm.push_str("sources: []\n");
    } else {
        fm.push_str("sources:\n");
        for source in sources {
            fm.push_str(&format!("  - {source}\n"));
        }
    }
    fm.push_str("---");
    fm
}
