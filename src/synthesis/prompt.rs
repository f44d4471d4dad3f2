use crate::model::{RelationType, WordBundle};

const MAX_DEFINITIONS: usize = 5;
const MAX_RELATIONS: usize = 15;
const MAX_ASSOCIATIONS: usize = 10;
const MAX_SUBTOPICS: usize = 5;

/// Condensed, plain-text view of a bundle for the model.
pub fn bundle_context(bundle: &WordBundle) -> String {
    let mut context = format!("Word: {}\n\n", bundle.query);

    if !bundle.definitions.is_empty() {
        context.push_str("Definitions:\n");
        for d in bundle.definitions.iter().take(MAX_DEFINITIONS) {
            let pos = d.part_of_speech.as_deref().unwrap_or("unknown");
            context.push_str(&format!("- ({pos}) {} [{}]\n", d.text, d.attribution.source));
        }
        context.push('\n');
    }

    if !bundle.relations.is_empty() {
        context.push_str("Semantic Relations:\n");
        // Grouped by relation, in order of first appearance.
        let mut groups: Vec<(RelationType, Vec<String>)> = Vec::new();
        for r in bundle.relations.iter().take(MAX_RELATIONS) {
            let entry = format!("{} [{}]", r.target, r.attribution.source);
            match groups.iter_mut().find(|(rel, _)| *rel == r.rel) {
                Some((_, targets)) => targets.push(entry),
                None => groups.push((r.rel, vec![entry])),
            }
        }
        for (rel, targets) in groups {
            context.push_str(&format!("- {rel}: {}\n", targets.join(", ")));
        }
        context.push('\n');
    }

    if !bundle.associations.is_empty() {
        context.push_str("Associations:\n");
        let terms: Vec<_> = bundle
            .associations
            .iter()
            .take(MAX_ASSOCIATIONS)
            .map(|a| a.term.as_str())
            .collect();
        context.push_str(&terms.join(", "));
        context.push_str("\n\n");
    }

    if !bundle.wiki.toc.is_empty() {
        context.push_str("Wikipedia Subtopics:\n");
        let titles: Vec<_> = bundle
            .wiki
            .toc
            .iter()
            .take(MAX_SUBTOPICS)
            .map(|t| t.title.as_str())
            .collect();
        context.push_str(&titles.join(", "));
        context.push('\n');
    }

    context
}

pub fn synthesis_prompt(bundle: &WordBundle) -> String {
    format!(
        "You are a linguistic analyst. Synthesize the provided data about a word into a concise, insightful summary.

Instructions:
1. Produce a 90-120 word synthesis based only on the provided data.
2. Do not invent facts or definitions.
3. When you use information, cite its source tag inline, like [dictionaryapi] or [conceptnet].
4. Start with a primary definition.
5. Weave in semantic relationships and associations for deeper context.
6. Close with a brief mention of its conceptual space based on the Wikipedia subtopics, if any.
7. Keep a neutral, analytical tone.

Provided data for \"{query}\":
---
{context}---

Synthesis:",
        query = bundle.query,
        context = bundle_context(bundle),
    )
}
