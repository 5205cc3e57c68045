//! Technical skill recognition against the shared taxonomy.
//!
//! Matching runs over whole tokens, leftmost-longest, so `java` never fires inside
//! `javascript` and `ruby on rails` wins over `ruby`. Results are keyed by canonical
//! skill name, never by the surface form that was seen.

use std::collections::HashMap;

use crate::analysis::lexicon::SkillTaxonomy;
use crate::analysis::models::{RankedTerm, TermSet, TermSource};
use crate::analysis::normalizer::{NormalizedDocument, Word};

/// Words after a bare "go" that make it the English verb: "go live", "go ahead".
const GO_VERB_FOLLOWERS: &[&str] = &[
    "live", "ahead", "beyond", "back", "through", "over", "above", "into", "out", "further",
    "forward", "extra", "the", "a", "an",
];
/// Words before a bare "go" that make it the English verb: "will go", "let's go".
const GO_VERB_LEADERS: &[&str] = &[
    "will", "can", "must", "should", "would", "could", "let", "let's", "lets",
];
/// "ready to go", "able to go" and similar.
const GO_VERB_INFINITIVE_LEADERS: &[&str] = &["ready", "good", "able", "need", "want"];

/// A run of words that names one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillSpan {
    /// Taxonomy entry index.
    pub skill: usize,
    /// First word index.
    pub start: usize,
    pub len: usize,
}

/// Leftmost-longest, non-overlapping skill mentions over the document's words.
pub fn find_skill_spans(doc: &NormalizedDocument, taxonomy: &SkillTaxonomy) -> Vec<SkillSpan> {
    let words: Vec<&str> = doc.words.iter().map(|w| w.text.as_str()).collect();
    let mut spans = Vec::new();

    let mut i = 0;
    while i < words.len() {
        match taxonomy.match_at(&words, i) {
            Some((_, 1)) if words[i] == "go" && is_go_verb(&doc.words, i) => i += 1,
            Some((skill, len)) => {
                spans.push(SkillSpan {
                    skill,
                    start: i,
                    len,
                });
                i += len;
            }
            None => i += 1,
        }
    }

    spans
}

/// Neighbouring words only count when they sit on the same line as "go".
fn is_go_verb(words: &[Word], i: usize) -> bool {
    let line = words[i].line;
    let at = |idx: Option<usize>| {
        idx.and_then(|idx| words.get(idx))
            .filter(|w| w.line == line)
            .map(|w| w.text.as_str())
    };
    let next = at(Some(i + 1));
    let prev = at(i.checked_sub(1));
    let prev2 = at(i.checked_sub(2));

    next.map_or(false, |w| GO_VERB_FOLLOWERS.contains(&w))
        || prev.map_or(false, |w| GO_VERB_LEADERS.contains(&w))
        || (prev == Some("to") && prev2.map_or(false, |w| GO_VERB_INFINITIVE_LEADERS.contains(&w)))
}

/// Finds every taxonomy skill mentioned in `doc`, ranked by frequency and then by
/// first mention.
pub fn recognize_skills(
    doc: &NormalizedDocument,
    taxonomy: &SkillTaxonomy,
    source: TermSource,
) -> TermSet {
    // entry index -> (frequency, first position)
    let mut seen: HashMap<usize, (u32, usize)> = HashMap::new();
    for span in find_skill_spans(doc, taxonomy) {
        let stats = seen.entry(span.skill).or_insert((0, span.start));
        stats.0 += 1;
    }

    let mut ranked: Vec<RankedTerm> = seen
        .into_iter()
        .map(|(idx, (frequency, first_position))| {
            let canonical = taxonomy.canonical(idx).to_string();
            RankedTerm {
                key: canonical.clone(),
                label: canonical,
                frequency,
                first_position,
            }
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(a.first_position.cmp(&b.first_position))
    });

    TermSet::new(source, ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::Lexicon;
    use crate::analysis::normalizer::normalize;

    fn skills_in(text: &str) -> Vec<String> {
        let lexicon = Lexicon::builtin();
        let doc = normalize(text, &lexicon);
        recognize_skills(&doc, &lexicon.skills, TermSource::Resume)
            .iter()
            .map(|t| t.key.clone())
            .collect()
    }

    #[test]
    fn test_synonyms_resolve_to_canonical_name() {
        assert_eq!(skills_in("Shipped services in Golang on K8S"), vec!["go", "kubernetes"]);
        assert_eq!(skills_in("Frontend work in JS"), vec!["javascript"]);
    }

    #[test]
    fn test_no_match_inside_longer_words() {
        assert_eq!(skills_in("JavaScript and TypeScript"), vec!["javascript", "typescript"]);
        assert!(skills_in("Gopher enthusiast, javanese cuisine").is_empty());
    }

    #[test]
    fn test_go_as_english_verb_is_not_a_skill() {
        assert!(skills_in("Help the team go live with the new billing flow").is_empty());
        assert!(skills_in("Candidates should be ready to go from day one").is_empty());
        assert!(skills_in("You will go above and beyond").is_empty());
        assert_eq!(skills_in("Strong Python and Go experience"), vec!["python", "go"]);
        assert_eq!(skills_in("Migrated services from Python to Go"), vec!["python", "go"]);
        assert_eq!(skills_in("Golang live reload tooling"), vec!["go"]);
        assert_eq!(skills_in("Skills: Python, Go\nThe rest is history"), vec!["python", "go"]);
    }

    #[test]
    fn test_multi_word_skills() {
        assert_eq!(
            skills_in("Applied machine learning and Ruby on Rails"),
            vec!["machine learning", "ruby on rails"]
        );
    }

    #[test]
    fn test_case_insensitive_and_punctuation_tolerant() {
        assert_eq!(skills_in("PYTHON, Go, and Node.js."), vec!["python", "go", "node.js"]);
    }

    #[test]
    fn test_ranked_by_frequency_then_first_mention() {
        let lexicon = Lexicon::builtin();
        let doc = normalize(
            "Docker experience. Kubernetes required. Kubernetes operators. Docker and AWS.",
            &lexicon,
        );
        let set = recognize_skills(&doc, &lexicon.skills, TermSource::JobDescription);
        let ranked: Vec<(&str, u32)> =
            set.iter().map(|t| (t.key.as_str(), t.frequency)).collect();
        assert_eq!(ranked, vec![("docker", 2), ("kubernetes", 2), ("aws", 1)]);
        assert_eq!(set.source, TermSource::JobDescription);
    }

    #[test]
    fn test_synonym_and_canonical_count_as_one_skill() {
        let lexicon = Lexicon::builtin();
        let doc = normalize("Kubernetes (k8s) administration", &lexicon);
        let set = recognize_skills(&doc, &lexicon.skills, TermSource::Resume);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().frequency, 2);
    }
}
