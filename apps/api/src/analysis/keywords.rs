//! Keyword extraction: frequency-ranked unigrams and short phrases from the job
//! description, with technical skills left to the skill recognizer.

use std::collections::HashMap;

use crate::analysis::lexicon::Lexicon;
use crate::analysis::models::{RankedTerm, TermSet, TermSource};
use crate::analysis::normalizer::{NormalizedDocument, Term};
use crate::analysis::skills::find_skill_spans;

/// A phrase must repeat this often in the job description to become a keyword.
const MIN_PHRASE_FREQUENCY: u32 = 2;

#[derive(Debug, Default)]
struct Candidate {
    frequency: u32,
    first_position: usize,
    words: usize,
    /// surface phrase -> (count, first position)
    surfaces: HashMap<String, (u32, usize)>,
}

impl Candidate {
    /// Most frequent surface phrase, earliest on ties.
    fn label(&self) -> String {
        self.surfaces
            .iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(surface, _)| surface.clone())
            .unwrap_or_default()
    }
}

fn is_keyword_token(surface: &str) -> bool {
    surface.chars().filter(|c| c.is_alphabetic()).count() >= 2
        && surface
            .chars()
            .all(|c| c.is_alphabetic() || c == '-' || c == '\'')
}

/// Collects unigram and adjacent-bigram candidates keyed by lemma phrase.
/// With `skip_skill_mentions`, words that belong to a technical skill mention
/// are left out.
fn collect_candidates(
    doc: &NormalizedDocument,
    lexicon: &Lexicon,
    skip_skill_mentions: bool,
) -> HashMap<String, Candidate> {
    let mut in_skill = vec![false; doc.words.len()];
    if skip_skill_mentions {
        for span in find_skill_spans(doc, &lexicon.skills) {
            in_skill[span.start..span.start + span.len].fill(true);
        }
    }

    let eligible: Vec<bool> = doc
        .terms
        .iter()
        .map(|t| !in_skill[t.word_index] && is_keyword_token(doc.surface(t)))
        .collect();

    let mut candidates: HashMap<String, Candidate> = HashMap::new();
    let mut record = |key: String, surface: String, words: usize, position: usize| {
        let candidate = candidates.entry(key).or_insert_with(|| Candidate {
            first_position: position,
            words,
            ..Default::default()
        });
        candidate.frequency += 1;
        candidate
            .surfaces
            .entry(surface)
            .or_insert((0, position))
            .0 += 1;
    };

    for (i, term) in doc.terms.iter().enumerate() {
        if !eligible[i] {
            continue;
        }
        record(term.lemma.clone(), doc.surface(term).to_string(), 1, i);

        let Some(next) = doc.terms.get(i + 1) else {
            continue;
        };
        if eligible[i + 1] && NormalizedDocument::adjacent(term, next) {
            let surface = phrase_surface(doc, term, next);
            if !lexicon.skills.is_skill_phrase(&surface) {
                record(format!("{} {}", term.lemma, next.lemma), surface, 2, i);
            }
        }
    }

    candidates
}

fn phrase_surface(doc: &NormalizedDocument, first: &Term, second: &Term) -> String {
    format!("{} {}", doc.surface(first), doc.surface(second))
}

/// Ranks the job description's keywords and keeps at most `limit` of them.
/// A short description simply yields fewer keywords.
pub fn extract_job_keywords(doc: &NormalizedDocument, lexicon: &Lexicon, limit: usize) -> TermSet {
    let mut ranked: Vec<(String, Candidate)> = collect_candidates(doc, lexicon, true)
        .into_iter()
        .filter(|(_, c)| c.words == 1 || c.frequency >= MIN_PHRASE_FREQUENCY)
        .collect();

    ranked.sort_by(|(_, a), (_, b)| {
        b.frequency
            .cmp(&a.frequency)
            .then(b.words.cmp(&a.words))
            .then(a.first_position.cmp(&b.first_position))
    });
    ranked.truncate(limit);

    TermSet::new(
        TermSource::JobDescription,
        ranked.into_iter().map(|(key, candidate)| RankedTerm {
            label: candidate.label(),
            key,
            frequency: candidate.frequency,
            first_position: candidate.first_position,
        }),
    )
}

/// Every unigram and adjacent phrase key present in the resume, skill mentions
/// included, so "machine learning" still covers a job keyword "learning".
pub fn resume_keywords(doc: &NormalizedDocument, lexicon: &Lexicon) -> TermSet {
    TermSet::from_keys(
        TermSource::Resume,
        collect_candidates(doc, lexicon, false).into_keys(),
    )
}
