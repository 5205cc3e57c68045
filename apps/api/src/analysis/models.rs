use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Where a term set was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermSource {
    JobDescription,
    Resume,
}

/// A canonical term with its ranking signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTerm {
    /// Matching key (lemma phrase or canonical skill name).
    pub key: String,
    /// Text shown to the user.
    pub label: String,
    pub frequency: u32,
    /// Position of the first occurrence, used as the final tie-breaker.
    pub first_position: usize,
}

/// Deduplicated canonical terms. Job-side sets keep their rank order.
#[derive(Debug, Clone)]
pub struct TermSet {
    pub source: TermSource,
    terms: Vec<RankedTerm>,
    keys: HashSet<String>,
}

impl TermSet {
    /// Builds a set from terms already in rank order; later duplicates are dropped.
    pub fn new(source: TermSource, ranked: impl IntoIterator<Item = RankedTerm>) -> Self {
        let mut terms = Vec::new();
        let mut keys = HashSet::new();
        for term in ranked {
            if keys.insert(term.key.clone()) {
                terms.push(term);
            }
        }
        TermSet {
            source,
            terms,
            keys,
        }
    }

    /// Unranked set of keys.
    pub fn from_keys(source: TermSource, keys: impl IntoIterator<Item = String>) -> Self {
        let keys: HashSet<String> = keys.into_iter().collect();
        let mut sorted: Vec<&String> = keys.iter().collect();
        sorted.sort();
        let terms = sorted
            .into_iter()
            .enumerate()
            .map(|(i, key)| RankedTerm {
                key: key.clone(),
                label: key.clone(),
                frequency: 1,
                first_position: i,
            })
            .collect();
        TermSet {
            source,
            terms,
            keys,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedTerm> {
        self.terms.iter()
    }

    /// Splits this set into terms present in `other` and terms absent from it,
    /// both in this set's rank order.
    pub fn partition<'a>(&'a self, other: &TermSet) -> Overlap<'a> {
        debug_assert_ne!(self.source, other.source, "overlap compares across sources");
        let (matched, missing): (Vec<&RankedTerm>, Vec<&RankedTerm>) =
            self.iter().partition(|t| other.contains(&t.key));
        Overlap { matched, missing }
    }
}

/// Result of comparing a job term set against a resume term set.
#[derive(Debug, Clone)]
pub struct Overlap<'a> {
    pub matched: Vec<&'a RankedTerm>,
    pub missing: Vec<&'a RankedTerm>,
}

impl Overlap<'_> {
    pub fn matched_labels(&self) -> Vec<String> {
        self.matched.iter().map(|t| t.label.clone()).collect()
    }

    pub fn missing_labels(&self) -> Vec<String> {
        self.missing.iter().map(|t| t.label.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureReport {
    pub sections_found: Vec<String>,
    pub strong_verbs_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub filename: String,
    pub resume_length: usize,
    pub job_description_length: usize,
    pub total_job_keywords: usize,
    pub total_job_tech_skills: usize,
}

/// The match report returned to clients. Field names are the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub keyword_score: u32,
    pub tech_skill_score: u32,
    pub keyword_matches: Vec<String>,
    pub keyword_misses: Vec<String>,
    pub tech_skill_matches: Vec<String>,
    pub tech_skill_misses: Vec<String>,
    pub structure: StructureReport,
    pub recommendations: Vec<String>,
    pub metadata: AnalysisMetadata,
}
