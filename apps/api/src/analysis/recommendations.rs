//! Recommendation generation from the gaps found by the analyzers.
//!
//! Ordering: missing technical skills (most mentioned first), then missing
//! keywords, then structural gaps. Every gap is named at most once.

use crate::analysis::models::{RankedTerm, StructureReport};
use crate::analysis::scoring::{KEY_SECTIONS, STRONG_VERB_THRESHOLD};

/// Missing skills that get a recommendation of their own.
const MAX_INDIVIDUAL_SKILLS: usize = 3;
const MAX_LISTED_KEYWORDS: usize = 5;

pub struct Gaps<'a> {
    /// Missing technical skills, in job description rank order.
    pub missing_skills: &'a [&'a RankedTerm],
    /// Missing keywords, in job description rank order.
    pub missing_keywords: &'a [&'a RankedTerm],
    pub structure: &'a StructureReport,
}

pub fn generate_recommendations(gaps: &Gaps<'_>) -> Vec<String> {
    let mut recommendations = Vec::new();

    let (top_skills, other_skills) = gaps
        .missing_skills
        .split_at(gaps.missing_skills.len().min(MAX_INDIVIDUAL_SKILLS));
    for skill in top_skills {
        recommendations.push(format!(
            "Highlight experience with {}: the job description mentions it {}.",
            skill.label,
            times(skill.frequency)
        ));
    }
    if !other_skills.is_empty() {
        recommendations.push(format!(
            "Also consider showing hands-on experience with: {}.",
            join_labels(other_skills.iter().copied())
        ));
    }

    if !gaps.missing_keywords.is_empty() {
        recommendations.push(format!(
            "Work these job description keywords into your resume where they reflect your experience: {}.",
            join_labels(gaps.missing_keywords.iter().take(MAX_LISTED_KEYWORDS).copied())
        ));
    }

    recommendations.extend(structure_recommendations(gaps.structure));
    recommendations
}

fn structure_recommendations(structure: &StructureReport) -> Vec<String> {
    let mut recommendations = Vec::new();

    if structure.sections_found.is_empty() {
        recommendations.push(
            "No section headings were detected. Organize your resume under clear headings such as Experience, Education and Skills."
                .to_string(),
        );
    } else {
        let missing: Vec<String> = KEY_SECTIONS
            .iter()
            .filter(|key| !structure.sections_found.iter().any(|s| s == *key))
            .map(|key| capitalize(key))
            .collect();
        if !missing.is_empty() {
            recommendations.push(format!(
                "Add clearly labeled sections for: {}.",
                missing.join(", ")
            ));
        }
    }

    if structure.strong_verbs_count < STRONG_VERB_THRESHOLD {
        recommendations.push(format!(
            "Use more strong action verbs such as led, built, or optimized to describe your impact ({} found, aim for at least {}).",
            structure.strong_verbs_count, STRONG_VERB_THRESHOLD
        ));
    }

    recommendations
}

fn times(n: u32) -> String {
    match n {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        n => format!("{n} times"),
    }
}

fn join_labels<'a>(terms: impl Iterator<Item = &'a RankedTerm>) -> String {
    terms.map(|t| t.label.as_str()).collect::<Vec<_>>().join(", ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
