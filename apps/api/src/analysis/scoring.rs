//! Scoring: per-dimension coverage and the overall match score.
//!
//! Overall policy: the mean coverage of the dimensions the job description actually
//! has terms for is worth up to 95 points, and resume structure adds up to 5
//! (one per key section, two for enough strong verbs). Everything is computed
//! with integer arithmetic and rounded half-up once, so identical inputs always
//! produce identical scores.

use crate::analysis::models::StructureReport;

/// Sections whose presence earns structure points.
pub const KEY_SECTIONS: &[&str] = &["experience", "education", "skills"];
/// Strong verb count a resume should reach.
pub const STRONG_VERB_THRESHOLD: u32 = 5;

const COVERAGE_WEIGHT: u64 = 95;
const VERB_BONUS: u64 = 2;

/// Matched versus total job terms for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub matched: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub overall: u32,
    pub keyword: u32,
    pub tech_skill: u32,
}

/// `num / den` rounded half-up. `den` must be non-zero.
fn round_half_up(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

/// `round(100 × matched / max(1, total))`.
pub fn coverage_score(coverage: Coverage) -> u32 {
    let total = coverage.total.max(1) as u64;
    let matched = coverage.matched.min(coverage.total) as u64;
    round_half_up(100 * matched, total).min(100) as u32
}

pub fn structure_bonus(structure: &StructureReport) -> u64 {
    let sections = KEY_SECTIONS
        .iter()
        .filter(|key| structure.sections_found.iter().any(|s| s == *key))
        .count() as u64;
    let verbs = if structure.strong_verbs_count >= STRONG_VERB_THRESHOLD {
        VERB_BONUS
    } else {
        0
    };
    sections + verbs
}

pub fn overall_score(keywords: Coverage, tech_skills: Coverage, structure: &StructureReport) -> u32 {
    let dims: Vec<(u64, u64)> = [keywords, tech_skills]
        .into_iter()
        .filter(|c| c.total > 0)
        .map(|c| (c.matched.min(c.total) as u64, c.total as u64))
        .collect();

    // coverage part as an exact fraction num / den, already scaled to COVERAGE_WEIGHT
    let (num, den) = match dims.as_slice() {
        [] => (0, 1),
        [(m, n)] => (COVERAGE_WEIGHT * m, *n),
        [(m1, n1), (m2, n2)] => (COVERAGE_WEIGHT * (m1 * n2 + m2 * n1), 2 * n1 * n2),
        _ => unreachable!("at most two scoring dimensions"),
    };

    let bonus = structure_bonus(structure);
    round_half_up(num + bonus * den, den).clamp(0, 100) as u32
}

pub fn score(keywords: Coverage, tech_skills: Coverage, structure: &StructureReport) -> Scores {
    Scores {
        overall: overall_score(keywords, tech_skills, structure),
        keyword: coverage_score(keywords),
        tech_skill: coverage_score(tech_skills),
    }
}
