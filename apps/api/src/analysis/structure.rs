//! Resume structure: section headings and strong action verbs.

use std::sync::OnceLock;

use regex::Regex;
use strsim::jaro_winkler;

use crate::analysis::lexicon::{heading_key, Lexicon};
use crate::analysis::models::StructureReport;
use crate::analysis::normalizer::{NormalizedDocument, Term};

const MAX_HEADING_WORDS: usize = 5;
const MAX_HEADING_CHARS: usize = 40;
/// Headings of up to this many words count even without heading-style casing.
const STANDALONE_HEADING_WORDS: usize = 3;
/// Minimum Jaro-Winkler similarity for a misspelled heading to count.
const FUZZY_HEADING_THRESHOLD: f64 = 0.92;
/// Shorter headings must match exactly.
const FUZZY_MIN_CHARS: usize = 5;

fn contact_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}|\+?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")
            .expect("static contact pattern")
    })
}

pub fn analyze_structure(doc: &NormalizedDocument, lexicon: &Lexicon) -> StructureReport {
    let mut sections_found: Vec<String> = Vec::new();
    let mut note = |section: &str| {
        if !sections_found.iter().any(|s| s == section) {
            sections_found.push(section.to_string());
        }
    };

    for line in doc.lines() {
        let heading = heading_text(line);
        if is_heading_like(heading) {
            if let Some(section) = match_section(heading, lexicon) {
                note(section);
            }
        }
        if contact_pattern().is_match(line) {
            note("contact");
        }
    }

    let strong_verbs_count = doc
        .terms
        .iter()
        .filter(|t| lexicon.is_strong_verb(&t.lemma) && reads_as_verb(doc, t))
        .count() as u32;

    StructureReport {
        sections_found,
        strong_verbs_count,
    }
}

/// Bullet-style lines open with their verb ("Led the team"). Elsewhere only a past
/// form counts, regular ("optimized") or irregular ("built"), since base forms
/// mid-line are usually nouns: "Tech Lead", "system design".
fn reads_as_verb(doc: &NormalizedDocument, term: &Term) -> bool {
    let opens_line = term.word_index == 0
        || doc
            .words
            .get(term.word_index - 1)
            .map_or(true, |prev| prev.line != term.line);
    if opens_line {
        return true;
    }
    doc.words
        .get(term.word_index)
        .map_or(false, |w| {
            w.text.ends_with("ed") || !w.text.starts_with(term.lemma.as_str())
        })
}

/// Text that could be a heading: everything up to and including the first colon
/// (`Skills: Python, Go` reads as `Skills:`), otherwise the whole line.
fn heading_text(line: &str) -> &str {
    match line.find(':') {
        Some(colon) if !line[..colon].trim().is_empty() => &line[..=colon],
        _ => line,
    }
}

fn is_heading_like(line: &str) -> bool {
    let line = line.trim();
    let text = line.trim_end_matches(':').trim();
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() || words.len() > MAX_HEADING_WORDS || text.chars().count() > MAX_HEADING_CHARS
    {
        return false;
    }

    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }

    let ends_with_colon = line.ends_with(':');
    let upper_case = letters.iter().all(|c| c.is_uppercase());
    let title_case = words.iter().all(|w| {
        w.chars()
            .find(|c| c.is_alphabetic())
            .map_or(true, |c| c.is_uppercase() || matches!(*w, "and" | "of" | "&"))
    });

    ends_with_colon || upper_case || title_case || words.len() <= STANDALONE_HEADING_WORDS
}

/// Canonical section introduced by `line`, by exact synonym or close spelling.
fn match_section<'a>(line: &str, lexicon: &'a Lexicon) -> Option<&'a str> {
    let key = heading_key(line);
    if key.is_empty() {
        return None;
    }

    for (section, phrases) in lexicon.sections() {
        if phrases.iter().any(|p| *p == key) {
            return Some(section.as_str());
        }
    }

    if key.chars().count() < FUZZY_MIN_CHARS {
        return None;
    }

    let mut best: Option<(&str, f64)> = None;
    for (section, phrases) in lexicon.sections() {
        for phrase in phrases {
            let score = jaro_winkler(&key, phrase);
            if score >= FUZZY_HEADING_THRESHOLD && best.map_or(true, |(_, b)| score > b) {
                best = Some((section.as_str(), score));
            }
        }
    }
    best.map(|(section, _)| section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalizer::normalize;

    fn report(text: &str) -> StructureReport {
        let lexicon = Lexicon::builtin();
        analyze_structure(&normalize(text, &lexicon), &lexicon)
    }

    const RESUME: &str = "Jane Doe\n\
        jane.doe@example.com\n\
        PROFESSIONAL SUMMARY\n\
        Backend engineer focused on reliability.\n\
        Work Experience:\n\
        Led the payments platform team and built a settlement pipeline.\n\
        Architected event-driven services; optimized database queries.\n\
        Education\n\
        BSc Computer Science\n\
        Technical Skills\n\
        Python, Go, Kubernetes";

    #[test]
    fn test_detects_sections_in_order_of_appearance() {
        let report = report(RESUME);
        assert_eq!(
            report.sections_found,
            vec!["contact", "summary", "experience", "education", "skills"]
        );
    }

    #[test]
    fn test_counts_every_strong_verb_occurrence() {
        let report = report(RESUME);
        // led, built, architected, optimized
        assert_eq!(report.strong_verbs_count, 4);

        let repeated = self::report("Built X.\nBuilt Y.\nBuilt Z.");
        assert_eq!(repeated.strong_verbs_count, 3);
    }

    #[test]
    fn test_verb_nouns_mid_line_are_not_counted() {
        let report = report(
            "Tech Lead on the platform team\n\
             Ran design reviews weekly\n\
             Drives roadmap planning",
        );
        assert_eq!(report.strong_verbs_count, 1);

        let inflected = self::report("Platform team: designed and shipped the ledger, leads hiring");
        // designed, shipped; "leads" is ambiguous mid-line
        assert_eq!(inflected.strong_verbs_count, 2);
    }

    #[test]
    fn test_no_headings_yields_empty_sections() {
        let report = report(
            "I have worked on many things over a long career in a number of places.\n\
             Some of them were interesting and some of them were less interesting overall.",
        );
        assert!(report.sections_found.is_empty());
        assert_eq!(report.strong_verbs_count, 0);
    }

    #[test]
    fn test_misspelled_heading_is_matched() {
        let report = report("EXPERIANCE\nLed a team");
        assert_eq!(report.sections_found, vec!["experience"]);
    }

    #[test]
    fn test_ampersand_heading() {
        let report = report("Honors & Awards\nDean's list");
        assert_eq!(report.sections_found, vec!["awards"]);
    }

    #[test]
    fn test_long_sentence_mentioning_section_word_is_not_a_heading() {
        let report = report("my education was mostly self directed through online courses");
        assert!(report.sections_found.is_empty());
    }

    #[test]
    fn test_phone_number_counts_as_contact() {
        let report = report("Jane Doe\n(555) 123-4567");
        assert_eq!(report.sections_found, vec!["contact"]);
    }

    #[test]
    fn test_inline_headings_are_detected() {
        let report = report(
            "Jane Doe\n\
             Experience: Backend engineer at Acme\n\
             Education: BSc Computer Science\n\
             Skills: Python, Go, Kubernetes",
        );
        assert_eq!(report.sections_found, vec!["experience", "education", "skills"]);
    }

    #[test]
    fn test_colon_inside_prose_is_not_a_heading() {
        let report = report("Reduced latency by half across the fleet: p99 went from 80ms to 40ms");
        assert!(report.sections_found.is_empty());
    }

    #[test]
    fn test_heading_text_stops_at_first_colon() {
        assert_eq!(heading_text("Skills: Python, Go"), "Skills:");
        assert_eq!(heading_text("Work History:"), "Work History:");
        assert_eq!(heading_text("Education"), "Education");
        assert_eq!(heading_text(": stray"), ": stray");
    }

    #[test]
    fn test_heading_like_rules() {
        assert!(is_heading_like("EXPERIENCE"));
        assert!(is_heading_like("Work History:"));
        assert!(is_heading_like("Core Competencies"));
        assert!(is_heading_like("skills"));
        assert!(!is_heading_like("—"));
        assert!(!is_heading_like("worked with the team on several items"));
    }
}
