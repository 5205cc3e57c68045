//! Word lists and the technical-skill taxonomy.
//!
//! Built once at startup and shared read-only (`Arc<Lexicon>`) by every request.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::normalizer::{lemmatize, tokenize};

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "don't",
    "down", "during", "each", "either", "etc", "every", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "i'm", "if", "in", "into", "is", "it", "it's",
    "its", "itself", "just", "let", "may", "me", "might", "more", "most", "much", "must",
    "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "per", "same", "shall", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "within", "without", "would", "yet", "you", "you'll", "you're", "your",
    "yours", "yourself", "yourselves",
];

/// Job-posting filler that carries no signal about the role itself.
const BOILERPLATE: &[&str] = &[
    "ability", "able", "applicant", "applicants", "apply", "benefits", "candidate",
    "candidates", "company", "competitive", "description", "equal", "employer",
    "excellent", "ideal", "including", "join", "job", "looking", "minimum", "new",
    "opportunity", "plus", "position", "preferred", "qualification", "qualifications",
    "related", "required", "requirement", "requirements", "responsibilities",
    "responsibility", "role", "salary", "seeking", "strong", "successful", "using",
    "various", "year", "years",
];

/// Strong action verbs, in base form.
const STRONG_VERBS: &[&str] = &[
    "accelerate", "achieve", "architect", "automate", "build", "coordinate", "create",
    "deliver", "design", "develop", "drive", "establish", "implement",
    "improve", "increase", "launch", "lead", "manage", "mentor", "migrate", "modernize",
    "negotiate", "optimize", "orchestrate", "own", "pioneer", "reduce", "scale", "ship",
    "spearhead", "streamline", "supervise", "transform",
];

/// Canonical resume sections and the heading texts that introduce them.
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "summary",
        &["summary", "professional summary", "profile", "professional profile", "objective",
          "career objective", "about me", "about"],
    ),
    (
        "experience",
        &["experience", "work experience", "professional experience", "employment",
          "employment history", "work history", "career history", "relevant experience"],
    ),
    (
        "education",
        &["education", "academic background", "academic history", "education and training"],
    ),
    (
        "skills",
        &["skills", "technical skills", "core competencies", "competencies", "technologies",
          "tools and technologies", "tech stack", "core skills", "key skills"],
    ),
    ("projects", &["projects", "personal projects", "selected projects", "portfolio"]),
    (
        "certifications",
        &["certifications", "certificates", "licenses and certifications", "licenses"],
    ),
    ("awards", &["awards", "honors", "honors and awards", "achievements"]),
    ("publications", &["publications", "papers", "research"]),
    ("volunteer", &["volunteer", "volunteering", "volunteer experience", "community"]),
    ("contact", &["contact", "contact information", "contact details"]),
];

/// Canonical technical skills and their surface forms. The canonical name is
/// always a surface form of itself.
const SKILL_TAXONOMY: &[(&str, &[&str])] = &[
    ("python", &["py", "python3"]),
    ("java", &[]),
    ("javascript", &["js", "ecmascript", "es6"]),
    ("typescript", &["ts"]),
    ("go", &["golang"]),
    ("rust", &["rustlang"]),
    ("c++", &["cpp"]),
    ("c#", &["csharp", "c sharp"]),
    ("ruby", &[]),
    ("ruby on rails", &["rails", "ror"]),
    ("php", &[]),
    ("kotlin", &[]),
    ("swift", &[]),
    ("scala", &[]),
    ("html", &["html5"]),
    ("css", &["css3"]),
    ("sql", &[]),
    ("nosql", &["no-sql"]),
    ("mysql", &[]),
    ("postgresql", &["postgres", "psql"]),
    ("mongodb", &["mongo"]),
    ("redis", &[]),
    ("elasticsearch", &["elastic search"]),
    ("kafka", &["apache kafka"]),
    ("spark", &["apache spark", "pyspark"]),
    ("hadoop", &[]),
    ("graphql", &[]),
    ("rest api", &["restful", "rest apis", "restful api"]),
    ("grpc", &[]),
    ("react", &["react.js", "reactjs"]),
    ("angular", &["angularjs", "angular.js"]),
    ("vue", &["vue.js", "vuejs"]),
    ("node.js", &["nodejs"]),
    ("express.js", &["expressjs"]),
    ("django", &[]),
    ("flask", &[]),
    ("fastapi", &[]),
    ("spring", &["spring boot", "springboot"]),
    ("asp.net", &["dotnet"]),
    ("aws", &["amazon web services"]),
    ("azure", &["microsoft azure"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("docker", &[]),
    ("kubernetes", &["k8s"]),
    ("terraform", &[]),
    ("ansible", &[]),
    ("jenkins", &[]),
    ("ci/cd", &["cicd", "continuous integration", "continuous delivery", "continuous deployment"]),
    ("git", &[]),
    ("github", &[]),
    ("gitlab", &[]),
    ("linux", &[]),
    ("unix", &[]),
    ("windows", &[]),
    ("macos", &["mac os", "osx"]),
    ("machine learning", &["ml"]),
    ("deep learning", &[]),
    ("artificial intelligence", &["ai"]),
    ("data science", &[]),
    ("nlp", &["natural language processing"]),
    ("computer vision", &[]),
    ("tensorflow", &[]),
    ("pytorch", &["torch"]),
    ("scikit-learn", &["sklearn", "scikit learn"]),
    ("pandas", &[]),
    ("numpy", &[]),
    ("tableau", &[]),
    ("power bi", &["powerbi"]),
    ("microservices", &["microservice", "micro-services"]),
];

/// One canonical skill with its tokenized surface forms.
#[derive(Debug, Clone)]
pub struct SkillEntry {
    pub canonical: String,
    pub surfaces: Vec<Vec<String>>,
}

/// The technical-skill taxonomy, indexed for token-sequence matching.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    entries: Vec<SkillEntry>,
    /// First surface token → (surface tokens, entry index), longest surfaces first.
    by_first_token: HashMap<String, Vec<(Vec<String>, usize)>>,
    /// Every surface form joined with single spaces.
    surface_phrases: HashSet<String>,
}

impl SkillTaxonomy {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut merged: Vec<SkillEntry> = Vec::new();
        for (canonical, synonyms) in entries {
            let canonical = canonical.trim().to_lowercase();
            if canonical.is_empty() {
                continue;
            }
            let idx = match merged.iter().position(|e| e.canonical == canonical) {
                Some(idx) => idx,
                None => {
                    merged.push(SkillEntry {
                        canonical: canonical.clone(),
                        surfaces: vec![],
                    });
                    merged.len() - 1
                }
            };
            let forms = std::iter::once(canonical.clone())
                .chain(synonyms.into_iter().map(|s| s.as_ref().to_string()));
            for form in forms {
                let tokens = tokenize(&form);
                if !tokens.is_empty() && !merged[idx].surfaces.contains(&tokens) {
                    merged[idx].surfaces.push(tokens);
                }
            }
        }

        let mut by_first_token: HashMap<String, Vec<(Vec<String>, usize)>> = HashMap::new();
        let mut surface_phrases = HashSet::new();
        for (idx, entry) in merged.iter().enumerate() {
            for surface in &entry.surfaces {
                surface_phrases.insert(surface.join(" "));
                by_first_token
                    .entry(surface[0].clone())
                    .or_default()
                    .push((surface.clone(), idx));
            }
        }
        for candidates in by_first_token.values_mut() {
            candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.1.cmp(&b.1)));
        }

        SkillTaxonomy {
            entries: merged,
            by_first_token,
            surface_phrases,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn canonical(&self, idx: usize) -> &str {
        &self.entries[idx].canonical
    }

    /// Longest surface form starting at `words[start]`, as (entry index, token count).
    pub fn match_at(&self, words: &[&str], start: usize) -> Option<(usize, usize)> {
        let candidates = self.by_first_token.get(words[start])?;
        candidates.iter().find_map(|(surface, idx)| {
            let end = start + surface.len();
            let fits = end <= words.len()
                && surface.iter().zip(&words[start..end]).all(|(s, w)| s == w);
            fits.then_some((*idx, surface.len()))
        })
    }

    /// True when `phrase` (space-joined lowercase tokens) is a skill surface form.
    pub fn is_skill_phrase(&self, phrase: &str) -> bool {
        self.surface_phrases.contains(phrase)
    }
}

/// Process-wide, read-only word lists used by the analyzers.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    strong_verbs: HashSet<String>,
    /// Canonical section name → normalized heading phrases.
    sections: Vec<(String, Vec<String>)>,
    pub skills: SkillTaxonomy,
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self::with_taxonomy(SkillTaxonomy::from_entries(builtin_skill_entries()))
    }

    fn with_taxonomy(skills: SkillTaxonomy) -> Self {
        let stopwords = STOPWORDS
            .iter()
            .chain(BOILERPLATE)
            .map(|w| w.to_string())
            .collect();
        let strong_verbs = STRONG_VERBS.iter().map(|v| lemmatize(v)).collect();
        let sections = SECTIONS
            .iter()
            .map(|(name, headings)| {
                let phrases = headings.iter().map(|h| heading_key(h)).collect();
                (name.to_string(), phrases)
            })
            .collect();

        Lexicon {
            stopwords,
            strong_verbs,
            sections,
            skills,
        }
    }

    /// Built-in lists, with extra taxonomy entries merged in from `taxonomy_path`
    /// when one is configured.
    pub fn load(taxonomy_path: Option<&Path>) -> Result<Self> {
        let Some(path) = taxonomy_path else {
            let lexicon = Self::builtin();
            info!("Skill taxonomy loaded ({} built-in skills)", lexicon.skills.len());
            return Ok(lexicon);
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill taxonomy {}", path.display()))?;
        let extra: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Skill taxonomy {} is not valid JSON", path.display()))?;

        let entries = builtin_skill_entries().chain(extra);
        let lexicon = Self::with_taxonomy(SkillTaxonomy::from_entries(entries));
        info!(
            "Skill taxonomy loaded ({} skills, extended from {})",
            lexicon.skills.len(),
            path.display()
        );
        Ok(lexicon)
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn is_strong_verb(&self, lemma: &str) -> bool {
        self.strong_verbs.contains(lemma)
    }

    pub fn sections(&self) -> &[(String, Vec<String>)] {
        &self.sections
    }
}

/// Lowercase, punctuation-free form of a heading used for section lookup.
/// Connectives are dropped so `Honors & Awards` and `honors and awards` agree.
pub fn heading_key(text: &str) -> String {
    tokenize(text)
        .into_iter()
        .filter(|t| t != "and")
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin_skill_entries() -> impl Iterator<Item = (String, Vec<String>)> {
    SKILL_TAXONOMY.iter().map(|(canonical, synonyms)| {
        (
            canonical.to_string(),
            synonyms.iter().map(|s| s.to_string()).collect(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_taxonomy_indexes_synonyms() {
        let lexicon = Lexicon::builtin();
        let words = ["golang", "and", "k8s"];
        let (idx, len) = lexicon.skills.match_at(&words, 0).unwrap();
        assert_eq!(lexicon.skills.canonical(idx), "go");
        assert_eq!(len, 1);
        let (idx, _) = lexicon.skills.match_at(&words, 2).unwrap();
        assert_eq!(lexicon.skills.canonical(idx), "kubernetes");
    }

    #[test]
    fn test_longest_surface_wins() {
        let lexicon = Lexicon::builtin();
        let words = ["ruby", "on", "rails"];
        let (idx, len) = lexicon.skills.match_at(&words, 0).unwrap();
        assert_eq!(lexicon.skills.canonical(idx), "ruby on rails");
        assert_eq!(len, 3);
    }

    #[test]
    fn test_skill_phrase_lookup() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.skills.is_skill_phrase("machine learning"));
        assert!(lexicon.skills.is_skill_phrase("js"));
        assert!(!lexicon.skills.is_skill_phrase("leadership"));
    }

    #[test]
    fn test_strong_verbs_match_inflected_lemmas() {
        let lexicon = Lexicon::builtin();
        for form in ["led", "built", "architected", "managing", "optimized"] {
            assert!(lexicon.is_strong_verb(&lemmatize(form)), "{form}");
        }
        assert!(!lexicon.is_strong_verb(&lemmatize("helped")));
    }

    #[test]
    fn test_duplicate_canonical_entries_merge() {
        let taxonomy = SkillTaxonomy::from_entries(vec![
            ("Rust".to_string(), vec!["rustlang"]),
            ("rust".to_string(), vec!["rust-lang"]),
        ]);
        assert_eq!(taxonomy.len(), 1);
        assert!(taxonomy.is_skill_phrase("rust-lang"));
        assert!(taxonomy.is_skill_phrase("rustlang"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Lexicon::load(Some(Path::new("/nonexistent/taxonomy.json"))).unwrap_err();
        assert!(err.to_string().contains("taxonomy"));
    }

    #[test]
    fn test_load_merges_extra_skills() {
        let path = std::env::temp_dir().join(format!(
            "reviewer-taxonomy-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, r#"{"zig": ["ziglang"], "python": ["cpython"]}"#).unwrap();

        let lexicon = Lexicon::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(lexicon.skills.len(), Lexicon::builtin().skills.len() + 1);
        assert!(lexicon.skills.is_skill_phrase("ziglang"));
        assert!(lexicon.skills.is_skill_phrase("cpython"));
    }
}
