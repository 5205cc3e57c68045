//! Text normalization: tokenization, stopword removal and lemmatization.
//!
//! Normalization keeps the line structure of the source text. Every word remembers
//! the line it came from and every term remembers the word it was derived from, so
//! heading detection and phrase adjacency still work after stopwords are gone.

use crate::analysis::lexicon::Lexicon;

/// A lowercase surface token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub line: usize,
}

/// A stopword-filtered, lemmatized token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub lemma: String,
    /// Index into [`NormalizedDocument::words`].
    pub word_index: usize,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    /// Original text, line-segmented.
    pub text: String,
    /// Every token, stopwords included, in document order.
    pub words: Vec<Word>,
    pub terms: Vec<Term>,
}

impl NormalizedDocument {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Surface form a term was derived from.
    pub fn surface(&self, term: &Term) -> &str {
        &self.words[term.word_index].text
    }

    /// True when `next` directly follows `prev` on the same line with nothing
    /// filtered out between them.
    pub fn adjacent(prev: &Term, next: &Term) -> bool {
        prev.line == next.line && prev.word_index + 1 == next.word_index
    }
}

pub fn normalize(text: &str, lexicon: &Lexicon) -> NormalizedDocument {
    let mut words = Vec::new();
    let mut terms = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        for token in tokenize(line) {
            let word_index = words.len();
            if !lexicon.is_stopword(&token) {
                terms.push(Term {
                    lemma: lemmatize(&token),
                    word_index,
                    line: line_no,
                });
            }
            words.push(Word {
                text: token,
                line: line_no,
            });
        }
    }

    NormalizedDocument {
        text: text.to_string(),
        words,
        terms,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

/// Characters kept only when they sit between two word characters
/// (`node.js`, `ci/cd`, `front-end`, `don't`).
fn is_joiner(c: char) -> bool {
    matches!(c, '.' | '-' | '/' | '\'' | '\u{2019}')
}

/// Splits one line into lowercase tokens. Tokens without any alphanumeric
/// character are dropped.
pub fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_word_char(c) {
            current.extend(c.to_lowercase());
            continue;
        }
        let joins = is_joiner(c)
            && !current.is_empty()
            && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
        if joins {
            current.push(if c == '\u{2019}' { '\'' } else { c });
        } else {
            flush(&mut current, &mut tokens);
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if current.chars().any(char::is_alphanumeric) {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Irregular inflections mapped to their base form.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("led", "lead"),
    ("built", "build"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("won", "win"),
    ("began", "begin"),
    ("begun", "begin"),
    ("taught", "teach"),
    ("made", "make"),
    ("brought", "bring"),
    ("sold", "sell"),
    ("held", "hold"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("thought", "think"),
    ("found", "find"),
    ("kept", "keep"),
    ("met", "meet"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
    ("understood", "understand"),
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("analyses", "analysis"),
    ("criteria", "criterion"),
];

/// Reduces a lowercase token to its lemma.
///
/// Rule based: irregular table, plural and third-person `-s`, `-ed` and `-ing`,
/// consonant undoubling, then a trailing `e` is folded away so that
/// `manage`, `managed`, `manages` and `managing` all land on `manag`.
/// The result is a matching key; display text always comes from the surface form.
pub fn lemmatize(token: &str) -> String {
    let token = token
        .strip_suffix("'s")
        .filter(|s| !s.is_empty())
        .unwrap_or(token);

    let base = IRREGULAR_FORMS
        .iter()
        .find(|(form, _)| *form == token)
        .map(|(_, base)| *base)
        .unwrap_or(token);

    if !base.chars().all(|c| c.is_ascii_alphabetic()) || base.len() <= 3 {
        return base.to_string();
    }

    let mut word = strip_plural(base);
    word = strip_verb_suffix(&word);
    if word.len() > 3 && word.ends_with('e') {
        word.pop();
    }
    word
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
}

fn strip_plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if word.ends_with("sses") {
        return word[..word.len() - 2].to_string();
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    for suffix in ["xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if stem.len() >= 3 => stem.to_string(),
        _ => word.to_string(),
    }
}

fn strip_verb_suffix(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }

    let stem = if word.ends_with("eed") {
        None
    } else {
        word.strip_suffix("ed").or_else(|| word.strip_suffix("ing"))
    };

    match stem {
        Some(stem) if stem.len() >= 3 && has_vowel(stem) => undouble(stem),
        _ => word.to_string(),
    }
}

/// `plann` → `plan`, but `install` and `process` keep their double letters.
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !matches!(bytes[n - 1], b'l' | b's' | b'z') {
        let c = bytes[n - 1];
        if !matches!(c, b'a' | b'e' | b'i' | b'o' | b'u') {
            return stem[..n - 1].to_string();
        }
    }
    stem.to_string()
}
