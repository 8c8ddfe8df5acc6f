//! Content Classifier: separates the printable article body from a trailing
//! vocabulary / glossary listing in model-generated Markdown.
//!
//! # Rules
//! Entry into the vocabulary section is decided by an ordered table of named
//! predicates (`VOCABULARY_RULES`). The first match wins; every rule has the
//! same effect, but the name is kept for tracing and tests.
//!
//! Known limitation: body lines shaped like a rule (e.g. `1. Apple (n.)` or
//! `Note: ...`) are classified as vocabulary too.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

/// A named predicate that marks the start of a vocabulary section.
pub struct VocabularyRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
}

static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^##?\s+(Vocabulary|New Words|Word List|Glossary|生词表|单词表|词汇表)")
        .expect("vocabulary heading pattern is valid")
});

static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\*\*)?(生词|词汇|New Words|Vocabulary)(\*\*)?[：:]")
        .expect("vocabulary label pattern is valid")
});

static NUMBERED_DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\.\s+[A-Za-z0-9_]+\s+\([a-z]+\.\)")
        .expect("numbered definition pattern is valid")
});

static CAPITALIZED_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+:").expect("capitalized label pattern is valid"));

static DEEP_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###?\s+Vocabulary").expect("deep heading pattern is valid"));

static WORD_TABLE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|\s*Word\s*\|.*\|$").expect("table header pattern is valid"));

fn is_vocabulary_heading(line: &str) -> bool {
    HEADING_RE.is_match(line)
}

/// `生词：`, `**词汇**:`, `**New Words:**`, `Vocabulary:` and friends.
fn is_vocabulary_label(line: &str) -> bool {
    LABEL_RE.is_match(line)
}

/// `1. arduous (adj.)`
fn is_numbered_definition(line: &str) -> bool {
    NUMBERED_DEFINITION_RE.is_match(line)
}

/// `Word:`
fn is_capitalized_label(line: &str) -> bool {
    CAPITALIZED_LABEL_RE.is_match(line)
}

fn is_deep_vocabulary_heading(line: &str) -> bool {
    DEEP_HEADING_RE.is_match(line)
}

fn is_word_table_header(line: &str) -> bool {
    line.trim() == "| Word | Chinese Meaning |" || WORD_TABLE_HEADER_RE.is_match(line)
}

/// `|------|------|`
fn is_table_separator(line: &str) -> bool {
    line.contains('|') && line.contains("--")
}

/// Entry rules in priority order.
pub static VOCABULARY_RULES: &[VocabularyRule] = &[
    VocabularyRule {
        name: "vocabulary-heading",
        matches: is_vocabulary_heading,
    },
    VocabularyRule {
        name: "vocabulary-label",
        matches: is_vocabulary_label,
    },
    VocabularyRule {
        name: "numbered-definition",
        matches: is_numbered_definition,
    },
    VocabularyRule {
        name: "capitalized-label",
        matches: is_capitalized_label,
    },
    VocabularyRule {
        name: "deep-vocabulary-heading",
        matches: is_deep_vocabulary_heading,
    },
    VocabularyRule {
        name: "word-table-header",
        matches: is_word_table_header,
    },
    VocabularyRule {
        name: "table-separator",
        matches: is_table_separator,
    },
];

/// Returns the first rule that marks `line` as the start of a vocabulary section.
pub fn matching_rule(line: &str) -> Option<&'static VocabularyRule> {
    VOCABULARY_RULES.iter().find(|rule| (rule.matches)(line))
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Returns the body lines of `lines`, in order, without the vocabulary section.
pub fn classify_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    // A blank line can only close the section once no table row follows it.
    let last_pipe_index = lines.iter().rposition(|l| l.contains('|'));

    let mut body = Vec::with_capacity(lines.len());
    let mut in_vocabulary = false;
    let mut table_header_seen = false;

    for (i, &line) in lines.iter().enumerate() {
        if let Some(rule) = matching_rule(line) {
            debug!(line = i, rule = rule.name, "vocabulary section starts");
            in_vocabulary = true;
            if line.contains('|') {
                table_header_seen = true;
            }
            continue;
        }

        if !in_vocabulary && table_header_seen && line.trim().starts_with('|') {
            in_vocabulary = true;
            continue;
        }

        if !in_vocabulary {
            body.push(line);
        } else if line.trim().is_empty() && !table_header_seen {
            let table_follows = last_pipe_index.is_some_and(|last| last > i);
            if !table_follows {
                in_vocabulary = false;
            }
        }
    }
    body
}

/// Strips the vocabulary / glossary listing from generated Markdown.
pub fn extract_article_body(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    classify_lines(&lines).join("\n")
}
