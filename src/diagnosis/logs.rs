//! Log tail classification against known failure signatures

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_TAIL_LINES: i64 = 50;

/// Named failure signatures tested against every log line.
///
/// Slice order is scan order, and the catch-all pattern has to stay
/// last or it would shadow the specific ones in the match list.
const PATTERNS: &[(&str, &str)] = &[
    ("Java exception", r"(?i)(Exception|Error):"),
    ("Go panic", r"panic:"),
    ("Python traceback", r"Traceback \(most recent call last\):"),
    ("Node.js error", r"(?i)ReferenceError|TypeError|SyntaxError"),
    ("Out of memory", r"(?i)Kill process|Out of memory"),
    ("Permission denied", r"(?i)permission denied"),
    ("Generic error", r"(?i)error|fail|fatal|exception"),
];

static COMPILED: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();

/// The compiled signature library
pub fn signatures() -> &'static [(&'static str, Regex)] {
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (*name, re)))
            .collect()
    })
}

/// Raw tail lines plus the signature names they matched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEvidence {
    /// Tail lines exactly as emitted by the container
    pub lines: Vec<String>,
    /// Matched signature names, first occurrence order, no duplicates
    pub signatures: Vec<String>,
}

/// Match every line against the signature library.
///
/// Each signature name appears at most once no matter how many lines
/// matched it.
pub fn classify_lines(lines: &[String]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();
    for line in lines {
        for (name, pattern) in signatures() {
            if pattern.is_match(line) && !matched.iter().any(|m| m == name) {
                matched.push((*name).to_string());
            }
        }
    }
    matched
}

/// Split a raw log tail into lines and classify them
pub fn analyze_tail(raw: &str) -> LogEvidence {
    let lines: Vec<String> = raw.lines().map(|l| l.to_string()).collect();
    let signatures = classify_lines(&lines);
    LogEvidence { lines, signatures }
}
