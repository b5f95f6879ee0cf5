//! Best-effort parsing of the extraction model's semi-structured reply.
//!
//! The model is instructed to answer with four labeled bracketed lists.
//! Each label is extracted independently: a missing or malformed label
//! yields an empty list for that category only, never a parse failure for
//! the whole reply.

use super::EntitySet;
use regex::Regex;

pub struct ReplyParser {
    names: Regex,
    companies: Regex,
    courses: Regex,
    terms: Regex,
}

impl ReplyParser {
    pub fn new() -> Self {
        Self {
            names: label_pattern("Names"),
            companies: label_pattern("Companies"),
            courses: label_pattern("Courses"),
            terms: label_pattern("Technical terms"),
        }
    }

    pub fn parse(&self, reply: &str) -> EntitySet {
        EntitySet {
            names: capture_list(&self.names, reply),
            companies: capture_list(&self.companies, reply),
            courses: capture_list(&self.courses, reply),
            terms: capture_list(&self.terms, reply),
        }
    }
}

impl Default for ReplyParser {
    fn default() -> Self {
        Self::new()
    }
}

fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\s*:\s*\[([^\]]*)\]", regex::escape(label)))
        .expect("label pattern is valid")
}

fn capture_list(pattern: &Regex, reply: &str) -> Vec<String> {
    let Some(captures) = pattern.captures(reply) else {
        return Vec::new();
    };

    captures[1]
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
