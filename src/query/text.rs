use bson::{Bson, Document as BsonDocument};
use std::collections::HashSet;

use super::eval::get_path;

/// Lowercased alphanumeric words.
pub fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).map(str::to_lowercase)
}

/// Search terms split into wanted and `-negated` words.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TextTerms {
    pub positive: Vec<String>,
    pub negated: Vec<String>,
}

#[must_use]
pub fn parse_terms(search: &str) -> TextTerms {
    let mut terms = TextTerms::default();
    for raw in search.split_whitespace() {
        match raw.strip_prefix('-') {
            Some(rest) => terms.negated.extend(tokenize(rest)),
            None => terms.positive.extend(tokenize(raw)),
        }
    }
    terms
}

fn collect_words(v: &Bson, out: &mut HashSet<String>) {
    match v {
        Bson::String(s) => out.extend(tokenize(s)),
        Bson::Array(items) => items.iter().for_each(|i| collect_words(i, out)),
        _ => {}
    }
}

/// True when any wanted word occurs in the indexed fields and no negated word does.
#[must_use]
pub fn text_matches(doc: &BsonDocument, fields: &[String], search: &str) -> bool {
    let terms = parse_terms(search);
    if terms.positive.is_empty() {
        return false;
    }
    let mut words = HashSet::new();
    for f in fields {
        if let Some(v) = get_path(doc, f) {
            collect_words(v, &mut words);
        }
    }
    terms.positive.iter().any(|t| words.contains(t)) && !terms.negated.iter().any(|t| words.contains(t))
}
