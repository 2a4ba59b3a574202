use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;

/// Parameter names with a meaning of their own; never treated as record fields.
pub const RESERVED_KEYS: [&str; 5] = ["sort", "fields", "keyword", "page", "limit"];

#[must_use]
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A parameter value: one text, or several when the key was repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    One(String),
    Many(Vec<String>),
}

impl RawValue {
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::One(s) => s,
            Self::Many(v) => v.first().map_or("", String::as_str),
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(s) => std::slice::from_ref(s),
            Self::Many(v) => v,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::One(s) => *self = Self::Many(vec![std::mem::take(s), value]),
            Self::Many(v) => v.push(value),
        }
    }
}

/// The untyped parameters of one request, exactly as the caller sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    params: BTreeMap<String, RawValue>,
}

fn decode_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

impl RawQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` string; a leading `?` is ignored.
    #[must_use]
    pub fn parse(query_string: &str) -> Self {
        let mut out = Self::new();
        let qs = query_string.strip_prefix('?').unwrap_or(query_string);
        for pair in qs.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(k);
            if key.is_empty() {
                continue;
            }
            out.insert(key, decode_component(v));
        }
        out
    }

    /// Adds a value; a repeated key accumulates into a list.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        self.params
            .entry(key.into())
            .and_modify(|existing| existing.push(value.clone()))
            .or_insert_with(|| RawValue::One(value));
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.params.get(key)
    }

    /// First value of `key`, if present.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).map(RawValue::first)
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.params.remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A copy holding only the filterable (non-reserved) parameters.
    #[must_use]
    pub fn without_reserved(&self) -> Self {
        let params =
            self.params.iter().filter(|(k, _)| !is_reserved(k)).map(|(k, v)| (k.clone(), v.clone())).collect();
        Self { params }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}
