//! An ordered query-string multi-map: parse/serialize plus replace/extend/remove
//! operations, modeled on the request/response header list used elsewhere in this
//! crate family.

use crate::quoter::Quoter;
use crate::unquoter::Unquoter;
use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;

fn query_quoter() -> &'static Quoter {
    static Q: OnceLock<Quoter> = OnceLock::new();
    Q.get_or_init(Quoter::query_part)
}

fn query_unquoter() -> &'static Unquoter {
    static U: OnceLock<Unquoter> = OnceLock::new();
    U.get_or_init(|| Unquoter::new("", true).unwrap())
}

/// One decoded `key=value` pair. Duplicate keys are represented as separate entries,
/// not as a `key -> Vec<value>` map, so insertion order survives intact.
#[derive(Clone, Eq, PartialEq)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

impl QueryParam {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

impl Debug for QueryParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}={:?}", self.key, self.value)
    }
}

/// An ordered, duplicate-preserving query-string multi-map.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query(Vec<QueryParam>);

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses a raw (percent-encoded) `a=b&c=d` query string. `&` and `;` are both
    /// accepted as top-level separators; a token with no `=` decodes to an
    /// empty-string value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut params = Vec::new();
        if raw.is_empty() {
            return Self(params);
        }
        for token in raw.split(['&', ';']) {
            if token.is_empty() {
                continue;
            }
            let (raw_key, raw_value) = match token.split_once('=') {
                Some((k, v)) => (k, v),
                None => (token, ""),
            };
            let key = query_unquoter().unquote(raw_key);
            let value = query_unquoter().unquote(raw_value);
            params.push(QueryParam::new(key, value));
        }
        Self(params)
    }

    /// Serializes back to a raw (percent-encoded) query string.
    #[must_use]
    pub fn to_raw_string(&self) -> String {
        let mut out = String::new();
        for (i, param) in self.0.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(&query_quoter().quote(&param.key));
            out.push('=');
            out.push_str(&query_quoter().quote(&param.value));
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryParam> {
        self.0.iter()
    }

    /// The first value for `key`, if any; uses an exact (case-sensitive) key match.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// All values for `key`, in their original relative order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|p| p.key == key)
            .map(|p| p.value.as_str())
            .collect()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(QueryParam::new(key, value));
    }

    /// `extend_query`: appends `other`'s entries without touching existing ones.
    pub fn extend(&mut self, other: &Query) {
        self.0.extend(other.0.iter().cloned());
    }

    /// `update_query`: for each key present in `other`, first removes every existing
    /// entry with that key, then appends `other`'s entries for that key, preserving
    /// `other`'s relative order and the position of first appearance.
    pub fn update(&mut self, other: &Query) {
        let mut seen_keys: Vec<&str> = Vec::new();
        for p in &other.0 {
            if !seen_keys.contains(&p.key.as_str()) {
                seen_keys.push(&p.key);
            }
        }
        for key in &seen_keys {
            self.0.retain(|p| p.key != *key);
        }
        self.0.extend(other.0.iter().cloned());
    }

    /// `without_query_params`: removes every entry whose key is in `keys`.
    pub fn without_params(&mut self, keys: &[&str]) {
        self.0.retain(|p| !keys.contains(&p.key.as_str()));
    }
}

impl<'x> IntoIterator for &'x Query {
    type Item = &'x QueryParam;
    type IntoIter = std::slice::Iter<'x, QueryParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for Query {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| QueryParam::new(k, v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty() {
        let q = Query::parse("");
        assert!(q.is_empty());
    }

    #[test]
    fn parse_basic_pairs() {
        let q = Query::parse("a=b&c=d");
        assert_eq!(q.get("a"), Some("b"));
        assert_eq!(q.get("c"), Some("d"));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn parse_accepts_semicolon_separator() {
        let q = Query::parse("a=b;c=d");
        assert_eq!(q.len(), 2);
        assert_eq!(q.get("c"), Some("d"));
    }

    #[test]
    fn missing_equals_yields_empty_value() {
        let q = Query::parse("flag");
        assert_eq!(q.get("flag"), Some(""));
    }

    #[test]
    fn plus_decodes_to_space() {
        let q = Query::parse("name=a+b");
        assert_eq!(q.get("name"), Some("a b"));
    }

    #[test]
    fn duplicate_keys_preserved_in_order() {
        let q = Query::parse("a=1&a=2&a=3");
        assert_eq!(q.get_all("a"), vec!["1", "2", "3"]);
    }

    #[test]
    fn serialize_round_trip() {
        let q = Query::parse("a=b&c=d");
        assert_eq!(q.to_raw_string(), "a=b&c=d");
    }

    #[test]
    fn serialize_space_as_plus() {
        let mut q = Query::new();
        q.push("name", "a b");
        assert_eq!(q.to_raw_string(), "name=a+b");
    }

    #[test]
    fn update_replaces_all_entries_for_touched_keys_only() {
        let mut q = Query::parse("a=b&b=1");
        q.update(&Query::parse("b=2"));
        assert_eq!(q.to_raw_string(), "a=b&b=2");
    }

    #[test]
    fn update_keeps_multiple_new_values_for_same_key() {
        let mut q = Query::parse("a=b&b=1");
        q.update(&Query::parse("b=2&b=3"));
        assert_eq!(q.to_raw_string(), "a=b&b=2&b=3");
    }

    #[test]
    fn extend_appends_without_removing_duplicates() {
        let mut q = Query::parse("a=b&b=1");
        q.extend(&Query::parse("b=2"));
        assert_eq!(q.to_raw_string(), "a=b&b=1&b=2");
    }

    #[test]
    fn without_params_removes_matching_keys() {
        let mut q = Query::parse("a=b&b=1&c=d");
        q.without_params(&["b"]);
        assert_eq!(q.to_raw_string(), "a=b&c=d");
    }
}
