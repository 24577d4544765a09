//! Cache key generation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of executed SQL plus bound parameters, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint the rewritten SQL text together with its parameter values.
///
/// Parameters are rendered as a JSON array so that order, NULLs and
/// separators inside values all change the digest.
pub fn fingerprint(sql: &str, params: &[Option<String>]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hasher.update(render_params(params).as_bytes());
    Fingerprint(hex::encode(hasher.finalize()))
}

fn render_params(params: &[Option<String>]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|p| match p {
            Some(v) => serde_json::Value::String(v.clone()).to_string(),
            None => "null".to_string(),
        })
        .collect();
    format!("[{}]", rendered.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(v: &[Option<&str>]) -> Vec<Option<String>> {
        v.iter().map(|x| x.map(str::to_string)).collect()
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = fingerprint("select * from t where a = $1", &p(&[Some("1")]));
        let b = fingerprint("select * from t where a = $1", &p(&[Some("1")]));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_depends_on_sql() {
        let params = p(&[Some("1")]);
        assert_ne!(
            fingerprint("select * from t order by id", &params),
            fingerprint("select * from t order by name", &params)
        );
    }

    #[test]
    fn test_fingerprint_depends_on_params() {
        let sql = "select $1, $2";
        let base = fingerprint(sql, &p(&[Some("a"), Some("b")]));
        assert_ne!(base, fingerprint(sql, &p(&[Some("b"), Some("a")])));
        assert_ne!(base, fingerprint(sql, &p(&[Some("a,b")])));
        assert_ne!(base, fingerprint(sql, &p(&[Some("a"), None])));
        assert_ne!(fingerprint(sql, &p(&[None])), fingerprint(sql, &p(&[Some("null")])));
        assert_ne!(fingerprint(sql, &[]), fingerprint(sql, &p(&[None])));
    }

    #[test]
    fn test_render_params() {
        assert_eq!(render_params(&[]), "[]");
        assert_eq!(render_params(&p(&[Some("x\"y"), None])), r#"["x\"y",null]"#);
    }
}
