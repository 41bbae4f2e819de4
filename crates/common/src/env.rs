//! Environment/runtime helpers
//!
//! Inspection of process environment variables for diagnostics.

use std::collections::BTreeMap;

const MASK: &str = "***";
const SENSITIVE_SUFFIXES: [&str; 4] = ["key", "secret", "password", "token"];

/// True when the variable name looks like it carries a credential.
pub fn is_sensitive(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Mask values of sensitive entries; everything else passes through.
pub fn redact_vars<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .map(|(k, v)| {
            let v = if is_sensitive(&k) { MASK.to_string() } else { v };
            (k, v)
        })
        .collect()
}

/// Snapshot of the current process environment with credentials masked.
pub fn redacted_env() -> BTreeMap<String, String> {
    redact_vars(std::env::vars())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_keys_by_suffix_case_insensitively() {
        let vars = vec![
            ("API_KEY".to_string(), "abc".to_string()),
            ("jwt_secret".to_string(), "s".to_string()),
            ("DB_PASSWORD".to_string(), "p".to_string()),
            ("GITHUB_TOKEN".to_string(), "t".to_string()),
            ("RENDER".to_string(), "true".to_string()),
        ];
        let out = redact_vars(vars);
        assert_eq!(out["API_KEY"], "***");
        assert_eq!(out["jwt_secret"], "***");
        assert_eq!(out["DB_PASSWORD"], "***");
        assert_eq!(out["GITHUB_TOKEN"], "***");
        assert_eq!(out["RENDER"], "true");
    }

    #[test]
    fn keys_containing_but_not_ending_in_suffix_are_kept() {
        assert!(!is_sensitive("KEYBOARD_LAYOUT"));
        assert!(!is_sensitive("TOKENIZER_PATH"));
    }
}
