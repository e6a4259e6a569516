//! # Error Suggestions
//!
//! Helpers that turn failures into messages saying what went wrong AND how
//! to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codeinventory::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("No organization given");
//!
//! // Use:
//! return Err(suggestions::org_missing());
//! ```

use std::path::Path;

use crate::defaults::{API_URL_ENV, DEFAULT_CONFIG_FILENAME, TOKEN_ENV};
use crate::error::Error;

/// Error for an explicitly requested configuration file that does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a {DEFAULT_CONFIG_FILENAME} file in the working directory\n\
         hint: Use -c/--config to specify a different path",
        path = path.display()
    )
}

/// Error for a run with no organization from any source.
pub fn org_missing() -> anyhow::Error {
    anyhow::anyhow!(
        "No organization to inventory\n\n\
         hint: Pass the organization as an argument, e.g. 'codeinventory github GSA'\n\
         hint: Or set 'org:' in {DEFAULT_CONFIG_FILENAME}"
    )
}

/// Wraps a library error with hints where we have some.
pub fn explain(error: Error) -> anyhow::Error {
    let hints = match &error {
        Error::Authentication { .. } => vec![
            format!("hint: Set {TOKEN_ENV} to a token that can read the organization"),
            "hint: Private repositories need a token with the 'repo' scope".to_string(),
        ],
        Error::Network { .. } => vec![
            "hint: Check your network connection".to_string(),
            format!("hint: Check --api-url or {API_URL_ENV} if you use GitHub Enterprise"),
        ],
        Error::DeclarationParse { .. } => vec![
            "hint: The declaration's top level must be a mapping of field names".to_string(),
            "hint: Use --skip-invalid to leave such repositories out instead".to_string(),
        ],
        Error::RepositoryNotFound { .. } => vec![
            "hint: Use the full name, e.g. 'GSA/ProductOne'".to_string(),
            format!("hint: Private repositories are only visible with {TOKEN_ENV} set"),
        ],
        Error::InvalidOverride { .. } => {
            vec!["hint: Overrides look like 'contact.email=team@example.gov'".to_string()]
        }
        _ => Vec::new(),
    };

    if hints.is_empty() {
        anyhow::Error::new(error)
    } else {
        anyhow::anyhow!("{error}\n\n{}", hints.join("\n"))
    }
}

/// Finds a close match for `input` among `candidates` (edit distance <= 2).
pub fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut previous: Vec<usize> = (0..=b_len).collect();
    let mut current = vec![0usize; b_len + 1];

    for i in 1..=a_len {
        current[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_includes_hints() {
        let path = Path::new("/some/path/codeinventory.yaml");
        let message = config_not_found(path).to_string();

        assert!(message.contains("Configuration file not found"));
        assert!(message.contains("/some/path/codeinventory.yaml"));
        assert!(message.contains("hint:"));
        assert!(message.contains("-c/--config"));
    }

    #[test]
    fn test_org_missing_mentions_config_key() {
        let message = org_missing().to_string();
        assert!(message.contains("No organization"));
        assert!(message.contains("org:"));
    }

    #[test]
    fn test_authentication_hint_mentions_token() {
        let error = explain(Error::Authentication {
            url: "https://api.github.com/orgs/GSA/repos".to_string(),
            message: "Bad credentials".to_string(),
        });
        let message = error.to_string();
        assert!(message.contains("Bad credentials"));
        assert!(message.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_explain_without_hints_keeps_message() {
        let error = explain(Error::ConfigParse {
            message: "broken".to_string(),
            hint: None,
        });
        assert_eq!(error.to_string(), "Configuration parsing error: broken");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("org", "org"), 0);
        assert_eq!(edit_distance("orgg", "org"), 1);
        assert_eq!(edit_distance("exlude", "exclude"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar() {
        let candidates = ["org", "api_url", "exclude", "overrides"];

        assert_eq!(find_similar("orgg", &candidates), Some("org"));
        assert_eq!(find_similar("exclud", &candidates), Some("exclude"));
        assert_eq!(find_similar("override", &candidates), Some("overrides"));
        assert_eq!(find_similar("colour", &candidates), None);
    }
}
