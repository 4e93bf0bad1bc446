//! # Identifier and Version Formats
//!
//! Compiled checks for the two string formats business rules enforce. These
//! are byte-level scanners rather than regex matches; each function documents
//! the exact pattern it accepts.

/// Compiled check for `^[a-z0-9-]+$`.
///
/// Examples: `react-hooks`, `typescript-5`, `a`. Leading, trailing and
/// repeated hyphens are accepted, matching the pattern literally.
pub fn is_kebab_case_id(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Compiled check for
/// `^\d+\.\d+\.\d+(-[a-zA-Z0-9-]+)?(\+[a-zA-Z0-9-]+)?$`.
///
/// Examples: `1.0.0`, `2.10.3-beta`, `1.0.0-rc-1+build-7`. Dotted
/// pre-release identifiers (`1.0.0-beta.1`) are rejected.
pub fn is_semantic_version(s: &str) -> bool {
    let (core, build) = match s.split_once('+') {
        Some((core, build)) => (core, Some(build)),
        None => (s, None),
    };
    if let Some(build) = build {
        if !is_label(build) {
            return false;
        }
    }

    let (numbers, pre) = match core.split_once('-') {
        Some((numbers, pre)) => (numbers, Some(pre)),
        None => (core, None),
    };
    if let Some(pre) = pre {
        if !is_label(pre) {
            return false;
        }
    }

    let mut parts = 0;
    for part in numbers.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        parts += 1;
    }
    parts == 3
}

/// `[a-zA-Z0-9-]+`
fn is_label(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_accepts_lowercase_digits_hyphens() {
        assert!(is_kebab_case_id("react-hooks"));
        assert!(is_kebab_case_id("ts5"));
        assert!(is_kebab_case_id("-"));
    }

    #[test]
    fn kebab_rejects_other_characters() {
        assert!(!is_kebab_case_id(""));
        assert!(!is_kebab_case_id("React"));
        assert!(!is_kebab_case_id("snake_case"));
        assert!(!is_kebab_case_id("has space"));
        assert!(!is_kebab_case_id("dotted.id"));
    }

    #[test]
    fn semver_accepts_core_pre_and_build() {
        assert!(is_semantic_version("1.0.0"));
        assert!(is_semantic_version("10.20.30"));
        assert!(is_semantic_version("1.0.0-beta"));
        assert!(is_semantic_version("1.0.0-rc-1"));
        assert!(is_semantic_version("1.0.0+build-7"));
        assert!(is_semantic_version("1.0.0-alpha+001"));
    }

    #[test]
    fn semver_rejects_malformed() {
        assert!(!is_semantic_version(""));
        assert!(!is_semantic_version("1.0"));
        assert!(!is_semantic_version("1.0.0.0"));
        assert!(!is_semantic_version("v1.0.0"));
        assert!(!is_semantic_version("1.0.0-"));
        assert!(!is_semantic_version("1.0.0+"));
        assert!(!is_semantic_version("1.0.0-beta.1"));
        assert!(!is_semantic_version("1..0"));
        assert!(!is_semantic_version("not-a-semver"));
    }
}
