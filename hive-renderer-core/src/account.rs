//! Hive account name rules, used to decide whether `@mention` is linked

use crate::localization::LocalizationOptions;

/// Names impersonating exchanges and services
pub const BAD_ACTORS: &[&str] = &[
    "hivewallet",
    "hive-wallet",
    "hivesupport",
    "hive-support",
    "hiveio-support",
    "hive-io",
    "blocktrades-support",
    "peakd-support",
    "ecency-support",
];

/// `None` when `name` is a valid account name, else the localized reason.
pub fn validate_account_name<'a>(name: &str, localization: &'a LocalizationOptions) -> Option<&'a str> {
    if !(3..=16).contains(&name.len()) {
        return Some(&localization.account_name_wrong_length);
    }
    if BAD_ACTORS.contains(&name) {
        return Some(&localization.account_name_bad_actor);
    }
    if !name.split('.').all(is_valid_segment) {
        return Some(&localization.account_name_wrong_segment);
    }
    None
}

fn is_valid_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            segment.len() >= 3
                && first.is_ascii_lowercase()
                && (last.is_ascii_lowercase() || last.is_ascii_digit())
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
                && !segment.contains("--")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        let loc = LocalizationOptions::default();
        for name in ["alice", "hive.blog", "gtg", "good-karma", "user123"] {
            assert_eq!(validate_account_name(name, &loc), None, "{}", name);
        }
    }

    #[test]
    fn test_length() {
        let loc = LocalizationOptions::default();
        assert_eq!(validate_account_name("ab", &loc), Some(loc.account_name_wrong_length.as_str()));
        assert_eq!(
            validate_account_name("abcdefghijklmnopq", &loc),
            Some(loc.account_name_wrong_length.as_str())
        );
    }

    #[test]
    fn test_bad_actor() {
        let loc = LocalizationOptions::default();
        assert_eq!(validate_account_name("hivewallet", &loc), Some(loc.account_name_bad_actor.as_str()));
    }

    #[test]
    fn test_bad_segments() {
        let loc = LocalizationOptions::default();
        for name in ["1alice", "alice-", "al--ice", "ab.alice", "Alice", "ali_ce", "alice."] {
            assert_eq!(
                validate_account_name(name, &loc),
                Some(loc.account_name_wrong_segment.as_str()),
                "{}",
                name
            );
        }
    }
}
