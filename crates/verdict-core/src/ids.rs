//! ID prefix constants.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated in SQL by `VerdictDb::generate_id`.

pub const PREFIX_SUBMISSION: &str = "sub";
pub const PREFIX_EVIDENCE: &str = "res";
pub const PREFIX_FEEDBACK: &str = "fbk";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_SUBMISSION, PREFIX_EVIDENCE, PREFIX_FEEDBACK];

/// Check whether `id` has the shape `{prefix}-{8 lowercase hex}`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| {
            hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_three_chars_and_distinct() {
        for prefix in ALL_PREFIXES {
            assert_eq!(prefix.len(), 3);
        }
        let mut sorted = ALL_PREFIXES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ALL_PREFIXES.len());
    }

    #[test]
    fn has_prefix_checks_shape() {
        assert!(has_prefix("sub-a3f8b2c1", PREFIX_SUBMISSION));
        assert!(!has_prefix("sub-A3F8B2C1", PREFIX_SUBMISSION));
        assert!(!has_prefix("res-a3f8b2c1", PREFIX_SUBMISSION));
        assert!(!has_prefix("sub-a3f8", PREFIX_SUBMISSION));
    }
}
