//! Pluggable per-row transformations
//!
//! Transformations are pure and shape-preserving: a keyed row stays keyed
//! with the same keys in the same order, a positional row keeps its length.
//! The pipeline accepts any [`RowTransform`] implementation.

use crate::codec::Row;

/// A pure per-row transformation
pub trait RowTransform: Send + Sync {
    fn transform(&self, row: &Row) -> Row;
}

/// Default policy: uppercase every value, leave keys untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Uppercase;

impl RowTransform for Uppercase {
    fn transform(&self, row: &Row) -> Row {
        match row {
            Row::Keyed(pairs) => Row::Keyed(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_uppercase()))
                    .collect(),
            ),
            Row::Positional(values) => {
                Row::Positional(values.iter().map(|v| v.to_uppercase()).collect())
            },
        }
    }
}

/// Pass-through policy, useful for validation-only runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl RowTransform for Identity {
    fn transform(&self, row: &Row) -> Row {
        row.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase_keyed_preserves_keys_and_order() {
        let row = Row::Keyed(vec![
            ("name".to_string(), "alice".to_string()),
            ("city".to_string(), "berlin".to_string()),
        ]);

        let out = Uppercase.transform(&row);
        assert_eq!(
            out,
            Row::Keyed(vec![
                ("name".to_string(), "ALICE".to_string()),
                ("city".to_string(), "BERLIN".to_string()),
            ])
        );
    }

    #[test]
    fn test_uppercase_positional_preserves_length() {
        let row = Row::Positional(vec!["hi".to_string(), "bye".to_string()]);
        let out = Uppercase.transform(&row);
        assert_eq!(
            out,
            Row::Positional(vec!["HI".to_string(), "BYE".to_string()])
        );
        assert_eq!(out.len(), row.len());
    }

    #[test]
    fn test_identity_is_a_no_op() {
        let row = Row::Positional(vec!["MiXeD".to_string()]);
        assert_eq!(Identity.transform(&row), row);
    }
}
