use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
pub struct ConstraintParser;

/// Which side of a foreign key a violating statement was on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyViolation {
    /// A row references a parent that does not exist
    /// (`insert or update on table ...`).
    MissingReference {
        table: String,
        field: String,
        value: String,
    },
    /// A parent row is still referenced by child rows
    /// (`update or delete on table ...`).
    StillReferenced {
        table: String,
        referenced_by: Option<String>,
    },
}

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    first_table: Regex,
    referencing_table: Regex,
}

impl RegexPatterns {
    fn new() -> Option<Self> {
        Some(Self {
            // "Key (field)=(value)" from the DETAIL line
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
            column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
            first_table: Regex::new(r#"on table "([^"]+)""#).ok()?,
            referencing_table: Regex::new(r#"referenced from table "([^"]+)""#).ok()?,
        })
    }
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new).as_ref()
    }

    /// Classifies a foreign key violation.
    ///
    /// `message` should contain both the primary message and the DETAIL
    /// line when the driver exposes them separately.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<ForeignKeyViolation> {
        let patterns = Self::patterns()?;
        let table = patterns
            .first_table
            .captures(message)
            .map(|caps| caps[1].to_string());

        if message.starts_with("update or delete on table") {
            let referenced_by = patterns
                .referencing_table
                .captures(message)
                .map(|caps| caps[1].to_string());
            return Some(ForeignKeyViolation::StillReferenced {
                table: table?,
                referenced_by,
            });
        }

        let (field, value) = match Self::extract_key_value_from_message(message) {
            Some(pair) => pair,
            None => {
                let (_, field) = Self::parse_constraint_name(constraint_name?)?;
                (field, "unknown".to_string())
            }
        };

        Some(ForeignKeyViolation::MissingReference {
            table: table.unwrap_or_else(|| "resource".to_string()),
            field,
            value,
        })
    }

    /// Extracts the column from a not-null violation message.
    pub fn parse_not_null_violation(message: &str) -> Option<String> {
        Self::patterns()?
            .column_name
            .captures(message)
            .map(|caps| caps[1].to_string())
    }

    /// Extracts `(field, value)` from a unique violation, falling back to
    /// the constraint name for the field.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(pair) = Self::extract_key_value_from_message(message) {
            return Some(pair);
        }
        let (_, field) = Self::parse_constraint_name(constraint_name?)?;
        Some((field, "duplicate_value".to_string()))
    }

    /// Extracts the "Key (field)=(value)" pair.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns()?
            .key_value
            .captures(message)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }

    /// Splits a PostgreSQL-generated constraint name such as
    /// `products_category_id_fkey` into `(table, column)`.
    ///
    /// The table is assumed to be the leading segment, which holds for every
    /// table this service owns.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = ["_fkey", "_key", "_check", "_not_null"]
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSERT_FK: &str = "insert or update on table \"products\" violates foreign key constraint \"products_category_id_fkey\"\nDETAIL: Key (category_id)=(999) is not present in table \"categories\".";
    const DELETE_FK: &str = "update or delete on table \"categories\" violates foreign key constraint \"products_category_id_fkey\" on table \"products\"\nDETAIL: Key (id)=(1) is still referenced from table \"products\".";

    #[test]
    fn test_missing_reference() {
        let result =
            ConstraintParser::parse_foreign_key_violation(INSERT_FK, Some("products_category_id_fkey"));
        assert_eq!(
            result,
            Some(ForeignKeyViolation::MissingReference {
                table: "products".to_string(),
                field: "category_id".to_string(),
                value: "999".to_string(),
            })
        );
    }

    #[test]
    fn test_still_referenced() {
        let result =
            ConstraintParser::parse_foreign_key_violation(DELETE_FK, Some("products_category_id_fkey"));
        assert_eq!(
            result,
            Some(ForeignKeyViolation::StillReferenced {
                table: "categories".to_string(),
                referenced_by: Some("products".to_string()),
            })
        );
    }

    #[test]
    fn test_missing_reference_without_detail_uses_constraint_name() {
        let message = "insert or update on table \"products\" violates foreign key constraint \"products_category_id_fkey\"";
        match ConstraintParser::parse_foreign_key_violation(message, Some("products_category_id_fkey")) {
            Some(ForeignKeyViolation::MissingReference { field, value, .. }) => {
                assert_eq!(field, "category_id");
                assert_eq!(value, "unknown");
            }
            other => panic!("Expected MissingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("products_category_id_fkey"),
            Some(("products".to_string(), "category_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_email_key"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("pkey"), None);
    }

    #[test]
    fn test_not_null_column() {
        let message = "null value in column \"name\" of relation \"categories\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message),
            Some("name".to_string())
        );
    }
}
