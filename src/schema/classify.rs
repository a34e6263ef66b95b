//! Column role classification from declared type strings.
//!
//! The store reports declared types as free-form strings (`BIGINT`, `Utf8`,
//! `Decimal128(38, 10)`, ...). Classification is a case-insensitive substring
//! match against known type token families, producing a closed [`ColumnRole`]
//! variant that analyzers dispatch on exhaustively instead of re-matching
//! strings at every call site.

use serde::{Deserialize, Serialize};

/// Semantic role of a column, inferred once at introspection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Integer/float/decimal families; eligible for numeric statistics.
    Numeric,
    /// Text and everything that is not recognizably numeric or boolean.
    Categorical,
    /// Declared boolean type. Runtime boolean-likeness (a 1-2 value distinct
    /// probe) is detected separately and does not change this role.
    Boolean,
    /// Identifier-like column, flagged from the column name.
    Id,
    /// Empty or unrecognizable declared type.
    Unknown,
}

/// Numeric declared-type tokens, matched case-insensitively as substrings.
const NUMERIC_TOKENS: &[&str] = &[
    "int", "float", "double", "decimal", "numeric", "real",
];

/// Textual declared-type tokens.
const TEXTUAL_TOKENS: &[&str] = &["char", "text", "string", "utf8"];

/// Identifier-like name suffixes.
const ID_SUFFIXES: &[&str] = &["_id", "_key"];

/// Returns true when the declared type belongs to a numeric family.
pub fn is_numeric_type(declared_type: &str) -> bool {
    let lowered = declared_type.to_ascii_lowercase();
    NUMERIC_TOKENS.iter().any(|token| lowered.contains(token))
}

/// Returns true when the declared type is textual.
pub fn is_textual_type(declared_type: &str) -> bool {
    let lowered = declared_type.to_ascii_lowercase();
    TEXTUAL_TOKENS.iter().any(|token| lowered.contains(token))
}

/// Returns true when the column name looks like an identifier column.
fn is_id_like_name(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    lowered == "id" || ID_SUFFIXES.iter().any(|suffix| lowered.ends_with(suffix))
}

/// Classifies a column into its semantic role.
///
/// Identifier-like names win over the type-derived role for reporting
/// purposes; numeric-stats eligibility still keys off [`is_numeric_type`].
pub fn classify_column(name: &str, declared_type: &str) -> ColumnRole {
    if declared_type.trim().is_empty() {
        return ColumnRole::Unknown;
    }
    if is_id_like_name(name) {
        return ColumnRole::Id;
    }
    let lowered = declared_type.to_ascii_lowercase();
    if lowered.contains("bool") {
        ColumnRole::Boolean
    } else if is_numeric_type(declared_type) {
        ColumnRole::Numeric
    } else {
        ColumnRole::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_families() {
        for ty in ["INTEGER", "BIGINT", "Int64", "DOUBLE", "Float32", "Decimal128(38, 10)", "NUMERIC", "real"] {
            assert!(is_numeric_type(ty), "{ty} should be numeric");
        }
        assert!(!is_numeric_type("Utf8"));
        assert!(!is_numeric_type("VARCHAR"));
        assert!(!is_numeric_type("Boolean"));
    }

    #[test]
    fn textual_families() {
        for ty in ["VARCHAR", "Utf8", "TEXT", "CHAR(10)", "LargeUtf8", "Utf8View"] {
            assert!(is_textual_type(ty), "{ty} should be textual");
        }
        assert!(!is_textual_type("Int64"));
    }

    #[test]
    fn role_dispatch() {
        assert_eq!(classify_column("price", "DOUBLE"), ColumnRole::Numeric);
        assert_eq!(classify_column("title", "Utf8"), ColumnRole::Categorical);
        assert_eq!(classify_column("active", "Boolean"), ColumnRole::Boolean);
        assert_eq!(classify_column("id", "Int64"), ColumnRole::Id);
        assert_eq!(classify_column("category_id", "Utf8"), ColumnRole::Id);
        assert_eq!(classify_column("shipping_key", "BIGINT"), ColumnRole::Id);
        assert_eq!(classify_column("whatever", ""), ColumnRole::Unknown);
        // Unrecognized types fall back to categorical, not an error.
        assert_eq!(classify_column("ts", "Timestamp(ns)"), ColumnRole::Categorical);
    }

    #[test]
    fn id_name_does_not_change_numeric_eligibility() {
        assert_eq!(classify_column("seller_id", "BIGINT"), ColumnRole::Id);
        assert!(is_numeric_type("BIGINT"));
    }
}
