//! SQL identifier validation for dynamically constructed queries.
//!
//! The profiler builds every aggregation query at runtime from introspected
//! column names plus caller-supplied table and business-column names. Each
//! identifier is validated and quoted here before it is embedded into SQL
//! text, so a hostile or malformed name fails fast instead of producing a
//! broken or unsafe query.

use crate::error::{ProfileError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum accepted identifier length.
const MAX_IDENT_LEN: usize = 128;

static IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    // Letters, digits and underscores, optionally dot-qualified; must start
    // with a letter or underscore. Compile-time constant pattern.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*$")
        .expect("hard-coded identifier regex is valid")
});

/// Validation and quoting for table/column identifiers.
pub struct SqlIdent;

impl SqlIdent {
    /// Validates an identifier without quoting it.
    pub fn validate(identifier: &str) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(ProfileError::InvalidIdentifier(
                "identifier cannot be empty".to_string(),
            ));
        }
        if identifier.len() > MAX_IDENT_LEN {
            return Err(ProfileError::InvalidIdentifier(format!(
                "identifier too long ({} characters, max {MAX_IDENT_LEN})",
                identifier.len()
            )));
        }
        if identifier.contains('\0') {
            return Err(ProfileError::InvalidIdentifier(
                "identifier cannot contain null bytes".to_string(),
            ));
        }
        if !IDENT_RE.is_match(identifier) {
            return Err(ProfileError::InvalidIdentifier(format!(
                "'{identifier}' must start with a letter or underscore and contain only \
                 letters, digits, underscores and dots"
            )));
        }
        Ok(())
    }

    /// Validates an identifier and returns it double-quoted for SQL use.
    ///
    /// Dot-qualified names are quoted per segment so `data.listings` becomes
    /// `"data"."listings"`.
    pub fn quote(identifier: &str) -> Result<String> {
        Self::validate(identifier)?;
        let quoted = identifier
            .split('.')
            .map(|part| format!("\"{part}\""))
            .collect::<Vec<_>>()
            .join(".");
        Ok(quoted)
    }

    /// Escapes a string for embedding as a SQL string literal.
    ///
    /// Used for table names compared against `information_schema` rows, where
    /// the value appears as a literal rather than an identifier.
    pub fn string_literal(value: &str) -> String {
        value.replace('\'', "''")
    }
}
