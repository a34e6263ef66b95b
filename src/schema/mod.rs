//! Schema introspection and column role classification.
//!
//! Profiling starts here: [`introspect::SchemaIntrospector`] resolves the
//! column names and declared types of an unknown table through a fallback
//! chain of introspection strategies, and [`classify`] maps each declared
//! type string onto a semantic [`ColumnRole`] that the analyzers dispatch on.

pub mod classify;
pub mod introspect;

pub use classify::{classify_column, is_numeric_type, is_textual_type, ColumnRole};
pub use introspect::SchemaIntrospector;

use serde::{Deserialize, Serialize};

/// A single column of the introspected schema.
///
/// `role` is inferred from the declared type and column name; it is never
/// authoritative and downstream analyzers tolerate misclassification (a
/// numeric ID column still gets numeric statistics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as reported by the store.
    pub name: String,
    /// Declared type string, verbatim from the introspection strategy.
    pub declared_type: String,
    /// Inferred semantic role.
    pub role: ColumnRole,
}

impl ColumnDescriptor {
    /// Builds a descriptor, inferring the role from name and declared type.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let name = name.into();
        let declared_type = declared_type.into();
        let role = classify_column(&name, &declared_type);
        Self {
            name,
            declared_type,
            role,
        }
    }

    /// Whether the declared type is numeric, regardless of role.
    ///
    /// Numeric-stats eligibility keys off the declared type so that ID-like
    /// integer columns are still covered.
    pub fn numeric_type(&self) -> bool {
        is_numeric_type(&self.declared_type)
    }

    /// Whether the declared type is textual (char/text/string/utf8 family).
    pub fn textual_type(&self) -> bool {
        is_textual_type(&self.declared_type)
    }
}
