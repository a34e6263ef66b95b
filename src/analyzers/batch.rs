//! Shared cell extraction helpers for DataFusion result batches.
//!
//! DataFusion is free to hand back aggregates as any of several numeric or
//! string array flavors depending on input types; every analyzer funnels its
//! downcasts through here so the widening rules live in one place.

use arrow::array::{
    Array, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray, StringViewArray, UInt32Array, UInt64Array,
};
use arrow::record_batch::RecordBatch;

use super::errors::{AnalyzerError, AnalyzerResult};

/// Reads a non-null integer scalar from row 0 of the given column.
///
/// `COUNT`-style aggregates always produce a row, so a missing or null cell
/// is an invalid result shape.
pub(crate) fn scalar_i64(batch: &RecordBatch, col_idx: usize, what: &str) -> AnalyzerResult<i64> {
    let column = batch.column(col_idx);
    if batch.num_rows() == 0 || column.is_null(0) {
        return Err(AnalyzerError::invalid_data(format!(
            "null or missing value for {what}"
        )));
    }
    if let Some(arr) = column.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(0))
    } else if let Some(arr) = column.as_any().downcast_ref::<UInt64Array>() {
        Ok(arr.value(0) as i64)
    } else if let Some(arr) = column.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.value(0) as i64)
    } else {
        Err(AnalyzerError::invalid_data(format!(
            "expected integer for {what}, got {:?}",
            column.data_type()
        )))
    }
}

/// Reads an optional float scalar from row 0, widening any numeric type.
///
/// Aggregates over zero non-null rows come back as SQL `NULL`, which maps to
/// `None` here rather than an error.
pub(crate) fn scalar_opt_f64(batch: &RecordBatch, col_idx: usize) -> AnalyzerResult<Option<f64>> {
    if batch.num_rows() == 0 {
        return Ok(None);
    }
    opt_f64_at(batch.column(col_idx).as_ref(), 0)
}

/// Reads an optional float from an arbitrary row of an array.
pub(crate) fn opt_f64_at(array: &dyn Array, row: usize) -> AnalyzerResult<Option<f64>> {
    if array.is_null(row) {
        return Ok(None);
    }
    let value = if let Some(arr) = array.as_any().downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = array.as_any().downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = array.as_any().downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = array.as_any().downcast_ref::<Int32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = array.as_any().downcast_ref::<UInt64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = array.as_any().downcast_ref::<UInt32Array>() {
        arr.value(row) as f64
    } else {
        return Err(AnalyzerError::invalid_data(format!(
            "expected numeric array, got {:?}",
            array.data_type()
        )));
    };
    Ok(Some(value))
}

/// Reads a non-null integer from an arbitrary row of an array.
pub(crate) fn i64_at(array: &dyn Array, row: usize, what: &str) -> AnalyzerResult<i64> {
    if array.is_null(row) {
        return Err(AnalyzerError::invalid_data(format!("null value for {what}")));
    }
    if let Some(arr) = array.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = array.as_any().downcast_ref::<UInt64Array>() {
        Ok(arr.value(row) as i64)
    } else if let Some(arr) = array.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as i64)
    } else {
        Err(AnalyzerError::invalid_data(format!(
            "expected integer array for {what}, got {:?}",
            array.data_type()
        )))
    }
}

/// Reads an optional string from an arbitrary row, rendering scalar types
/// through their display form when the cell is not a string array.
pub(crate) fn opt_string_at(array: &dyn Array, row: usize) -> Option<String> {
    if array.is_null(row) {
        return None;
    }
    if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<StringViewArray>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<LargeStringArray>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<Int64Array>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<Int32Array>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<Float64Array>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<BooleanArray>() {
        Some(arr.value(row).to_string())
    } else if let Some(arr) = array.as_any().downcast_ref::<Date32Array>() {
        Some(format!("{:?}", arr.value(row)))
    } else {
        None
    }
}

/// Reads a required string from an arbitrary row.
pub(crate) fn string_at(array: &dyn Array, row: usize, what: &str) -> AnalyzerResult<String> {
    opt_string_at(array, row)
        .ok_or_else(|| AnalyzerError::invalid_data(format!("null or non-string value for {what}")))
}
