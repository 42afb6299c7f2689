use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::data::memory::MemoryLeaf;
use crate::data::model::{ValueArray, Values};
use crate::data::source::BoxError;

// ---------------------------------------------------------------------------
// Table-reader collaborator
// ---------------------------------------------------------------------------

/// One decoded column of a structured leaf.
pub struct TableColumn {
    pub name: String,
    pub values: ValueArray,
    pub unit: Option<String>,
}

/// Decodes a structured leaf into named columns, in source column order.
/// Implementations are free to interpret the leaf's storage however the
/// backing source requires; the extraction engine only sees the columns.
pub trait TableReader<L> {
    fn read_table(&self, leaf: &L) -> Result<Vec<TableColumn>, BoxError>;
}

/// Reads structured [`MemoryLeaf`] datasets, which carry their rows as an
/// Arrow [`RecordBatch`]. Per-column units ride the Arrow field metadata
/// under the `"unit"` key.
#[derive(Debug, Default)]
pub struct BatchTableReader;

impl TableReader<MemoryLeaf> for BatchTableReader {
    fn read_table(&self, leaf: &MemoryLeaf) -> Result<Vec<TableColumn>, BoxError> {
        let batch = leaf
            .table_batch()
            .ok_or("dataset is not structured: no table to read")?;
        columns_from_batch(batch)
    }
}

/// Decode every column of a record batch into a [`TableColumn`].
pub fn columns_from_batch(batch: &RecordBatch) -> Result<Vec<TableColumn>, BoxError> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(schema.fields().len());

    for (idx, field) in schema.fields().iter().enumerate() {
        let values = decode_column(batch.column(idx))
            .map_err(|e| format!("column '{}': {e}", field.name()))?;
        columns.push(TableColumn {
            name: field.name().clone(),
            values,
            unit: field.metadata().get("unit").cloned(),
        });
    }
    Ok(columns)
}

/// Decode a single Arrow column into materialized values. Nulls collapse to
/// NaN / 0 / "" / false per type, matching how the numeric loaders treat
/// missing entries.
fn decode_column(col: &ArrayRef) -> Result<ValueArray, BoxError> {
    let n = col.len();
    let values = match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Values::Float(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Values::Float(arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Values::Integer(arr.iter().map(|v| v.unwrap_or(0)).collect())
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Values::Integer(arr.iter().map(|v| v.unwrap_or(0) as i64).collect())
        }
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().unwrap();
            Values::Text(
                (0..n)
                    .map(|i| if arr.is_null(i) { String::new() } else { arr.value(i).to_string() })
                    .collect(),
            )
        }
        DataType::LargeUtf8 => {
            let arr = col.as_any().downcast_ref::<LargeStringArray>().unwrap();
            Values::Text(
                (0..n)
                    .map(|i| if arr.is_null(i) { String::new() } else { arr.value(i).to_string() })
                    .collect(),
            )
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            Values::Bool(arr.iter().map(|v| v.unwrap_or(false)).collect())
        }
        other => return Err(format!("unsupported column type {other:?}").into()),
    };

    Ok(ValueArray {
        shape: vec![n],
        values,
    })
}
