use crate::errors::CommandError;
use crate::table::fields::AttributeValue;
use crate::table::spatial::SpatialFeatureTable;

fn share(part: Option<&AttributeValue>, total: Option<&AttributeValue>) -> AttributeValue {
    match (part.and_then(AttributeValue::as_f64),total.and_then(AttributeValue::as_f64)) {
        (Some(part),Some(total)) if total != 0.0 => AttributeValue::Real(part / total * 100.0),
        _ => AttributeValue::Null
    }
}

/// For each column `c`, adds a column `c_pct` holding `c` as a percentage of `total_column`. The share is null when
/// either value is missing or not a number, or when the total is zero.
pub(crate) fn add_share_columns(table: &mut SpatialFeatureTable, columns: &[String], total_column: &str) -> Result<(),CommandError> {
    let total = table.column_index(total_column)?;
    // every column is checked before any is added
    let indexes = columns.iter().map(|column| table.column_index(column)).collect::<Result<Vec<_>,_>>()?;

    for (name,column) in columns.iter().zip(indexes) {
        let values = (0..table.len()).map(|row| share(table.value(row,column),table.value(row,total))).collect();
        table.push_column(format!("{name}_pct"),values);
    }
    Ok(())
}

/// Keeps only rows where `column` holds a number greater than zero.
pub(crate) fn retain_positive(table: &mut SpatialFeatureTable, column: &str) -> Result<(),CommandError> {
    let column = table.column_index(column)?;
    table.retain(|row| row.values.get(column).and_then(AttributeValue::as_f64).is_some_and(|value| value > 0.0));
    Ok(())
}

pub(crate) fn fill_nulls(table: &mut SpatialFeatureTable, value: f64) {
    let replacement = if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        AttributeValue::Integer(value as i64)
    } else {
        AttributeValue::Real(value)
    };
    for row in table.rows_mut() {
        for cell in row.values.iter_mut().filter(|cell| cell.is_null()) {
            *cell = replacement.clone()
        }
    }
}
