use crate::errors::CommandError;
use crate::geometry::ArealGeometry;
use crate::projection::Crs;
use crate::table::fields::AttributeValue;

#[derive(Clone,Debug,PartialEq)]
pub(crate) struct SpatialRow {
    /// Rows added by a right or outer join have no geometry.
    pub(crate) geometry: Option<ArealGeometry>,
    pub(crate) values: Vec<AttributeValue>
}

impl SpatialRow {

    pub(crate) const fn new(geometry: Option<ArealGeometry>, values: Vec<AttributeValue>) -> Self {
        Self {
            geometry,
            values
        }
    }

    #[must_use]
    pub(crate) fn with_geometry(&self, geometry: ArealGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            values: self.values.clone()
        }
    }
}

/// Rows of areal features with named attribute columns, all sharing one CRS.
#[derive(Clone,Debug)]
pub(crate) struct SpatialFeatureTable {
    crs: Option<Crs>,
    columns: Vec<String>,
    rows: Vec<SpatialRow>
}

impl SpatialFeatureTable {

    pub(crate) const fn new(crs: Option<Crs>, columns: Vec<String>, rows: Vec<SpatialRow>) -> Self {
        Self {
            crs,
            columns,
            rows
        }
    }

    /// A table with the same columns and CRS but different rows.
    #[must_use]
    pub(crate) fn with_rows(&self, rows: Vec<SpatialRow>) -> Self {
        Self {
            crs: self.crs.clone(),
            columns: self.columns.clone(),
            rows
        }
    }

    pub(crate) const fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub(crate) fn set_crs(&mut self, crs: Option<Crs>) {
        self.crs = crs
    }

    pub(crate) fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn rows(&self) -> &[SpatialRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [SpatialRow] {
        &mut self.rows
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn column_index(&self, column: &str) -> Result<usize,CommandError> {
        self.columns.iter().position(|name| name == column).ok_or_else(|| CommandError::KeyNotFound {
            column: column.to_owned(),
            table: "spatial table".to_owned()
        })
    }

    pub(crate) fn value(&self, row: usize, column: usize) -> Option<&AttributeValue> {
        self.rows.get(row).and_then(|row| row.values.get(column))
    }

    /// Adds a column to the end of the table, `values` must have one entry per row.
    pub(crate) fn push_column(&mut self, name: String, values: Vec<AttributeValue>) {
        debug_assert_eq!(values.len(),self.rows.len());
        self.columns.push(name);
        for (row,value) in self.rows.iter_mut().zip(values) {
            row.values.push(value)
        }
    }

    pub(crate) fn rename_columns<Callback: Fn(&str) -> String>(&mut self, callback: Callback) {
        for column in &mut self.columns {
            *column = callback(column.as_str())
        }
    }

    pub(crate) fn retain<Callback: FnMut(&SpatialRow) -> bool>(&mut self, callback: Callback) {
        self.rows.retain(callback)
    }

}
