use indexmap::IndexMap;

use crate::errors::CommandError;
use crate::table::fields::AttributeValue;
use crate::table::fields::JoinKey;

/// Row positions of each distinct key value, in order of first appearance.
pub(crate) type KeyIndex = IndexMap<JoinKey,Vec<usize>>;

/// A non-spatial statistics table, as read from a CSV file or a spreadsheet.
#[derive(Clone,Debug,PartialEq)]
pub(crate) struct AttributeTable {
    columns: Vec<String>,
    rows: Vec<Vec<AttributeValue>>
}

impl AttributeTable {

    pub(crate) const fn new(columns: Vec<String>, rows: Vec<Vec<AttributeValue>>) -> Self {
        Self {
            columns,
            rows
        }
    }

    pub(crate) fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn rows(&self) -> &[Vec<AttributeValue>] {
        &self.rows
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn column_index(&self, column: &str) -> Result<usize,CommandError> {
        self.columns.iter().position(|name| name == column).ok_or_else(|| CommandError::KeyNotFound {
            column: column.to_owned(),
            table: "attribute table".to_owned()
        })
    }

    pub(crate) fn index_by(&self, column: usize) -> KeyIndex {
        let mut result = KeyIndex::new();
        for (i,row) in self.rows.iter().enumerate() {
            if let Some(key) = row.get(column).and_then(AttributeValue::join_key) {
                result.entry(key).or_default().push(i)
            }
        }
        result
    }

}

#[cfg(test)]
mod test {
    use super::AttributeTable;
    use crate::table::fields::AttributeValue;
    use crate::table::fields::JoinKey;

    #[test]
    fn test_index_groups_duplicates_and_skips_nulls() {
        let table = AttributeTable::new(vec!["name".to_owned()],vec![
            vec![AttributeValue::Text("Papula".to_owned())],
            vec![AttributeValue::Null],
            vec![AttributeValue::Text("Repola".to_owned())],
            vec![AttributeValue::Text("Papula".to_owned())],
        ]);
        let index = table.index_by(0);
        assert_eq!(index.len(),2);
        assert_eq!(index.get(&JoinKey::Text("Papula".to_owned())),Some(&vec![0,3]));
        assert_eq!(index.get_index(1).map(|(key,_)| key),Some(&JoinKey::Text("Repola".to_owned())));
    }

    #[test]
    fn test_missing_column_names_table() {
        let table = AttributeTable::new(vec!["name".to_owned()],Vec::new());
        let error = table.column_index("Kaupunginosa").unwrap_err().to_string();
        assert!(error.contains("Kaupunginosa"));
        assert!(error.contains("attribute table"));
    }
}
