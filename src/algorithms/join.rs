use std::path::Path;

use clap::Args;
use clap::ValueEnum;

use crate::errors::CommandError;
use crate::progress::ProgressObserver;
use crate::progress::WatchableIterator as _;
use crate::table::attributes::AttributeTable;
use crate::table::attributes::KeyIndex;
use crate::table::fields::AttributeValue;
use crate::table::layers::TableFormat;
use crate::table::layers::read_attribute_table;
use crate::table::layers::read_spatial_table;
use crate::table::spatial::SpatialFeatureTable;
use crate::table::spatial::SpatialRow;
use crate::utils::umlauts::normalize_column_name;

/// Which rows are kept when joining statistics onto a map.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,ValueEnum)]
pub(crate) enum JoinHow {
    /// Every map feature is kept, in map order. Features without statistics get empty values.
    #[default]
    Left,
    /// Every statistics row is kept, in table order. Rows without a map feature have no geometry.
    Right,
    /// Only map features with matching statistics are kept.
    Inner,
    /// Every map feature, followed by the statistics rows which matched none of them.
    Outer
}

#[derive(Clone,Debug,Args)]
pub(crate) struct JoinSettings {
    #[arg(long)]
    /// The name of the key column in the map
    pub(crate) spatial_key: String,

    #[arg(long)]
    /// The name of the key column in the statistics table
    pub(crate) attributes_key: String,

    #[arg(long,value_enum,default_value_t)]
    /// Which rows to keep
    pub(crate) how: JoinHow,

    #[arg(long)]
    /// Lowercase the output column names and replace the umlauts in them
    pub(crate) normalize_columns: bool
}

// Column positions of the two tables, and where their values land in a joined row.
struct JoinLayout {
    spatial_key: usize,
    spatial_columns: Vec<usize>,
    attributes_key: usize,
    attribute_columns: Vec<usize>
}

impl JoinLayout {

    fn value(values: Option<&[AttributeValue]>, column: usize) -> AttributeValue {
        values.and_then(|values| values.get(column)).cloned().unwrap_or(AttributeValue::Null)
    }

    fn row(&self, spatial: Option<&SpatialRow>, attributes: Option<&[AttributeValue]>) -> SpatialRow {
        let spatial_values = spatial.map(|row| row.values.as_slice());
        let key = if spatial.is_some() {
            Self::value(spatial_values,self.spatial_key)
        } else {
            Self::value(attributes,self.attributes_key)
        };

        let mut values = Vec::with_capacity(1 + self.spatial_columns.len() + self.attribute_columns.len());
        values.push(key);
        values.extend(self.spatial_columns.iter().map(|column| Self::value(spatial_values,*column)));
        values.extend(self.attribute_columns.iter().map(|column| Self::value(attributes,*column)));

        SpatialRow::new(spatial.and_then(|row| row.geometry.clone()),values)
    }

}

fn index_spatial_rows(table: &SpatialFeatureTable, column: usize) -> KeyIndex {
    let mut result = KeyIndex::new();
    for (i,row) in table.rows().iter().enumerate() {
        if let Some(key) = row.values.get(column).and_then(AttributeValue::join_key) {
            result.entry(key).or_default().push(i)
        }
    }
    result
}

/**
Joins the statistics onto the map features by key. The result starts with the key column, named after the map's key
column, followed by the other map columns and then the other statistics columns. Columns other than the keys may not
appear in both tables.
*/
pub(crate) fn combine<Progress: ProgressObserver>(spatial: &SpatialFeatureTable, attributes: &AttributeTable, settings: &JoinSettings, progress: &mut Progress) -> Result<SpatialFeatureTable,CommandError> {
    let spatial_key = spatial.column_index(&settings.spatial_key)?;
    let attributes_key = attributes.column_index(&settings.attributes_key)?;

    let attribute_columns: Vec<usize> = (0..attributes.columns().len()).filter(|column| *column != attributes_key).collect();
    for name in attribute_columns.iter().filter_map(|column| attributes.columns().get(*column)) {
        if spatial.columns().contains(name) {
            return Err(CommandError::OverlappingColumns(name.clone()))
        }
    }
    let spatial_columns: Vec<usize> = (0..spatial.columns().len()).filter(|column| *column != spatial_key).collect();

    let mut columns = vec![settings.spatial_key.clone()];
    columns.extend(spatial_columns.iter().filter_map(|column| spatial.columns().get(*column)).cloned());
    columns.extend(attribute_columns.iter().filter_map(|column| attributes.columns().get(*column)).cloned());

    let layout = JoinLayout {
        spatial_key,
        spatial_columns,
        attributes_key,
        attribute_columns
    };

    let mut rows = Vec::new();

    if settings.how == JoinHow::Right {
        let spatial_index = index_spatial_rows(spatial,spatial_key);
        for attribute_row in attributes.rows().iter().watch(progress,"Joining statistics.","Statistics joined.") {
            let matches = attribute_row.get(attributes_key).and_then(AttributeValue::join_key).and_then(|key| spatial_index.get(&key));
            if let Some(matches) = matches {
                for spatial_row in matches.iter().filter_map(|i| spatial.rows().get(*i)) {
                    rows.push(layout.row(Some(spatial_row),Some(attribute_row.as_slice())))
                }
            } else {
                rows.push(layout.row(None,Some(attribute_row.as_slice())))
            }
        }
    } else {
        let attribute_index = attributes.index_by(attributes_key);
        let mut matched = vec![false; attributes.len()];
        for spatial_row in spatial.rows().iter().watch(progress,"Joining statistics.","Statistics joined.") {
            let matches = spatial_row.values.get(spatial_key).and_then(AttributeValue::join_key).and_then(|key| attribute_index.get(&key));
            if let Some(matches) = matches {
                for i in matches {
                    if let Some(flag) = matched.get_mut(*i) {
                        *flag = true
                    }
                    rows.push(layout.row(Some(spatial_row),attributes.rows().get(*i).map(Vec::as_slice)))
                }
            } else if matches!(settings.how,JoinHow::Left | JoinHow::Outer) {
                rows.push(layout.row(Some(spatial_row),None))
            }
        }

        if settings.how == JoinHow::Outer {
            for (attribute_row,_) in attributes.rows().iter().zip(&matched).filter(|(_,matched)| !**matched) {
                rows.push(layout.row(None,Some(attribute_row.as_slice())))
            }
        }
    }

    let mut result = SpatialFeatureTable::new(spatial.crs().cloned(),columns,rows);
    if settings.normalize_columns {
        result.rename_columns(normalize_column_name)
    }
    Ok(result)
}

/// Loads the map and the statistics table and joins them. `sheet` picks the worksheet of a spreadsheet.
pub(crate) fn combine_files<Progress: ProgressObserver>(spatial_path: &Path, attributes_path: &Path, sheet: Option<&str>, settings: &JoinSettings, progress: &mut Progress) -> Result<SpatialFeatureTable,CommandError> {
    // fail on an unknown statistics format before reading the map
    _ = TableFormat::from_path(attributes_path)?;

    let spatial = read_spatial_table(spatial_path,progress)?;
    let attributes = read_attribute_table(attributes_path,sheet,progress)?;
    combine(&spatial,&attributes,settings,progress)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use geo_types::polygon;

    use super::JoinHow;
    use super::JoinSettings;
    use super::combine;
    use super::combine_files;
    use crate::errors::CommandError;
    use crate::geometry::ArealGeometry;
    use crate::table::attributes::AttributeTable;
    use crate::table::fields::AttributeValue;
    use crate::table::spatial::SpatialFeatureTable;
    use crate::table::spatial::SpatialRow;

    fn text(value: &str) -> AttributeValue {
        AttributeValue::Text(value.to_owned())
    }

    fn settings(how: JoinHow) -> JoinSettings {
        JoinSettings {
            spatial_key: "NAME".to_owned(),
            attributes_key: "Kaupunginosa".to_owned(),
            how,
            normalize_columns: false
        }
    }

    fn districts(names: &[&str]) -> SpatialFeatureTable {
        let rows = names.iter().enumerate().map(|(i,name)| {
            let x = i as f64;
            let square = polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0), (x: x, y: 0.0)];
            SpatialRow::new(Some(ArealGeometry::Polygon(square)),vec![AttributeValue::Integer(i as i64),text(name)])
        }).collect();
        SpatialFeatureTable::new(None,vec!["id".to_owned(),"NAME".to_owned()],rows)
    }

    fn statistics(rows: &[(&str,i64)]) -> AttributeTable {
        AttributeTable::new(vec!["Kaupunginosa".to_owned(),"Yhteensä".to_owned()],rows.iter().map(|(name,total)| {
            vec![text(name),AttributeValue::Integer(*total)]
        }).collect())
    }

    #[test]
    fn test_left_join_keeps_every_district() {
        let spatial = districts(&["Papula","Repola","Linna"]);
        let attributes = statistics(&[("Repola",120),("Saunalahti",80)]);
        let result = combine(&spatial,&attributes,&settings(JoinHow::Left),&mut ()).unwrap();
        assert_eq!(result.columns(),&["NAME","id","Yhteensä"]);
        assert_eq!(result.len(),3);
        let populated: Vec<&SpatialRow> = result.rows().iter().filter(|row| !row.values[2].is_null()).collect();
        assert_eq!(populated.len(),1);
        assert_eq!(populated[0].values,vec![text("Repola"),AttributeValue::Integer(1),AttributeValue::Integer(120)]);
        assert!(result.rows().iter().all(|row| row.geometry.is_some()));
    }

    #[test]
    fn test_left_join_row_count() {
        let spatial = districts(&["Papula","Repola","Linna","Hiekka"]);
        // unique keys give exactly one row per district
        let unique = statistics(&[("Linna",5),("Papula",7),("Hiekka",9)]);
        assert_eq!(combine(&spatial,&unique,&settings(JoinHow::Left),&mut ()).unwrap().len(),spatial.len());
        // duplicated keys can only add rows
        let duplicated = statistics(&[("Linna",5),("Linna",6),("Papula",7)]);
        let result = combine(&spatial,&duplicated,&settings(JoinHow::Left),&mut ()).unwrap();
        assert_eq!(result.len(),spatial.len() + 1);
        assert_eq!(result.value(2,0),Some(&text("Linna")));
        assert_eq!(result.value(3,0),Some(&text("Linna")));
    }

    #[test]
    fn test_inner_right_and_outer_orders() {
        let spatial = districts(&["Papula","Repola","Linna"]);
        let attributes = statistics(&[("Saunalahti",80),("Linna",5),("Papula",7)]);

        let keys = |how: JoinHow| -> Vec<String> {
            let result = combine(&spatial,&attributes,&settings(how),&mut ()).unwrap();
            result.rows().iter().map(|row| row.values[0].to_string()).collect()
        };

        assert_eq!(keys(JoinHow::Inner),vec!["Papula","Linna"]);
        assert_eq!(keys(JoinHow::Right),vec!["Saunalahti","Linna","Papula"]);
        assert_eq!(keys(JoinHow::Outer),vec!["Papula","Repola","Linna","Saunalahti"]);

        let right = combine(&spatial,&attributes,&settings(JoinHow::Right),&mut ()).unwrap();
        assert!(right.rows()[0].geometry.is_none());
        assert!(right.rows()[0].values[1].is_null());
        assert!(right.rows()[1].geometry.is_some());
    }

    #[test]
    fn test_integral_real_keys_match() {
        let spatial = SpatialFeatureTable::new(None,vec!["NAME".to_owned()],vec![SpatialRow::new(None,vec![AttributeValue::Integer(1700)])]);
        let attributes = AttributeTable::new(vec!["Kaupunginosa".to_owned(),"value".to_owned()],vec![vec![AttributeValue::Real(1700.0),AttributeValue::Integer(3)]]);
        let result = combine(&spatial,&attributes,&settings(JoinHow::Inner),&mut ()).unwrap();
        assert_eq!(result.len(),1);
        assert_eq!(result.value(0,1),Some(&AttributeValue::Integer(3)));
    }

    #[test]
    fn test_missing_key_column() {
        let spatial = districts(&["Papula"]);
        let attributes = statistics(&[("Papula",7)]);
        let mut bad = settings(JoinHow::Left);
        bad.attributes_key = "Alue".to_owned();
        match combine(&spatial,&attributes,&bad,&mut ()) {
            Err(CommandError::KeyNotFound { column, table }) => {
                assert_eq!(column,"Alue");
                assert_eq!(table,"attribute table");
            },
            other => panic!("unexpected result {other:?}")
        }
        let mut bad = settings(JoinHow::Left);
        bad.spatial_key = "nimi".to_owned();
        assert!(matches!(combine(&spatial,&attributes,&bad,&mut ()),Err(CommandError::KeyNotFound { .. })));
    }

    #[test]
    fn test_overlapping_columns_are_rejected() {
        let spatial = districts(&["Papula"]);
        let attributes = AttributeTable::new(vec!["Kaupunginosa".to_owned(),"id".to_owned()],vec![vec![text("Papula"),AttributeValue::Integer(1)]]);
        assert!(matches!(combine(&spatial,&attributes,&settings(JoinHow::Left),&mut ()),Err(CommandError::OverlappingColumns(name)) if name == "id"));
    }

    #[test]
    fn test_normalized_column_names() {
        let spatial = districts(&["Papula"]);
        let attributes = statistics(&[("Papula",7)]);
        let mut normalized = settings(JoinHow::Left);
        normalized.normalize_columns = true;
        let result = combine(&spatial,&attributes,&normalized,&mut ()).unwrap();
        assert_eq!(result.columns(),&["name","id","yhteensa"]);
    }

    #[test]
    fn test_unsupported_statistics_format() {
        // the format is checked before the map is opened, so neither file needs to exist
        let result = combine_files(Path::new("missing/districts.shp"),Path::new("missing/population.txt"),None,&settings(JoinHow::Left),&mut ());
        assert!(matches!(result,Err(CommandError::UnsupportedFormat(_))));
    }
}
