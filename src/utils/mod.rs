use std::path::Path;
use std::path::PathBuf;

pub(crate) mod extent;
pub(crate) mod arg_range;
pub(crate) mod umlauts;

/// Compares two paths by the files they point to, falling back to the paths as written if either can't be resolved.
pub(crate) fn same_file(first: &Path, second: &Path) -> bool {
    match (first.canonicalize(),second.canonicalize()) {
        (Ok(first),Ok(second)) => first == second,
        _ => first == second
    }
}

/// `<directory>/<stem of path>.<extension>`
pub(crate) fn sibling_path(directory: &Path, path: &Path, extension: &str) -> PathBuf {
    let stem = path.file_stem().map_or_else(|| "output".into(), |stem| stem.to_string_lossy().into_owned());
    directory.join(format!("{stem}.{extension}"))
}

#[cfg(test)]
mod test {
    use std::path::Path;
    use std::path::PathBuf;

    use super::same_file;
    use super::sibling_path;

    #[test]
    fn test_sibling_path() {
        assert_eq!(sibling_path(Path::new("clipped"),Path::new("data/water.shp"),"shp"),PathBuf::from("clipped/water.shp"));
        assert_eq!(sibling_path(Path::new("data"),Path::new("data/districts.shp"),"geojson"),PathBuf::from("data/districts.geojson"));
    }

    #[test]
    fn test_same_file_without_files() {
        assert!(same_file(Path::new("missing/a.shp"),Path::new("missing/a.shp")));
        assert!(!same_file(Path::new("missing/a.shp"),Path::new("missing/b.shp")));
    }
}
