use std::fmt;

/// Displays a string with `ä` and `ö` (in either case) written as plain lowercase `a` and `o`.
pub(crate) struct AsFoldedUmlauts<StringType: AsRef<str>>(StringType);

impl<T: AsRef<str>> fmt::Display for AsFoldedUmlauts<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write as _;

        for char in self.0.as_ref().chars() {
            f.write_char(match char {
                'ä' | 'Ä' => 'a',
                'ö' | 'Ö' => 'o',
                other => other
            })?
        }
        Ok(())
    }
}

pub(crate) trait FoldUmlauts: ToOwned {
    /// Replace the umlaut vowels found in Finnish names so the text is ASCII-safe for web clients.
    fn fold_umlauts(&self) -> Self::Owned;
}

impl FoldUmlauts for str {
    fn fold_umlauts(&self) -> String {
        AsFoldedUmlauts(self).to_string()
    }
}

/// Column names as the district maps expect them: lowercase and without umlauts.
pub(crate) fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().fold_umlauts()
}

#[cfg(test)]
mod test {
    use super::FoldUmlauts as _;
    use super::normalize_column_name;

    #[test]
    fn test_fold_umlauts() {
        assert_eq!("Väkiluku".fold_umlauts(),"Vakiluku");
        assert_eq!("ÄÖ venäjä".fold_umlauts(),"ao venaja");
        assert_eq!("Åbo".fold_umlauts(),"Åbo");
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Yhteensä"),"yhteensa");
        assert_eq!(normalize_column_name("VENÄJÄ"),"venaja");
    }
}
