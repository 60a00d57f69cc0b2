use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

/// Ordered class names, index-aligned with the model's output vector.
///
/// Built once at startup and never mutated, so it can be shared freely
/// across concurrent postprocessing calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Loads a label table from a file with one class name per line.
    /// Blank lines are skipped; a file with no names is rejected.
    pub fn load(filepath: &Path) -> io::Result<Self> {
        let file = File::open(filepath)?;
        let reader = io::BufReader::new(file);
        let mut names = Vec::new();

        for line_result in reader.lines() {
            let line = line_result?;
            let name = line.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }

        if names.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("no labels found in {:?}", filepath),
            ));
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_blank_lines() {
        let path = std::env::temp_dir().join("logo_prediction_labels_test.txt");
        std::fs::write(&path, "axis\n\nhdfc\n  sbi  \n").unwrap();

        let table = LabelTable::load(&path).unwrap();

        assert_eq!(table.names(), &["axis", "hdfc", "sbi"]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let path = std::env::temp_dir().join("logo_prediction_labels_empty_test.txt");
        std::fs::write(&path, "\n\n").unwrap();

        let result = LabelTable::load(&path);

        assert!(result.is_err());
        std::fs::remove_file(&path).ok();
    }
}
