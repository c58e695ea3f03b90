// Translation Units
// A unit is one `.vm` source named by its file stem. Directory input becomes an ordered
// list of units with the entry-point unit first.

use std::fs;
use std::path::Path;

use crate::vm_translator::error::TranslatorError;

pub const SOURCE_EXTENSION: &str = "vm";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// Qualifies static symbols (`<name>.<offset>`)
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: &str, source: &str) -> Self {
        SourceUnit {
            name: name.to_string(),
            source: source.to_string(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, TranslatorError> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                TranslatorError::IOError(format!("'{}' has no file name", path.display()))
            })?;
        let source = fs::read_to_string(path).map_err(|err| {
            TranslatorError::IOError(format!("reading '{}': {}", path.display(), err))
        })?;
        log::debug!("Read unit '{}' from {} ({} bytes)", name, path.display(), source.len());
        Ok(SourceUnit { name, source })
    }
}

/// Put the entry-point unit first and the rest in name order.
pub fn order_units(mut units: Vec<SourceUnit>, entry_point: &str) -> Vec<SourceUnit> {
    units.sort_by(|a, b| {
        (a.name != entry_point)
            .cmp(&(b.name != entry_point))
            .then_with(|| a.name.cmp(&b.name))
    });
    units
}

/// Units for a `.vm` file or for every `.vm` file directly inside a directory.
pub fn load_units(path: &Path, entry_point: &str) -> Result<Vec<SourceUnit>, TranslatorError> {
    if !path.is_dir() {
        return Ok(vec![SourceUnit::from_path(path)?]);
    }

    let mut units = Vec::new();
    let entries = fs::read_dir(path).map_err(|err| {
        TranslatorError::IOError(format!("reading directory '{}': {}", path.display(), err))
    })?;
    for entry in entries {
        let file_path = entry?.path();
        let is_source = file_path.is_file()
            && file_path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION);
        if is_source {
            units.push(SourceUnit::from_path(&file_path)?);
        }
    }

    if units.is_empty() {
        return Err(TranslatorError::IOError(format!(
            "no .{} files in '{}'",
            SOURCE_EXTENSION,
            path.display()
        )));
    }

    let units = order_units(units, entry_point);
    log::info!(
        "Directory {}: {} units, order [{}]",
        path.display(),
        units.len(),
        units
            .iter()
            .map(|unit| unit.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use test_log::test;

    fn names(units: &[SourceUnit]) -> Vec<&str> {
        units.iter().map(|unit| unit.name.as_str()).collect()
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("hackvm-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_entry_point_sorted_first() {
        let units = vec![
            SourceUnit::new("Main", ""),
            SourceUnit::new("Array", ""),
            SourceUnit::new("Sys", ""),
            SourceUnit::new("Math", ""),
        ];
        let ordered = order_units(units, "Sys");
        assert_eq!(names(&ordered), vec!["Sys", "Array", "Main", "Math"]);
    }

    #[test]
    fn test_missing_entry_point_keeps_name_order() {
        let units = vec![SourceUnit::new("B", ""), SourceUnit::new("A", "")];
        let ordered = order_units(units, "Sys");
        assert_eq!(names(&ordered), vec!["A", "B"]);
    }

    #[test]
    fn test_load_directory_skips_other_files() {
        let dir = scratch_dir("load");
        fs::write(dir.join("Main.vm"), "push constant 1\n").unwrap();
        fs::write(dir.join("Sys.vm"), "push constant 2\n").unwrap();
        fs::write(dir.join("notes.txt"), "not vm code").unwrap();

        let units = load_units(&dir, "Sys").unwrap();
        assert_eq!(names(&units), vec!["Sys", "Main"]);
        assert_eq!(units[1].source, "push constant 1\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_single_file_names_unit_by_stem() {
        let dir = scratch_dir("single");
        let file = dir.join("SimpleAdd.vm");
        fs::write(&file, "push constant 7\n").unwrap();

        let units = load_units(&file, "Sys").unwrap();
        assert_eq!(names(&units), vec!["SimpleAdd"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = scratch_dir("empty");
        assert!(matches!(
            load_units(&dir, "Sys"),
            Err(TranslatorError::IOError(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
