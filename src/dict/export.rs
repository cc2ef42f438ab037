use crate::dict::record::{Record, ID_FIELD};
use crate::dict::repository::is_safe_name;
use crate::dict::{DictError, Result};
use crate::store::atomic_write;
use std::path::{Path, PathBuf};

/// File name used when exporting `collection`.
pub fn export_file_name(collection: &str) -> String {
    format!("{collection}_data.json")
}

/// Records as exported: `_id` removed, every other field kept in order.
pub fn export_records(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.remove(ID_FIELD);
            r
        })
        .collect()
}

/// Write `records` to `<dir>/<collection>_data.json`. Names that would
/// leave `dir` are refused.
pub fn write_export(collection: &str, records: &[Record], dir: &Path) -> Result<PathBuf> {
    if !is_safe_name(collection) {
        return Err(DictError::InvalidName(collection.to_string()));
    }
    let path = dir.join(export_file_name(collection));
    let json = serde_json::to_vec_pretty(&export_records(records))?;
    atomic_write(&path, &json)?;
    tracing::info!(collection, path = %path.display(), "exported collection");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::record::CREATE_TIME_FIELD;
    use tempfile::tempdir;

    #[test]
    fn strips_id_but_keeps_create_time() {
        let records: Vec<Record> = vec![[
            (ID_FIELD, "1-0"),
            ("name", "tom"),
            (CREATE_TIME_FIELD, "2024-01-01 10:00:00.000"),
        ]
        .into_iter()
        .collect()];
        let dir = tempdir().unwrap();
        let path = write_export("people", &records, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "people_data.json");
        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            back,
            serde_json::json!([{"name": "tom", "createTime": "2024-01-01 10:00:00.000"}])
        );
    }

    #[test]
    fn refuses_names_that_escape_the_export_dir() {
        let root = tempdir().unwrap();
        let dir = root.path().join("exports");
        std::fs::create_dir(&dir).unwrap();
        for name in ["../x", "a/b", ".."] {
            assert!(matches!(
                write_export(name, &[], &dir),
                Err(DictError::InvalidName(_))
            ));
        }
        assert!(!root.path().join("x_data.json").exists());
    }
}
