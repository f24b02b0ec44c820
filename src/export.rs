use anyhow::{Context, Result};
use log2::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::crawler::Relation;

/// Default location of the relations export
pub const DEFAULT_EXPORT_PATH: &str = "relations.json";

/// Writes relations as a JSON array of `[source, target, depth]` arrays
pub fn write_relations(path: &Path, relations: &[Relation]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, relations)?;
    writer.flush()?;

    info!("Wrote {} relations to {}", relations.len(), path.display());
    Ok(())
}

pub fn read_relations(path: &Path) -> Result<Vec<Relation>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let relations: Vec<Relation> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a relations export", path.display()))?;

    info!("Loaded {} relations from {}", relations.len(), path.display());
    Ok(relations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::DomainKey;

    fn relation(source: &str, target: &str, depth: usize) -> Relation {
        Relation::new(DomainKey::from(source), DomainKey::from(target), depth)
    }

    #[test]
    fn test_relations_serialize_as_arrays() -> Result<()> {
        let relations = vec![relation("a.test", "b.test", 1), relation("b.test", "c.test", 2)];
        let json = serde_json::to_string(&relations)?;
        assert_eq!(json, r#"[["a.test","b.test",1],["b.test","c.test",2]]"#);
        Ok(())
    }

    #[test]
    fn test_empty_export_is_empty_array() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("relations.json");
        write_relations(&path, &[])?;
        assert_eq!(std::fs::read_to_string(&path)?, "[]");
        Ok(())
    }

    #[test]
    fn test_read_rejects_wrong_shape() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"[{"source": "a.test"}]"#)?;
        assert!(read_relations(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_relations(Path::new("/definitely/not/here.json")).is_err());
    }
}
