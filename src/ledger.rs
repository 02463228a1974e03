//! Flat file of resource identifiers shared between create and terminate runs.
//!
//! One identifier per line. Blank lines and lines starting with `#` are
//! ignored when reading, so the file can be annotated by hand.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Writes `ids` to `path`, one per line, replacing any existing file.
pub fn write_ids(path: impl AsRef<Path>, ids: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    for id in ids {
        writeln!(writer, "{id}")?;
    }
    writer.flush()
}

/// Reads identifiers from `path` in file order.
pub fn read_ids(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        ids.push(trimmed.to_string());
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_ids_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.txt");
        let ids: Vec<String> = (1..=5).map(|n| format!("ocid1.instance.oc1..{n}")).collect();

        write_ids(&path, &ids).unwrap();
        assert_eq!(read_ids(&path).unwrap(), ids);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.txt");
        std::fs::write(
            &path,
            "# launched 2026-10-17\nocid1.instance.a\n\n   \n  ocid1.instance.b  \n#ocid1.instance.c\n",
        )
        .unwrap();

        assert_eq!(
            read_ids(&path).unwrap(),
            vec!["ocid1.instance.a".to_string(), "ocid1.instance.b".to_string()]
        );
    }

    #[test]
    fn rewriting_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.txt");
        write_ids(&path, &["old".to_string(), "older".to_string()]).unwrap();
        write_ids(&path, &["new".to_string()]).unwrap();
        assert_eq!(read_ids(&path).unwrap(), vec!["new".to_string()]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_ids(dir.path().join("nope.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
