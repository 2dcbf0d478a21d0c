use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{CarouselError, Result};

/// File name with directories and the extension removed.
pub fn short_file_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a list file: one entry per line, trimmed, blank lines skipped.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let to_err = |source: io::Error| CarouselError::ListFile {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::open(path).map_err(to_err)?;
    let mut entries = Vec::new();
    for line in io::BufReader::new(file).lines() {
        let line = line.map_err(to_err)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        entries.push(trimmed.to_string());
    }

    log::debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn short_name_of_nested_path() {
        assert_eq!(short_file_name(&PathBuf::from("/a/b/c.tar.gz")), "c.tar");
        assert_eq!(short_file_name(&PathBuf::from("plain")), "plain");
        assert_eq!(short_file_name(&PathBuf::from("/")), "");
    }

    #[test]
    fn list_skips_blank_lines_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("images.txt");
        fs::write(&list, "  one.png \n\n\t\ntwo.jpg\r\n   \nthree.webp").unwrap();

        let entries = read_list(&list).unwrap();
        assert_eq!(entries, vec!["one.png", "two.jpg", "three.webp"]);
    }

    #[test]
    fn missing_list_reports_path() {
        let err = read_list(Path::new("/no/such/list.txt")).unwrap_err();
        assert!(matches!(err, CarouselError::ListFile { .. }));
        assert_eq!(err.to_string(), "cannot open file: /no/such/list.txt");
    }
}
