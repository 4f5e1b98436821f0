//! Directory scanner for comic collections.
//!
//! Walks the library root recursively, in sorted order, and returns every
//! comic archive still waiting for metadata.

use std::path::{Path, PathBuf};

use bdtag_core::FileHandle;

use crate::archive;

/// What the scanner should pick up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Also treat plain `.zip` files as comic archives.
    pub accept_zip: bool,
    /// Keep archives that already carry a `ComicInfo.xml`.
    pub include_tagged: bool,
}

impl ScanOptions {
    fn accepts_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("cbz") || (self.accept_zip && ext.eq_ignore_ascii_case("zip"))
    }
}

/// Scan `root` for comic archives.
///
/// Archives that cannot be opened as zips are logged and skipped in every
/// mode.
pub fn scan_comics(root: &Path, options: &ScanOptions) -> std::io::Result<Vec<FileHandle>> {
    let mut paths = Vec::new();
    collect_archives(root, options, &mut paths)?;

    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        match archive::has_comicinfo(&path) {
            Ok(true) if !options.include_tagged => {
                log::debug!("Skipping already tagged {}", path.display());
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("Could not open {}: {e}", path.display());
                continue;
            }
        }
        handles.push(FileHandle::new(path, root));
    }

    Ok(handles)
}

fn collect_archives(dir: &Path, options: &ScanOptions, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(dir)?.flatten().collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            if let Err(e) = collect_archives(&path, options, out) {
                log::warn!("Could not read {}: {e}", path.display());
            }
        } else if has_accepted_extension(&path, options) {
            out.push(path);
        }
    }
    Ok(())
}

fn has_accepted_extension(path: &Path, options: &ScanOptions) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| options.accepts_extension(e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn write_zip(path: &Path, entries: &[&str]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for entry in entries {
            writer.start_file(*entry, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"data").unwrap();
        }
        writer.finish().unwrap();
    }

    fn stems(handles: &[FileHandle]) -> Vec<&str> {
        handles.iter().map(|h| h.stem.as_str()).collect()
    }

    #[test]
    fn test_scan_recurses_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_zip(&root.join("Blacksad/Blacksad T02.cbz"), &["01.jpg"]);
        write_zip(&root.join("Blacksad/Blacksad T01.cbz"), &["01.jpg"]);
        write_zip(&root.join("Aria 01.cbz"), &["01.jpg"]);
        std::fs::write(root.join("notes.txt"), "ignore me").unwrap();

        let handles = scan_comics(root, &ScanOptions::default()).unwrap();

        assert_eq!(stems(&handles), vec!["Aria 01", "Blacksad T01", "Blacksad T02"]);
        assert_eq!(handles[1].ancestors, vec!["Blacksad".to_string()]);
        assert!(handles[0].ancestors.is_empty());
    }

    #[test]
    fn test_scan_zip_only_when_accepted() {
        let dir = tempfile::tempdir().unwrap();
        write_zip(&dir.path().join("Thorgal 03.zip"), &["01.jpg"]);
        write_zip(&dir.path().join("Thorgal 04.CBZ"), &["01.jpg"]);

        let default = scan_comics(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(stems(&default), vec!["Thorgal 04"]);

        let options = ScanOptions {
            accept_zip: true,
            ..Default::default()
        };
        let with_zip = scan_comics(dir.path(), &options).unwrap();
        assert_eq!(stems(&with_zip), vec!["Thorgal 03", "Thorgal 04"]);
    }

    #[test]
    fn test_scan_skips_tagged_unless_included() {
        let dir = tempfile::tempdir().unwrap();
        write_zip(&dir.path().join("A 1.cbz"), &["01.jpg", archive::COMICINFO_ENTRY]);
        write_zip(&dir.path().join("A 2.cbz"), &["01.jpg"]);

        let pending = scan_comics(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(stems(&pending), vec!["A 2"]);

        let options = ScanOptions {
            include_tagged: true,
            ..Default::default()
        };
        let all = scan_comics(dir.path(), &options).unwrap();
        assert_eq!(stems(&all), vec!["A 1", "A 2"]);
    }

    #[test]
    fn test_scan_skips_broken_archives() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.cbz"), b"not a zip").unwrap();
        write_zip(&dir.path().join("good 1.cbz"), &["01.jpg"]);

        let handles = scan_comics(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(stems(&handles), vec!["good 1"]);

        let options = ScanOptions {
            include_tagged: true,
            ..Default::default()
        };
        let handles = scan_comics(dir.path(), &options).unwrap();
        assert_eq!(stems(&handles), vec!["good 1"]);
    }

    #[test]
    fn test_scan_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_comics(&dir.path().join("missing"), &ScanOptions::default()).is_err());
    }
}
