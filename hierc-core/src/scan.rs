use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::CoreError;

/// Find every file below `root` with the given extension.
///
/// Entries whose name begins with `.` are skipped along with everything
/// beneath them. The result is sorted so that registration order, and with
/// it root order and duplicate diagnostics, does not depend on the
/// platform's directory iteration order.
pub fn find_source_files(
    root: impl AsRef<Path>,
    extension: &str,
) -> Result<Vec<PathBuf>, CoreError> {
    let root = root.as_ref();
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            CoreError::io(path, source)
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    debug!(root = %root.display(), count = files.len(), "found source files");
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().first() == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_nested_files_with_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("Animal/Mammal")).expect("create dirs");
        fs::write(root.join("Animal.cfh"), "").expect("write");
        fs::write(root.join("Animal/Mammal/Dog.cfh"), "").expect("write");
        fs::write(root.join("Animal/notes.txt"), "").expect("write");

        // Paths sort component-wise, so a directory precedes its sibling file.
        let files = find_source_files(root, "cfh").expect("scan");
        assert_eq!(
            files,
            vec![root.join("Animal/Mammal/Dog.cfh"), root.join("Animal.cfh")]
        );
    }

    #[test]
    fn skips_hidden_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).expect("create dirs");
        fs::write(root.join(".git/Stale.cfh"), "").expect("write");
        fs::write(root.join(".Hidden.cfh"), "").expect("write");
        fs::write(root.join("Visible.cfh"), "").expect("write");

        let files = find_source_files(root, "cfh").expect("scan");
        assert_eq!(files, vec![root.join("Visible.cfh")]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn skips_hidden_entries_with_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        let hidden = root.join(OsStr::from_bytes(b".cache\xff"));
        fs::create_dir_all(&hidden).expect("create dirs");
        fs::write(hidden.join("Stale.cfh"), "").expect("write");
        fs::write(root.join(OsStr::from_bytes(b".\xfe.cfh")), "").expect("write");
        fs::write(root.join("Visible.cfh"), "").expect("write");

        let files = find_source_files(root, "cfh").expect("scan");
        assert_eq!(files, vec![root.join("Visible.cfh")]);
    }

    #[test]
    fn hidden_root_is_still_walked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join(".sources");
        fs::create_dir_all(&root).expect("create dirs");
        fs::write(root.join("Foo.cfh"), "").expect("write");

        let files = find_source_files(&root, "cfh").expect("scan");
        assert_eq!(files, vec![root.join("Foo.cfh")]);
    }

    #[test]
    fn reports_missing_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = find_source_files(dir.path().join("missing"), "cfh").unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
