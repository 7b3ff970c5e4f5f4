//! Mapping from source file paths to namespaced class names.

use std::path::{Component, Path};

use crate::error::CoreError;

/// Token joining the segments of a namespaced class name.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Derive the class name owning the file at `path`.
///
/// The source root prefix and the file extension are dropped, each
/// directory becomes a namespace segment, and only ASCII alphanumerics are
/// kept within a segment. Segments left empty by that filter are skipped.
///
/// `Lucy/Analysis/Token.cfh` under the root becomes `Lucy::Analysis::Token`.
pub fn derive_class_name(source_root: &Path, path: &Path) -> Result<String, CoreError> {
    let relative = path
        .strip_prefix(source_root)
        .map_err(|_| CoreError::MalformedPath {
            path: path.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;
    let without_extension = relative.with_extension("");

    let mut segments = Vec::new();
    for component in without_extension.components() {
        if let Component::Normal(segment) = component {
            let cleaned: String = segment
                .to_string_lossy()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            if !cleaned.is_empty() {
                segments.push(cleaned);
            }
        }
    }
    Ok(segments.join(NAMESPACE_SEPARATOR))
}

/// Relative path (without extension) that a class name maps back onto.
pub fn class_name_to_path(class_name: &str) -> String {
    class_name.replace(NAMESPACE_SEPARATOR, "/")
}

/// Last segment of a namespaced class name.
pub fn last_segment(class_name: &str) -> &str {
    class_name
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(class_name)
}
