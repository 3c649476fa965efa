//! Platform path-comparison convention.
//!
//! Build output paths are canonicalized upstream, but their comparison rules
//! still depend on the host filesystem: Windows and macOS treat paths
//! case-insensitively, other platforms do not. The helpers here centralize
//! that convention so routing and partition selection always agree with the
//! file-identity type.

use std::path::Path;

/// Returns `true` if path comparisons on this platform ignore case.
pub const fn comparisons_ignore_case() -> bool {
    cfg!(any(windows, target_os = "macos"))
}

/// Compares two path fragments under the platform convention.
pub fn fragments_equal(a: &str, b: &str) -> bool {
    if comparisons_ignore_case() {
        a.len() == b.len() && a.to_uppercase() == b.to_uppercase()
    } else {
        a == b
    }
}

/// Compares two whole paths component-wise under the platform convention.
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let mut a_iter = a.components();
    let mut b_iter = b.components();
    loop {
        match (a_iter.next(), b_iter.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                match (x.as_os_str().to_str(), y.as_os_str().to_str()) {
                    (Some(x), Some(y)) if fragments_equal(x, y) => {}
                    _ => return false,
                }
            }
            _ => return false,
        }
    }
}

/// Returns the components of `path` below `base`, or `None` if `base` is not
/// an ancestor of `path` under the platform comparison convention.
///
/// An empty result means the two paths are equal. Components that are not
/// valid UTF-8 never match.
pub fn relative_components<'a>(base: &Path, path: &'a Path) -> Option<Vec<&'a str>> {
    let mut path_iter = path.components();
    for base_comp in base.components() {
        let path_comp = path_iter.next()?;
        let a = base_comp.as_os_str().to_str()?;
        let b = path_comp.as_os_str().to_str()?;
        if !fragments_equal(a, b) {
            return None;
        }
    }
    path_iter.map(|c| c.as_os_str().to_str()).collect()
}

/// Returns `true` if `dir` is a strict ancestor of `path`.
pub fn is_strict_ancestor(dir: &Path, path: &Path) -> bool {
    relative_components(dir, path).is_some_and(|rest| !rest.is_empty())
}
