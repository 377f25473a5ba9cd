use std::path::{Component, Path, PathBuf};

pub fn prepend_name(name: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Strip the prefix from an entry path, and reject paths that would
/// escape the output directory. Returns `None` for entries to skip.
pub fn sanitize_entry_path(path: &Path, remove_prefix: Option<&str>) -> Option<PathBuf> {
    let mut path = path;

    if let Some(prefix) = remove_prefix {
        if let Ok(stripped) = path.strip_prefix(prefix) {
            path = stripped;
        }
    }

    let mut clean = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        };
    }

    if clean.as_os_str().is_empty() {
        return None;
    }

    Some(clean)
}

/// Whether a symlink at `link` (relative to the output directory)
/// pointing to `target` resolves to a path inside the output directory.
pub fn link_stays_within(link: &Path, target: &Path) -> bool {
    let mut depth = link
        .parent()
        .map(|parent| parent.components().count())
        .unwrap_or_default();

    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }

                depth -= 1;
            }
            _ => return false,
        };
    }

    true
}
