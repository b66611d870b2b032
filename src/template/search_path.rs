//! Ordered template search path

use std::fmt;
use std::path::PathBuf;

/// Directories probed in order when resolving a template name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Append a directory with the lowest precedence
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve a template name to the first matching file.
    ///
    /// Names are `/`-separated and relative to each directory. A name
    /// containing a `..` segment never resolves.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let pieces = split_template_name(name)?;
        self.dirs
            .iter()
            .map(|dir| pieces.iter().fold(dir.clone(), |path, piece| path.join(piece)))
            .find(|candidate| candidate.is_file())
    }

    /// Read a template by name, `None` when no directory has it
    pub fn read(&self, name: &str) -> std::io::Result<Option<(PathBuf, String)>> {
        match self.find(name) {
            Some(path) => {
                let source = std::fs::read_to_string(&path)?;
                Ok(Some((path, source)))
            }
            None => Ok(None),
        }
    }
}

fn split_template_name(name: &str) -> Option<Vec<&str>> {
    let mut pieces = Vec::new();
    for piece in name.split('/') {
        match piece {
            ".." => return None,
            "" | "." => continue,
            other => pieces.push(other),
        }
    }
    if pieces.is_empty() {
        None
    } else {
        Some(pieces)
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_first_directory_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "app.conf", "first");
        write(second.path(), "app.conf", "second");

        let search_path = SearchPath::new(vec![first.path().into(), second.path().into()]);
        let (path, source) = search_path.read("app.conf").unwrap().unwrap();
        assert_eq!(path, first.path().join("app.conf"));
        assert_eq!(source, "first");
    }

    #[test]
    fn test_falls_through_to_later_directory() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(second.path(), "nginx/site.conf", "x");

        let search_path = SearchPath::new(vec![first.path().into(), second.path().into()]);
        assert_eq!(
            search_path.find("nginx/site.conf"),
            Some(second.path().join("nginx").join("site.conf"))
        );
    }

    #[test]
    fn test_directories_do_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "nginx/site.conf", "x");

        let search_path = SearchPath::new(vec![dir.path().into()]);
        assert_eq!(search_path.find("nginx"), None);
        assert_eq!(search_path.read("missing").unwrap(), None);
    }

    #[test]
    fn test_parent_segments_are_rejected() {
        let outer = tempfile::tempdir().unwrap();
        write(outer.path(), "secret.txt", "x");
        let inner = outer.path().join("templates");
        fs::create_dir_all(&inner).unwrap();

        let search_path = SearchPath::new(vec![inner]);
        assert_eq!(search_path.find("../secret.txt"), None);
        assert_eq!(search_path.find(""), None);
    }

    #[test]
    fn test_display_joins_directories() {
        let search_path = SearchPath::new(vec![PathBuf::from("/etc/t"), PathBuf::from("/opt/t")]);
        assert_eq!(search_path.to_string(), "/etc/t, /opt/t");
    }
}
