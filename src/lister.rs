//! Listing of available templates

use std::io;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::error::ConfiguratorError;
use crate::template::SearchPath;

/// List every template file under each search directory.
///
/// Each directory gets an `In <dir>:` header followed by its files, relative
/// to that directory and sorted by name at every level. Directories
/// themselves are descended into but never listed.
pub fn list_templates(search_path: &SearchPath) -> Result<String, ConfiguratorError> {
    let mut lines = Vec::new();

    for dir in search_path {
        lines.push(format!("In {}:", dir.display()));

        if !dir.is_dir() {
            warn!(dir = %dir.display(), "search directory does not exist");
            continue;
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                ConfiguratorError::Io {
                    path,
                    source: io::Error::from(err),
                }
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            lines.push(template_name(relative));
        }
    }

    Ok(lines.join("\n"))
}

/// Path relative to a search directory, in template-name form
fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
