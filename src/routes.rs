use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RouteError;

/// Extensions recognized as route sources unless overridden.
pub const DEFAULT_EXTENSIONS: &[&str] = &["html", "htm", "md"];

/// One discovered route: a source file and the URL pattern derived from
/// its name. Handed to the host router at startup and not retained here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The file the route was derived from.
    pub source: PathBuf,
    /// The derived URL pattern, e.g. `/users/:userId`.
    pub path: String,
}

/// Startup-time directory scan that turns file names into URL patterns.
///
/// Naming conventions: `index.(ext)` collapses to its directory's root,
/// `$name` segments (files or directories) become `:name` parameters, and
/// nested directories compose segments.
#[derive(Debug, Clone)]
pub struct RouteDiscovery {
    root: PathBuf,
    extensions: Vec<String>,
}

impl RouteDiscovery {
    /// Scans under `root` for files with the [default extensions]
    /// (DEFAULT_EXTENSIONS).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Replaces the recognized extension set, compared without the dot and
    /// case-insensitively.
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Recursively lists every file under the root, in traversal order.
    /// Fails if the root is missing, not a directory, or unreadable.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, RouteError> {
        if !self.root.is_dir() {
            return Err(RouteError::NotADirectory(self.root.clone()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        tracing::debug!(root = %self.root.display(), files = files.len(), "route scan finished");
        Ok(files)
    }

    /// Lists files and derives a route for each recognized one.
    pub fn discover(&self) -> Result<Vec<Route>, RouteError> {
        let mut routes = Vec::new();
        for source in self.list_files()? {
            if let Some(path) = url_path(&source, &self.root, &self.extensions)? {
                tracing::trace!(source = %source.display(), %path, "route derived");
                routes.push(Route { source, path });
            }
        }
        Ok(routes)
    }
}

/// Derives the URL pattern for one file: relative to `root`, recognized
/// extension stripped, a trailing `index` segment collapsed to the
/// directory root, and `$token` segments rewritten to `:token`.
///
/// Pure and deterministic. Returns `Ok(None)` when the extension is not
/// recognized (the file is not a route source), and an error when the file
/// is not under `root`.
///
/// A root-level `index` file maps to `/`.
pub fn url_path<S>(file: &Path, root: &Path, extensions: &[S]) -> Result<Option<String>, RouteError>
where
    S: AsRef<str>,
{
    let relative = file
        .strip_prefix(root)
        .map_err(|_| RouteError::OutsideRoot {
            file: file.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let extension = match relative.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return Ok(None),
    };
    if !extensions.iter().any(|allowed| allowed.as_ref() == extension) {
        return Ok(None);
    }

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => match segment.to_str() {
                Some(segment) => segments.push(segment.to_owned()),
                // non-UTF8 names cannot become URL segments
                None => return Ok(None),
            },
            _ => {
                return Err(RouteError::OutsideRoot {
                    file: file.to_path_buf(),
                    root: root.to_path_buf(),
                })
            }
        }
    }

    if let Some(last) = segments.last_mut() {
        last.truncate(last.len() - extension.len() - 1);
    }
    if segments.last().is_some_and(|segment| segment == "index") {
        segments.pop();
    }

    let path = segments
        .iter()
        .map(|segment| match segment.strip_prefix('$') {
            Some(param) => format!(":{param}"),
            None => segment.clone(),
        })
        .collect::<Vec<_>>()
        .join("/");

    Ok(Some(format!("/{path}")))
}
