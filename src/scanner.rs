use crate::detector::Detection;
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that never contain sources worth scanning
const SKIPPED_DIRECTORIES: [&str; 3] = ["target", "build", "out"];

/// How candidate source files are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ScanMode {
    /// Interfaces under a `controller` directory, excluding `*Controller.java` files
    #[default]
    Interfaces,
    /// Classes annotated with `@RestController` or `@Controller`
    Controllers,
}

impl ScanMode {
    /// Path-based part of the selection rule.
    ///
    /// `relative_path` is the file path relative to its API folder.
    pub fn accepts_path(&self, relative_path: &Path) -> bool {
        let Some(file_name) = relative_path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !file_name.ends_with(".java") {
            return false;
        }

        match self {
            ScanMode::Interfaces => {
                let in_controller_dir = relative_path
                    .parent()
                    .map(|dir| {
                        dir.components().any(|c| {
                            c.as_os_str().to_string_lossy().to_lowercase().contains("controller")
                        })
                    })
                    .unwrap_or(false);
                in_controller_dir && !file_name.ends_with("Controller.java")
            }
            ScanMode::Controllers => true,
        }
    }

    /// Content-based part of the selection rule
    pub fn accepts(&self, detection: &Detection) -> bool {
        match self {
            ScanMode::Interfaces => detection.declares_interface,
            ScanMode::Controllers => detection.is_controller,
        }
    }
}

/// File scanner for traversing a directory of Java API projects.
///
/// Every immediate subdirectory of the root is treated as one API and becomes one
/// [`SourceGroup`], named after the directory. Java files sitting directly in the root
/// form a group named after the root itself. Hidden directories and build output
/// directories (`target`, `build`, `out`) are skipped.
///
/// # Example
///
/// ```no_run
/// use postman_from_source::scanner::{FileScanner, ScanMode};
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./apis"), ScanMode::Interfaces);
/// let result = scanner.scan().unwrap();
/// for group in &result.groups {
///     println!("{}: {} candidate files", group.name, group.files.len());
/// }
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    mode: ScanMode,
}

/// Candidate files belonging to one API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    /// The API name (directory name)
    pub name: String,
    /// Candidate `.java` files, ordered by path
    pub files: Vec<PathBuf>,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// One group per API directory, ordered by name
    pub groups: Vec<SourceGroup>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl ScanResult {
    /// Total number of candidate files across all groups
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory and selection mode.
    pub fn new(root_path: PathBuf, mode: ScanMode) -> Self {
        Self { root_path, mode }
    }

    /// Scans the directory tree and groups candidate files by API.
    ///
    /// Only the path-based selection rule is applied here; the content-based rule needs a
    /// parsed file and is applied by the caller through [`ScanMode::accepts`].
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be read.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut warnings = Vec::new();

        let mut root_group = SourceGroup {
            name: self.root_name(),
            files: Vec::new(),
        };
        let mut groups: Vec<SourceGroup> = Vec::new();

        for entry in std::fs::read_dir(&self.root_path)
            .with_context(|| format!("Failed to read directory: {}", self.root_path.display()))?
        {
            let entry = entry.with_context(|| {
                format!("Failed to read directory: {}", self.root_path.display())
            })?;
            let path = entry.path();
            if path.is_dir() && !Self::is_skipped(&entry.file_name().to_string_lossy()) {
                groups.push(SourceGroup {
                    name: entry.file_name().to_string_lossy().to_string(),
                    files: Vec::new(),
                });
            }
        }
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in self.walk(&mut warnings) {
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&self.root_path) else {
                continue;
            };

            let mut components = relative.components();
            let first = components.next();
            let in_api_folder = components.clone().next().is_some();

            // Path rules apply below the API folder, never to the folder name itself
            let (group, api_relative) = match first {
                Some(first) if in_api_folder => {
                    let name = first.as_os_str().to_string_lossy();
                    (groups.iter_mut().find(|g| g.name == name), components.as_path())
                }
                _ => (Some(&mut root_group), relative),
            };
            if !self.mode.accepts_path(api_relative) {
                continue;
            }
            if let Some(group) = group {
                debug!("Candidate file: {}", path.display());
                group.files.push(path.to_path_buf());
            }
        }

        if !root_group.files.is_empty() {
            groups.insert(0, root_group);
        }

        Ok(ScanResult { groups, warnings })
    }

    /// Collects every `.java` file under the root, regardless of scan mode.
    pub fn java_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root_path.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root_path.display());
        }

        let mut warnings = Vec::new();
        let files = self
            .walk(&mut warnings)
            .into_iter()
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("java"))
            .collect();
        Ok(files)
    }

    /// Walks the tree in file-name order, returning regular files
    fn walk(&self, warnings: &mut Vec<String>) -> Vec<DirEntry> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }
                !(e.file_type().is_dir() && Self::is_skipped(&e.file_name().to_string_lossy()))
            })
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry);
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        files
    }

    fn is_skipped(dir_name: &str) -> bool {
        dir_name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&dir_name)
    }

    fn root_name(&self) -> String {
        self.root_path
            .canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(&self.root_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "root".to_string())
    }
}
