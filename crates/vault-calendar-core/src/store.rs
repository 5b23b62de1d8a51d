//! Document storage for the note vault.
//!
//! All paths handed to and returned by a [`DocumentStore`] are vault-relative
//! and use `/` as separator, e.g. `daily/2024-03-15.md`.
//!
//! Two implementations are provided:
//! - [`VaultStore`] - markdown files below a root directory, via `tokio::fs`
//! - [`MemoryStore`] - an in-memory map, for tests and embedding

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tokio::fs;

/// Extension of the documents a store lists.
const MARKDOWN_EXTENSION: &str = "md";

/// Errors that can occur during document storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document does not exist.
    #[error("document not found: '{path}'")]
    NotFound {
        /// The vault-relative path.
        path: String,
    },

    /// `create` was called for a path that already exists.
    #[error("document already exists: '{path}'")]
    AlreadyExists {
        /// The vault-relative path.
        path: String,
    },

    /// I/O error during document read.
    #[error("failed to read document '{path}': {source}")]
    Read {
        /// The vault-relative path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during document write.
    #[error("failed to write document '{path}': {source}")]
    Write {
        /// The vault-relative path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error while listing a directory.
    #[error("failed to list directory '{path}': {source}")]
    List {
        /// The directory that failed to list.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Returns true if the error means the document is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Access to the notes of a vault.
///
/// Implementations are driven from a single task; the futures they return
/// are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Lists the paths of all markdown documents, sorted.
    async fn list_documents(&self) -> Result<Vec<String>>;

    /// Reads a document.
    async fn read(&self, path: &str) -> Result<String>;

    /// Replaces the content of a document, creating it if needed.
    async fn write(&self, path: &str, content: &str) -> Result<()>;

    /// Returns true if the document exists.
    async fn exists(&self, path: &str) -> bool;

    /// Creates a new document, failing with [`StoreError::AlreadyExists`]
    /// if one is already present.
    async fn create(&self, path: &str, content: &str) -> Result<()>;
}

/// Markdown files below a root directory.
///
/// Hidden directories (such as an editor's `.obsidian` folder) are skipped
/// when listing.
///
/// # Example
///
/// ```no_run
/// use vault_calendar_core::{DocumentStore, VaultStore};
///
/// # async fn example() -> Result<(), vault_calendar_core::StoreError> {
/// let store = VaultStore::new("/home/me/notes");
/// for path in store.list_documents().await? {
///     println!("{path}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the filesystem path of a vault-relative document path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        path.trim_start_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Converts a filesystem path below the root into a vault-relative path.
    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }

    async fn ensure_parent(&self, file: &Path) -> Result<()> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl DocumentStore for VaultStore {
    async fn list_documents(&self) -> Result<Vec<String>> {
        let mut documents = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|e| StoreError::List {
                path: dir.clone(),
                source: e,
            })?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| StoreError::List {
                path: dir.clone(),
                source: e,
            })? {
                let name = entry.file_name().to_string_lossy().into_owned();
                if is_hidden(&name) {
                    continue;
                }
                let path = entry.path();
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                if file_type.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION) {
                    if let Some(relative) = self.relative(&path) {
                        documents.push(relative);
                    }
                }
            }
        }

        documents.sort();
        Ok(documents)
    }

    async fn read(&self, path: &str) -> Result<String> {
        fs::read_to_string(self.resolve(path))
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => StoreError::NotFound {
                    path: path.to_string(),
                },
                _ => StoreError::Read {
                    path: path.to_string(),
                    source: e,
                },
            })
    }

    async fn write(&self, path: &str, content: &str) -> Result<()> {
        let file = self.resolve(path);
        self.ensure_parent(&file).await?;

        // Write to a sibling temp file, then rename over the target
        let temp = file.with_extension("md.tmp");
        fs::write(&temp, content)
            .await
            .map_err(|e| StoreError::Write {
                path: path.to_string(),
                source: e,
            })?;
        fs::rename(&temp, &file)
            .await
            .map_err(|e| StoreError::Write {
                path: path.to_string(),
                source: e,
            })
    }

    async fn exists(&self, path: &str) -> bool {
        fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    async fn create(&self, path: &str, content: &str) -> Result<()> {
        if self.exists(path).await {
            return Err(StoreError::AlreadyExists {
                path: path.to_string(),
            });
        }
        self.write(path, content).await
    }
}

/// In-memory document store.
///
/// Paths can be marked unreadable to exercise partial-failure handling.
///
/// # Example
///
/// ```
/// use vault_calendar_core::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_document("daily/2024-03-15.md", "- [ ] Buy milk");
/// assert_eq!(store.get("daily/2024-03-15.md").as_deref(), Some("- [ ] Buy milk"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, String>>,
    unreadable: Mutex<BTreeSet<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document (builder style).
    pub fn with_document(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.docs().insert(path.into(), content.into());
        self
    }

    /// Makes every read of `path` fail with an I/O error.
    pub fn with_unreadable(self, path: impl Into<String>) -> Self {
        lock(&self.unreadable).insert(path.into());
        self
    }

    /// Returns a copy of a document's content.
    pub fn get(&self, path: &str) -> Option<String> {
        self.docs().get(path).cloned()
    }

    fn docs(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        lock(&self.documents)
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DocumentStore for MemoryStore {
    async fn list_documents(&self) -> Result<Vec<String>> {
        Ok(self
            .docs()
            .keys()
            .filter(|path| path.ends_with(".md"))
            .cloned()
            .collect())
    }

    async fn read(&self, path: &str) -> Result<String> {
        if lock(&self.unreadable).contains(path) {
            return Err(StoreError::Read {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "document is unreadable"),
            });
        }
        self.get(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })
    }

    async fn write(&self, path: &str, content: &str) -> Result<()> {
        self.docs().insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.docs().contains_key(path)
    }

    async fn create(&self, path: &str, content: &str) -> Result<()> {
        let mut docs = self.docs();
        if docs.contains_key(path) {
            return Err(StoreError::AlreadyExists {
                path: path.to_string(),
            });
        }
        docs.insert(path.to_string(), content.to_string());
        Ok(())
    }
}
