//! Directory-backed content loader with lazy loading support

use anyhow::{anyhow, Context, Result};
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::content::{Content, ContentId, ContentType};
use crate::loader::ContentLoader;

/// Type of directory items
pub static FOLDER: ContentType = ContentType::root("Folder");
/// Type of every non-directory item
pub static FILE: ContentType = ContentType::root("File");

/// Metadata for filesystem items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileData {
    /// File size in bytes (0 for directories)
    pub size: u64,
    /// Last modified timestamp
    pub modified: Option<SystemTime>,
    /// File extension (if any)
    pub extension: Option<String>,
}

impl std::fmt::Display for FileData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bytes", self.size)
    }
}

/// State of a directory's listing
#[derive(Debug, Clone)]
enum ChildrenState {
    /// Not read from disk yet
    NotLoaded,
    /// Read and cached
    Loaded(Vec<ContentId>),
    /// The last read failed; the next request retries
    Error(String),
}

#[derive(Debug, Clone)]
struct FsEntry {
    content: Content<FileData>,
    full_path: PathBuf,
    children: ChildrenState,
    /// No longer listed by its directory after a reload
    removed: bool,
}

#[derive(Debug, Default)]
struct Arena {
    /// Entry for id `n` lives at index `n - 1`
    entries: Vec<FsEntry>,
    /// Path -> id, so a reload hands out the same ids again
    path_cache: HashMap<PathBuf, ContentId>,
}

impl Arena {
    fn entry(&self, id: ContentId) -> Option<&FsEntry> {
        index_of(id)
            .and_then(|index| self.entries.get(index))
            .filter(|entry| !entry.removed)
    }

    fn entry_mut(&mut self, id: ContentId) -> Option<&mut FsEntry> {
        index_of(id)
            .and_then(|index| self.entries.get_mut(index))
            .filter(|entry| !entry.removed)
    }

    /// Entry for `id`, removed or not
    fn slot_mut(&mut self, id: ContentId) -> Option<&mut FsEntry> {
        index_of(id).and_then(|index| self.entries.get_mut(index))
    }

    /// Mark `id` and everything cached below it as removed
    fn mark_removed(&mut self, id: ContentId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(entry) = self.entry_mut(id) {
                entry.removed = true;
                if let ChildrenState::Loaded(children) = &entry.children {
                    pending.extend(children.iter().copied());
                }
                entry.children = ChildrenState::NotLoaded;
            }
        }
    }

    fn live_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.removed).count()
    }

    /// Add or refresh the entry for `path`, keeping its id if it was seen
    /// before
    fn upsert(&mut self, path: PathBuf, parent: ContentId, metadata: &fs::Metadata) -> ContentId {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let data = file_data(&path, metadata);
        let content_type = if metadata.is_dir() { FOLDER } else { FILE };

        if let Some(&id) = self.path_cache.get(&path) {
            if let Some(entry) = self.slot_mut(id) {
                if entry.removed {
                    trace!("{} is back at {}", id, path.display());
                    entry.removed = false;
                    entry.children = ChildrenState::NotLoaded;
                }
                entry.content.name = name;
                entry.content.content_type = content_type;
                entry.content.data = data;
                entry.content.parent = Some(parent);
                return id;
            }
        }

        let id = ContentId::new(self.entries.len() as u64 + 1);
        self.entries.push(FsEntry {
            content: Content::new(id, name, content_type, data).with_parent(parent),
            full_path: path.clone(),
            children: ChildrenState::NotLoaded,
            removed: false,
        });
        self.path_cache.insert(path, id);
        id
    }
}

fn index_of(id: ContentId) -> Option<usize> {
    id.get().checked_sub(1).map(|index| index as usize)
}

fn file_data(path: &Path, metadata: &fs::Metadata) -> FileData {
    let extension = if metadata.is_file() {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_string())
    } else {
        None
    };

    FileData {
        size: if metadata.is_dir() { 0 } else { metadata.len() },
        modified: metadata.modified().ok(),
        extension,
    }
}

/// A directory tree exposed as a content store
///
/// Directory listings are read on the first [`children`](ContentLoader::children)
/// call for that directory and cached afterwards, so only the parts of the
/// tree a query actually visits are read from disk. Ids are assigned in
/// discovery order starting with the root at 1, and stay stable across
/// [`reload`](Self::reload), even for a path that disappears and comes back.
///
/// The cache sits behind a mutex, so a loader can be shared between threads.
///
/// # Example
///
/// ```ignore
/// let loader = FilesystemLoader::new("/path/to/directory")?;
///
/// for child in loader.children(loader.root())? {
///     println!("{}", child.name);
/// }
/// ```
pub struct FilesystemLoader {
    state: Mutex<Arena>,
    root_path: PathBuf,
}

impl FilesystemLoader {
    /// Create a loader rooted at the given directory
    ///
    /// Only the root itself is read here.
    ///
    /// # Errors
    ///
    /// Returns an error if the path doesn't exist or isn't a directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata of {}", path.display()))?;

        if !metadata.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("root")
            .to_string();

        let root = FsEntry {
            content: Content::new(ContentId::new(1), name, FOLDER, file_data(path, &metadata)),
            full_path: path.to_path_buf(),
            children: ChildrenState::NotLoaded,
            removed: false,
        };

        let mut arena = Arena::default();
        arena.path_cache.insert(path.to_path_buf(), root.content.id);
        arena.entries.push(root);

        Ok(Self {
            state: Mutex::new(arena),
            root_path: path.to_path_buf(),
        })
    }

    /// Id of the root directory
    pub fn root(&self) -> ContentId {
        ContentId::new(1)
    }

    /// The directory this loader was created for
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Full filesystem path of an item
    pub fn full_path(&self, id: ContentId) -> Result<Option<PathBuf>> {
        Ok(self.lock()?.entry(id).map(|e| e.full_path.clone()))
    }

    /// Path of an item relative to the root directory
    pub fn relative_path(&self, id: ContentId) -> Result<Option<PathBuf>> {
        Ok(self.full_path(id)?.and_then(|full| {
            full.strip_prefix(&self.root_path)
                .ok()
                .map(|p| p.to_path_buf())
        }))
    }

    /// Check if a directory's listing is cached
    pub fn is_loaded(&self, id: ContentId) -> Result<bool> {
        Ok(self
            .lock()?
            .entry(id)
            .map(|e| matches!(e.children, ChildrenState::Loaded(_)))
            .unwrap_or(false))
    }

    /// Number of items discovered so far and still present
    pub fn discovered(&self) -> Result<usize> {
        Ok(self.lock()?.live_count())
    }

    /// Drop the cached listing of a directory and read it again
    ///
    /// Items the directory no longer lists, and everything cached below
    /// them, are forgotten: `try_get` returns `None` for them afterwards.
    /// Their slots are kept so the ids come back if the paths reappear.
    pub fn reload(&self, id: ContentId) -> Result<()> {
        let mut arena = self.lock()?;
        let previous = match arena.entry_mut(id) {
            Some(entry) => match std::mem::replace(&mut entry.children, ChildrenState::NotLoaded) {
                ChildrenState::Loaded(children) => children,
                _ => Vec::new(),
            },
            None => return Ok(()),
        };

        ensure_loaded(&mut arena, id)?;

        let current = match arena.entry(id) {
            Some(FsEntry {
                children: ChildrenState::Loaded(children),
                ..
            }) => children.clone(),
            _ => Vec::new(),
        };
        for gone in previous.into_iter().filter(|child| !current.contains(child)) {
            debug!("{} disappeared from {}", gone, id);
            arena.mark_removed(gone);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Arena>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("filesystem loader state is poisoned"))
    }
}

/// Read a directory listing into the arena unless it is already cached
fn ensure_loaded(arena: &mut Arena, id: ContentId) -> Result<()> {
    let path = match arena.entry(id) {
        Some(entry) if entry.content.content_type != FOLDER => return Ok(()),
        Some(entry) => match &entry.children {
            ChildrenState::Loaded(_) => return Ok(()),
            ChildrenState::Error(previous) => {
                debug!("Retrying {} after earlier failure: {}", id, previous);
                entry.full_path.clone()
            }
            ChildrenState::NotLoaded => entry.full_path.clone(),
        },
        None => return Ok(()),
    };

    match load_children(arena, id, &path) {
        Ok(child_ids) => {
            trace!("Loaded {} entries from {}", child_ids.len(), path.display());
            if let Some(entry) = arena.entry_mut(id) {
                entry.children = ChildrenState::Loaded(child_ids);
            }
            Ok(())
        }
        Err(e) => {
            warn!("Failed to list {}: {:#}", path.display(), e);
            if let Some(entry) = arena.entry_mut(id) {
                entry.children = ChildrenState::Error(e.to_string());
            }
            Err(e)
        }
    }
}

/// Load children from the filesystem
fn load_children(arena: &mut Arena, parent: ContentId, path: &Path) -> Result<Vec<ContentId>> {
    let mut child_ids = Vec::new();

    let entries =
        fs::read_dir(path).with_context(|| format!("Failed to read directory {}", path.display()))?;

    for entry in entries {
        let entry = entry?;
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to read metadata of {}", entry.path().display()))?;
        child_ids.push(arena.upsert(entry.path(), parent, &metadata));
    }

    // Sort children: directories first, then files, alphabetically within each group
    child_ids.sort_by(|&a, &b| {
        let (Some(a), Some(b)) = (arena.entry(a), arena.entry(b)) else {
            return std::cmp::Ordering::Equal;
        };
        let a_is_file = a.content.content_type == FILE;
        let b_is_file = b.content.content_type == FILE;
        a_is_file
            .cmp(&b_is_file)
            .then_with(|| a.content.name.cmp(&b.content.name))
    });

    Ok(child_ids)
}

impl ContentLoader for FilesystemLoader {
    type Data = FileData;

    fn try_get(&self, id: ContentId) -> Result<Option<Content<FileData>>> {
        Ok(self.lock()?.entry(id).map(|e| e.content.clone()))
    }

    fn children(&self, id: ContentId) -> Result<Vec<Content<FileData>>> {
        let mut arena = self.lock()?;
        ensure_loaded(&mut arena, id)?;

        let Some(FsEntry {
            children: ChildrenState::Loaded(child_ids),
            ..
        }) = arena.entry(id)
        else {
            return Ok(Vec::new());
        };

        Ok(child_ids
            .iter()
            .filter_map(|&child| arena.entry(child))
            .map(|e| e.content.clone())
            .collect())
    }
}
