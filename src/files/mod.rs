//! In-Memory File Store
//!
//! Map-backed hierarchical file system for tests and single-process runs.
//! Paths are cleaned lexically; the base directory (`.` or `/`) always exists.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::path::{Component, Path, PathBuf};

use crate::error::FilesError;

pub type Result<T> = std::result::Result<T, FilesError>;

/// One child of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// File or directory metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub len: u64,
    pub is_dir: bool,
    pub modified: DateTime<Utc>,
}

/// Common file system operations
pub trait FileStore: Send + Sync {
    /// Create or overwrite a file; its parent directory must exist
    fn write(&self, path: &Path, data: Bytes) -> Result<()>;

    fn read(&self, path: &Path) -> Result<Bytes>;

    /// Create a directory and any missing ancestors
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Remove a file or a directory with everything beneath it
    fn remove(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Immediate children, sorted by name
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    fn copy(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Move a file, or a directory together with its contents
    fn rename(&self, src: &Path, dst: &Path) -> Result<()>;

    fn is_dir(&self, path: &Path) -> bool;

    fn metadata(&self, path: &Path) -> Result<FileMeta>;
}

#[derive(Debug, Clone)]
struct Node {
    data: Bytes,
    is_dir: bool,
    modified: DateTime<Utc>,
}

impl Node {
    fn file(data: Bytes) -> Self {
        Self {
            data,
            is_dir: false,
            modified: Utc::now(),
        }
    }

    fn dir() -> Self {
        Self {
            data: Bytes::new(),
            is_dir: true,
            modified: Utc::now(),
        }
    }
}

/// In-memory implementation of `FileStore`
#[derive(Debug, Default)]
pub struct MemoryFiles {
    nodes: RwLock<HashMap<PathBuf, Node>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files and directories stored
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lexically normalize a path: drop `.`, resolve `..`, ignore trailing separators
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_relative_limit = matches!(
                    out.components().next_back(),
                    None | Some(Component::ParentDir)
                ) && !out.has_root();
                if at_relative_limit {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

fn is_base(path: &Path) -> bool {
    path == Path::new(".") || path == Path::new("/")
}

fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn dir_exists(nodes: &HashMap<PathBuf, Node>, path: &Path) -> bool {
    is_base(path) || nodes.get(path).map(|n| n.is_dir).unwrap_or(false)
}

fn check_parent(nodes: &HashMap<PathBuf, Node>, path: &Path) -> Result<()> {
    let parent = parent_of(path);
    if dir_exists(nodes, &parent) {
        Ok(())
    } else {
        Err(FilesError::ParentNotFound(parent))
    }
}

impl FileStore for MemoryFiles {
    fn write(&self, path: &Path, data: Bytes) -> Result<()> {
        let path = clean(path);
        let mut nodes = self.nodes.write();

        if dir_exists(&nodes, &path) {
            return Err(FilesError::IsDirectory(path));
        }
        check_parent(&nodes, &path)?;

        nodes.insert(path, Node::file(data));
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Bytes> {
        let path = clean(path);
        let nodes = self.nodes.read();
        match nodes.get(&path) {
            Some(node) if !node.is_dir => Ok(node.data.clone()),
            Some(_) => Err(FilesError::IsDirectory(path)),
            None => Err(FilesError::NotFound(path)),
        }
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        let path = clean(path);
        let mut nodes = self.nodes.write();

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component.as_os_str());
            if is_base(&current) || matches!(component, Component::ParentDir) {
                continue;
            }
            match nodes.get(&current) {
                Some(node) if !node.is_dir => return Err(FilesError::NotADirectory(current)),
                Some(_) => {}
                None => {
                    nodes.insert(current.clone(), Node::dir());
                }
            }
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let path = clean(path);
        self.nodes.write().retain(|k, _| !k.starts_with(&path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let path = clean(path);
        is_base(&path) || self.nodes.read().contains_key(&path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = clean(path);
        let nodes = self.nodes.read();
        if !dir_exists(&nodes, &path) {
            return Err(FilesError::DirectoryNotFound(path));
        }

        let mut entries: Vec<DirEntry> = nodes
            .iter()
            .filter(|(k, _)| k.as_path() != path && parent_of(k) == path)
            .filter_map(|(k, node)| {
                k.file_name().map(|name| DirEntry {
                    name: name.to_string_lossy().into_owned(),
                    is_dir: node.is_dir,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        let (src, dst) = (clean(src), clean(dst));
        let mut nodes = self.nodes.write();

        let node = nodes
            .get(&src)
            .cloned()
            .ok_or_else(|| FilesError::NotFound(src.clone()))?;
        if dir_exists(&nodes, &dst) {
            return Err(FilesError::IsDirectory(dst));
        }
        check_parent(&nodes, &dst)?;

        nodes.insert(
            dst,
            Node {
                modified: Utc::now(),
                ..node
            },
        );
        Ok(())
    }

    fn rename(&self, src: &Path, dst: &Path) -> Result<()> {
        let (src, dst) = (clean(src), clean(dst));
        let mut nodes = self.nodes.write();

        if !nodes.contains_key(&src) {
            return Err(FilesError::NotFound(src));
        }
        if src == dst {
            return Ok(());
        }
        if dst.starts_with(&src) {
            return Err(FilesError::MoveIntoSelf(dst));
        }
        if dir_exists(&nodes, &dst) {
            return Err(FilesError::IsDirectory(dst));
        }
        check_parent(&nodes, &dst)?;

        let moved: Vec<PathBuf> = nodes
            .keys()
            .filter(|k| k.starts_with(&src))
            .cloned()
            .collect();
        for old in moved {
            if let Some(node) = nodes.remove(&old) {
                let new = match old.strip_prefix(&src) {
                    Ok(rest) if !rest.as_os_str().is_empty() => dst.join(rest),
                    _ => dst.clone(),
                };
                nodes.insert(new, node);
            }
        }
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = clean(path);
        dir_exists(&self.nodes.read(), &path)
    }

    fn metadata(&self, path: &Path) -> Result<FileMeta> {
        let path = clean(path);
        self.nodes
            .read()
            .get(&path)
            .map(|node| FileMeta {
                len: node.data.len() as u64,
                is_dir: node.is_dir,
                modified: node.modified,
            })
            .ok_or(FilesError::NotFound(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> &Path {
        Path::new(s)
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(p("a/./b/../c/")), PathBuf::from("a/c"));
        assert_eq!(clean(p("./")), PathBuf::from("."));
        assert_eq!(clean(p("../x")), PathBuf::from("../x"));
        assert_eq!(clean(p("a/../../x")), PathBuf::from("../x"));
        assert_eq!(clean(p("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_write_read() {
        let fs = MemoryFiles::new();
        fs.write(p("hello.txt"), Bytes::from_static(b"hi")).unwrap();
        assert_eq!(fs.read(p("./hello.txt")).unwrap(), Bytes::from_static(b"hi"));

        fs.write(p("hello.txt"), Bytes::from_static(b"bye")).unwrap();
        assert_eq!(fs.read(p("hello.txt")).unwrap(), Bytes::from_static(b"bye"));
        assert_eq!(fs.metadata(p("hello.txt")).unwrap().len, 3);
    }

    #[test]
    fn test_write_requires_parent() {
        let fs = MemoryFiles::new();
        let err = fs.write(p("docs/a.md"), Bytes::new()).unwrap_err();
        assert_eq!(err, FilesError::ParentNotFound(PathBuf::from("docs")));

        fs.create_dir(p("docs")).unwrap();
        fs.write(p("docs/a.md"), Bytes::new()).unwrap();
        assert!(fs.exists(p("docs/a.md")));
    }

    #[test]
    fn test_read_errors() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("d")).unwrap();
        assert!(matches!(fs.read(p("missing")), Err(FilesError::NotFound(_))));
        assert!(matches!(fs.read(p("d")), Err(FilesError::IsDirectory(_))));
        assert!(matches!(
            fs.write(p("d"), Bytes::new()),
            Err(FilesError::IsDirectory(_))
        ));
    }

    #[test]
    fn test_create_dir_makes_ancestors() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("a/b/c")).unwrap();
        assert!(fs.is_dir(p("a")));
        assert!(fs.is_dir(p("a/b")));
        assert!(fs.is_dir(p("a/b/c")));
        assert!(fs.is_dir(p(".")));
        assert_eq!(fs.len(), 3);

        fs.write(p("a/file"), Bytes::new()).unwrap();
        assert_eq!(
            fs.create_dir(p("a/file/sub")),
            Err(FilesError::NotADirectory(PathBuf::from("a/file")))
        );
    }

    #[test]
    fn test_list_dir() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("root/sub")).unwrap();
        fs.write(p("root/z.txt"), Bytes::from_static(b"z")).unwrap();
        fs.write(p("root/a.txt"), Bytes::from_static(b"a")).unwrap();
        fs.write(p("root/sub/deep.txt"), Bytes::from_static(b"d")).unwrap();

        let names: Vec<_> = fs
            .list_dir(p("root"))
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a.txt".to_string(), false),
                ("sub".to_string(), true),
                ("z.txt".to_string(), false),
            ]
        );

        let top = fs.list_dir(p(".")).unwrap();
        assert_eq!(top, vec![DirEntry { name: "root".into(), is_dir: true }]);

        assert!(matches!(
            fs.list_dir(p("nope")),
            Err(FilesError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_remove_subtree() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("a/b")).unwrap();
        fs.write(p("a/b/f"), Bytes::new()).unwrap();
        fs.create_dir(p("ab")).unwrap();

        fs.remove(p("a")).unwrap();
        assert!(!fs.exists(p("a")));
        assert!(!fs.exists(p("a/b/f")));
        assert!(fs.exists(p("ab")));

        // absent paths are ignored
        fs.remove(p("ghost")).unwrap();
    }

    #[test]
    fn test_copy_is_independent() {
        let fs = MemoryFiles::new();
        fs.write(p("src"), Bytes::from_static(b"one")).unwrap();
        fs.copy(p("src"), p("dst")).unwrap();
        fs.write(p("src"), Bytes::from_static(b"two")).unwrap();

        assert_eq!(fs.read(p("dst")).unwrap(), Bytes::from_static(b"one"));
        assert!(matches!(
            fs.copy(p("missing"), p("x")),
            Err(FilesError::NotFound(_))
        ));
    }

    #[test]
    fn test_copy_onto_directory_rejected() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("d")).unwrap();
        fs.write(p("d/child"), Bytes::from_static(b"c")).unwrap();
        fs.write(p("f"), Bytes::from_static(b"f")).unwrap();

        assert_eq!(
            fs.copy(p("f"), p("d")),
            Err(FilesError::IsDirectory(PathBuf::from("d")))
        );
        assert!(fs.is_dir(p("d")));
        assert_eq!(fs.read(p("d/child")).unwrap(), Bytes::from_static(b"c"));
    }

    #[test]
    fn test_rename_into_own_subtree_rejected() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("a")).unwrap();
        fs.write(p("a/x"), Bytes::from_static(b"x")).unwrap();

        assert_eq!(
            fs.rename(p("a"), p("a/b")),
            Err(FilesError::MoveIntoSelf(PathBuf::from("a/b")))
        );
        assert!(fs.is_dir(p("a")));
        assert!(fs.exists(p("a/x")));
        assert!(!fs.exists(p("a/b")));
        assert_eq!(
            fs.list_dir(p(".")).unwrap(),
            vec![DirEntry { name: "a".into(), is_dir: true }]
        );

        // renaming onto itself is a no-op
        fs.rename(p("a"), p("./a")).unwrap();
        assert!(fs.exists(p("a/x")));
    }

    #[test]
    fn test_rename_onto_directory_rejected() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("target/keep")).unwrap();
        fs.write(p("f"), Bytes::from_static(b"f")).unwrap();

        assert_eq!(
            fs.rename(p("f"), p("target")),
            Err(FilesError::IsDirectory(PathBuf::from("target")))
        );
        assert!(fs.exists(p("f")));
        assert!(fs.is_dir(p("target/keep")));
    }

    #[test]
    fn test_rename_directory_moves_contents() {
        let fs = MemoryFiles::new();
        fs.create_dir(p("old/inner")).unwrap();
        fs.write(p("old/inner/f.txt"), Bytes::from_static(b"x")).unwrap();

        fs.rename(p("old"), p("new")).unwrap();
        assert!(!fs.exists(p("old")));
        assert!(fs.is_dir(p("new/inner")));
        assert_eq!(fs.read(p("new/inner/f.txt")).unwrap(), Bytes::from_static(b"x"));
        assert!(fs.rename(p("old"), p("again")).is_err());
    }
}
