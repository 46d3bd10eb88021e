pub mod error;
pub mod fcb;
pub mod perm;
pub mod tree;
pub mod types;

pub use error::FsError;
pub use fcb::Fcb;
pub use perm::{Access, Mode};
pub use tree::{Node, NodeKind, Tree};
pub use types::{FileKind, NodeId, User};

use ferrite_disk::MemDisk;
use log::debug;

/// One row of a directory listing.
#[derive(Debug)]
pub enum Entry {
    Directory {
        name: String,
    },
    File {
        name: String,
        mode: Mode,
        size: usize,
        id: u64,
    },
}

/// The file-layer engine: namespace tree, block store and permission
/// evaluator behind path-level operations.
///
/// Every name argument resolves against the current directory only, one
/// level at a time, matching the modeled shell surface. The requester
/// identity is passed in per call; the engine never creates users.
pub struct FileSystem {
    tree: Tree,
    disk: MemDisk,
    cwd: NodeId,
    next_fcb_id: u64,
}

impl FileSystem {
    pub fn new(disk: MemDisk) -> Self {
        let tree = Tree::new();
        let cwd = tree.root();
        Self {
            tree,
            disk,
            cwd,
            next_fcb_id: 1,
        }
    }

    /// The underlying disk, read-only (diagnostics, occupancy maps).
    pub fn disk(&self) -> &MemDisk {
        &self.disk
    }

    pub fn pwd(&self) -> String {
        self.tree.pwd(self.cwd)
    }

    pub fn make_directory(&mut self, name: &str) -> Result<(), FsError> {
        self.tree.insert(
            self.cwd,
            name,
            NodeKind::Directory {
                children: Vec::new(),
            },
        )?;
        debug!("created directory '{}' in {}", name, self.pwd());
        Ok(())
    }

    pub fn make_file(&mut self, name: &str, user: &User) -> Result<(), FsError> {
        self.create_file(name, user).map(|_| ())
    }

    pub fn change_directory(&mut self, token: &str) -> Result<(), FsError> {
        self.cwd = self.tree.navigate(self.cwd, token)?;
        Ok(())
    }

    pub fn list(&self) -> Vec<Entry> {
        self.tree
            .children(self.cwd)
            .iter()
            .filter_map(|&id| {
                let node = self.tree.get(id)?;
                Some(match &node.kind {
                    NodeKind::Directory { .. } => Entry::Directory {
                        name: node.name.clone(),
                    },
                    NodeKind::File { fcb } => Entry::File {
                        name: node.name.clone(),
                        mode: fcb.mode,
                        size: fcb.size,
                        id: fcb.id,
                    },
                })
            })
            .collect()
    }

    /// Detach `name` from the current directory. Removing a file needs
    /// write permission on it; removing a directory takes its whole
    /// subtree. Either way every affected file's blocks go back to the
    /// disk before the nodes are dropped.
    pub fn remove(&mut self, name: &str, user: &User) -> Result<(), FsError> {
        let id = self
            .tree
            .child(self.cwd, name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        if let Some(fcb) = self.tree.get(id).and_then(Node::fcb) {
            if !perm::check(fcb.mode, fcb.uid, fcb.gid, user, Access::Write) {
                return Err(FsError::PermissionDenied {
                    name: name.to_string(),
                    op: "remove",
                });
            }
        }

        let fcbs = self.tree.remove(self.cwd, name)?;
        for fcb in &fcbs {
            self.disk.free(&fcb.blocks);
        }
        debug!("removed '{}' ({} file(s) released)", name, fcbs.len());
        Ok(())
    }

    /// Duplicate a file within the current directory. Content is copied
    /// physically (read then write into a fresh FCB), never shared.
    ///
    /// The destination is created before its content is written; if the
    /// write fails on a full disk, an empty destination file remains.
    pub fn copy(&mut self, src: &str, dst: &str, user: &User) -> Result<(), FsError> {
        let src_id = self
            .tree
            .child(self.cwd, src)
            .ok_or_else(|| FsError::NotFound(src.to_string()))?;
        if self.tree.child(self.cwd, dst).is_some() {
            return Err(FsError::AlreadyExists(dst.to_string()));
        }

        let (content, src_meta) = {
            let node = self
                .tree
                .get_mut(src_id)
                .ok_or_else(|| FsError::NotFound(src.to_string()))?;
            let fcb = match &mut node.kind {
                NodeKind::File { fcb } => fcb,
                NodeKind::Directory { .. } => return Err(FsError::UnsupportedOperation),
            };
            if !perm::check(fcb.mode, fcb.uid, fcb.gid, user, Access::Read) {
                return Err(FsError::PermissionDenied {
                    name: src.to_string(),
                    op: "read",
                });
            }
            let content = fcb.read(&self.disk);
            (content, fcb.clone())
        };

        let dst_id = self.create_file(dst, user)?;
        if let Some(node) = self.tree.get_mut(dst_id) {
            if let NodeKind::File { fcb } = &mut node.kind {
                fcb.write(&mut self.disk, &content)?;
                fcb.copy_metadata_from(&src_meta);
            }
        }
        debug!("copied '{}' to '{}' ({} bytes)", src, dst, content.len());
        Ok(())
    }

    /// Rename within the current directory. Cross-directory moves are out
    /// of scope; this models rename only.
    pub fn rename(&mut self, src: &str, dst: &str) -> Result<(), FsError> {
        let id = self.tree.rename(self.cwd, src, dst)?;
        if let Some(node) = self.tree.get_mut(id) {
            if let NodeKind::File { fcb } = &mut node.kind {
                fcb.name = dst.to_string();
                fcb.touch();
            }
        }
        debug!("renamed '{}' to '{}'", src, dst);
        Ok(())
    }

    pub fn write(&mut self, name: &str, content: &[u8], user: &User) -> Result<(), FsError> {
        let fcb = self.tree.file_mut(self.cwd, name)?;
        if !perm::check(fcb.mode, fcb.uid, fcb.gid, user, Access::Write) {
            return Err(FsError::PermissionDenied {
                name: name.to_string(),
                op: "write",
            });
        }
        fcb.write(&mut self.disk, content)?;
        debug!("wrote {} bytes to '{}'", content.len(), name);
        Ok(())
    }

    pub fn read(&mut self, name: &str, user: &User) -> Result<Vec<u8>, FsError> {
        let fcb = self.tree.file_mut(self.cwd, name)?;
        if !perm::check(fcb.mode, fcb.uid, fcb.gid, user, Access::Read) {
            return Err(FsError::PermissionDenied {
                name: name.to_string(),
                op: "read",
            });
        }
        Ok(fcb.read(&self.disk))
    }

    pub fn change_mode(&mut self, name: &str, mode: Mode, user: &User) -> Result<(), FsError> {
        let fcb = self.tree.file_mut(self.cwd, name)?;
        perm::chmod(fcb, user, mode)
    }

    fn create_file(&mut self, name: &str, user: &User) -> Result<NodeId, FsError> {
        let fcb_id = self.next_fcb_id;
        let fcb = Fcb::new(fcb_id, name, user, FileKind::Char);
        let id = self.tree.insert(self.cwd, name, NodeKind::File { fcb })?;
        self.next_fcb_id += 1;
        debug!("created file '{}' (fcb {})", name, fcb_id);
        Ok(id)
    }
}
