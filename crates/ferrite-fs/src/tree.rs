use crate::error::FsError;
use crate::fcb::Fcb;
use crate::types::NodeId;
use std::collections::HashMap;

/// Directory-or-file payload of a namespace node. Children are kept in
/// insertion order.
#[derive(Debug)]
pub enum NodeKind {
    Directory { children: Vec<NodeId> },
    File { fcb: Fcb },
}

#[derive(Debug)]
pub struct Node {
    pub name: String,
    /// Non-owning back-reference; `None` only for the root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn fcb(&self) -> Option<&Fcb> {
        match &self.kind {
            NodeKind::File { fcb } => Some(fcb),
            NodeKind::Directory { .. } => None,
        }
    }
}

/// Hierarchical namespace. The tree owns every node in a handle-keyed
/// arena; nodes refer to each other by `NodeId` only, so parent links
/// stay non-owning and cycles are impossible to leak.
///
/// All lookups are single-level: one name resolved against one directory.
/// The tree never touches file content; the engine releases blocks before
/// (or from) whatever `remove` hands back.
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u32,
}

impl Tree {
    pub fn new() -> Self {
        let root_id = NodeId::new(1).unwrap();
        let mut nodes = HashMap::new();
        nodes.insert(
            root_id,
            Node {
                name: "/".to_string(),
                parent: None,
                kind: NodeKind::Directory {
                    children: Vec::new(),
                },
            },
        );
        Self {
            nodes,
            root: root_id,
            next_id: 2,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Resolve `name` among the children of `dir`.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.children(dir)
            .iter()
            .copied()
            .find(|&c| self.nodes.get(&c).map(|n| n.name.as_str()) == Some(name))
    }

    /// Children of `dir` in insertion order; empty for file nodes.
    pub fn children(&self, dir: NodeId) -> &[NodeId] {
        match self.nodes.get(&dir).map(|n| &n.kind) {
            Some(NodeKind::Directory { children }) => children,
            _ => &[],
        }
    }

    /// Absolute path of `node`, walking parent links up to the root.
    pub fn pwd(&self, node: NodeId) -> String {
        if node == self.root {
            return "/".to_string();
        }
        let mut path = String::new();
        let mut cur = node;
        while let Some(n) = self.nodes.get(&cur) {
            let Some(parent) = n.parent else { break };
            path = format!("/{}{}", n.name, path);
            cur = parent;
        }
        path
    }

    /// Attach a new node under `dir`. Child names are unique per directory.
    pub fn insert(&mut self, dir: NodeId, name: &str, kind: NodeKind) -> Result<NodeId, FsError> {
        if !self.nodes.get(&dir).is_some_and(Node::is_dir) {
            return Err(FsError::NotADirectory(self.pwd(dir)));
        }
        if self.child(dir, name).is_some() {
            return Err(FsError::AlreadyExists(name.to_string()));
        }

        let id = NodeId::new(self.next_id).unwrap();
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent: Some(dir),
                kind,
            },
        );
        if let Some(NodeKind::Directory { children }) =
            self.nodes.get_mut(&dir).map(|n| &mut n.kind)
        {
            children.push(id);
        }
        Ok(id)
    }

    /// Detach `name` from `dir` and drop its whole subtree from the arena.
    /// Returns the FCBs of every file the subtree contained so the caller
    /// can release their blocks; the tree itself frees no content.
    pub fn remove(&mut self, dir: NodeId, name: &str) -> Result<Vec<Fcb>, FsError> {
        let target = self
            .child(dir, name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;

        if let Some(NodeKind::Directory { children }) =
            self.nodes.get_mut(&dir).map(|n| &mut n.kind)
        {
            children.retain(|&c| c != target);
        }

        let mut fcbs = Vec::new();
        let mut stack = vec![target];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                match node.kind {
                    NodeKind::Directory { children } => stack.extend(children),
                    NodeKind::File { fcb } => fcbs.push(fcb),
                }
            }
        }
        Ok(fcbs)
    }

    /// Resolve `name` in `dir` as a regular file and hand out its FCB.
    pub fn file_mut(&mut self, dir: NodeId, name: &str) -> Result<&mut Fcb, FsError> {
        let id = self
            .child(dir, name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::File { fcb }) => Ok(fcb),
            _ => Err(FsError::NotAFile(name.to_string())),
        }
    }

    /// Rename `src` to `dst` within `dir`. The node keeps its position
    /// among its siblings.
    pub fn rename(&mut self, dir: NodeId, src: &str, dst: &str) -> Result<NodeId, FsError> {
        let id = self
            .child(dir, src)
            .ok_or_else(|| FsError::NotFound(src.to_string()))?;
        if self.child(dir, dst).is_some() {
            return Err(FsError::AlreadyExists(dst.to_string()));
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = dst.to_string();
        }
        Ok(id)
    }

    /// One navigation step from `dir`: `".."` to the parent (no-op at the
    /// root), `"/"` to the root, anything else a child directory name.
    pub fn navigate(&self, dir: NodeId, token: &str) -> Result<NodeId, FsError> {
        match token {
            ".." => Ok(self
                .nodes
                .get(&dir)
                .and_then(|n| n.parent)
                .unwrap_or(dir)),
            "/" => Ok(self.root),
            name => {
                let child = self
                    .child(dir, name)
                    .ok_or_else(|| FsError::NotFound(name.to_string()))?;
                if self.nodes.get(&child).is_some_and(Node::is_dir) {
                    Ok(child)
                } else {
                    Err(FsError::NotADirectory(name.to_string()))
                }
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
