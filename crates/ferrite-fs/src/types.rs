use std::num::NonZeroU32;

/// Requester identity, issued by the session layer. The file layer only
/// ever reads it; it never creates or looks up users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
}

impl User {
    pub fn new(name: impl Into<String>, uid: u32, gid: u32) -> Self {
        Self {
            name: name.into(),
            uid,
            gid,
        }
    }
}

/// Content class recorded in a file control block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FileKind {
    Numeric,
    Char,
    Binary,
    Program,
    Directory,
}

/// Namespace node identifier
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    pub fn val(&self) -> u32 {
        self.0.get()
    }
}
