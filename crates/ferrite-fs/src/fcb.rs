use crate::perm::Mode;
use crate::types::{FileKind, User};
use ferrite_disk::{DiskError, MemDisk};
use std::time::SystemTime;

/// File control block: one file's metadata plus the ordered list of disk
/// blocks holding its content. Content I/O always goes through the disk
/// the block list refers to; the FCB itself stores no bytes.
#[derive(Debug, Clone)]
pub struct Fcb {
    pub id: u64,
    pub name: String,
    pub size: usize,
    pub kind: FileKind,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub accessed_at: SystemTime,
    pub uid: u32,
    pub gid: u32,
    pub mode: Mode,
    pub blocks: Vec<usize>,
}

impl Fcb {
    /// `id` comes from the engine's counter; the FCB never invents one.
    pub fn new(id: u64, name: impl Into<String>, owner: &User, kind: FileKind) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            name: name.into(),
            size: 0,
            kind,
            created_at: now,
            updated_at: now,
            accessed_at: now,
            uid: owner.uid,
            gid: owner.gid,
            mode: Mode::FILE_DEFAULT,
            blocks: Vec::new(),
        }
    }

    /// Replace the file's content. The new generation is allocated before
    /// the old one is released, so a failed allocation leaves the previous
    /// content fully intact. The trade-off is that both generations occupy
    /// the disk for the duration of the call.
    pub fn write(&mut self, disk: &mut MemDisk, content: &[u8]) -> Result<(), DiskError> {
        let new_blocks = disk.allocate(content)?;
        disk.free(&self.blocks);
        self.blocks = new_blocks;
        self.size = content.len();
        self.updated_at = SystemTime::now();
        Ok(())
    }

    /// Reconstruct the file's content. Stamps the access time even when
    /// the file has no blocks.
    pub fn read(&mut self, disk: &MemDisk) -> Vec<u8> {
        self.accessed_at = SystemTime::now();
        disk.read(&self.blocks)
    }

    pub fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }

    /// Duplicate size, kind and permission bits from another FCB. Blocks
    /// are never shared; callers duplicate content by read-then-write.
    pub fn copy_metadata_from(&mut self, other: &Fcb) {
        self.size = other.size;
        self.kind = other.kind;
        self.mode = other.mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_disk::DiskConfig;

    fn alice() -> User {
        User::new("alice", 1000, 1000)
    }

    #[test]
    fn new_fcb_defaults() {
        let fcb = Fcb::new(7, "note.txt", &alice(), FileKind::Char);
        assert_eq!(fcb.id, 7);
        assert_eq!(fcb.size, 0);
        assert_eq!(fcb.mode, Mode::FILE_DEFAULT);
        assert_eq!(fcb.uid, 1000);
        assert!(fcb.blocks.is_empty());
    }

    #[test]
    fn write_then_read_roundtrip() {
        let mut disk = MemDisk::new(DiskConfig::default());
        let mut fcb = Fcb::new(1, "a", &alice(), FileKind::Char);

        fcb.write(&mut disk, b"hello block world").unwrap();
        assert_eq!(fcb.size, 17);
        assert_eq!(fcb.blocks.len(), 2);
        assert_eq!(fcb.read(&disk), b"hello block world");
    }

    #[test]
    fn rewrite_releases_old_blocks() {
        let mut disk = MemDisk::new(DiskConfig::default());
        let mut fcb = Fcb::new(1, "a", &alice(), FileKind::Char);

        fcb.write(&mut disk, &[b'x'; 30]).unwrap();
        fcb.write(&mut disk, b"tiny").unwrap();
        assert_eq!(fcb.blocks.len(), 1);
        assert_eq!(disk.free_blocks(), 99);
        assert_eq!(fcb.read(&disk), b"tiny");
    }

    #[test]
    fn failed_rewrite_keeps_previous_content() {
        let mut disk = MemDisk::new(DiskConfig {
            blocks: 3,
            block_size: 10,
        });
        let mut fcb = Fcb::new(1, "a", &alice(), FileKind::Char);
        fcb.write(&mut disk, &[b'a'; 30]).unwrap();

        // The disk is full: the replacement cannot be allocated, and the
        // original content must survive untouched.
        let err = fcb.write(&mut disk, b"b").unwrap_err();
        assert!(matches!(err, DiskError::OutOfSpace { .. }));
        assert_eq!(fcb.size, 30);
        assert_eq!(fcb.read(&disk), [b'a'; 30]);
    }

    #[test]
    fn read_empty_file_returns_nothing() {
        let disk = MemDisk::new(DiskConfig::default());
        let mut fcb = Fcb::new(1, "a", &alice(), FileKind::Char);
        assert_eq!(fcb.read(&disk), b"");
    }

    #[test]
    fn copy_metadata_excludes_identity_and_blocks() {
        let mut disk = MemDisk::new(DiskConfig::default());
        let mut src = Fcb::new(1, "src", &alice(), FileKind::Program);
        src.write(&mut disk, b"0123456789").unwrap();
        src.mode = Mode::from_bits_truncate(0o750);

        let bob = User::new("bob", 1001, 1001);
        let mut dst = Fcb::new(2, "dst", &bob, FileKind::Char);
        dst.copy_metadata_from(&src);

        assert_eq!(dst.size, 10);
        assert_eq!(dst.kind, FileKind::Program);
        assert_eq!(dst.mode.bits(), 0o750);
        // Identity and content stay the destination's own.
        assert_eq!(dst.uid, 1001);
        assert!(dst.blocks.is_empty());
    }
}
