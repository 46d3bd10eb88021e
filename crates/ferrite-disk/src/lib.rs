use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("out of disk space: {needed} blocks needed, {free} free")]
    OutOfSpace { needed: usize, free: usize },
}

pub struct DiskConfig {
    pub blocks: usize,
    pub block_size: usize,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            blocks: 100,
            block_size: 10,
        }
    }
}

/// Simulated physical disk: a fixed array of fixed-size slots.
///
/// A slot is free iff it holds `None`. Allocation is first-fit over slot
/// indices; there is no free list and no compaction.
pub struct MemDisk {
    block_size: usize,
    slots: Vec<Option<Vec<u8>>>,
}

impl MemDisk {
    pub fn new(config: DiskConfig) -> Self {
        assert!(config.block_size > 0, "block size must be non-zero");
        Self {
            block_size: config.block_size,
            slots: vec![None; config.blocks],
        }
    }

    /// Split `content` into block-sized chunks and place each into the
    /// lowest-indexed free slot. Returns the occupied indices in content
    /// order.
    ///
    /// If any chunk fails to find a slot, every slot occupied during this
    /// call is released again before the error is returned, so a failed
    /// allocation is never observable from outside.
    pub fn allocate(&mut self, content: &[u8]) -> Result<Vec<usize>, DiskError> {
        let mut allocated = Vec::new();

        for chunk in content.chunks(self.block_size) {
            match self.slots.iter().position(|slot| slot.is_none()) {
                Some(ix) => {
                    self.slots[ix] = Some(chunk.to_vec());
                    allocated.push(ix);
                }
                None => {
                    // Rollback: release the partial allocation.
                    self.free(&allocated);
                    let err = DiskError::OutOfSpace {
                        needed: content.len().div_ceil(self.block_size),
                        free: self.free_blocks(),
                    };
                    debug!("{} (rolled back {} blocks)", err, allocated.len());
                    return Err(err);
                }
            }
        }

        debug!(
            "allocated {} bytes across blocks {:?}",
            content.len(),
            allocated
        );
        Ok(allocated)
    }

    /// Reconstruct content by concatenating the listed slots in order.
    ///
    /// Out-of-range and free indices are skipped, not errors: callers may
    /// hold stale block lists after partial frees and still expect a
    /// best-effort read.
    pub fn read(&self, indices: &[usize]) -> Vec<u8> {
        let mut content = Vec::new();
        for &ix in indices {
            if let Some(Some(data)) = self.slots.get(ix) {
                content.extend_from_slice(data);
            }
        }
        content
    }

    /// Mark the listed slots free. Idempotent; out-of-range indices are
    /// ignored.
    pub fn free(&mut self, indices: &[usize]) {
        for &ix in indices {
            if let Some(slot) = self.slots.get_mut(ix) {
                *slot = None;
            }
        }
    }

    pub fn total_blocks(&self) -> usize {
        self.slots.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn free_blocks(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn is_free(&self, ix: usize) -> bool {
        matches!(self.slots.get(ix), Some(None))
    }
}
