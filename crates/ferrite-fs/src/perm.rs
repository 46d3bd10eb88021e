//! Permission bits and the access-control evaluator.
//!
//! Nine rwx bits in three classes, owner/group/other. The evaluator picks
//! exactly one class per request: owner if the requester's uid matches the
//! file's uid, else group on gid match, else other. An owner match wins
//! even when the gid would also match.

use crate::error::FsError;
use crate::fcb::Fcb;
use crate::types::User;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct Mode: u16 {
        const OWNER_READ = 0o400;
        const OWNER_WRITE = 0o200;
        const OWNER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl Mode {
    /// rw-r--r--, the mode every new file starts with.
    pub const FILE_DEFAULT: Mode = Mode::from_bits_truncate(0o644);

    /// Parse a mode from its octal digits, e.g. `"755"`.
    pub fn from_octal(s: &str) -> Option<Mode> {
        u16::from_str_radix(s, 8).ok().map(Mode::from_bits_truncate)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.bits())
    }
}

/// Operation class a requester is asking for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Access {
    Read,
    Write,
    Execute,
}

impl Access {
    fn bit(self) -> u16 {
        match self {
            Access::Read => 0o4,
            Access::Write => 0o2,
            Access::Execute => 0o1,
        }
    }
}

/// Decide whether `user` may perform `access` on an object owned by
/// `owner_uid`/`owner_gid` with permission bits `mode`. Pure function,
/// no state.
pub fn check(mode: Mode, owner_uid: u32, owner_gid: u32, user: &User, access: Access) -> bool {
    let bits = mode.bits();
    let class = if user.uid == owner_uid {
        (bits >> 6) & 0o7
    } else if user.gid == owner_gid {
        (bits >> 3) & 0o7
    } else {
        bits & 0o7
    };
    class & access.bit() != 0
}

/// Set a file's permission bits. Only the owner may do this; group
/// membership carries no chmod right and there is no superuser override.
pub fn chmod(fcb: &mut Fcb, user: &User, mode: Mode) -> Result<(), FsError> {
    if user.uid != fcb.uid {
        return Err(FsError::PermissionDenied {
            name: fcb.name.clone(),
            op: "chmod",
        });
    }
    fcb.mode = mode;
    Ok(())
}
