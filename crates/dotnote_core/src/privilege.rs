//! Process privilege guard.
//!
//! # Responsibility
//! - Report whether the current process runs with root privilege.
//! - Turn that report into a typed permission result for the dispatcher.
//!
//! # Invariants
//! - The guard never terminates the process; callers decide the exit path.
//! - Only effective uid `0` counts as elevated.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Effective uid of the superuser.
pub const ROOT_EUID: u32 = 0;

/// Privilege level of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Elevated,
    /// `euid` is `None` on platforms without POSIX user ids.
    Unprivileged { euid: Option<u32> },
}

impl Privilege {
    /// Classifies a POSIX effective uid.
    pub fn from_euid(euid: u32) -> Self {
        if euid == ROOT_EUID {
            Self::Elevated
        } else {
            Self::Unprivileged { euid: Some(euid) }
        }
    }
}

/// Returned when a command is attempted without root privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionDenied {
    pub euid: Option<u32>,
}

impl Display for PermissionDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.euid {
            Some(euid) => write!(
                f,
                "permission denied: dotnote must be run as root (effective uid {euid})"
            ),
            None => write!(f, "permission denied: dotnote must be run as root"),
        }
    }
}

impl Error for PermissionDenied {}

/// Reads the privilege level of the current process.
#[cfg(unix)]
pub fn current_privilege() -> Privilege {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    Privilege::from_euid(euid)
}

/// Reads the privilege level of the current process.
#[cfg(not(unix))]
pub fn current_privilege() -> Privilege {
    Privilege::Unprivileged { euid: None }
}

/// Fails with [`PermissionDenied`] unless `privilege` is elevated.
pub fn require_elevated(privilege: Privilege) -> Result<(), PermissionDenied> {
    match privilege {
        Privilege::Elevated => Ok(()),
        Privilege::Unprivileged { euid } => Err(PermissionDenied { euid }),
    }
}
