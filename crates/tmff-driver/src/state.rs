//! Device lifecycle states.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Where a device is in its bring-up/teardown life.
///
/// ```text
/// UNINITIALIZED -> SETUP_IN_PROGRESS -> READY -> OPEN <-> CLOSED
///                          |
///                          +-> DESTROYED (setup failure)
/// ```
///
/// Every state may move to DESTROYED; nothing leaves DESTROYED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Uninitialized,
    SetupInProgress,
    Ready,
    Open,
    Closed,
    Destroyed,
}

impl LifecycleState {
    pub fn can_init(self) -> bool {
        self == Self::Uninitialized
    }

    pub fn can_play(self) -> bool {
        matches!(self, Self::Ready | Self::Open | Self::Closed)
    }

    pub fn can_open(self) -> bool {
        matches!(self, Self::Ready | Self::Closed)
    }

    pub fn can_close(self) -> bool {
        self == Self::Open
    }

    /// Vendor commands (range, gain, autocenter) need finished bring-up.
    pub fn can_command(self) -> bool {
        self.can_play()
    }

    pub fn is_destroyed(self) -> bool {
        self == Self::Destroyed
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::SetupInProgress => "SETUP_IN_PROGRESS",
            Self::Ready => "READY",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Destroyed => "DESTROYED",
        };
        f.write_str(name)
    }
}
