//! Process exit codes.
//!
//! The layout's service scripts share one exit-code table so systemd unit
//! files and shell wrappers can tell failure classes apart. Not every code
//! is raised from this binary.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Status {
    /// Clean run or operator-requested shutdown.
    Ok = 0,
    /// Generic error.
    Error = 1,
    /// Nothing needed doing.
    NoActionTaken = 2,
    /// Bad configuration or bad track/util documents.
    InvalidInput = 3,
    /// Requested state already in effect.
    AlreadyInState = 4,
    /// A startup phase exceeded its deadline.
    Timeout = 5,
    /// A configured feature is not available in this build.
    NotSupported = 6,
    /// LED strip could not be driven.
    HardwareFailure = 7,
    /// Internal failure, e.g. a crashed worker thread.
    SoftwareFailure = 8,
    /// Anything that could not be classified.
    Unknown = 9,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }
}
