use crate::protocol::Opcode;

pub type Result<T> = std::result::Result<T, VerbsError>;

#[derive(Debug, thiserror::Error)]
pub enum VerbsError {
    /// The transport write failed or the driver rejected the command.
    #[error("{command} failed: {source}")]
    Io {
        command: Opcode,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open verbs device {}: {source}", path.display())]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: short write, {written} of {expected} bytes transferred")]
    ShortWrite {
        command: Opcode,
        written: usize,
        expected: usize,
    },

    #[error("{kind} handle belongs to session {owner}, not session {session}")]
    ForeignHandle {
        kind: &'static str,
        owner: u64,
        session: u64,
    },

    #[error("invalid command size {size} bytes: {reason}")]
    InvalidCommandSize { size: usize, reason: &'static str },

    #[error("{command}: response too short, expected {expected} bytes, got {actual}")]
    ShortResponse {
        command: Opcode,
        expected: usize,
        actual: usize,
    },
}

impl VerbsError {
    /// The operating-system error code this failure reports to the caller.
    ///
    /// Transport failures carry the errno of the failed write. Short writes
    /// and locally detected problems map to `EIO` and `EINVAL`.
    pub fn errno(&self) -> i32 {
        match self {
            VerbsError::Io { source, .. } | VerbsError::Open { source, .. } => {
                source.raw_os_error().unwrap_or(libc::EIO)
            }
            VerbsError::ShortWrite { .. } | VerbsError::ShortResponse { .. } => libc::EIO,
            VerbsError::ForeignHandle { .. } | VerbsError::InvalidCommandSize { .. } => {
                libc::EINVAL
            }
        }
    }

    /// The command this error was raised for, if any was issued.
    pub fn command(&self) -> Option<Opcode> {
        match self {
            VerbsError::Io { command, .. }
            | VerbsError::ShortWrite { command, .. }
            | VerbsError::ShortResponse { command, .. } => Some(*command),
            VerbsError::Open { .. }
            | VerbsError::ForeignHandle { .. }
            | VerbsError::InvalidCommandSize { .. } => None,
        }
    }
}

/// A failed destroy/dealloc/dereg.
///
/// Hands the resource back: the driver may or may not still hold it, and only
/// the caller can decide whether to retry or abandon the handle.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct DestroyError<T: std::fmt::Debug> {
    #[source]
    pub error: VerbsError,
    pub resource: T,
}

impl<T: std::fmt::Debug> DestroyError<T> {
    pub fn into_parts(self) -> (VerbsError, T) {
        (self.error, self.resource)
    }
}

impl<T: std::fmt::Debug> From<DestroyError<T>> for VerbsError {
    fn from(e: DestroyError<T>) -> Self {
        e.error
    }
}
