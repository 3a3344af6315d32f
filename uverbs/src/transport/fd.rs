//! Descriptor-backed channel: one `write(2)` per command.

use super::CommandChannel;
use crate::error::{Result, VerbsError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::path::Path;

/// Channel over an open driver descriptor.
///
/// The driver reads the record, executes it, and writes the reply through
/// the address embedded in the record before `write` returns.
#[derive(Debug)]
pub struct FdChannel {
    file: File,
}

impl FdChannel {
    /// Take ownership of an already-open driver descriptor.
    pub fn from_fd(fd: OwnedFd) -> Self {
        Self {
            file: File::from(fd),
        }
    }

    /// Open the driver's character device for read/write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| VerbsError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), fd = file.as_raw_fd(), "opened verbs device");
        Ok(Self { file })
    }

    pub fn into_fd(self) -> OwnedFd {
        OwnedFd::from(self.file)
    }
}

impl AsFd for FdChannel {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for FdChannel {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl CommandChannel for FdChannel {
    fn transfer(&self, request: &[u8], _response: &mut [u8]) -> std::io::Result<usize> {
        // The reply address is already bound inside `request`; holding the
        // `&mut` borrow keeps the buffer alive and unaliased for the write.
        (&self.file).write(request)
    }
}
