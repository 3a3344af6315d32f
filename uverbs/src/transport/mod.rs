//! Synchronous command exchange with the driver.
//!
//! A [`CommandChannel`] moves one encoded record to the driver and lets the
//! driver fill the reply buffer before returning. [`execute`] wraps every
//! exchange: it binds the reply address, requires the whole record to be
//! accepted, and owns the reply buffer so it is released on every exit path.

mod fd;

pub use fd::FdChannel;

use crate::error::{Result, VerbsError};
use crate::protocol::Command;
use std::sync::Arc;

/// One blocking request/reply exchange with the driver.
///
/// The write that delivers `request` is also the moment the driver writes its
/// reply into `response`; there is no separate read. Implementations must not
/// retry; `Session` serializes nothing, so concurrent callers on one channel
/// must synchronize themselves.
pub trait CommandChannel: Send + Sync {
    /// Deliver `request` and let the driver fill `response`.
    ///
    /// Returns how many request bytes the transport accepted. Anything short
    /// of `request.len()` is turned into a failure by the caller.
    fn transfer(&self, request: &[u8], response: &mut [u8]) -> std::io::Result<usize>;
}

impl<T: CommandChannel + ?Sized> CommandChannel for Arc<T> {
    fn transfer(&self, request: &[u8], response: &mut [u8]) -> std::io::Result<usize> {
        (**self).transfer(request, response)
    }
}

impl<T: CommandChannel + ?Sized> CommandChannel for Box<T> {
    fn transfer(&self, request: &[u8], response: &mut [u8]) -> std::io::Result<usize> {
        (**self).transfer(request, response)
    }
}

/// Issue `cmd` over `channel` and return the reply bytes.
///
/// The reply buffer is exactly `cmd.response_len()` bytes, zeroed. It is
/// returned only when the full record was transferred.
pub fn execute(channel: &dyn CommandChannel, mut cmd: Command) -> Result<Vec<u8>> {
    let mut response = vec![0u8; cmd.response_len()];
    cmd.bind_response(&mut response);

    let command = cmd.opcode();
    let expected = cmd.len();
    tracing::trace!(%command, size = expected, reply = response.len(), "issuing command");

    match channel.transfer(cmd.as_bytes(), &mut response) {
        Ok(written) if written == expected => Ok(response),
        Ok(written) => {
            tracing::debug!(%command, written, expected, "short command write");
            Err(VerbsError::ShortWrite {
                command,
                written,
                expected,
            })
        }
        Err(source) => {
            tracing::debug!(%command, "command write failed: {source}");
            Err(VerbsError::Io { command, source })
        }
    }
}
