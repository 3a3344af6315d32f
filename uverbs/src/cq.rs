//! Completion queues.

use crate::error::{DestroyError, Result};
use crate::handle::{CqKind, Handle};
use crate::protocol::records::{CreateCqCmd, CreateCqResp, DestroyCqCmd};
use crate::protocol::{Command, Opcode, Wire, decode_reply};
use crate::session::Session;

/// A driver completion queue.
///
/// `cqe` is the capacity the driver actually granted, which may differ from
/// what was requested.
#[derive(Debug, PartialEq, Eq)]
pub struct CompletionQueue {
    handle: Handle<CqKind>,
    cqe: u32,
    user_handle: u64,
}

impl CompletionQueue {
    pub fn handle(&self) -> Handle<CqKind> {
        self.handle
    }

    pub fn cqe(&self) -> u32 {
        self.cqe
    }

    /// Opaque value echoed back in completion events for this queue.
    pub fn user_handle(&self) -> u64 {
        self.user_handle
    }
}

impl Session {
    /// Create a completion queue with room for at least `cqe` entries.
    pub fn create_cq(&self, cqe: u32, user_handle: u64) -> Result<CompletionQueue> {
        self.create_cq_ext(cqe, user_handle, &[])
    }

    /// [`create_cq`](Self::create_cq) with driver-private command data appended.
    pub fn create_cq_ext(
        &self,
        cqe: u32,
        user_handle: u64,
        driver_data: &[u8],
    ) -> Result<CompletionQueue> {
        let cmd = Command::new(
            Opcode::CreateCq,
            &CreateCqCmd {
                user_handle,
                cqe,
                ..Default::default()
            },
            driver_data,
            CreateCqResp::SIZE,
        )?;
        let reply = self.execute(cmd)?;
        let resp: CreateCqResp = decode_reply(Opcode::CreateCq, &reply)?;

        let handle = Handle::new(resp.cq_handle, self.id());
        if resp.cqe != cqe {
            tracing::debug!(?handle, requested = cqe, granted = resp.cqe, "cq size adjusted by driver");
        } else {
            tracing::debug!(?handle, cqe, "completion queue created");
        }
        Ok(CompletionQueue {
            handle,
            cqe: resp.cqe,
            user_handle,
        })
    }

    /// Destroy a completion queue.
    ///
    /// On failure the queue is handed back inside the error.
    pub fn destroy_cq(
        &self,
        cq: CompletionQueue,
    ) -> std::result::Result<(), DestroyError<CompletionQueue>> {
        let handle = cq.handle;
        self.destroy(Opcode::DestroyCq, handle, |cq_handle| DestroyCqCmd { cq_handle }, cq)
    }
}
