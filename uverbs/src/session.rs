//! Session: one open association with the driver.

use crate::config::VerbsConfig;
use crate::error::{DestroyError, Result, VerbsError};
use crate::handle::{Handle, HandleKind, SessionId};
use crate::port::PortAttr;
use crate::protocol::records::{
    COMP_FD_SIZE, GetContextCmd, GetContextResp, QueryPortCmd, QueryPortResp,
};
use crate::protocol::{Command, Opcode, Wire, decode_reply};
use crate::transport::{self, CommandChannel, FdChannel};
use std::os::fd::RawFd;

/// An open association with the verbs driver.
///
/// Owns the command channel every resource operation goes through and the
/// event descriptors handed out at init. Handles created through a session
/// are only accepted by that session.
///
/// The event descriptors are reported, not owned: dropping the session does
/// not close them, and the caller closes each one it received from
/// [`async_fd`](Self::async_fd) and [`comp_fds`](Self::comp_fds).
///
/// Commands are single blocking exchanges. The session adds no locking: two
/// threads issuing commands through the same session must coordinate.
pub struct Session {
    id: SessionId,
    channel: Box<dyn CommandChannel>,
    async_fd: Option<RawFd>,
    comp_fds: Vec<RawFd>,
}

impl Session {
    /// Wrap an already-established channel. Call [`init`](Self::init) next.
    pub fn new(channel: impl CommandChannel + 'static) -> Self {
        let id = SessionId::next();
        tracing::debug!(session = %id, "session created");
        Self {
            id,
            channel: Box::new(channel),
            async_fd: None,
            comp_fds: Vec::new(),
        }
    }

    /// Open the configured device and initialize with the configured number
    /// of completion vectors.
    pub fn open(config: &VerbsConfig) -> Result<Self> {
        let channel = FdChannel::open(&config.device)?;
        let mut session = Self::new(channel);
        session.init(config.comp_vectors)?;
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Initialize the driver context, requesting `num_comp` completion
    /// event descriptors.
    ///
    /// On success the async descriptor and exactly `num_comp` completion
    /// descriptors replace whatever the session held. On failure nothing
    /// changes.
    pub fn init(&mut self, num_comp: usize) -> Result<()> {
        self.init_ext(num_comp, &[])
    }

    /// [`init`](Self::init) with driver-private command data appended.
    pub fn init_ext(&mut self, num_comp: usize, driver_data: &[u8]) -> Result<()> {
        let reply_len = num_comp
            .checked_mul(COMP_FD_SIZE)
            .and_then(|n| n.checked_add(GetContextResp::SIZE))
            .ok_or(VerbsError::InvalidCommandSize {
                size: usize::MAX,
                reason: "completion vector count overflows the reply size",
            })?;
        let cmd = Command::new(
            Opcode::GetContext,
            &GetContextCmd::default(),
            driver_data,
            reply_len,
        )?;
        let reply = self.execute(cmd)?;

        let resp: GetContextResp = decode_reply(Opcode::GetContext, &reply)?;
        let comp_fds: Vec<RawFd> = reply[GetContextResp::SIZE..]
            .chunks_exact(COMP_FD_SIZE)
            .take(num_comp)
            .map(|b| u32::get(b) as RawFd)
            .collect();

        self.async_fd = Some(resp.async_fd as RawFd);
        self.comp_fds = comp_fds;
        tracing::debug!(
            session = %self.id,
            async_fd = resp.async_fd,
            comp_vectors = num_comp,
            "session initialized"
        );
        Ok(())
    }

    /// Async event descriptor, once initialized. The caller closes it.
    pub fn async_fd(&self) -> Option<RawFd> {
        self.async_fd
    }

    /// Completion event descriptors; slot `i` is completion vector `i`.
    /// The caller closes them.
    pub fn comp_fds(&self) -> &[RawFd] {
        &self.comp_fds
    }

    pub fn num_comp_vectors(&self) -> usize {
        self.comp_fds.len()
    }

    /// Query the attributes of port `port_num`.
    pub fn query_port(&self, port_num: u8) -> Result<PortAttr> {
        self.query_port_ext(port_num, &[])
    }

    /// [`query_port`](Self::query_port) with driver-private command data appended.
    pub fn query_port_ext(&self, port_num: u8, driver_data: &[u8]) -> Result<PortAttr> {
        let cmd = Command::new(
            Opcode::QueryPort,
            &QueryPortCmd {
                port_num,
                ..Default::default()
            },
            driver_data,
            QueryPortResp::SIZE,
        )?;
        let reply = self.execute(cmd)?;
        let resp: QueryPortResp = decode_reply(Opcode::QueryPort, &reply)?;
        Ok(PortAttr::from(&resp))
    }

    pub(crate) fn execute(&self, cmd: Command) -> Result<Vec<u8>> {
        transport::execute(self.channel.as_ref(), cmd)
    }

    /// Issue a reply-less destroy command for `handle`, handing `resource`
    /// back if it fails.
    pub(crate) fn destroy<K, B, T>(
        &self,
        opcode: Opcode,
        handle: Handle<K>,
        body: impl FnOnce(u32) -> B,
        resource: T,
    ) -> std::result::Result<(), DestroyError<T>>
    where
        K: HandleKind,
        B: Wire,
        T: std::fmt::Debug,
    {
        let result = handle.raw_for(self.id).and_then(|raw| {
            let cmd = Command::new(opcode, &body(raw), &[], 0)?;
            self.execute(cmd).map(drop)
        });
        match result {
            Ok(()) => {
                tracing::debug!(?handle, command = %opcode, "resource destroyed");
                Ok(())
            }
            Err(error) => Err(DestroyError { error, resource }),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("async_fd", &self.async_fd)
            .field("comp_fds", &self.comp_fds)
            .finish_non_exhaustive()
    }
}
