//! Control-plane command marshalling for the RDMA user-verbs driver.
//!
//! Every operation encodes one fixed-layout record (an 8-byte header
//! followed by the command body and optional driver-private data), hands it
//! to the driver in a single blocking write, and decodes the reply the driver
//! wrote back through the address embedded in the record.
//!
//! ```no_run
//! use uverbs::{AccessFlags, Session, VerbsConfig};
//!
//! # fn main() -> uverbs::Result<()> {
//! let session = Session::open(&VerbsConfig::from_env())?;
//! let pd = session.alloc_pd()?;
//! let cq = session.create_cq(64, 0)?;
//! let mut buf = vec![0u8; 4096];
//! let mr = unsafe {
//!     session.reg_mr_slice(&pd, &mut buf, AccessFlags::LOCAL_WRITE | AccessFlags::REMOTE_READ)?
//! };
//! println!("lkey={:#x} rkey={:#x} cqe={}", mr.lkey(), mr.rkey(), cq.cqe());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cq;
pub mod error;
pub mod handle;
pub mod pd;
pub mod port;
pub mod protocol;
pub mod qp;
pub mod session;
pub mod transport;
pub mod types;

pub use config::VerbsConfig;
pub use cq::CompletionQueue;
pub use error::{DestroyError, Result, VerbsError};
pub use handle::{CqKind, Handle, HandleKind, MrKind, PdKind, QpKind, SessionId};
pub use pd::{MemoryRegion, ProtectionDomain};
pub use port::PortAttr;
pub use protocol::Opcode;
pub use qp::{AhAttr, GlobalRoute, QpAttr, QpCap, QpInitAttr, QueuePair};
pub use session::Session;
pub use transport::{CommandChannel, FdChannel};
pub use types::{AccessFlags, Gid, MigState, Mtu, PortState, QpAttrMask, QpState, QpType};
