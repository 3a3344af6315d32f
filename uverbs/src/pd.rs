//! Protection domains and memory regions.
//!
//! A protection domain scopes memory registrations and queue pairs. A memory
//! region is a registered address range plus the local and remote keys the
//! hardware uses to authorize access to it.

use crate::error::{DestroyError, Result};
use crate::handle::{Handle, MrKind, PdKind};
use crate::protocol::records::{
    AllocPdCmd, AllocPdResp, DeallocPdCmd, DeregMrCmd, RegMrCmd, RegMrResp,
};
use crate::protocol::{Command, Opcode, Wire, decode_reply};
use crate::session::Session;
use crate::types::AccessFlags;

/// A driver protection domain.
#[derive(Debug, PartialEq, Eq)]
pub struct ProtectionDomain {
    handle: Handle<PdKind>,
}

impl ProtectionDomain {
    pub fn handle(&self) -> Handle<PdKind> {
        self.handle
    }
}

/// A registered memory region.
#[derive(Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    handle: Handle<MrKind>,
    pd: Handle<PdKind>,
    addr: u64,
    length: u64,
    lkey: u32,
    rkey: u32,
}

impl MemoryRegion {
    pub fn handle(&self) -> Handle<MrKind> {
        self.handle
    }

    /// Domain the region was registered in.
    pub fn pd(&self) -> Handle<PdKind> {
        self.pd
    }

    pub fn addr(&self) -> u64 {
        self.addr
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Key for local access (work request scatter/gather entries).
    pub fn lkey(&self) -> u32 {
        self.lkey
    }

    /// Key a remote peer presents for RDMA access.
    pub fn rkey(&self) -> u32 {
        self.rkey
    }
}

impl Session {
    /// Allocate a protection domain.
    pub fn alloc_pd(&self) -> Result<ProtectionDomain> {
        self.alloc_pd_ext(&[])
    }

    /// [`alloc_pd`](Self::alloc_pd) with driver-private command data appended.
    pub fn alloc_pd_ext(&self, driver_data: &[u8]) -> Result<ProtectionDomain> {
        let cmd = Command::new(
            Opcode::AllocPd,
            &AllocPdCmd::default(),
            driver_data,
            AllocPdResp::SIZE,
        )?;
        let reply = self.execute(cmd)?;
        let resp: AllocPdResp = decode_reply(Opcode::AllocPd, &reply)?;

        let handle = Handle::new(resp.pd_handle, self.id());
        tracing::debug!(?handle, "protection domain allocated");
        Ok(ProtectionDomain { handle })
    }

    /// Release a protection domain.
    ///
    /// On failure the domain is handed back inside the error.
    pub fn dealloc_pd(
        &self,
        pd: ProtectionDomain,
    ) -> std::result::Result<(), DestroyError<ProtectionDomain>> {
        let handle = pd.handle;
        self.destroy(
            Opcode::DeallocPd,
            handle,
            |pd_handle| DeallocPdCmd { pd_handle },
            pd,
        )
    }

    /// Register `length` bytes at `addr` in `pd`.
    ///
    /// `hca_va` is the address the device will use for the region; pass
    /// `addr` for the usual identity mapping.
    ///
    /// # Safety
    /// The memory at `addr..addr + length` must stay valid until the region
    /// is deregistered; the device may access it at any time in between.
    pub unsafe fn reg_mr(
        &self,
        pd: &ProtectionDomain,
        addr: u64,
        length: u64,
        hca_va: u64,
        access: AccessFlags,
    ) -> Result<MemoryRegion> {
        unsafe { self.reg_mr_ext(pd, addr, length, hca_va, access, &[]) }
    }

    /// [`reg_mr`](Self::reg_mr) with driver-private command data appended.
    ///
    /// # Safety
    /// Same contract as [`reg_mr`](Self::reg_mr).
    pub unsafe fn reg_mr_ext(
        &self,
        pd: &ProtectionDomain,
        addr: u64,
        length: u64,
        hca_va: u64,
        access: AccessFlags,
        driver_data: &[u8],
    ) -> Result<MemoryRegion> {
        let pd_handle = pd.handle.raw_for(self.id())?;
        let cmd = Command::new(
            Opcode::RegMr,
            &RegMrCmd {
                response: 0,
                start: addr,
                length,
                hca_va,
                pd_handle,
                access_flags: access.bits(),
            },
            driver_data,
            RegMrResp::SIZE,
        )?;
        let reply = self.execute(cmd)?;
        let resp: RegMrResp = decode_reply(Opcode::RegMr, &reply)?;

        let handle = Handle::new(resp.mr_handle, self.id());
        tracing::debug!(?handle, addr, length, "memory region registered");
        Ok(MemoryRegion {
            handle,
            pd: pd.handle,
            addr,
            length,
            lkey: resp.lkey,
            rkey: resp.rkey,
        })
    }

    /// Register a byte slice with an identity device mapping.
    ///
    /// # Safety
    /// `buf` must outlive the registration; the device may access it until
    /// the region is deregistered.
    pub unsafe fn reg_mr_slice(
        &self,
        pd: &ProtectionDomain,
        buf: &mut [u8],
        access: AccessFlags,
    ) -> Result<MemoryRegion> {
        let addr = buf.as_mut_ptr() as u64;
        unsafe { self.reg_mr(pd, addr, buf.len() as u64, addr, access) }
    }

    /// Deregister a memory region.
    ///
    /// On failure the region is handed back inside the error.
    pub fn dereg_mr(
        &self,
        mr: MemoryRegion,
    ) -> std::result::Result<(), DestroyError<MemoryRegion>> {
        let handle = mr.handle;
        self.destroy(Opcode::DeregMr, handle, |mr_handle| DeregMrCmd { mr_handle }, mr)
    }
}
