//! Queue pairs: creation, state transitions and teardown.
//!
//! A modify command always carries the complete attribute record, including
//! both path destinations in full. The change mask tells the driver which
//! fields to apply; unmasked fields are transmitted as given.

use crate::cq::CompletionQueue;
use crate::error::{DestroyError, Result};
use crate::handle::{CqKind, Handle, PdKind, QpKind};
use crate::pd::ProtectionDomain;
use crate::protocol::records::{
    CreateQpCmd, CreateQpResp, DestroyQpCmd, ModifyQpCmd, QpDest,
};
use crate::protocol::{Command, Opcode, Wire, decode_reply};
use crate::session::Session;
use crate::types::{AccessFlags, Gid, MigState, Mtu, QpAttrMask, QpState, QpType};

/// Requested work-queue capacities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QpCap {
    pub max_send_wr: u32,
    pub max_recv_wr: u32,
    pub max_send_sge: u32,
    pub max_recv_sge: u32,
    pub max_inline_data: u32,
}

/// Creation parameters for a queue pair.
#[derive(Debug, Clone, Copy)]
pub struct QpInitAttr<'a> {
    pub send_cq: &'a CompletionQueue,
    pub recv_cq: &'a CompletionQueue,
    pub cap: QpCap,
    pub qp_type: QpType,
    /// Generate a completion for every send, not only signaled ones.
    pub sq_sig_all: bool,
    pub user_handle: u64,
}

/// Global routing header fields of a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalRoute {
    pub dgid: Gid,
    pub flow_label: u32,
    pub sgid_index: u8,
    pub hop_limit: u8,
    pub traffic_class: u8,
}

/// Address vector of one path (primary or alternate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AhAttr {
    pub grh: GlobalRoute,
    pub dlid: u16,
    pub sl: u8,
    pub src_path_bits: u8,
    pub static_rate: u8,
    /// Route with the global header in `grh` instead of by LID alone.
    pub is_global: bool,
    pub port_num: u8,
}

impl AhAttr {
    fn to_dest(self) -> QpDest {
        QpDest {
            dgid: self.grh.dgid.raw,
            flow_label: self.grh.flow_label,
            dlid: self.dlid,
            reserved: 0,
            sgid_index: self.grh.sgid_index,
            hop_limit: self.grh.hop_limit,
            traffic_class: self.grh.traffic_class,
            sl: self.sl,
            src_path_bits: self.src_path_bits,
            static_rate: self.static_rate,
            is_global: self.is_global as u8,
            port_num: self.port_num,
        }
    }
}

/// Full queue-pair attribute set for a modify.
///
/// Which fields the driver applies is chosen by the [`QpAttrMask`] passed
/// alongside; every field is sent regardless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QpAttr {
    pub qp_state: QpState,
    pub cur_qp_state: QpState,
    /// `None` encodes as 0, which no driver accepts as a path MTU.
    pub path_mtu: Option<Mtu>,
    pub path_mig_state: MigState,
    pub qkey: u32,
    pub rq_psn: u32,
    pub sq_psn: u32,
    pub dest_qp_num: u32,
    pub qp_access_flags: AccessFlags,
    pub ah_attr: AhAttr,
    pub alt_ah_attr: AhAttr,
    pub pkey_index: u16,
    pub alt_pkey_index: u16,
    pub en_sqd_async_notify: bool,
    pub max_rd_atomic: u8,
    pub max_dest_rd_atomic: u8,
    pub min_rnr_timer: u8,
    pub port_num: u8,
    pub timeout: u8,
    pub retry_cnt: u8,
    pub rnr_retry: u8,
    pub alt_port_num: u8,
    pub alt_timeout: u8,
}

impl QpAttr {
    pub(crate) fn to_modify_cmd(&self, qp_handle: u32, mask: QpAttrMask) -> ModifyQpCmd {
        ModifyQpCmd {
            dest: self.ah_attr.to_dest(),
            alt_dest: self.alt_ah_attr.to_dest(),
            qp_handle,
            attr_mask: mask.bits(),
            qkey: self.qkey,
            rq_psn: self.rq_psn,
            sq_psn: self.sq_psn,
            dest_qp_num: self.dest_qp_num,
            qp_access_flags: self.qp_access_flags.bits(),
            pkey_index: self.pkey_index,
            alt_pkey_index: self.alt_pkey_index,
            qp_state: self.qp_state as u8,
            cur_qp_state: self.cur_qp_state as u8,
            path_mtu: self.path_mtu.map_or(0, |m| m as u8),
            path_mig_state: self.path_mig_state as u8,
            en_sqd_async_notify: self.en_sqd_async_notify as u8,
            max_rd_atomic: self.max_rd_atomic,
            max_dest_rd_atomic: self.max_dest_rd_atomic,
            min_rnr_timer: self.min_rnr_timer,
            port_num: self.port_num,
            timeout: self.timeout,
            retry_cnt: self.retry_cnt,
            rnr_retry: self.rnr_retry,
            alt_port_num: self.alt_port_num,
            alt_timeout: self.alt_timeout,
            reserved: [0; 2],
        }
    }
}

/// A driver queue pair.
///
/// Records the domain and completion queues it was created with; it does not
/// own them.
#[derive(Debug, PartialEq, Eq)]
pub struct QueuePair {
    handle: Handle<QpKind>,
    qp_num: u32,
    pd: Handle<PdKind>,
    send_cq: Handle<CqKind>,
    recv_cq: Handle<CqKind>,
    qp_type: QpType,
}

impl QueuePair {
    pub fn handle(&self) -> Handle<QpKind> {
        self.handle
    }

    /// Queue-pair number peers address this QP by.
    pub fn qp_num(&self) -> u32 {
        self.qp_num
    }

    pub fn pd(&self) -> Handle<PdKind> {
        self.pd
    }

    pub fn send_cq(&self) -> Handle<CqKind> {
        self.send_cq
    }

    pub fn recv_cq(&self) -> Handle<CqKind> {
        self.recv_cq
    }

    pub fn qp_type(&self) -> QpType {
        self.qp_type
    }
}

impl Session {
    /// Create a queue pair in `pd`.
    pub fn create_qp(&self, pd: &ProtectionDomain, init: &QpInitAttr<'_>) -> Result<QueuePair> {
        self.create_qp_ext(pd, init, &[])
    }

    /// [`create_qp`](Self::create_qp) with driver-private command data appended.
    pub fn create_qp_ext(
        &self,
        pd: &ProtectionDomain,
        init: &QpInitAttr<'_>,
        driver_data: &[u8],
    ) -> Result<QueuePair> {
        let pd_handle = pd.handle().raw_for(self.id())?;
        let send_cq_handle = init.send_cq.handle().raw_for(self.id())?;
        let recv_cq_handle = init.recv_cq.handle().raw_for(self.id())?;

        let cmd = Command::new(
            Opcode::CreateQp,
            &CreateQpCmd {
                user_handle: init.user_handle,
                pd_handle,
                send_cq_handle,
                recv_cq_handle,
                max_send_wr: init.cap.max_send_wr,
                max_recv_wr: init.cap.max_recv_wr,
                max_send_sge: init.cap.max_send_sge,
                max_recv_sge: init.cap.max_recv_sge,
                max_inline_data: init.cap.max_inline_data,
                sq_sig_all: init.sq_sig_all as u8,
                qp_type: init.qp_type as u8,
                ..Default::default()
            },
            driver_data,
            CreateQpResp::SIZE,
        )?;
        let reply = self.execute(cmd)?;
        let resp: CreateQpResp = decode_reply(Opcode::CreateQp, &reply)?;

        let handle = Handle::new(resp.qp_handle, self.id());
        tracing::debug!(?handle, qpn = resp.qpn, qp_type = ?init.qp_type, "queue pair created");
        Ok(QueuePair {
            handle,
            qp_num: resp.qpn,
            pd: pd.handle(),
            send_cq: init.send_cq.handle(),
            recv_cq: init.recv_cq.handle(),
            qp_type: init.qp_type,
        })
    }

    /// Apply the fields of `attr` selected by `mask` to `qp`.
    ///
    /// Whether the requested state transition is legal is the driver's call.
    pub fn modify_qp(&self, qp: &QueuePair, attr: &QpAttr, mask: QpAttrMask) -> Result<()> {
        self.modify_qp_ext(qp, attr, mask, &[])
    }

    /// [`modify_qp`](Self::modify_qp) with driver-private command data appended.
    pub fn modify_qp_ext(
        &self,
        qp: &QueuePair,
        attr: &QpAttr,
        mask: QpAttrMask,
        driver_data: &[u8],
    ) -> Result<()> {
        let qp_handle = qp.handle.raw_for(self.id())?;
        let cmd = Command::new(
            Opcode::ModifyQp,
            &attr.to_modify_cmd(qp_handle, mask),
            driver_data,
            0,
        )?;
        self.execute(cmd)?;
        tracing::debug!(
            handle = ?qp.handle,
            state = ?attr.qp_state,
            mask = ?mask,
            "queue pair modified"
        );
        Ok(())
    }

    /// Destroy a queue pair.
    ///
    /// On failure the queue pair is handed back inside the error.
    pub fn destroy_qp(&self, qp: QueuePair) -> std::result::Result<(), DestroyError<QueuePair>> {
        let handle = qp.handle;
        self.destroy(Opcode::DestroyQp, handle, |qp_handle| DestroyQpCmd { qp_handle }, qp)
    }
}
