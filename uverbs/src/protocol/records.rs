//! Command bodies and replies, one record per driver struct.
//!
//! A command body is everything after the 8-byte header. Bodies of
//! reply-bearing commands start with `response`, the reply buffer address,
//! which the transport layer fills in right before the write.

use super::wire::wire_record;

wire_record! {
    pub struct GetContextCmd {
        pub response: u64,
    }
}

wire_record! {
    /// Fixed part of the session-init reply. Followed by one `u32`
    /// completion event descriptor per requested completion vector.
    pub struct GetContextResp {
        pub async_fd: u32,
    }
}

/// Width of one trailing completion descriptor in the session-init reply.
pub const COMP_FD_SIZE: usize = 4;

wire_record! {
    pub struct QueryPortCmd {
        pub response: u64,
        pub port_num: u8,
        pub reserved: [u8; 7],
    }
}

wire_record! {
    pub struct QueryPortResp {
        pub port_cap_flags: u32,
        pub max_msg_sz: u32,
        pub bad_pkey_cntr: u32,
        pub qkey_viol_cntr: u32,
        pub gid_tbl_len: u32,
        pub pkey_tbl_len: u16,
        pub lid: u16,
        pub sm_lid: u16,
        pub state: u8,
        pub max_mtu: u8,
        pub active_mtu: u8,
        pub lmc: u8,
        pub max_vl_num: u8,
        pub sm_sl: u8,
        pub subnet_timeout: u8,
        pub init_type_reply: u8,
        pub active_width: u8,
        pub active_speed: u8,
        pub phys_state: u8,
        pub reserved: [u8; 3],
    }
}

wire_record! {
    pub struct AllocPdCmd {
        pub response: u64,
    }
}

wire_record! {
    pub struct AllocPdResp {
        pub pd_handle: u32,
    }
}

wire_record! {
    pub struct DeallocPdCmd {
        pub pd_handle: u32,
    }
}

wire_record! {
    pub struct RegMrCmd {
        pub response: u64,
        pub start: u64,
        pub length: u64,
        pub hca_va: u64,
        pub pd_handle: u32,
        pub access_flags: u32,
    }
}

wire_record! {
    pub struct RegMrResp {
        pub mr_handle: u32,
        pub lkey: u32,
        pub rkey: u32,
    }
}

wire_record! {
    pub struct DeregMrCmd {
        pub mr_handle: u32,
    }
}

wire_record! {
    pub struct CreateCqCmd {
        pub response: u64,
        pub user_handle: u64,
        pub cqe: u32,
        pub reserved: u32,
    }
}

wire_record! {
    pub struct CreateCqResp {
        pub cq_handle: u32,
        pub cqe: u32,
    }
}

wire_record! {
    pub struct DestroyCqCmd {
        pub cq_handle: u32,
    }
}

wire_record! {
    pub struct CreateQpCmd {
        pub response: u64,
        pub user_handle: u64,
        pub pd_handle: u32,
        pub send_cq_handle: u32,
        pub recv_cq_handle: u32,
        pub srq_handle: u32,
        pub max_send_wr: u32,
        pub max_recv_wr: u32,
        pub max_send_sge: u32,
        pub max_recv_sge: u32,
        pub max_inline_data: u32,
        pub sq_sig_all: u8,
        pub qp_type: u8,
        pub is_srq: u8,
        pub reserved: u8,
    }
}

wire_record! {
    pub struct CreateQpResp {
        pub qp_handle: u32,
        pub qpn: u32,
    }
}

wire_record! {
    /// One path destination inside a modify command.
    pub struct QpDest {
        pub dgid: [u8; 16],
        pub flow_label: u32,
        pub dlid: u16,
        pub reserved: u16,
        pub sgid_index: u8,
        pub hop_limit: u8,
        pub traffic_class: u8,
        pub sl: u8,
        pub src_path_bits: u8,
        pub static_rate: u8,
        pub is_global: u8,
        pub port_num: u8,
    }
}

wire_record! {
    pub struct ModifyQpCmd {
        pub dest: QpDest,
        pub alt_dest: QpDest,
        pub qp_handle: u32,
        pub attr_mask: u32,
        pub qkey: u32,
        pub rq_psn: u32,
        pub sq_psn: u32,
        pub dest_qp_num: u32,
        pub qp_access_flags: u32,
        pub pkey_index: u16,
        pub alt_pkey_index: u16,
        pub qp_state: u8,
        pub cur_qp_state: u8,
        pub path_mtu: u8,
        pub path_mig_state: u8,
        pub en_sqd_async_notify: u8,
        pub max_rd_atomic: u8,
        pub max_dest_rd_atomic: u8,
        pub min_rnr_timer: u8,
        pub port_num: u8,
        pub timeout: u8,
        pub retry_cnt: u8,
        pub rnr_retry: u8,
        pub alt_port_num: u8,
        pub alt_timeout: u8,
        pub reserved: [u8; 2],
    }
}

wire_record! {
    pub struct DestroyQpCmd {
        pub qp_handle: u32,
    }
}
