//! Port attributes returned by a port query.

use crate::protocol::records::QueryPortResp;
use crate::types::{Mtu, PortState};

/// Decoded port attributes.
///
/// Fields keep the driver's raw encodings so that values this crate has no
/// enum variant for still come through; typed accessors are provided for the
/// common ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortAttr {
    pub state: u8,
    pub max_mtu: u8,
    pub active_mtu: u8,
    pub gid_tbl_len: u32,
    pub port_cap_flags: u32,
    pub max_msg_sz: u32,
    pub bad_pkey_cntr: u32,
    pub qkey_viol_cntr: u32,
    pub pkey_tbl_len: u16,
    pub lid: u16,
    pub sm_lid: u16,
    pub lmc: u8,
    pub max_vl_num: u8,
    pub sm_sl: u8,
    pub subnet_timeout: u8,
    pub init_type_reply: u8,
    pub active_width: u8,
    pub active_speed: u8,
    pub phys_state: u8,
}

impl PortAttr {
    pub fn port_state(&self) -> Option<PortState> {
        PortState::from_u8(self.state)
    }

    pub fn max_mtu(&self) -> Option<Mtu> {
        Mtu::from_u8(self.max_mtu)
    }

    pub fn active_mtu(&self) -> Option<Mtu> {
        Mtu::from_u8(self.active_mtu)
    }

    pub fn is_active(&self) -> bool {
        self.port_state() == Some(PortState::Active)
    }
}

impl From<&QueryPortResp> for PortAttr {
    fn from(resp: &QueryPortResp) -> Self {
        Self {
            state: resp.state,
            max_mtu: resp.max_mtu,
            active_mtu: resp.active_mtu,
            gid_tbl_len: resp.gid_tbl_len,
            port_cap_flags: resp.port_cap_flags,
            max_msg_sz: resp.max_msg_sz,
            bad_pkey_cntr: resp.bad_pkey_cntr,
            qkey_viol_cntr: resp.qkey_viol_cntr,
            pkey_tbl_len: resp.pkey_tbl_len,
            lid: resp.lid,
            sm_lid: resp.sm_lid,
            lmc: resp.lmc,
            max_vl_num: resp.max_vl_num,
            sm_sl: resp.sm_sl,
            subnet_timeout: resp.subnet_timeout,
            init_type_reply: resp.init_type_reply,
            active_width: resp.active_width,
            active_speed: resp.active_speed,
            phys_state: resp.phys_state,
        }
    }
}
