/// Size of the command header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Driver command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    GetContext = 0,
    QueryPort = 2,
    AllocPd = 3,
    DeallocPd = 4,
    RegMr = 9,
    DeregMr = 13,
    CreateCq = 18,
    DestroyCq = 20,
    CreateQp = 24,
    ModifyQp = 26,
    DestroyQp = 27,
}

impl Opcode {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Opcode::GetContext),
            2 => Some(Opcode::QueryPort),
            3 => Some(Opcode::AllocPd),
            4 => Some(Opcode::DeallocPd),
            9 => Some(Opcode::RegMr),
            13 => Some(Opcode::DeregMr),
            18 => Some(Opcode::CreateCq),
            20 => Some(Opcode::DestroyCq),
            24 => Some(Opcode::CreateQp),
            26 => Some(Opcode::ModifyQp),
            27 => Some(Opcode::DestroyQp),
            _ => None,
        }
    }

    /// Whether the driver writes a reply for this command.
    ///
    /// Reply-bearing commands carry the reply address as their first body field.
    pub const fn has_response(self) -> bool {
        matches!(
            self,
            Opcode::GetContext
                | Opcode::QueryPort
                | Opcode::AllocPd
                | Opcode::RegMr
                | Opcode::CreateCq
                | Opcode::CreateQp
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Opcode::GetContext => "GET_CONTEXT",
            Opcode::QueryPort => "QUERY_PORT",
            Opcode::AllocPd => "ALLOC_PD",
            Opcode::DeallocPd => "DEALLOC_PD",
            Opcode::RegMr => "REG_MR",
            Opcode::DeregMr => "DEREG_MR",
            Opcode::CreateCq => "CREATE_CQ",
            Opcode::DestroyCq => "DESTROY_CQ",
            Opcode::CreateQp => "CREATE_QP",
            Opcode::ModifyQp => "MODIFY_QP",
            Opcode::DestroyQp => "DESTROY_QP",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 8-byte prologue of every command record.
///
/// ```text
/// [0..4] command:   u32
/// [4..6] in_words:  u16  total record size / 4, header included
/// [6..8] out_words: u16  reply size / 4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmdHeader {
    pub command: Opcode,
    pub in_words: u16,
    pub out_words: u16,
}

impl CmdHeader {
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&(self.command as u32).to_ne_bytes());
        buf[4..6].copy_from_slice(&self.in_words.to_ne_bytes());
        buf[6..8].copy_from_slice(&self.out_words.to_ne_bytes());
        buf
    }

    /// Decode a header from the front of `buf`.
    ///
    /// Returns `None` if `buf` is shorter than a header or names an unknown command.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        let command = u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]);
        Some(CmdHeader {
            command: Opcode::from_u32(command)?,
            in_words: u16::from_ne_bytes([buf[4], buf[5]]),
            out_words: u16::from_ne_bytes([buf[6], buf[7]]),
        })
    }

    /// Declared size of the whole record in bytes.
    pub fn in_bytes(&self) -> usize {
        self.in_words as usize * 4
    }

    /// Declared size of the reply in bytes.
    pub fn out_bytes(&self) -> usize {
        self.out_words as usize * 4
    }
}
