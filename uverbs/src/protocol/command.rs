use crate::error::{Result, VerbsError};
use crate::protocol::header::{CmdHeader, HEADER_SIZE, Opcode};
use crate::protocol::wire::{Wire, decode_record};

/// Largest record a `u16` word count can declare.
pub const MAX_COMMAND_SIZE: usize = u16::MAX as usize * 4;

/// A fully encoded command record, ready for the transport.
///
/// Layout: `[header][body][driver data, zero-padded to 4 bytes]`. The buffer
/// starts zeroed, so reserved fields and padding never carry stale bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    opcode: Opcode,
    buf: Vec<u8>,
    response_len: usize,
}

impl Command {
    /// Encode `body` behind a stamped header.
    ///
    /// `response_len` is the exact reply size the caller will provide.
    /// `driver_data` is appended after the base record for driver-private
    /// extensions.
    pub fn new<B: Wire>(
        opcode: Opcode,
        body: &B,
        driver_data: &[u8],
        response_len: usize,
    ) -> Result<Self> {
        if B::SIZE % 4 != 0 {
            return Err(VerbsError::InvalidCommandSize {
                size: HEADER_SIZE + B::SIZE,
                reason: "command body is not a multiple of 4",
            });
        }
        let padded_ext = driver_data.len().next_multiple_of(4);
        let size = HEADER_SIZE + B::SIZE + padded_ext;

        if size > MAX_COMMAND_SIZE {
            return Err(VerbsError::InvalidCommandSize {
                size,
                reason: "record does not fit a u16 word count",
            });
        }
        if response_len % 4 != 0 || response_len > MAX_COMMAND_SIZE {
            return Err(VerbsError::InvalidCommandSize {
                size: response_len,
                reason: "reply size is not a u16 word count",
            });
        }
        if response_len > 0 && !opcode.has_response() {
            return Err(VerbsError::InvalidCommandSize {
                size: response_len,
                reason: "command takes no reply",
            });
        }

        let header = CmdHeader {
            command: opcode,
            in_words: (size / 4) as u16,
            out_words: (response_len / 4) as u16,
        };

        let mut buf = vec![0u8; size];
        buf[..HEADER_SIZE].copy_from_slice(&header.encode());
        body.put(&mut buf[HEADER_SIZE..]);
        let ext_off = HEADER_SIZE + B::SIZE;
        buf[ext_off..ext_off + driver_data.len()].copy_from_slice(driver_data);

        Ok(Self {
            opcode,
            buf,
            response_len,
        })
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Size of the reply buffer this command declares.
    pub fn response_len(&self) -> usize {
        self.response_len
    }

    /// Point the record's reply address at `response`.
    ///
    /// Only reply-bearing commands have an address field; for the rest this
    /// is a no-op.
    pub(crate) fn bind_response(&mut self, response: &mut [u8]) {
        if !self.opcode.has_response() {
            return;
        }
        let addr = response.as_mut_ptr() as u64;
        self.buf[HEADER_SIZE..HEADER_SIZE + 8].copy_from_slice(&addr.to_ne_bytes());
    }
}

/// Decode the fixed part of a reply.
pub fn decode_reply<R: Wire>(command: Opcode, reply: &[u8]) -> Result<R> {
    decode_record(reply).ok_or(VerbsError::ShortResponse {
        command,
        expected: R::SIZE,
        actual: reply.len(),
    })
}
