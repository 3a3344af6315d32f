//! Byte-exact command and reply records of the user-verbs driver ABI.

pub mod command;
pub mod header;
pub mod records;
pub mod wire;

pub use command::{Command, MAX_COMMAND_SIZE, decode_reply};
pub use header::{CmdHeader, HEADER_SIZE, Opcode};
pub use wire::{Wire, decode_record, encode_record};
