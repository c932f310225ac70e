//! Protocol Module
//!
//! Defines the wire protocol spoken to the remote key-value server (RESP2).
//!
//! ### Commands
//! - GET, SET, SETEX
//! - INCR, INCRBY, DECR, DECRBY
//! - DEL, FLUSHALL
//!
//! ### Reply Types
//! - `+` simple string
//! - `-` error
//! - `:` integer
//! - `$` bulk string (`$-1` = null)
//! - `*` array (`*-1` = null)

mod command;
mod reply;
mod codec;

pub use command::Command;
pub use reply::Reply;
pub use codec::{
    decode_reply, encode_command, encode_reply, MAX_NESTING_DEPTH, MAX_PAYLOAD_SIZE,
};
