//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol (RESP2).
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! An array of bulk strings, command name first:
//! ```text
//! *3\r\n $3\r\nSET\r\n $3\r\nkey\r\n $5\r\nvalue\r\n
//! ```
//!
//! ### Reply Format
//! One type byte, a CRLF-terminated header, then (for bulk strings and
//! arrays) a payload:
//! ```text
//! ┌──────────┬─────────────────┬──────────────────────────┐
//! │ Type (1) │ Header + CRLF   │ Payload (bulk / array)   │
//! └──────────┴─────────────────┴──────────────────────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CacheError, Result};
use super::{Command, Reply};

/// Line terminator
const CRLF: &[u8] = b"\r\n";

/// Maximum bulk payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Maximum depth of nested array replies
pub const MAX_NESTING_DEPTH: usize = 32;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command as a RESP array of bulk strings
pub fn encode_command(command: &Command) -> Bytes {
    let args = command.args();
    let payload_len: usize = args.iter().map(|a| a.len() + 16).sum();

    let mut message = BytesMut::with_capacity(16 + payload_len);
    message.put_u8(b'*');
    message.put_slice(args.len().to_string().as_bytes());
    message.put_slice(CRLF);

    for arg in &args {
        message.put_u8(b'$');
        message.put_slice(arg.len().to_string().as_bytes());
        message.put_slice(CRLF);
        message.put_slice(arg);
        message.put_slice(CRLF);
    }

    message.freeze()
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply (used by test peers and tooling)
pub fn encode_reply(reply: &Reply) -> Bytes {
    let mut message = BytesMut::new();
    put_reply(&mut message, reply);
    message.freeze()
}

fn put_reply(message: &mut BytesMut, reply: &Reply) {
    match reply {
        Reply::Simple(s) => put_line(message, b'+', s.as_bytes()),
        Reply::Error(s) => put_line(message, b'-', s.as_bytes()),
        Reply::Integer(n) => put_line(message, b':', n.to_string().as_bytes()),
        Reply::Bulk(None) => put_line(message, b'$', b"-1"),
        Reply::Bulk(Some(bytes)) => {
            put_line(message, b'$', bytes.len().to_string().as_bytes());
            message.put_slice(bytes);
            message.put_slice(CRLF);
        }
        Reply::Array(None) => put_line(message, b'*', b"-1"),
        Reply::Array(Some(items)) => {
            put_line(message, b'*', items.len().to_string().as_bytes());
            for item in items {
                put_reply(message, item);
            }
        }
    }
}

fn put_line(message: &mut BytesMut, tag: u8, line: &[u8]) {
    message.put_u8(tag);
    message.put_slice(line);
    message.put_slice(CRLF);
}

/// Decode one reply from the front of `buffer`
///
/// Returns `Ok(None)` when the buffer does not yet hold a complete reply; in
/// that case nothing is consumed. On success exactly the bytes of the decoded
/// reply are consumed.
pub fn decode_reply(buffer: &mut BytesMut) -> Result<Option<Reply>> {
    match parse_reply(buffer, 0, 0)? {
        Some((reply, consumed)) => {
            buffer.advance(consumed);
            Ok(Some(reply))
        }
        None => Ok(None),
    }
}

/// Parse a reply starting at `pos`; returns the reply and the end offset
fn parse_reply(bytes: &[u8], pos: usize, depth: usize) -> Result<Option<(Reply, usize)>> {
    let Some(&tag) = bytes.get(pos) else {
        return Ok(None);
    };
    let Some((line, next)) = read_line(bytes, pos + 1) else {
        return Ok(None);
    };

    match tag {
        b'+' => Ok(Some((Reply::Simple(text(line)?), next))),
        b'-' => Ok(Some((Reply::Error(text(line)?), next))),
        b':' => Ok(Some((Reply::Integer(number(line)?), next))),
        b'$' => parse_bulk(bytes, line, next),
        b'*' => parse_array(bytes, line, next, depth),
        _ => Err(CacheError::Protocol(format!(
            "Unknown reply type: 0x{:02x}",
            tag
        ))),
    }
}

fn parse_bulk(bytes: &[u8], header: &[u8], start: usize) -> Result<Option<(Reply, usize)>> {
    let len = number(header)?;
    if len == -1 {
        return Ok(Some((Reply::Bulk(None), start)));
    }

    let len = usize::try_from(len)
        .map_err(|_| CacheError::Protocol(format!("Negative bulk length: {}", len)))?;

    if len > MAX_PAYLOAD_SIZE {
        return Err(CacheError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }

    let end = start + len;
    if bytes.len() < end + CRLF.len() {
        return Ok(None);
    }

    if &bytes[end..end + CRLF.len()] != CRLF {
        return Err(CacheError::Protocol(
            "Bulk string not terminated by CRLF".to_string(),
        ));
    }

    Ok(Some((
        Reply::Bulk(Some(bytes[start..end].to_vec())),
        end + CRLF.len(),
    )))
}

fn parse_array(
    bytes: &[u8],
    header: &[u8],
    start: usize,
    depth: usize,
) -> Result<Option<(Reply, usize)>> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(CacheError::Protocol(format!(
            "Reply nested deeper than {} arrays",
            MAX_NESTING_DEPTH
        )));
    }

    let count = number(header)?;
    if count == -1 {
        return Ok(Some((Reply::Array(None), start)));
    }

    let count = usize::try_from(count)
        .map_err(|_| CacheError::Protocol(format!("Negative array length: {}", count)))?;

    let mut items = Vec::with_capacity(count.min(1024));
    let mut pos = start;
    for _ in 0..count {
        match parse_reply(bytes, pos, depth + 1)? {
            Some((item, next)) => {
                items.push(item);
                pos = next;
            }
            None => return Ok(None),
        }
    }

    Ok(Some((Reply::Array(Some(items)), pos)))
}

/// Find the CRLF-terminated line starting at `pos`
fn read_line(bytes: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let rest = bytes.get(pos..)?;
    let offset = rest.windows(CRLF.len()).position(|w| w == CRLF)?;
    Some((&rest[..offset], pos + offset + CRLF.len()))
}

fn text(line: &[u8]) -> Result<String> {
    String::from_utf8(line.to_vec())
        .map_err(|e| CacheError::Protocol(format!("Reply line is not UTF-8: {}", e)))
}

fn number(line: &[u8]) -> Result<i64> {
    let line = text(line)?;
    line.parse::<i64>()
        .map_err(|_| CacheError::Protocol(format!("Invalid integer in reply: {:?}", line)))
}
