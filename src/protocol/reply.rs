//! Reply definitions
//!
//! Represents replies from the remote server.

use crate::error::{CacheError, Result};

/// A decoded server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+OK`
    Simple(String),

    /// `-ERR ...`
    Error(String),

    /// `:42`
    Integer(i64),

    /// `$5\r\nhello` (`None` for the null bulk string `$-1`)
    Bulk(Option<Vec<u8>>),

    /// `*2\r\n...` (`None` for the null array `*-1`)
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Turn an error reply into `CacheError::Remote`
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Reply::Error(message) => Err(CacheError::Remote(message)),
            other => Ok(other),
        }
    }

    /// Expect an integer reply
    pub fn into_integer(self) -> Result<i64> {
        match self.into_result()? {
            Reply::Integer(n) => Ok(n),
            other => Err(unexpected("integer", &other)),
        }
    }

    /// Expect a bulk string reply, decoded as UTF-8
    pub fn into_string(self) -> Result<Option<String>> {
        match self.into_result()? {
            Reply::Bulk(None) => Ok(None),
            Reply::Bulk(Some(bytes)) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| CacheError::Protocol(format!("Bulk reply is not UTF-8: {}", e))),
            other => Err(unexpected("bulk string", &other)),
        }
    }

    /// Expect a simple status reply such as `+OK`
    pub fn into_status(self) -> Result<String> {
        match self.into_result()? {
            Reply::Simple(status) => Ok(status),
            other => Err(unexpected("status", &other)),
        }
    }
}

fn unexpected(expected: &str, got: &Reply) -> CacheError {
    CacheError::Protocol(format!("Expected {} reply, got {:?}", expected, got))
}
