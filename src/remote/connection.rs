//! Connection Handler
//!
//! A RESP client over a single TCP connection.

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

use crate::error::{CacheError, Result};
use crate::protocol::{decode_reply, encode_command, Command, Reply};

use super::RemoteClient;

/// Initial read buffer size
const READ_BUFFER_SIZE: usize = 4 * 1024;

/// One TCP stream plus the bytes read from it but not yet decoded
struct Connection {
    /// TCP stream writer (buffered for efficiency)
    stream: BufWriter<TcpStream>,

    /// Bytes received but not yet decoded
    buffer: BytesMut,
}

impl Connection {
    /// Send a command and wait for its reply
    async fn round_trip(&mut self, command: &Command) -> Result<Reply> {
        self.stream.write_all(&encode_command(command)).await?;
        self.stream.flush().await?;
        self.read_reply().await
    }

    async fn read_reply(&mut self) -> Result<Reply> {
        loop {
            if let Some(reply) = decode_reply(&mut self.buffer)? {
                return Ok(reply);
            }

            if self.stream.get_mut().read_buf(&mut self.buffer).await? == 0 {
                return Err(CacheError::Network(if self.buffer.is_empty() {
                    "Connection closed by server".to_string()
                } else {
                    "Connection closed mid-reply".to_string()
                }));
            }
        }
    }
}

/// Client for a RESP-speaking key-value server
///
/// Requests are serialised: one command is in flight at a time.
pub struct RespClient {
    connection: Mutex<Connection>,

    /// Peer address for logging
    peer_addr: String,
}

impl RespClient {
    /// Connect to a server
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| CacheError::Network(format!("Failed to connect: {}", e)))?;
        Self::from_stream(stream)
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            connection: Mutex::new(Connection {
                stream: BufWriter::new(stream),
                buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
            }),
            peer_addr,
        })
    }

    /// Execute a command and return the raw reply
    pub async fn execute(&self, command: Command) -> Result<Reply> {
        tracing::trace!("Sending {} to {}", command.name(), self.peer_addr);

        let mut connection = self.connection.lock().await;
        connection.round_trip(&command).await.map_err(|e| {
            tracing::warn!("{} to {} failed: {}", command.name(), self.peer_addr, e);
            e
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

#[async_trait]
impl RemoteClient for RespClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.execute(Command::Get { key: key.to_string() })
            .await?
            .into_string()
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.execute(Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        })
        .await?
        .into_status()?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, value: &str) -> Result<()> {
        self.execute(Command::SetEx {
            key: key.to_string(),
            seconds,
            value: value.to_string(),
        })
        .await?
        .into_status()?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.execute(Command::Incr { key: key.to_string() })
            .await?
            .into_integer()
    }

    async fn incr_by(&self, key: &str, by: i64) -> Result<i64> {
        self.execute(Command::IncrBy {
            key: key.to_string(),
            by,
        })
        .await?
        .into_integer()
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        self.execute(Command::Decr { key: key.to_string() })
            .await?
            .into_integer()
    }

    async fn decr_by(&self, key: &str, by: i64) -> Result<i64> {
        self.execute(Command::DecrBy {
            key: key.to_string(),
            by,
        })
        .await?
        .into_integer()
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let removed = self
            .execute(Command::Del { key: key.to_string() })
            .await?
            .into_integer()?;
        u64::try_from(removed)
            .map_err(|_| CacheError::Protocol(format!("Negative DEL count: {}", removed)))
    }

    async fn flush_all(&self) -> Result<()> {
        self.execute(Command::FlushAll).await?.into_status()?;
        Ok(())
    }
}
