//! Command definitions
//!
//! The remote commands the remote driver issues.

/// A command for the remote key-value server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Set a value with no expiry
    Set { key: String, value: String },

    /// Set a value expiring after `seconds`
    SetEx {
        key: String,
        seconds: u64,
        value: String,
    },

    /// Increment by one
    Incr { key: String },

    /// Increment by `by`
    IncrBy { key: String, by: i64 },

    /// Decrement by one
    Decr { key: String },

    /// Decrement by `by`
    DecrBy { key: String, by: i64 },

    /// Delete a key
    Del { key: String },

    /// Delete every key in every database
    FlushAll,
}

impl Command {
    /// Command name as sent on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::SetEx { .. } => "SETEX",
            Command::Incr { .. } => "INCR",
            Command::IncrBy { .. } => "INCRBY",
            Command::Decr { .. } => "DECR",
            Command::DecrBy { .. } => "DECRBY",
            Command::Del { .. } => "DEL",
            Command::FlushAll => "FLUSHALL",
        }
    }

    /// Full argument vector, command name first
    pub fn args(&self) -> Vec<Vec<u8>> {
        let mut args = vec![self.name().as_bytes().to_vec()];

        match self {
            Command::Get { key }
            | Command::Incr { key }
            | Command::Decr { key }
            | Command::Del { key } => args.push(key.as_bytes().to_vec()),
            Command::Set { key, value } => {
                args.push(key.as_bytes().to_vec());
                args.push(value.as_bytes().to_vec());
            }
            Command::SetEx { key, seconds, value } => {
                args.push(key.as_bytes().to_vec());
                args.push(seconds.to_string().into_bytes());
                args.push(value.as_bytes().to_vec());
            }
            Command::IncrBy { key, by } | Command::DecrBy { key, by } => {
                args.push(key.as_bytes().to_vec());
                args.push(by.to_string().into_bytes());
            }
            Command::FlushAll => {}
        }

        args
    }
}
