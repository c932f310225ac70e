//! cachette CLI
//!
//! Command-line interface for inspecting and editing a cache.

use clap::{Parser, Subcommand, ValueEnum};
use cachette::{Cache, Config, DriverKind};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// cachette CLI
#[derive(Parser, Debug)]
#[command(name = "cachette-cli")]
#[command(about = "CLI for the cachette key-value cache")]
#[command(version)]
struct Args {
    /// Storage driver
    #[arg(long, value_enum, default_value_t = Driver::Fs)]
    driver: Driver,

    /// Cache directory (filesystem driver)
    #[arg(short, long, default_value = "./cachette_data")]
    directory: String,

    /// Server address (remote driver)
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Key segment separator (filesystem driver)
    #[arg(long, default_value = ":")]
    separator: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Driver {
    Fs,
    Remote,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set (parsed as JSON, stored as a string otherwise)
        value: String,

        /// Expire after this many milliseconds
        #[arg(short, long)]
        ttl: Option<u64>,
    },

    /// Increment a counter and print the result
    Incr {
        /// The key to increment
        key: String,

        /// Amount to add
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        by: i64,
    },

    /// Decrement a counter and print the result
    Decr {
        /// The key to decrement
        key: String,

        /// Amount to subtract
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        by: i64,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Delete every key
    Flush,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cachette=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .driver(match args.driver {
            Driver::Fs => DriverKind::FileSystem,
            Driver::Remote => DriverKind::Remote,
        })
        .directory(&args.directory)
        .key_separator(&args.separator)
        .remote_addr(&args.server)
        .build();

    let cache = match Cache::open(&config).await {
        Ok(cache) => cache,
        Err(e) => {
            tracing::error!("Failed to open cache: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cache, args.command).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cache: &Cache, command: Commands) -> cachette::Result<()> {
    match command {
        Commands::Get { key } => match cache.get(&key).await? {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Commands::Set { key, value, ttl } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            cache.set(&key, &value, ttl).await?;
            println!("OK");
        }
        Commands::Incr { key, by } => {
            println!("{}", cache.increment_by(&key, by).await?);
        }
        Commands::Decr { key, by } => {
            println!("{}", cache.decrement_by(&key, by).await?);
        }
        Commands::Del { key } => {
            println!("{}", cache.delete(&key).await?);
        }
        Commands::Flush => {
            cache.flush().await?;
            println!("OK");
        }
    }

    Ok(())
}
