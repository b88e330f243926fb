mod parse;

pub mod cmd;
pub use cmd::{Command, ToArg};

pub mod config;
pub use config::ClientConfig;

pub mod connection;
pub use connection::Connection;

pub mod error;
pub use error::Error;

pub mod reply;
pub use reply::{Reply, ReplyKind};

pub mod clients;
pub use clients::{Client, KeyType, SessionState};

pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub type Result<T> = std::result::Result<T, crate::error::Error>;
