pub mod client;
pub use client::{Client, SessionState};

mod hashes;
mod keys;
mod lists;
mod server;
mod sets;
mod sorted_sets;
mod strings;
mod transactions;

pub use keys::KeyType;
