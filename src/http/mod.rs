pub mod client;

pub use client::ArenaClient;
