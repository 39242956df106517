pub mod registration;
pub mod server;
pub mod teams;
pub mod watcher;
