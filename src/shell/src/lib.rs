pub mod clock;
pub mod config;
pub mod device_client;
pub mod shell;
pub mod terminal;
