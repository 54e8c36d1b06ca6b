pub mod config;
pub mod logger;
pub mod save_config;
pub mod clock;

pub mod board;
pub mod inventory;
pub mod render;
