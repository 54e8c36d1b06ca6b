pub mod paginator;
pub mod runner;
pub mod session;
