pub mod catalog;
pub mod config;
pub mod console_log;
pub mod dataset;
pub mod demo;
pub mod derive;
pub mod error;
pub mod export;
pub mod filter;
pub mod paginate;
pub mod ranking;
pub mod session;
pub mod state;
pub mod table;

pub use error::ScoutError;
