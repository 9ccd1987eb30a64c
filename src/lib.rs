pub mod admin;
pub mod attachment;
pub mod config;
pub mod error;
pub mod group;
pub mod message;
pub mod state;
pub mod sync;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
