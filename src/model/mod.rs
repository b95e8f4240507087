pub mod config;
pub mod store;
pub mod task;

pub use config::*;
pub use store::*;
pub use task::*;
