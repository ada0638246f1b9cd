//! In-memory project and task tracking: progress arithmetic, category
//! filtering, dashboard statistics and the mutations behind them.

pub mod auth;
pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod sample;
pub mod store;
pub mod tracker;

pub use ops::OpError;
pub use store::Store;
pub use tracker::Tracker;
