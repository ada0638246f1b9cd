pub mod config_io;
pub mod snapshot_io;
