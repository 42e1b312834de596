pub mod config_io;
pub mod paths;
