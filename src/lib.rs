pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;
pub mod util;
