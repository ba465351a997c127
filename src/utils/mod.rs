mod io_utils;
mod readers;
mod region;
mod util;

pub use io_utils::write_atomically;
pub use readers::open_table_reader;
pub use region::GenomicRegion;
pub use util::{handle_error_and_exit, Error, Result};
