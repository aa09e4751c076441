//! Output formatting
//!
//! Plain-text tables, unit conversions and map links used by the CLI.

pub mod table;
pub mod units;
pub mod url;

pub use table::Table;
pub use url::MapLink;
