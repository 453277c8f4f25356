mod rate_table;
mod rates_csv;

pub type Error = String;

// Exports
pub use self::rate_table::*;
pub use self::rates_csv::*;
