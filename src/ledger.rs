pub mod bookkeeping;
pub mod csv_common;
pub mod cumulative_gains;
pub mod io;
pub mod misc;
pub mod model;
pub mod render;

pub use self::model::currency::*;
pub use self::model::error::*;
pub use self::model::tabulation::*;
pub use self::model::trade::*;

#[cfg(test)]
pub mod testlib;
