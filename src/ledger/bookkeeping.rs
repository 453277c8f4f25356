mod calculator;
mod conversion;
mod tabulation;
mod tax_year;

pub use self::calculator::*;
pub use self::conversion::*;
pub use self::tabulation::*;
pub use self::tax_year::*;
