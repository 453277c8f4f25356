pub mod currency;
pub mod error;
pub mod tabulation;
pub mod trade;
