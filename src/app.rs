pub mod approot;
pub mod input_parse;
pub mod outfmt;

/// Versions follow the crate version. The ledger math is versioned with it,
/// since a report is only reproducible with the same release.
pub const CRYPTO_ACB_APP_VERSION: &str = env!("CARGO_PKG_VERSION");
