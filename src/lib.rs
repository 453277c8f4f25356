pub mod app;
pub mod cmd;
pub mod fx;
pub mod ledger;
pub mod log;
pub mod tracing;
pub mod util;

#[cfg(any(test, feature = "testlib"))]
pub mod testlib;
