pub mod trade_csv;
pub mod trade_formats;
pub mod trade_loader;
