use crate::ledger::{LedgerError, Trade};
use crate::util::rw::DescribedReader;

use super::trade_csv::{parse_trade_csv, TradeCsvParseOptions};

/// Reads every file in order. Read indexes run on across files, so that
/// trades with equal timestamps keep the order the files were given in.
pub fn load_trades(
    csv_readers: &[DescribedReader],
    parse_options: &TradeCsvParseOptions,
) -> Result<Vec<Trade>, LedgerError> {
    let mut all_trades = Vec::<Trade>::new();
    for desc_reader in csv_readers {
        let read_index = u32::try_from(all_trades.len()).map_err(|_| {
            LedgerError::UnreadableInput {
                desc: desc_reader.desc().to_string(),
                reason: "too many trades".to_string(),
            }
        })?;
        let mut trades = parse_trade_csv(desc_reader, read_index, parse_options)?;
        tracing::info!("Read {} trade(s) from {}", trades.len(), desc_reader.desc());
        all_trades.append(&mut trades);
    }
    Ok(all_trades)
}
