use crate::ledger::{Currency, LedgerError, Trade};
use crate::util::{date::TradeTimeZone, rw::DescribedReader};

use super::trade_formats::{detect_format, normalize_header};

#[derive(Default)]
pub struct TradeCsvParseOptions {
    /// The zone trade instants are expressed in. This decides which
    /// calendar day (and so which tax year and exchange rate) a trade
    /// falls on.
    pub time_zone: TradeTimeZone,
    /// When set, rows which trade neither from nor into this asset are
    /// skipped without being validated.
    pub asset: Option<Currency>,
}

/// Reads all trades from a single exchange export.
///
/// The format is chosen from the header. Any row which cannot be read, or
/// which does not make a valid trade and involves the selected asset, fails
/// the whole file.
pub fn parse_trade_csv(
    desc_reader: &DescribedReader,
    initial_global_read_index: u32,
    parse_options: &TradeCsvParseOptions,
) -> Result<Vec<Trade>, LedgerError> {
    let csv_desc = desc_reader.desc();
    let unreadable = |e: &dyn std::fmt::Display| LedgerError::UnreadableInput {
        desc: csv_desc.to_string(),
        reason: e.to_string(),
    };

    let reader = desc_reader.reader().map_err(|e| unreadable(&e))?;
    let mut csv_r = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = normalize_header(csv_r.headers().map_err(|e| unreadable(&e))?.iter());
    let format = detect_format(&header).ok_or_else(|| LedgerError::UnrecognizedTradeFormat {
        desc: csv_desc.to_string(),
        header: header.join(","),
    })?;
    tracing::info!("Reading {} as {} trades", csv_desc, format.name());
    let header = csv::StringRecord::from(header);

    let mut trades = Vec::<Trade>::new();
    let mut global_row_index = initial_global_read_index;

    for (i, record_res) in csv_r.records().enumerate() {
        // Start at 1 for the user, and include header.
        let row_num = i + 2;
        let malformed = |reason: String| LedgerError::MalformedTrade {
            context: format!("row {row_num} of {csv_desc}"),
            reason,
        };

        let record = record_res.map_err(|e| malformed(e.to_string()))?;
        tracing::trace!("parse_trade_csv: row {}: {:?}", row_num, record);

        let raw = format
            .normalize(&record, &header, global_row_index, parse_options.time_zone)
            .map_err(malformed)?;
        global_row_index += 1;

        if let Some(asset) = &parse_options.asset {
            if raw.major != *asset && raw.minor != *asset {
                tracing::trace!("parse_trade_csv: skipping {} row {}", raw.major, row_num);
                continue;
            }
        }
        trades.push(Trade::try_from(raw).map_err(malformed)?);
    }

    Ok(trades)
}
