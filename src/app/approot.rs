use std::path::PathBuf;

use crate::{
    fx::io::{CsvRateTableReader, ExchangeRateTable},
    ledger::{
        bookkeeping::{calculate, CalcOptions},
        cumulative_gains::calc_cumulative_capital_gains,
        io::{trade_csv::TradeCsvParseOptions, trade_loader::load_trades},
        misc::{filter_trades_for_asset, select_target_asset},
        render::{render_ledger_table, render_totals_table, render_yearly_gains_table, RenderTable},
        Carryover, Currency, LedgerReport,
    },
    util::{date::TradeTimeZone, rw::{DescribedReader, WriteHandle}},
    verboseln, write_errln,
};

use super::outfmt::{
    csv::CsvWriter,
    model::{AcbWriter, OutputType},
    text::TextWriter,
};

pub type Error = String;

pub struct Options {
    /// The major asset to tabulate. Inferred from the trades when None.
    pub asset: Option<Currency>,
    pub base_currency: Currency,
    /// None to include every year.
    pub tax_year: Option<i32>,
    pub carryover: Option<Carryover>,
    /// The zone exchange timestamps are read in. Decides which day (and
    /// year) a trade lands on.
    pub time_zone: TradeTimeZone,
    pub render_full_values: bool,
    pub csv_output_dir: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            asset: None,
            base_currency: Currency::default_base(),
            tax_year: None,
            carryover: None,
            time_zone: TradeTimeZone::default(),
            render_full_values: false,
            csv_output_dir: None,
        }
    }
}

pub struct AppReport {
    pub asset: Currency,
    pub report: LedgerReport,
}

/// Reads all inputs, and tabulates the trades of a single asset.
/// This is everything short of rendering.
pub fn run_app_to_report(
    trade_readers: Vec<DescribedReader>,
    rates_reader: Option<DescribedReader>,
    options: &Options,
    err_printer: WriteHandle,
) -> Result<AppReport, Error> {
    let parse_options = TradeCsvParseOptions {
        time_zone: options.time_zone,
        asset: options.asset.clone(),
    };
    let trades = load_trades(&trade_readers, &parse_options).map_err(|e| e.to_string())?;

    let asset = select_target_asset(&trades, options.asset.as_ref())
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "No trades were found, and no asset was specified".to_string())?;

    let n_read = trades.len();
    let trades = filter_trades_for_asset(trades, &asset).map_err(|e| e.to_string())?;
    verboseln!("Tabulating {} of {} trade(s), for {}", trades.len(), n_read, asset);

    let rates = match rates_reader {
        Some(r) => CsvRateTableReader::new(err_printer).read_table(&r)?,
        None => ExchangeRateTable::new(),
    };

    let calc_options = CalcOptions {
        base_currency: options.base_currency.clone(),
        tax_year: options.tax_year,
        carryover: options.carryover,
    };
    let report = calculate(trades, &rates, &calc_options).map_err(|e| e.to_string())?;
    Ok(AppReport { asset, report })
}

pub struct AppRenderResult {
    /// Uppercased, for display.
    pub asset_name: String,
    pub trades_table: RenderTable,
    pub totals_table: RenderTable,
    /// Only when all years are included.
    pub yearly_gains_table: Option<RenderTable>,
}

/// Runs the entire app, up to a generic render model, so that it can be
/// fed to either output formatter.
pub fn run_app_to_render_model(
    trade_readers: Vec<DescribedReader>,
    rates_reader: Option<DescribedReader>,
    options: &Options,
    err_printer: WriteHandle,
) -> Result<AppRenderResult, Error> {
    let AppReport { asset, report } =
        run_app_to_report(trade_readers, rates_reader, options, err_printer)?;

    let full = options.render_full_values;
    let yearly_gains_table = match report.tax_year {
        Some(_) => None,
        None => Some(render_yearly_gains_table(
            &calc_cumulative_capital_gains(&report.events), full)),
    };

    Ok(AppRenderResult {
        asset_name: asset.as_str().to_uppercase(),
        trades_table: render_ledger_table(&report, full),
        totals_table: render_totals_table(&report, full),
        yearly_gains_table,
    })
}

fn write_render_result(
    render_res: &AppRenderResult,
    writer: &mut dyn AcbWriter,
) -> Result<(), Error> {
    let name = render_res.asset_name.as_str();

    writer.print_render_table(OutputType::Trades, name, &render_res.trades_table)
        .map_err(|e| format!("Rendering trades for {name}: {e}"))?;
    writer.print_render_table(OutputType::Totals, name, &render_res.totals_table)
        .map_err(|e| format!("Rendering totals for {name}: {e}"))?;
    if let Some(table) = &render_res.yearly_gains_table {
        writer.print_render_table(OutputType::YearlyGains, name, table)
            .map_err(|e| format!("Rendering yearly gains for {name}: {e}"))?;
    }
    Ok(())
}

/// Returned Err is for exit code determination only.
/// All errors are written to err_printer.
pub fn run_app_to_writer(
    writer: &mut dyn AcbWriter,
    trade_readers: Vec<DescribedReader>,
    rates_reader: Option<DescribedReader>,
    options: &Options,
    mut err_printer: WriteHandle,
) -> Result<AppRenderResult, ()> {
    let render_res = run_app_to_render_model(
        trade_readers, rates_reader, options, err_printer.clone())
        .map_err(|e| write_errln!(err_printer, "Error: {}", e))?;

    write_render_result(&render_res, writer)
        .map_err(|e| write_errln!(err_printer, "Error: {}", e))?;

    Ok(render_res)
}

pub fn run_app_to_console(
    trade_readers: Vec<DescribedReader>,
    rates_reader: Option<DescribedReader>,
    options: &Options,
    mut err_printer: WriteHandle,
) -> Result<(), ()> {
    let mut writer: Box<dyn AcbWriter> = match &options.csv_output_dir {
        Some(dir_path) => match CsvWriter::new(&PathBuf::from(dir_path)) {
            Ok(w) => Box::new(w),
            Err(e) => {
                write_errln!(err_printer, "Error: Could not use {}: {}", dir_path, e);
                return Err(());
            }
        },
        None => Box::new(TextWriter::new(WriteHandle::stdout_write_handle())),
    };

    run_app_to_writer(
        writer.as_mut(), trade_readers, rates_reader, options, err_printer.clone())?;

    writer.finish().map_err(|e| write_errln!(err_printer, "Error: {}", e))
}

// MARK: Tests
#[cfg(test)]
mod tests {
    use crate::{
        app::outfmt::{
            model::{AcbWriter, OutputType},
            text::TextWriter,
        },
        ledger::{csv_common::ReportCol, Currency},
        testlib::assert_re,
        util::{
            rw::{DescribedReader, WriteHandle},
            sys::env_var_non_empty,
        },
    };

    use super::{run_app_to_render_model, run_app_to_report, run_app_to_writer, Options};

    const GENERIC_HEADER: &str = "type,major,minor,amount,rate,value,total,datetime\n";

    fn trades_reader(rows: &str) -> DescribedReader {
        DescribedReader::from_string("trades.csv".to_string(), GENERIC_HEADER.to_string() + rows)
    }

    fn rates_reader(data: &str) -> Option<DescribedReader> {
        Some(DescribedReader::from_string("rates.csv".to_string(), data.to_string()))
    }

    fn smoke_test_render(render_table: &crate::ledger::render::RenderTable) {
        let wh = if env_var_non_empty("VERBOSE") {
            WriteHandle::stderr_write_handle()
        } else {
            WriteHandle::empty_write_handle()
        };
        let mut w = TextWriter::new(wh);
        w.print_render_table(OutputType::Trades, "DUMMY", render_table).unwrap();
    }

    #[test]
    fn test_buy_then_sell() {
        let readers = vec![trades_reader(
            "buy,btc,cad,2.2,10,22,2,2018-01-01T12:00:00Z\n\
             sell,btc,cad,2,20,40,39.8,2018-02-01T12:00:00Z\n")];
        let render_res = run_app_to_render_model(
            readers, None, &Options::default(), WriteHandle::empty_write_handle()).unwrap();

        smoke_test_render(&render_res.trades_table);
        assert_eq!(render_res.asset_name, "BTC");
        assert_eq!(render_res.trades_table.rows.len(), 2);
        let gains_col = render_res.trades_table.col_index(ReportCol::TOTAL_CAPITAL_GAINS).unwrap();
        assert_eq!(render_res.trades_table.footer[gains_col], "$17.80");
        assert!(render_res.yearly_gains_table.is_some());
    }

    #[test]
    fn test_tax_year_and_asset() {
        let readers = vec![trades_reader(
            "buy,eth,cad,1,100,100,1,2017-06-01T12:00:00Z\n\
             buy,btc,cad,1,10,10,1,2017-06-01T12:00:00Z\n\
             sell,eth,cad,1,150,150,149,2018-06-01T12:00:00Z\n")];
        let opts = Options {
            asset: Some(Currency::new("eth")),
            tax_year: Some(2018),
            ..Options::default()
        };
        let res = run_app_to_report(readers, None, &opts, WriteHandle::empty_write_handle());
        // The 2017 buy is outside the year, and nothing was carried over.
        assert_re("Cannot sell 1 eth", &res.err().unwrap());
    }

    #[test]
    fn test_foreign_rates() {
        let readers = vec![trades_reader(
            "buy,btc,mxn,1,200,200,1,2018-04-04T12:00:00Z\n")];
        let (err_h, err_buff) = WriteHandle::string_buff_write_handle();
        let render_res = run_app_to_render_model(
            readers, rates_reader("date,mxn\n2018-04-04,20\n"),
            &Options::default(), err_h).unwrap();
        assert_eq!(render_res.trades_table.rows[0][4], "$10.00");
        assert_eq!(render_res.trades_table.rows[0][10], "20");
        assert_eq!(err_buff.borrow().as_str(), "");
    }

    #[test]
    fn test_errors() {
        let err = run_app_to_report(
            vec![trades_reader("")], None, &Options::default(),
            WriteHandle::empty_write_handle()).err().unwrap();
        assert_eq!(err, "No trades were found, and no asset was specified");

        let readers = vec![trades_reader(
            "buy,btc,mxn,1,200,200,1,2018-04-04T12:00:00Z\n\
             buy,btc,usd,1,200,200,1,2018-04-05T12:00:00Z\n")];
        let err = run_app_to_report(
            readers, rates_reader("date,usd\n"), &Options::default(),
            WriteHandle::empty_write_handle()).err().unwrap();
        assert_re("mxn on 2018-04-04", &err);
        assert_re("usd on 2018-04-05", &err);

        let readers = vec![trades_reader(
            "buy,btc,cad,1,10,10,1,2018-04-04T12:00:00Z\n\
             buy,eth,cad,1,10,10,1,2018-04-04T12:00:00Z\n")];
        let err = run_app_to_report(
            readers, None, &Options::default(), WriteHandle::empty_write_handle())
            .err().unwrap();
        assert_re("btc, eth", &err);
    }

    #[test]
    fn test_value_too_large_is_reported() {
        let readers = vec![trades_reader(
            "buy,btc,cad,100000000000000,1000000000000000,1,100000000000000,\
             2018-06-01T12:00:00Z\n")];
        let mut writer = TextWriter::new(WriteHandle::empty_write_handle());
        let (err_h, err_buff) = WriteHandle::string_buff_write_handle();
        let res = run_app_to_writer(&mut writer, readers, None, &Options::default(), err_h);
        assert!(res.is_err());
        assert_re("^Error: Invalid trade in Buy of 100000000000000 btc at 2018-06-01",
                  err_buff.borrow().as_str());
        assert_re("cost is too large to calculate", err_buff.borrow().as_str());
    }

    #[test]
    fn test_other_asset_rows_not_validated() {
        let rows = "buy,btc,cad,1,10,10,1,2018-04-04T12:00:00Z\n\
                    buy,eth,cad,1,100,100,5,2018-04-05T12:00:00Z\n\
                    sell,btc,cad,1,20,20,19,2018-04-06T12:00:00Z\n";
        let opts = Options { asset: Some(Currency::btc()), ..Options::default() };
        let res = run_app_to_report(
            vec![trades_reader(rows)], None, &opts, WriteHandle::empty_write_handle()).unwrap();
        assert_eq!(res.report.events.len(), 2);
        assert_eq!(res.report.totals.capital_gains, rust_decimal_macros::dec!(9));

        // Without an asset, every row must be valid.
        let err = run_app_to_report(
            vec![trades_reader(rows)], None, &Options::default(),
            WriteHandle::empty_write_handle()).err().unwrap();
        assert_re("^Invalid trade in row 3 of trades.csv", &err);
    }
}
