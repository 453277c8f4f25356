use std::path::PathBuf;

use clap::Parser;
use time::UtcOffset;

use crate::{
    app::{
        approot::{run_app_to_console, Options},
        input_parse::parse_carryover,
    },
    ledger::{io::trade_formats::known_formats, Currency},
    util::{
        date::{today_local, TradeTimeZone},
        rw::{DescribedReader, WriteHandle},
    },
    write_errln,
};

const ABOUT: &str = "Adjusted cost base (ACB) and capital gains calculator for crypto assets";

fn get_long_about() -> String {
    let formats: Vec<String> = known_formats()
        .iter()
        .map(|f| format!("  {}:\n    {}", f.name(), f.header().join(",")))
        .collect();
    format!("\
A cli tool which tabulates the adjusted cost base (ACB) and capital gains of
a single crypto asset, from the trade history exported by exchanges.

Trade files are CSVs, and must have one of these headers:
{}

Trades priced in a currency other than the base currency need an exchange
rate table (--exchange-rates), with a 'date' column followed by one column per
currency. Each rate is the amount of that currency equal to one unit of the
base currency. Eg.

  date,usd,mxn
  2018-04-04,0.78,14.3

The run fails, listing every missing (date, currency) pair, if any rate needed
for the selected tax year is absent.",
        formats.join("\n"))
}

#[derive(Parser, Debug)]
#[command(version = crate::app::CRYPTO_ACB_APP_VERSION,
          about = ABOUT, long_about = get_long_about())]
pub struct Args {
    /// Trade history CSV files
    #[arg(required = true)]
    pub trade_files: Vec<String>,

    /// Print verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// The asset to tabulate (eg. btc). Required when the files contain
    /// trades for more than one asset.
    #[arg(long)]
    pub asset: Option<String>,

    /// The currency all values are reported in
    #[arg(long, default_value = "cad")]
    pub base_currency: String,

    /// CSV of daily exchange rates against the base currency
    #[arg(long)]
    pub exchange_rates: Option<String>,

    /// Only include trades made in this year. Defaults to the current year.
    #[arg(long, conflicts_with = "all_years")]
    pub tax_year: Option<i32>,

    /// Include trades from every year, and print capital gains per year
    #[arg(long, default_value_t = false)]
    pub all_years: bool,

    /// Units held and their total ACB before the first included trade.
    ///
    /// Formatted as UNITS:ACB. Eg. 1.5:9000.00
    #[arg(short = 'b', long)]
    pub carryover: Option<String>,

    /// Read exchange timestamps as UTC, rather than local time. This decides
    /// which day (and year) a trade falls on.
    #[arg(long, default_value_t = false)]
    pub utc: bool,

    /// Print all digits in output values
    #[arg(long, default_value_t = false)]
    pub print_full_values: bool,

    /// Write output as CSV to the specified directory.
    #[arg(short = 'd', long)]
    pub csv_output_dir: Option<String>,
}

fn make_options(args: &Args) -> Result<Options, String> {
    let time_zone = if args.utc {
        TradeTimeZone::Fixed(UtcOffset::UTC)
    } else {
        TradeTimeZone::Local
    };

    let tax_year = if args.all_years { None } else {
        Some(args.tax_year.unwrap_or_else(|| today_local().year()))
    };

    let carryover = match &args.carryover {
        Some(c) => Some(parse_carryover(c)?),
        None => None,
    };

    let base_currency = Currency::new(&args.base_currency);
    if base_currency.is_empty() {
        return Err("Base currency must not be empty".to_string());
    }

    Ok(Options {
        asset: args.asset.as_deref().map(Currency::new),
        base_currency,
        tax_year,
        carryover,
        time_zone,
        render_full_values: args.print_full_values,
        csv_output_dir: args.csv_output_dir.clone(),
    })
}

/// Returned Err is for exit code determination only. Errors have already
/// been printed.
pub fn command_main() -> Result<(), ()> {
    let args = Args::parse();
    let mut err_printer = WriteHandle::stderr_write_handle();

    crate::log::set_verbose(args.verbose);
    tracing::debug!("{:#?}", args);

    let options = make_options(&args).map_err(|e| write_errln!(err_printer, "Error: {}", e))?;

    let trade_readers: Vec<DescribedReader> = args.trade_files.iter()
        .map(|f| DescribedReader::from_file_path(PathBuf::from(f)))
        .collect();
    let rates_reader = args.exchange_rates.as_ref()
        .map(|f| DescribedReader::from_file_path(PathBuf::from(f)));

    run_app_to_console(trade_readers, rates_reader, &options, err_printer)
}
