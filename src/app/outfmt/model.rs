use crate::ledger::render::RenderTable;

pub enum OutputType {
    Trades,
    Totals,
    YearlyGains,
}

pub type Error = String;

pub trait AcbWriter {
    /// `name` is the asset the table is about (eg. BTC).
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error>;

    fn finish(self: Box<Self>) -> Result<(), Error> {
        Ok(())
    }
}
