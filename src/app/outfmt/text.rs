use std::io::Write;

use tabled::{
    settings::{
        object::{Cell, Columns, Rows},
        style::On,
        Alignment, Border, Style,
    },
    Table,
};

use crate::{ledger::render::RenderTable, util::rw::WriteHandle};

use super::model::{AcbWriter, Error, OutputType};

/// Writes tables as ascii art, for reading in a terminal.
pub struct TextWriter {
    w: WriteHandle,
}

impl TextWriter {
    pub fn new(w: WriteHandle) -> TextWriter {
        TextWriter { w }
    }
}

#[derive(Clone, Copy)]
struct CellBorder {
    top: char,
    bottom: char,
    left: char,
    right: char,
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
}

impl CellBorder {
    fn to_border(self) -> Border<On, On, On, On> {
        Border::full(
            self.top,
            self.bottom,
            self.left,
            self.right,
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        )
    }

    fn blank() -> CellBorder {
        CellBorder {
            top: ' ',
            bottom: ' ',
            left: ' ',
            right: ' ',
            top_left: ' ',
            top_right: ' ',
            bottom_left: ' ',
            bottom_right: ' ',
        }
    }
}

impl Default for CellBorder {
    fn default() -> Self {
        CellBorder {
            top: '-',
            bottom: '-',
            left: '|',
            right: '|',
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
        }
    }
}

fn title_for(out_type: &OutputType, name: &str) -> String {
    match out_type {
        OutputType::Trades => format!("Trades of {}", name),
        OutputType::Totals => format!("{} Totals", name),
        OutputType::YearlyGains => format!("{} Capital Gains by Year", name),
    }
}

/// Opens up the outer edge of the table, so only the inner grid and the
/// underline of the header remain.
fn open_outer_edges(table: &mut Table, n_cols: usize) {
    let d = CellBorder::default();
    table.modify(
        Rows::first(),
        CellBorder { top: ' ', top_left: ' ', top_right: ' ', ..d }.to_border(),
    );
    table.modify(
        Columns::first(),
        CellBorder { left: ' ', top_left: '-', bottom_left: '-', ..d }.to_border(),
    );
    table.modify(
        Columns::last(),
        CellBorder { right: ' ', top_right: '-', bottom_right: '-', ..d }.to_border(),
    );

    let header_corner = CellBorder { top: ' ', top_left: ' ', top_right: ' ', ..d };
    table.modify(
        Cell::new(0, 0),
        CellBorder { left: ' ', bottom_left: '-', ..header_corner }.to_border(),
    );
    table.modify(
        Cell::new(0, n_cols - 1),
        CellBorder { right: ' ', bottom_right: '-', ..header_corner }.to_border(),
    );
}

/// The footer is drawn as a small table hanging under the main one. Only
/// the non-empty footer cells get borders.
fn hang_footer(table: &mut Table, footer: &[String], sep_row: usize) {
    let footer_row = sep_row + 1;
    table.modify(Rows::single(sep_row), Border::new().set_left(' ').set_right(' '));
    table.modify(Rows::single(footer_row), CellBorder::blank().to_border());

    for (col, _) in footer.iter().enumerate().filter(|(_, c)| !c.is_empty()) {
        table.modify(Cell::new(sep_row, col), CellBorder::default().to_border());
        table.modify(Cell::new(footer_row, col), CellBorder::default().to_border());
    }
}

impl AcbWriter for TextWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        let map_write_err = |e: std::io::Error| e.to_string();

        writeln!(self.w, "{}", title_for(&out_type, name)).map_err(map_write_err)?;

        let n_cols = table_model.header.len();
        if n_cols == 0 {
            return Err(format!("Table '{}' has no columns", title_for(&out_type, name)));
        }

        let mut table_bldr = tabled::builder::Builder::default();
        table_bldr.push_record(table_model.header.iter().map(|h| h.to_uppercase()));
        for row in &table_model.rows {
            table_bldr.push_record(row.clone());
        }

        let has_footer = !table_model.footer.is_empty();
        if has_footer {
            table_bldr.push_record(vec![String::new(); table_model.footer.len()]);
            table_bldr.push_record(table_model.footer.clone());
        }

        let mut table = table_bldr.build();
        table.with(Style::ascii());
        table.modify(Rows::first(), Alignment::center());
        open_outer_edges(&mut table, n_cols);
        if has_footer {
            hang_footer(&mut table, &table_model.footer, 1 + table_model.rows.len());
        }

        writeln!(self.w, "{table}").map_err(map_write_err)?;
        for note in &table_model.notes {
            writeln!(self.w, "{note}").map_err(map_write_err)?;
        }
        writeln!(self.w).map_err(map_write_err)?;
        Ok(())
    }
}
