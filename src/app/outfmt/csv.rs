use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use crate::ledger::render::RenderTable;

use super::model::{AcbWriter, Error, OutputType};

fn mk_writable_dir(dirpath: &Path) -> io::Result<()> {
    fs::create_dir_all(dirpath)?;

    let mut perms = fs::metadata(dirpath)?.permissions();
    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(dirpath, perms)?;
    }
    Ok(())
}

/// Writes each table to its own file in `out_dir`.
pub struct CsvWriter {
    out_dir: PathBuf,
}

impl CsvWriter {
    pub fn new(out_dir: &Path) -> Result<CsvWriter, io::Error> {
        mk_writable_dir(out_dir)?;
        Ok(CsvWriter { out_dir: out_dir.to_path_buf() })
    }

    pub fn file_name(out_type: &OutputType, name: &str) -> String {
        let name = name.to_lowercase().replace(' ', "-");
        match out_type {
            OutputType::Trades => format!("{name}-trades.csv"),
            OutputType::Totals => format!("{name}-totals.csv"),
            OutputType::YearlyGains => format!("{name}-yearly-gains.csv"),
        }
    }
}

impl AcbWriter for CsvWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        let file_path = self.out_dir.join(Self::file_name(&out_type, name));
        let fp = File::create(&file_path)
            .map_err(|e| format!("Failed to create {}: {}", file_path.display(), e))?;
        tracing::debug!("CsvWriter: writing {}", file_path.display());

        // Notes are padded out, so every record is the same width.
        let mut csv_w = csv::WriterBuilder::new().from_writer(fp);
        let map_csv_err = |e: csv::Error| e.to_string();

        csv_w.write_record(&table_model.header).map_err(map_csv_err)?;
        for row in &table_model.rows {
            csv_w.write_record(row).map_err(map_csv_err)?;
        }
        if !table_model.footer.is_empty() {
            csv_w.write_record(&table_model.footer).map_err(map_csv_err)?;
        }

        let n_cols = table_model.header.len().max(1);
        for note in &table_model.notes {
            let mut note_record = vec![String::new(); n_cols];
            note_record[0] = note.clone();
            csv_w.write_record(&note_record).map_err(map_csv_err)?;
        }

        csv_w.flush().map_err(|e| e.to_string())
    }
}
