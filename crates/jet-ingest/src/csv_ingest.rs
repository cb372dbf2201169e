//! CSV export reading.
//!
//! Accounting exports arrive comma- or semicolon-delimited depending on
//! locale; the delimiter is sniffed from the header line.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use jet_model::{Column, Table};

use crate::error::{IngestError, Result};

/// Reads a delimited export file into a [`Table`].
///
/// The first record is taken as the header row. Short rows are padded
/// with missing cells; blank cells become missing.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let delimiter = sniff_delimiter(&contents);
    debug!(
        path = %path.display(),
        delimiter = %(delimiter as char),
        "reading export"
    );

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column::new(name.clone(), Vec::new()))
        .collect();

    for record in reader.records() {
        let record = record?;
        for (index, column) in columns.iter_mut().enumerate() {
            let cell = record.get(index).map(str::trim).unwrap_or_default();
            column
                .values
                .push((!cell.is_empty()).then(|| cell.to_string()));
        }
    }

    info!(
        path = %path.display(),
        columns = columns.len(),
        rows = columns.first().map_or(0, |c| c.values.len()),
        "export loaded"
    );
    Ok(Table::new(columns))
}

/// Picks `;` over `,` when the header line contains more semicolons.
fn sniff_delimiter(contents: &str) -> u8 {
    let header = contents.lines().next().unwrap_or_default();
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn reads_comma_delimited() {
        let file = write_temp("Asiento,Debe,Haber\n1,100.0,0\n1,0,100.0\n");
        let table = read_csv_table(file.path()).expect("read");
        assert_eq!(table.column_names(), vec!["Asiento", "Debe", "Haber"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let file = write_temp("Asiento;Importe\n1;1.234,56\n2;-1.234,56\n");
        let table = read_csv_table(file.path()).expect("read");
        assert_eq!(table.column_names(), vec!["Asiento", "Importe"]);
        assert_eq!(
            table.column("Importe").unwrap().values[0].as_deref(),
            Some("1.234,56")
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let file = write_temp("A,B,C\n1,2\n");
        let table = read_csv_table(file.path()).expect("read");
        assert_eq!(table.column("C").unwrap().values[0], None);
    }

    #[test]
    fn blank_cells_become_missing() {
        let file = write_temp("A,B\n1,\n,2\n");
        let table = read_csv_table(file.path()).expect("read");
        assert_eq!(table.column("B").unwrap().values[0], None);
        assert_eq!(table.column("A").unwrap().values[1], None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = read_csv_table(Path::new("/nonexistent/export.csv")).unwrap_err();
        assert!(matches!(error, IngestError::Io { .. }));
    }
}
