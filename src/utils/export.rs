use std::io::Write;

use csv::{Writer, WriterBuilder};

/// Neutralize a CSV cell against spreadsheet formula injection
///
/// Cells starting with `=`, `+`, `-`, `@`, tab or carriage return get a
/// leading `'`. Cells already starting with `'` are left alone.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// CSV writer that accepts rows of any width
pub fn report_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new().flexible(true).from_writer(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulas_are_prefixed() {
        assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
        assert_eq!(csv_safe_cell("@cmd".to_string()), "'@cmd");
        assert_eq!(csv_safe_cell("-1".to_string()), "'-1");
    }

    #[test]
    fn safe_cells_are_untouched() {
        assert_eq!(csv_safe_cell("'@SAFE".to_string()), "'@SAFE");
        assert_eq!(csv_safe_cell("normal".to_string()), "normal");
        assert_eq!(csv_safe_cell(String::new()), "");
    }

    #[test]
    fn report_writer_mixes_row_widths() {
        let mut buf = Vec::new();
        {
            let mut wtr = report_writer(&mut buf);
            wtr.write_record(["title"]).unwrap();
            wtr.write_record(["a", "b", "c"]).unwrap();
            wtr.flush().unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "title\na,b,c\n");
    }
}
