//! Record sinks: CSV, JSON, an Excel workbook and a plain-text listing.
//!
//! Every sink refuses an empty record list; an empty statement is reported
//! to the user rather than written out as a header-only file.

use std::io::Write;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use crate::error::ExportError;
use crate::models::config::OutputConfig;
use crate::models::transaction::TransactionRecord;
use crate::statement::format_amount;

/// Result type for record sinks.
pub type Result<T> = std::result::Result<T, ExportError>;

fn ensure_not_empty(records: &[TransactionRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(())
}

fn amount_cell(amount: Option<Decimal>) -> String {
    amount.map(format_amount).unwrap_or_default()
}

/// Write records as CSV: date, description, debit, credit.
///
/// Absent amounts are written as empty cells; present amounts always carry
/// two decimals.
pub fn write_csv<W: Write>(
    records: &[TransactionRecord],
    writer: W,
    config: &OutputConfig,
) -> Result<()> {
    ensure_not_empty(records)?;

    if !config.delimiter.is_ascii() {
        return Err(ExportError::Delimiter(config.delimiter));
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .from_writer(writer);

    wtr.write_record(&config.headers)?;

    for record in records {
        let debit = amount_cell(record.debit);
        let credit = amount_cell(record.credit);
        wtr.write_record([
            record.date.as_str(),
            record.description.as_str(),
            debit.as_str(),
            credit.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render records as a CSV string.
pub fn to_csv_string(records: &[TransactionRecord], config: &OutputConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf, config)?;
    // csv only ever writes the UTF-8 it was given.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write records as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[TransactionRecord], writer: W) -> Result<()> {
    ensure_not_empty(records)?;
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Write records as a single-sheet XLSX workbook.
///
/// Amounts are numeric cells shown with two decimals; absent amounts are
/// left blank.
pub fn write_xlsx<W: Write>(
    records: &[TransactionRecord],
    mut writer: W,
    config: &OutputConfig,
) -> Result<()> {
    ensure_not_empty(records)?;

    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border(FormatBorder::Thin);
    let money = Format::new().set_num_format("#,##0.00");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&config.sheet_name)?;

    for (col, title) in config.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &record.date)?;
        sheet.write_string(row, 1, &record.description)?;

        for (col, amount) in [(2u16, record.debit), (3u16, record.credit)] {
            if let Some(value) = amount.and_then(|a| a.round_dp(2).to_f64()) {
                sheet.write_number_with_format(row, col, value, &money)?;
            }
        }
    }

    sheet.autofit();

    let buf = workbook.save_to_buffer()?;
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Render records as an aligned plain-text listing with totals.
pub fn format_text(records: &[TransactionRecord]) -> Result<String> {
    ensure_not_empty(records)?;

    let desc_width = records
        .iter()
        .map(|r| r.description.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(11, 48);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<desc_width$}  {:>12}  {:>12}\n",
        "Date", "Description", "Debit", "Credit"
    ));
    output.push_str(&format!("{}\n", "-".repeat(10 + desc_width + 12 * 2 + 6)));

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for record in records {
        total_debit += record.debit.unwrap_or_default();
        total_credit += record.credit.unwrap_or_default();

        output.push_str(&format!(
            "{:<10}  {:<desc_width$}  {:>12}  {:>12}\n",
            record.date,
            clip(&record.description, desc_width),
            amount_cell(record.debit),
            amount_cell(record.credit),
        ));
    }

    output.push('\n');
    output.push_str(&format!("Transactions: {}\n", records.len()));
    output.push_str(&format!("Total debit:  {}\n", format_amount(total_debit)));
    output.push_str(&format!("Total credit: {}\n", format_amount(total_credit)));
    output.push_str(&format!("Net:          {}\n", format_amount(total_credit - total_debit)));

    Ok(output)
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut clipped: String = s.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("01-03-2025", "Grocery store", Some(dec("1234.5")), None),
            TransactionRecord::new("02-03-2025", "Salary, March", None, Some(dec("2500"))),
        ]
    }

    #[test]
    fn test_csv_output() {
        let csv = to_csv_string(&sample(), &OutputConfig::default()).unwrap();
        assert_eq!(
            csv,
            "Date,Description,Debit,Credit\n\
             01-03-2025,Grocery store,1234.50,\n\
             02-03-2025,\"Salary, March\",,2500.00\n"
        );
    }

    #[test]
    fn test_csv_custom_headers_and_delimiter() {
        let config = OutputConfig {
            delimiter: ';',
            headers: [
                "Fecha".to_string(),
                "Descripción".to_string(),
                "Débito".to_string(),
                "Crédito".to_string(),
            ],
            ..OutputConfig::default()
        };
        let csv = to_csv_string(&sample()[..1], &config).unwrap();
        assert_eq!(csv, "Fecha;Descripción;Débito;Crédito\n01-03-2025;Grocery store;1234.50;\n");
    }

    #[test]
    fn test_csv_rejects_bad_delimiter() {
        let config = OutputConfig {
            delimiter: '¦',
            ..OutputConfig::default()
        };
        assert!(matches!(
            to_csv_string(&sample(), &config),
            Err(ExportError::Delimiter('¦'))
        ));
    }

    #[test]
    fn test_empty_input_rejected_by_every_sink() {
        let mut sink = Vec::new();
        assert!(matches!(
            write_csv(&[], &mut sink, &OutputConfig::default()),
            Err(ExportError::Empty)
        ));
        assert!(matches!(write_json(&[], &mut sink), Err(ExportError::Empty)));
        assert!(matches!(format_text(&[]), Err(ExportError::Empty)));
        assert!(matches!(
            write_xlsx(&[], &mut sink, &OutputConfig::default()),
            Err(ExportError::Empty)
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["date"], "01-03-2025");
        assert_eq!(value[0]["credit"], serde_json::Value::Null);
        assert_eq!(value[1]["description"], "Salary, March");
    }

    #[test]
    fn test_xlsx_output() {
        let mut buf = Vec::new();
        write_xlsx(&sample(), &mut buf, &OutputConfig::default()).unwrap();
        assert!(!buf.is_empty());

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buf)).unwrap();
        let range = workbook.worksheet_range("Transactions").unwrap();

        assert_eq!(range.get_size(), (3, 4));
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("Date".to_string())));
        assert_eq!(
            range.get_value((1, 1)),
            Some(&Data::String("Grocery store".to_string()))
        );
        assert_eq!(range.get_value((1, 2)), Some(&Data::Float(1234.5)));
        assert!(range.get_value((1, 3)).is_none_or(|cell| *cell == Data::Empty));
        assert_eq!(range.get_value((2, 3)), Some(&Data::Float(2500.0)));
    }

    #[test]
    fn test_xlsx_rejects_bad_sheet_name() {
        let config = OutputConfig {
            sheet_name: "bad[name]".to_string(),
            ..OutputConfig::default()
        };
        let mut buf = Vec::new();
        assert!(matches!(
            write_xlsx(&sample(), &mut buf, &config),
            Err(ExportError::Xlsx(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_text_output_totals() {
        let text = format_text(&sample()).unwrap();
        assert!(text.contains("Grocery store"));
        assert!(text.contains("Transactions: 2"));
        assert!(text.contains("Total debit:  1234.50"));
        assert!(text.contains("Total credit: 2500.00"));
        assert!(text.contains("Net:          1265.50"));
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a long description", 6), "a lon~");
    }
}
