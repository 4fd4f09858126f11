//! CSV export for the projection series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::finance::FinancialProjection;

/// Column header for the projection CSV.
const HEADER: &str = "year,yearly_savings,yearly_revenue,yearly_total,\
                       cumulative_savings,production_percent";

/// Exports a projection's yearly series to a CSV file at the given path.
///
/// Monetary columns are rounded to whole currency units.
///
/// # Arguments
///
/// * `projection` - Completed projection
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_projection_csv(projection: &FinancialProjection, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_projection_csv(projection, buf)
}

/// Writes a projection's yearly series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_projection_csv(
    projection: &FinancialProjection,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for y in &projection.series {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.0}", y.yearly_savings),
            format!("{:.0}", y.yearly_revenue),
            format!("{:.0}", y.yearly_total),
            format!("{:.0}", y.cumulative_savings),
            y.production_percent.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{ProjectionOptions, project_financials};

    fn projection() -> FinancialProjection {
        project_financials(15000.0, 1800.0, 200.0, &ProjectionOptions::default())
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn render(p: &FinancialProjection) -> String {
        let mut buf = Vec::new();
        write_projection_csv(p, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_and_one_row_per_year() {
        let output = render(&projection());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "year,yearly_savings,yearly_revenue,yearly_total,cumulative_savings,production_percent"
        );
        assert_eq!(lines.len(), 26);
        assert_eq!(lines[1], "1,1791,199,1990,-13010,100");
    }

    #[test]
    fn rows_parse_back() {
        let output = render(&projection());
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let years: Vec<u32> = rdr
            .records()
            .filter_map(Result::ok)
            .filter_map(|rec| rec.get(0).and_then(|v| v.parse().ok()))
            .collect();
        assert_eq!(years, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn export_to_file() {
        let path =
            std::env::temp_dir().join(format!("solar-quote-export-{}.csv", std::process::id()));
        let written = export_projection_csv(&projection(), &path);
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        let _ = std::fs::remove_file(&path);
        assert!(written.is_ok());
        assert_eq!(content, render(&projection()));
    }
}
