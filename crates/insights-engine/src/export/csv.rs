//! CSV export of table rows.

use std::fmt::Write as _;

use insights_core::CampaignRecord;

use super::{ExportAdapter, ExportArtifact};
use crate::error::ExportError;

pub const CSV_HEADER: &str = "Campaign,Revenue,Users,Conversions,Growth %,Channel,Status,CTR %,CPC";
pub const CSV_FILE_NAME: &str = "campaign-data.csv";
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Render `records` as CSV: one header line, then one line per record, joined
/// by `\n` with no trailing newline.
///
/// # Errors
///
/// Returns [`ExportError::Serialization`] if formatting fails.
pub fn to_csv(records: &[CampaignRecord]) -> Result<String, ExportError> {
    let mut out = String::from(CSV_HEADER);
    for record in records {
        out.push('\n');
        write_row(&mut out, record)?;
    }
    Ok(out)
}

fn write_row(out: &mut String, record: &CampaignRecord) -> std::fmt::Result {
    write!(
        out,
        "{},{},{},{},{},{},{},{},{}",
        quoted(&record.campaign_name),
        record.revenue,
        record.users,
        record.conversions,
        to_fixed(record.growth, 1),
        quoted(&record.channel),
        record.status,
        to_fixed(record.ctr, 2),
        to_fixed(record.cpc, 2),
    )
}

/// Fixed-point rendering that rounds an exact half away from zero.
///
/// `{:.N}` rounds exact halves to even, so `0.25` would become `0.2`. Values
/// that only look like halves in decimal (`2.675` is stored just below) are
/// left to the standard formatter.
fn to_fixed(value: f64, digits: usize) -> String {
    let rounded = format!("{value:.digits$}");
    let wide = format!("{value:.*}", digits + 30);
    let Some(point) = wide.find('.') else {
        return rounded;
    };
    let (head, tail) = wide.split_at(point + 1 + digits);
    let is_half = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_half {
        return rounded;
    }

    let mut out: Vec<u8> = head.trim_end_matches('.').bytes().collect();
    let mut carry = true;
    for byte in out.iter_mut().rev() {
        match *byte {
            b'9' => *byte = b'0',
            b'0'..=b'8' => {
                *byte += 1;
                carry = false;
                break;
            }
            _ => {}
        }
    }
    if carry {
        let at = usize::from(out.first() == Some(&b'-'));
        out.insert(at, b'1');
    }
    String::from_utf8(out).unwrap_or(rounded)
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    file_name: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            file_name: CSV_FILE_NAME.to_string(),
        }
    }
}

impl CsvExporter {
    #[must_use]
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl ExportAdapter for CsvExporter {
    fn export(&self, records: &[CampaignRecord]) -> Result<ExportArtifact, ExportError> {
        let body = to_csv(records).inspect_err(|e| {
            tracing::error!(error = %e, file = %self.file_name, "export: csv failed");
        })?;
        tracing::info!(rows = records.len(), file = %self.file_name, "export: csv written");
        Ok(ExportArtifact {
            file_name: self.file_name.clone(),
            content_type: CSV_CONTENT_TYPE,
            bytes: body.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insights_core::CampaignStatus;

    use super::*;

    fn record(name: &str, channel: &str) -> CampaignRecord {
        CampaignRecord {
            id: 1,
            campaign_name: name.to_string(),
            revenue: 45_210,
            users: 3_120,
            conversions: 287,
            growth: 12.345,
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            channel: channel.to_string(),
            status: CampaignStatus::Paused,
            ctr: 4.5,
            cpc: 1.239,
        }
    }

    #[test]
    fn empty_export_is_header_only() {
        assert_eq!(to_csv(&[]).unwrap(), CSV_HEADER);
    }

    #[test]
    fn formats_row_fields() {
        let csv = to_csv(&[record("Summer Sale 3", "Google Ads")]).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"Summer Sale 3\",45210,3120,287,12.3,\"Google Ads\",paused,4.50,1.24"
        );
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(-0.25, 1), "-0.3");
        assert_eq!(to_fixed(1.125, 2), "1.13");
        assert_eq!(to_fixed(0.875, 2), "0.88");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(9.5, 0), "10");
        assert_eq!(to_fixed(-9.5, 0), "-10");
        assert_eq!(to_fixed(9.75, 1), "9.8");
        assert_eq!(to_fixed(99.875, 2), "99.88");
    }

    #[test]
    fn inexact_halves_follow_stored_value() {
        assert_eq!(to_fixed(2.675, 2), "2.67");
        assert_eq!(to_fixed(12.345, 1), "12.3");
        assert_eq!(to_fixed(1.239, 2), "1.24");
        assert_eq!(to_fixed(4.5, 2), "4.50");
        assert_eq!(to_fixed(0.0, 1), "0.0");
    }

    #[test]
    fn row_rounds_half_percentages_up() {
        let mut row = record("Product Launch 4", "Email");
        row.growth = 0.25;
        row.ctr = 1.125;
        row.cpc = 0.375;
        let csv = to_csv(&[row]).unwrap();
        assert!(csv.ends_with(",0.3,\"Email\",paused,1.13,0.38"));
    }

    #[test]
    fn doubles_embedded_quotes() {
        let csv = to_csv(&[record("The \"Big\" Launch, v2", "Email")]).unwrap();
        assert!(csv.ends_with("\"The \"\"Big\"\" Launch, v2\",45210,3120,287,12.3,\"Email\",paused,4.50,1.24"));
    }

    #[test]
    fn rows_keep_input_order_without_trailing_newline() {
        let csv = to_csv(&[record("A", "Email"), record("B", "Email")]).unwrap();
        assert!(!csv.ends_with('\n'));
        let names: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["\"A\"", "\"B\""]);
    }

    #[test]
    fn exporter_produces_named_artifact() {
        let artifact = CsvExporter::default()
            .export(&[record("Brand Awareness 9", "LinkedIn")])
            .unwrap();
        assert_eq!(artifact.file_name, "campaign-data.csv");
        assert!(artifact.content_type.starts_with("text/csv"));
        let body = String::from_utf8(artifact.bytes).unwrap();
        assert!(body.starts_with(CSV_HEADER));

        let custom = CsvExporter::with_file_name("march.csv");
        assert_eq!(custom.file_name(), "march.csv");
    }
}
