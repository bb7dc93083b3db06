use super::IngestError;
use crate::scoring::{FieldValue, Fields, Observation};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::io::Read;

const TEAM_COLUMNS: [&str; 3] = ["team_number", "teamnumber", "team"];
const MATCH_COLUMNS: [&str; 3] = ["match_number", "matchnumber", "match"];
const SCOUTED_AT_COLUMNS: [&str; 2] = ["scouted_at", "timestamp"];

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let normalized = header.trim().to_ascii_lowercase();
        names.iter().any(|name| *name == normalized)
    })
}

/// Reads one observation per CSV row; every column other than the identifiers becomes a field.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<Observation>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let team_column =
        find_column(&headers, &TEAM_COLUMNS).ok_or(IngestError::MissingColumn("team_number"))?;
    let match_column =
        find_column(&headers, &MATCH_COLUMNS).ok_or(IngestError::MissingColumn("match_number"))?;
    let scouted_at_column = find_column(&headers, &SCOUTED_AT_COLUMNS);

    let mut observations = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;

        let team_number = parse_identifier(record.get(team_column), row, "team_number")?;
        let match_number = parse_identifier(record.get(match_column), row, "match_number")?;
        let scouted_at = scouted_at_column
            .and_then(|column| record.get(column))
            .and_then(parse_timestamp);

        let mut fields = Fields::new();
        for (column, header) in headers.iter().enumerate() {
            if column == team_column || Some(column) == scouted_at_column || column == match_column
            {
                continue;
            }

            let value = FieldValue::from_cell(record.get(column).unwrap_or_default());
            if !value.is_missing() {
                fields.insert(header.trim().to_string(), value);
            }
        }

        observations.push(Observation {
            team_number,
            match_number,
            fields,
            scouted_at,
        });
    }

    Ok(observations)
}

fn parse_identifier(
    raw: Option<&str>,
    row: usize,
    column: &'static str,
) -> Result<u32, IngestError> {
    let value = raw.unwrap_or_default().trim();
    if let Ok(number) = value.parse::<u32>() {
        return Ok(number);
    }

    match value.parse::<f64>() {
        Ok(number) if number.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&number) => {
            Ok(number as u32)
        }
        _ => Err(IngestError::InvalidRow {
            row,
            column,
            value: value.to_string(),
        }),
    }
}

/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS` (taken as UTC) or a bare date.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
