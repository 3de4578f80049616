//! CSV reading operations.

use std::io::Cursor;

use polars::{
    frame::DataFrame,
    io::SerReader,
    prelude::{CsvReadOptions, StringChunked},
};

use crate::{
    ImportConfig, ParseError,
    feature::{Feature, Geometry, Position, Properties},
    io::{Format, ParsedData},
};

/// Separators tried when sniffing the header line.
const SEPARATORS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Read delimited text with a header row into Point features. Every column
/// other than the coordinate columns becomes a string property.
pub(crate) fn read_csv(text: &str, config: &ImportConfig) -> Result<ParsedData, ParseError> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Err(ParseError::MissingCoordinateColumns { headers: Vec::new() });
    }
    let separator = sniff_separator(text);
    let df = read_csv_string(text, separator)?;

    // Row 0 holds the header; the frame's own column names are positional.
    let columns = df.get_columns().iter()
        .map(|c| c.str().map_err(|e| ParseError::syntax(Format::Csv, e)))
        .collect::<Result<Vec<&StringChunked>, _>>()?;
    if columns.is_empty() || df.height() == 0 {
        return Err(ParseError::MissingCoordinateColumns { headers: Vec::new() });
    }

    let mut issues = Vec::new();
    let headers = header_names(&columns, &mut issues);
    let lat_col = headers.iter().position(|h| config.is_lat_header(h));
    let lon_col = headers.iter().position(|h| config.is_lon_header(h));
    let (Some(lat_col), Some(lon_col)) = (lat_col, lon_col) else {
        return Err(ParseError::MissingCoordinateColumns { headers });
    };

    let widths = record_widths(text, separator);
    // Semicolon/tab files commonly use a decimal comma.
    let decimal_comma = separator != b',';
    let mut features = Vec::with_capacity(df.height());

    for row in 1..df.height() {
        let line = row + 1;
        if let Some(&width) = widths.get(row).filter(|&&w| w > headers.len()) {
            issues.push(format!("line {line}: {width} fields but the header has {}; extra fields ignored", headers.len()));
        }
        let raw_lat = columns[lat_col].get(row).unwrap_or("");
        let raw_lon = columns[lon_col].get(row).unwrap_or("");
        let (Some(lat), Some(lon)) = (parse_coordinate(raw_lat, decimal_comma), parse_coordinate(raw_lon, decimal_comma)) else {
            issues.push(format!("line {line}: invalid coordinates (lat={raw_lat:?}, lon={raw_lon:?})"));
            continue;
        };
        let position = Position::new(lon, lat);
        if !position.in_wgs84_range() {
            issues.push(format!("line {line}: coordinates out of range (lat={lat}, lon={lon})"));
            continue;
        }

        let mut properties = Properties::new();
        for (idx, (name, column)) in headers.iter().zip(&columns).enumerate() {
            if idx != lat_col && idx != lon_col {
                properties.insert(name, column.get(row).unwrap_or(""));
            }
        }
        features.push(Feature::new(Geometry::Point(position), properties));
    }

    Ok(ParsedData::single(features, issues))
}

/// Header names from row 0. Blank names become `column_N`; a repeated name
/// gets the first free `_2`, `_3`, ... suffix and an issue entry.
fn header_names(columns: &[&StringChunked], issues: &mut Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        let raw = column.get(0).map(str::trim).unwrap_or("");
        let name = if raw.is_empty() { format!("column_{}", idx + 1) } else { raw.to_string() };
        if !headers.contains(&name) {
            headers.push(name);
            continue;
        }
        let renamed = (2..)
            .map(|n| format!("{name}_{n}"))
            .find(|candidate| !headers.contains(candidate))
            .unwrap_or_default();
        issues.push(format!("line 1: duplicate column `{name}` renamed to `{renamed}`"));
        headers.push(renamed);
    }
    headers
}

/// Reads CSV text into a DataFrame with every column typed as string. The
/// header line is read as data so its names come through untouched.
fn read_csv_string(text: &str, separator: u8) -> Result<DataFrame, ParseError> {
    CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po.with_separator(separator).with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()
        .map_err(|e| ParseError::syntax(Format::Csv, e))
}

/// Field count of every non-blank record, quotes respected. Indexes line
/// up with the frame's rows.
fn record_widths(text: &str, separator: u8) -> Vec<usize> {
    let mut widths = Vec::new();
    let (mut fields, mut blank, mut quoted) = (1, true, false);
    for byte in text.bytes() {
        match byte {
            b'"' => {
                quoted = !quoted;
                blank = false;
            }
            b'\n' if !quoted => {
                if !blank {
                    widths.push(fields);
                }
                (fields, blank) = (1, true);
            }
            b'\r' if !quoted => {}
            b if b == separator && !quoted => {
                fields += 1;
                blank = false;
            }
            _ => blank = false,
        }
    }
    if !blank {
        widths.push(fields);
    }
    widths
}

/// Pick the candidate separator occurring most often in the header line.
fn sniff_separator(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    SEPARATORS.iter()
        .map(|&sep| (sep, header.bytes().filter(|&b| b == sep).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(sep, count)| (count, std::cmp::Reverse(SEPARATORS.iter().position(|&s| s == sep))))
        .map(|(sep, _)| sep)
        .unwrap_or(b',')
}

fn parse_coordinate(raw: &str, decimal_comma: bool) -> Option<f64> {
    let raw = raw.trim();
    let value = if decimal_comma { raw.replace(',', ".").parse::<f64>() } else { raw.parse::<f64>() };
    value.ok().filter(|v| v.is_finite())
}
