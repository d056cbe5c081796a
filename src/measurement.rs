/// Measurement rows parsed from the semicolon-delimited harness log
///
/// Column layout (no header):
/// map name; hash name; benchmark; test number; test name;
/// operation count; nanoseconds per operation; memory usage (MB)
///
/// Ingestion is best-effort: numeric fields that fail to parse become `None`
/// and the row survives, records with the wrong field count are dropped.
use csv::{ReaderBuilder, StringRecord};
use std::str::FromStr;

pub const FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub map_name: String,
    pub hash_name: String,
    pub benchmark: String,
    pub test_num: String,
    pub test_name: String,
    pub num_operations: Option<i64>,
    pub ns_per_op: Option<f64>,
    pub memory_mb: Option<f64>,
    /// `"<map_name> (<hash_name>)"`, built from the normalized names
    pub map_with_hash: String,
}

impl MeasurementRow {
    /// Build a row from one split record. Returns `None` unless the record has
    /// exactly [`FIELD_COUNT`] fields.
    pub fn from_record(record: &StringRecord) -> Option<Self> {
        if record.len() != FIELD_COUNT {
            return None;
        }

        let map_name = normalize_name(&record[0]);
        let hash_name = normalize_name(&record[1]);
        let map_with_hash = combined_label(&map_name, &hash_name);

        Some(Self {
            benchmark: normalize_name(&record[2]),
            test_num: record[3].trim().to_string(),
            test_name: record[4].trim().to_string(),
            num_operations: coerce(&record[5]),
            ns_per_op: coerce(&record[6]),
            memory_mb: coerce(&record[7]),
            map_name,
            hash_name,
            map_with_hash,
        })
    }
}

/// Strip every double quote, then surrounding whitespace. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

pub fn combined_label(map_name: &str, hash_name: &str) -> String {
    format!("{} ({})", map_name, hash_name)
}

/// Parse a numeric field, yielding `None` for anything that isn't a number
pub fn coerce<T: FromStr>(field: &str) -> Option<T> {
    field.trim().parse().ok()
}

#[derive(Debug, Clone, Default)]
pub struct ParsedMeasurements {
    pub rows: Vec<MeasurementRow>,
    /// Records dropped for a wrong field count or unreadable bytes
    pub dropped: usize,
}

impl ParsedMeasurements {
    pub fn for_benchmark<'a>(
        &'a self,
        benchmark: &'a str,
    ) -> impl Iterator<Item = &'a MeasurementRow> + 'a {
        self.rows.iter().filter(move |row| row.benchmark == benchmark)
    }
}

/// Parse cleaned log text into measurement rows.
///
/// Quotes are not special: every line is a plain split on `;`, so a stray
/// quote only affects its own row.
pub fn parse_measurements(content: &str) -> ParsedMeasurements {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());

    let mut parsed = ParsedMeasurements::default();

    for result in reader.records() {
        match result.ok().as_ref().and_then(MeasurementRow::from_record) {
            Some(row) => parsed.rows.push(row),
            None => parsed.dropped += 1,
        }
    }

    parsed
}
