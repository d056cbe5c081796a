/// Benchmark samples from structured CSV result files
///
/// Every file must carry at least a `name` column (`"<benchmark>/<key_count>"`)
/// and a numeric `cpu_time` column. An optional `library` column labels the
/// implementation under test; without it the file stem is used.
use anyhow::{bail, Context, Result};
use csv::StringRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSample {
    pub library: String,
    pub name: String,
    pub benchmark_name: String,
    pub key_count: u64,
    pub cpu_time: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeName {
    pub benchmark_name: String,
    pub key_count: u64,
}

/// Split `"<benchmark_name>/<key_count>"`.
///
/// The format is a contract with the benchmark tool, so a missing separator
/// or a non-integer key count is an error rather than a skipped row.
pub fn split_name(name: &str) -> Result<CompositeName> {
    let mut parts = name.split('/');
    let benchmark_name = parts.next().unwrap_or_default();
    let Some(key_segment) = parts.next() else {
        bail!("Benchmark name {:?} has no '/<key_count>' suffix", name);
    };
    if benchmark_name.trim().is_empty() {
        bail!("Benchmark name {:?} has an empty benchmark segment", name);
    }

    let key_count = key_segment
        .parse::<u64>()
        .with_context(|| format!("Key count {:?} in benchmark name {:?} is not an integer", key_segment, name))?;

    Ok(CompositeName {
        benchmark_name: benchmark_name.to_string(),
        key_count,
    })
}

#[derive(Debug, Deserialize)]
struct SampleRecord {
    name: String,
    cpu_time: f64,
    #[serde(default)]
    library: Option<String>,
}

/// Samples concatenated from one or more CSV files sharing a header
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    headers: Option<StringRecord>,
    pub samples: Vec<BenchmarkSample>,
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and concatenate every file, failing on the first bad one
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut table = Self::new();
        for path in paths {
            table.append_file(path.as_ref())?;
        }
        Ok(table)
    }

    pub fn append_file(&mut self, path: &Path) -> Result<()> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open results file: {}", path.display()))?;

        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let added = self
            .append_reader(&label, file)
            .with_context(|| format!("Failed to load results file: {}", path.display()))?;

        info!("Loaded {} samples from {}", added, path.display());
        Ok(())
    }

    /// Append rows from any CSV source. `source_label` names the library when
    /// the rows carry no `library` column. Returns the number of rows added.
    pub fn append_reader<R: Read>(&mut self, source_label: &str, source: R) -> Result<usize> {
        let mut reader = csv::Reader::from_reader(source);
        let headers = reader.headers()?.clone();

        match &self.headers {
            Some(expected) if *expected != headers => bail!(
                "Column mismatch: expected {:?}, found {:?}",
                expected.iter().collect::<Vec<_>>(),
                headers.iter().collect::<Vec<_>>()
            ),
            Some(_) => {}
            None => self.headers = Some(headers),
        }

        let mut added = 0;
        for (idx, result) in reader.deserialize().enumerate() {
            let record: SampleRecord =
                result.with_context(|| format!("Malformed row {} in {}", idx + 1, source_label))?;
            let parts = split_name(&record.name)?;

            let library = record
                .library
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| source_label.to_string());

            self.samples.push(BenchmarkSample {
                library,
                name: record.name,
                benchmark_name: parts.benchmark_name,
                key_count: parts.key_count,
                cpu_time: record.cpu_time,
            });
            added += 1;
        }

        debug!("{}: {} rows", source_label, added);
        Ok(added)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        let parts = split_name("RandomInsertErase/500000").unwrap();
        assert_eq!(parts.benchmark_name, "RandomInsertErase");
        assert_eq!(parts.key_count, 500000);
    }

    #[test]
    fn test_split_name_extra_segments() {
        let parts = split_name("RandomFind/2000/real_time").unwrap();
        assert_eq!(parts.benchmark_name, "RandomFind");
        assert_eq!(parts.key_count, 2000);
    }

    #[test]
    fn test_split_name_is_strict() {
        assert!(split_name("RandomInsertErase").is_err());
        assert!(split_name("RandomInsertErase/").is_err());
        assert!(split_name("RandomInsertErase/many").is_err());
        assert!(split_name("RandomInsertErase/-5").is_err());
        assert!(split_name("RandomInsertErase/500000_mean").is_err());
        assert!(split_name("/500").is_err());
        assert!(split_name(" /500").is_err());
    }

    #[test]
    fn test_append_reader_uses_label_without_library_column() {
        let csv = "name,iterations,cpu_time\nInsert/100,10,1.5\nInsert/200,10,3.0\n";
        let mut table = SampleTable::new();

        let added = table.append_reader("absl", csv.as_bytes()).unwrap();

        assert_eq!(added, 2);
        assert_eq!(
            table.samples[1],
            BenchmarkSample {
                library: "absl".to_string(),
                name: "Insert/200".to_string(),
                benchmark_name: "Insert".to_string(),
                key_count: 200,
                cpu_time: 3.0,
            }
        );
    }

    #[test]
    fn test_append_reader_prefers_library_column() {
        let csv = "name,cpu_time,library\nFind/10,1.0,optimap\nFind/10,2.0,\n";
        let mut table = SampleTable::new();
        table.append_reader("results", csv.as_bytes()).unwrap();

        assert_eq!(table.samples[0].library, "optimap");
        assert_eq!(table.samples[1].library, "results");
    }

    #[test]
    fn test_mismatched_headers_are_fatal() {
        let mut table = SampleTable::new();
        table
            .append_reader("a", "name,cpu_time\nFind/10,1.0\n".as_bytes())
            .unwrap();

        let err = table
            .append_reader("b", "name,real_time,cpu_time\nFind/10,1.0,1.0\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("Column mismatch"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_malformed_name_is_fatal() {
        let mut table = SampleTable::new();
        let result = table.append_reader("a", "name,cpu_time\nFind,1.0\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_cpu_time_is_fatal() {
        let mut table = SampleTable::new();
        let result = table.append_reader("a", "name,cpu_time\nFind/10,fast\n".as_bytes());
        assert!(result.is_err());
    }
}
