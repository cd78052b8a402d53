use crate::errors::DataLoadError;
use crate::types::{CompanyRecord, Field, RawRow};
use crate::util::clean_field;
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Locations tried, in order, when no data path is given.
pub const CANDIDATE_PATHS: [&str; 2] = ["data/companies.csv", "companies.csv"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_unnamed: usize,
    pub parse_errors: usize,
    /// Optional columns absent from the header; treated as entirely missing.
    pub missing_columns: Vec<String>,
}

/// Pick the data file: the explicit path when given, otherwise the first
/// existing candidate.
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf, DataLoadError> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    CANDIDATE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| DataLoadError::NotFound {
            searched: CANDIDATE_PATHS.iter().map(PathBuf::from).collect(),
        })
}

pub fn load_and_clean(path: &Path) -> Result<(Vec<CompanyRecord>, LoadReport), DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (records, report) = load_from_reader(file)?;
    info!(
        "Loaded {} companies from {} ({} rows read)",
        report.kept_rows,
        path.display(),
        report.total_rows
    );
    Ok((records, report))
}

/// Read and normalize company rows from any CSV source.
///
/// Rows keep their input order. Rows without a usable `co_name` and rows
/// that fail to decode are skipped and counted in the report.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<CompanyRecord>, LoadReport), DataLoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);
    if !has_column(Field::Name.column()) {
        return Err(DataLoadError::MissingColumn(Field::Name.column().to_string()));
    }
    if let Some(dup) = Field::ALL
        .iter()
        .map(|f| f.column())
        .find(|c| headers.iter().filter(|h| h == c).count() > 1)
    {
        return Err(DataLoadError::DuplicateColumn(dup.to_string()));
    }
    let missing_columns: Vec<String> = Field::ALL
        .iter()
        .map(|f| f.column())
        .filter(|c| !has_column(*c))
        .map(str::to_string)
        .collect();
    for col in &missing_columns {
        warn!("Column '{}' not present; treating it as missing for every row", col);
    }

    let mut report = LoadReport {
        missing_columns,
        ..LoadReport::default()
    };
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                if report.parse_errors == 0 {
                    warn!("Skipping row {}: {}", report.total_rows, e);
                } else {
                    debug!("Skipping row {}: {}", report.total_rows, e);
                }
                report.parse_errors += 1;
                continue;
            }
        };
        let Some(name) = clean_field(row.co_name.as_deref()) else {
            report.dropped_unnamed += 1;
            continue;
        };
        records.push(CompanyRecord {
            name,
            city: clean_field(row.city.as_deref()),
            phone: clean_field(row.phone.as_deref()),
            email: clean_field(row.email.as_deref()),
            website: clean_field(row.website.as_deref()),
            keywords: clean_field(row.keywords.as_deref()),
            contact: clean_field(row.contact.as_deref()),
        });
    }

    if report.total_rows > 0 && report.parse_errors == report.total_rows {
        return Err(DataLoadError::NoReadableRows {
            rows: report.total_rows,
        });
    }

    report.kept_rows = records.len();
    if report.dropped_unnamed > 0 {
        info!("Dropped {} rows without a company name", report.dropped_unnamed);
    }
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_trims_and_normalizes_placeholders() {
        let csv = "co_name,city,phone,email,website,keywords,contact\n\
                   \" Acme \", Paris ,,a@x.com,No Website,\"freight, customs\",N/A\n";
        let (records, report) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(report.total_rows, 1);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Acme");
        assert_eq!(r.city.as_deref(), Some("Paris"));
        assert_eq!(r.phone, None);
        assert_eq!(r.email.as_deref(), Some("a@x.com"));
        assert_eq!(r.website, None);
        assert_eq!(r.keywords.as_deref(), Some("freight, customs"));
        assert_eq!(r.contact, None);
    }

    #[test]
    fn test_rows_without_name_are_dropped_in_order() {
        let csv = "co_name,city\nFirst,Paris\n   ,Lyon\nnone,Nice\nSecond,Lyon\n";
        let (records, report) = load_from_reader(csv.as_bytes()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.kept_rows, 2);
        assert_eq!(report.dropped_unnamed, 2);
    }

    #[test]
    fn test_missing_name_column_is_an_error() {
        let csv = "name,city\nAcme,Paris\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(ref c) if c == "co_name"));
    }

    #[test]
    fn test_duplicate_tracked_column_is_an_error() {
        let csv = "co_name,city,city\nAcme,Paris,Lyon\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateColumn(ref c) if c == "city"));

        let csv = "co_name,city,co_name\nAcme,Paris,Acme\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateColumn(ref c) if c == "co_name"));
    }

    #[test]
    fn test_duplicate_untracked_column_is_allowed() {
        let csv = "co_name,note,note\nAcme,a,b\n";
        let (records, _) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_all_rows_undecodable_is_an_error() {
        let csv = b"co_name,city\n\xff\xfe,Paris\n\xff,Lyon\n";
        let err = load_from_reader(&csv[..]).unwrap_err();
        assert!(matches!(err, DataLoadError::NoReadableRows { rows: 2 }));
    }

    #[test]
    fn test_some_undecodable_rows_are_skipped() {
        let csv = b"co_name,city\nAcme,Paris\n\xff,Lyon\n";
        let (records, report) = load_from_reader(&csv[..]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.parse_errors, 1);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let csv = "co_name,email\nAcme,a@x.com\n";
        let (records, report) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city, None);
        assert!(records[0].has_email());
        assert_eq!(
            report.missing_columns,
            vec!["city", "phone", "website", "keywords", "contact"]
        );
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "id,co_name,rating,city\n7,Acme,5,Paris\n";
        let (records, _) = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].name, "Acme");
        assert_eq!(records[0].city.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_load_and_clean_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "co_name,city").unwrap();
        writeln!(file, "Acme,Paris").unwrap();
        let (records, report) = load_and_clean(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.kept_rows, 1);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_and_clean(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let p = resolve_data_path(Some(Path::new("elsewhere.csv"))).unwrap();
        assert_eq!(p, PathBuf::from("elsewhere.csv"));
    }
}
