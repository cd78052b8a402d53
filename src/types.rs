use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

/// Bucket used for records without a city.
pub const UNKNOWN_CITY: &str = "Unknown";

pub type LeadScore = u32;

/// One CSV row as read from disk. Every column is optional at this stage;
/// absent columns deserialize to `None`.
#[derive(Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub co_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

/// The tracked columns of the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    City,
    Phone,
    Email,
    Website,
    Keywords,
    Contact,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::City,
        Field::Phone,
        Field::Email,
        Field::Website,
        Field::Keywords,
        Field::Contact,
    ];

    /// Column name in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Field::Name => "co_name",
            Field::City => "city",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Website => "website",
            Field::Keywords => "keywords",
            Field::Contact => "contact",
        }
    }
}

/// A cleaned company row. `name` is always present; every other field is
/// `None` when the source cell was blank or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    pub name: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub keywords: Option<String>,
    pub contact: Option<String>,
}

impl CompanyRecord {
    /// A record with only a name; handy as a starting point in tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: None,
            phone: None,
            email: None,
            website: None,
            keywords: None,
            contact: None,
        }
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::City => self.city.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Website => self.website.as_deref(),
            Field::Keywords => self.keywords.as_deref(),
            Field::Contact => self.contact.as_deref(),
        }
    }

    pub fn has(&self, field: Field) -> bool {
        self.field(field).is_some()
    }

    pub fn has_city(&self) -> bool {
        self.city.is_some()
    }

    pub fn has_phone(&self) -> bool {
        self.phone.is_some()
    }

    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    pub fn has_website(&self) -> bool {
        self.website.is_some()
    }

    pub fn has_keywords(&self) -> bool {
        self.keywords.is_some()
    }

    pub fn has_contact(&self) -> bool {
        self.contact.is_some()
    }

    /// City used for grouping and filtering: the city, or [`UNKNOWN_CITY`].
    pub fn city_label(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN_CITY)
    }

    /// Normalized service tokens of the `keywords` field.
    pub fn keyword_tokens(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(crate::util::tokenize_keywords)
            .unwrap_or_default()
    }
}

/// The loaded table, shared read-only. Cloning only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Arc<[CompanyRecord]>,
}

impl Snapshot {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One exported lead. Column order here is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct LeadRow {
    pub co_name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub lead_score: LeadScore,
    pub website: String,
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CityCount {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ServiceCount {
    #[serde(rename = "Service")]
    #[tabled(rename = "Service")]
    pub service: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

pub type CityDistribution = Vec<CityCount>;
pub type ServiceFrequency = Vec<ServiceCount>;

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct FieldQuality {
    #[serde(rename = "Column")]
    #[tabled(rename = "Column")]
    pub column: String,
    #[serde(rename = "MissingPct")]
    #[tabled(rename = "Missing %")]
    pub missing_pct: f64,
    #[serde(rename = "Unique")]
    #[tabled(rename = "Unique")]
    pub unique: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub total_records: usize,
    pub fields: Vec<FieldQuality>,
    /// Records whose normalized name occurs more than once.
    pub duplicate_companies: usize,
    /// Records whose (normalized name, normalized city) pair occurs more than once.
    pub duplicate_company_city: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CompanyReach {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Company")]
    #[tabled(rename = "Company")]
    pub company: String,
    /// Distinct cities the company appears in.
    #[serde(rename = "Reach")]
    #[tabled(rename = "Reach")]
    pub reach: usize,
    /// Other companies sharing at least one of those cities.
    #[serde(rename = "CoLocated")]
    #[tabled(rename = "CoLocated")]
    pub co_located: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCityGraph {
    pub company_nodes: usize,
    pub city_nodes: usize,
    pub edges: usize,
    pub ranking: Vec<CompanyReach>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_companies: usize,
    pub cities_covered: usize,
    pub with_phone: usize,
    pub with_email: usize,
    pub with_website: usize,
    pub pct_with_phone: f64,
    pub pct_with_email: f64,
    pub pct_with_website: f64,
    pub top_city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_accessors() {
        let mut r = CompanyRecord::named("Acme");
        r.email = Some("a@x.com".to_string());
        assert!(r.has_email());
        assert!(!r.has_phone());
        assert!(r.has(Field::Name));
        assert!(!r.has(Field::Website));
        assert_eq!(r.field(Field::Email), Some("a@x.com"));
    }

    #[test]
    fn test_city_label_falls_back_to_unknown() {
        let mut r = CompanyRecord::named("Acme");
        assert_eq!(r.city_label(), UNKNOWN_CITY);
        r.city = Some("Paris".to_string());
        assert_eq!(r.city_label(), "Paris");
    }

    #[test]
    fn test_snapshot_clones_share_records() {
        let snap = Snapshot::new(vec![CompanyRecord::named("Acme")]);
        let other = snap.clone();
        assert!(std::ptr::eq(snap.records(), other.records()));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_field_columns_are_distinct() {
        let cols: std::collections::HashSet<_> = Field::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(cols.len(), Field::ALL.len());
    }
}
