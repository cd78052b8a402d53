use crate::filters::ScoredRecord;
use crate::types::LeadRow;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

impl<'a> From<&ScoredRecord<'a>> for LeadRow {
    fn from(s: &ScoredRecord<'a>) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let r = s.record;
        LeadRow {
            co_name: r.name.clone(),
            contact: text(&r.contact),
            email: text(&r.email),
            phone: text(&r.phone),
            city: text(&r.city),
            lead_score: s.score,
            website: text(&r.website),
            keywords: text(&r.keywords),
        }
    }
}

/// Lead list sorted by score descending. Equal scores keep input order.
pub fn lead_rows(scored: &[ScoredRecord<'_>]) -> Vec<LeadRow> {
    let mut rows: Vec<LeadRow> = scored.iter().map(LeadRow::from).collect();
    rows.sort_by(|a, b| b.lead_score.cmp(&a.lead_score));
    rows
}

/// Write rows as CSV with a header row to any writer.
pub fn write_csv_to<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export leads with the fixed column order
/// `co_name, contact, email, phone, city, lead_score, website, keywords`.
/// Missing fields are written as empty cells.
pub fn write_leads_csv<W: Write>(writer: W, leads: &[ScoredRecord<'_>]) -> Result<()> {
    write_csv_to(writer, &lead_rows(leads))
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv_to(file, rows).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    preview_table_rows(rows, max_rows);
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
