// Entry point and high-level CLI flow.
//
// Every invocation loads the CSV once into a snapshot, scores and filters it,
// then renders the requested views to the console and, for `report` and
// `leads --export`, to files.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use company_insights::config::{load_config, AppConfig};
use company_insights::errors::FilterError;
use company_insights::filters::{apply_filters, score_records, FilterConfig, RawFilter, ScoredRecord};
use company_insights::loader::{load_and_clean, resolve_data_path, LoadReport};
use company_insights::types::{CompanyCityGraph, DataQualityReport, Overview, Snapshot};
use company_insights::util::{format_int, format_number};
use company_insights::{logging, output, reports, scoring};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_OUTPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Overview, cities, services, leads, network and data quality (default)
    Report,
    /// Lead list sorted by score
    Leads {
        /// Write the filtered leads as CSV to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Missing values, uniqueness and duplicates per column
    Quality,
    /// Companies ranked by the number of cities they reach
    Network,
}

#[derive(Parser, Debug)]
#[command(name = "company_insights")]
#[command(about = "Lead scoring and analytics for a company directory CSV", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging and per-lead score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ./insights.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data file (defaults to data/companies.csv, then companies.csv)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Keep only these cities ("Unknown" selects rows without a city)
    #[arg(long, global = true)]
    city: Vec<String>,

    /// Keep only companies offering any of these services
    #[arg(long, global = true)]
    service: Vec<String>,

    /// Lowest lead score to keep (inclusive)
    #[arg(long, global = true)]
    min_score: Option<String>,

    /// Highest lead score to keep (inclusive)
    #[arg(long, global = true)]
    max_score: Option<String>,

    /// Number of companies in the network ranking
    #[arg(long, global = true)]
    top: Option<usize>,

    /// Directory for exported report files
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Serialize)]
struct Summary<'a> {
    generated_at: DateTime<Utc>,
    source: String,
    overview: &'a Overview,
    filter: &'a FilterConfig,
    scoring: &'a scoring::ScoringConfig,
    duplicate_companies: usize,
    duplicate_company_city: usize,
}

/// Everything a command needs: the loaded table and how to look at it.
struct Session {
    source: PathBuf,
    snapshot: Snapshot,
    config: AppConfig,
    filter: FilterConfig,
}

impl Session {
    fn scored(&self) -> Vec<ScoredRecord<'_>> {
        let scored = score_records(self.snapshot.records(), &self.config.scoring);
        apply_filters(&scored, &self.filter)
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Report);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(top) = cli.top {
        config.top_k = top;
    }
    if let Some(dir) = cli.out_dir {
        config.out_dir = dir;
    }
    if let Err(e) = config.validate() {
        eprintln!("Config error: {}", e);
        std::process::exit(EXIT_CONFIG);
    }

    let explicit = cli.data.as_deref().or(config.data.as_deref());
    let loaded = resolve_data_path(explicit)
        .and_then(|path| load_and_clean(&path).map(|loaded| (path, loaded)));
    let (source, (records, load_report)) = match loaded {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Failed to load data: {}", e);
            std::process::exit(EXIT_DATA);
        }
    };
    print_load_report(&load_report);

    let (filter, recovered) = FilterConfig::from_raw(&RawFilter {
        cities: cli.city,
        services: cli.service,
        min_score: cli.min_score,
        max_score: cli.max_score,
    });
    print_filter_notes(&recovered);

    let session = Session {
        source,
        snapshot: Snapshot::new(records),
        config,
        filter,
    };

    let result = match command {
        Commands::Report => handle_report(&session),
        Commands::Leads { export } => handle_leads(&session, export.as_deref(), cli.verbose),
        Commands::Quality => {
            let scored = session.scored();
            let quality = reports::compute_data_quality_report(scored.iter().map(|s| s.record));
            print_quality(&quality, quality.fields.len());
            Ok(())
        }
        Commands::Network => {
            let scored = session.scored();
            let top_k = session.config.top_k;
            let graph = reports::compute_company_city_graph(scored.iter().map(|s| s.record), top_k);
            print_network(&graph, top_k);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Output error: {:#}", e);
        std::process::exit(EXIT_OUTPUT);
    }
    std::process::exit(EXIT_SUCCESS);
}

fn print_load_report(report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows read, {} companies kept)",
        format_int(report.total_rows),
        format_int(report.kept_rows)
    );
    if report.dropped_unnamed > 0 {
        println!(
            "Note: {} rows skipped without a company name.",
            format_int(report.dropped_unnamed)
        );
    }
    if report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse errors.",
            format_int(report.parse_errors)
        );
    }
    println!();
}

fn print_filter_notes(recovered: &[FilterError]) {
    for e in recovered {
        println!("Note: ignoring filter: {}.", e);
    }
    if !recovered.is_empty() {
        println!();
    }
}

fn print_overview(overview: &Overview) {
    println!("Total Companies: {}", format_int(overview.total_companies));
    println!("Cities Covered:  {}", format_int(overview.cities_covered));
    println!("% with Website:  {}%", format_number(overview.pct_with_website, 1));
    println!("Top City:        {}", overview.top_city.as_deref().unwrap_or("—"));
    println!(
        "Online presence: {} phone / {} email / {} website",
        format_int(overview.with_phone),
        format_int(overview.with_email),
        format_int(overview.with_website)
    );
}

fn print_quality(quality: &DataQualityReport, max_rows: usize) {
    output::preview_table(
        "Data Quality Report",
        Some(&format!("{} records", format_int(quality.total_records))),
        &quality.fields,
        max_rows,
    );
    println!(
        "Duplicate rows (by company): {}",
        format_int(quality.duplicate_companies)
    );
    println!(
        "Duplicate rows (by company+city): {}\n",
        format_int(quality.duplicate_company_city)
    );
}

fn print_network(graph: &CompanyCityGraph, top_k: usize) {
    let note = format!(
        "{} companies, {} cities, {} links",
        format_int(graph.company_nodes),
        format_int(graph.city_nodes),
        format_int(graph.edges)
    );
    output::preview_table(
        &format!("Top {} Companies by Reach", top_k),
        Some(&note),
        &graph.ranking,
        top_k,
    );
}

fn handle_leads(session: &Session, export: Option<&Path>, verbose: bool) -> Result<()> {
    let scored = session.scored();
    let rows = output::lead_rows(&scored);
    output::preview_table("Lead List", None, &rows, rows.len());

    if verbose {
        let mut ranked = scored.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        for s in &ranked {
            let result = scoring::calculate_score(s.record, &session.config.scoring);
            println!("{}  (score {}, raw {})", s.record.name, result.score, result.raw);
            for f in &result.factors {
                println!("  {:<9} {:>4}  {}", f.factor.label(), f.points, f.detail);
            }
        }
        println!();
    }

    if let Some(path) = export {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        output::write_leads_csv(file, &scored)?;
        info!("Exported {} leads to {}", scored.len(), path.display());
        println!("(Lead list exported to {})", path.display());
    }
    Ok(())
}

fn handle_report(session: &Session) -> Result<()> {
    let scored = session.scored();
    let records = || scored.iter().map(|s| s.record);
    let out_dir = &session.config.out_dir;
    let preview = session.config.preview_rows;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    println!("Generating reports...");
    println!("Outputs saved to {}\n", out_dir.display());

    let overview = reports::compute_overview(records());
    print_overview(&overview);

    let cities = reports::compute_city_distribution(records());
    let file = out_dir.join("city_distribution.csv");
    output::write_csv(&file, &cities)?;
    output::preview_table("Top Cities by Company Count", None, &cities, preview);
    println!("(Full table exported to {})", file.display());

    let services = reports::compute_service_frequency(records());
    let file = out_dir.join("service_frequency.csv");
    output::write_csv(&file, &services)?;
    output::preview_table("Top Services", None, &services, preview);
    println!("(Full table exported to {})", file.display());

    let leads = output::lead_rows(&scored);
    let file = out_dir.join("leads_export.csv");
    output::write_csv(&file, &leads)?;
    output::preview_table("Lead List", Some("sorted by lead score"), &leads, preview);
    println!("(Full table exported to {})", file.display());

    let graph = reports::compute_company_city_graph(records(), session.config.top_k);
    let file = out_dir.join("network_reach.csv");
    output::write_csv(&file, &graph.ranking)?;
    print_network(&graph, session.config.top_k);
    println!("(Full table exported to {})", file.display());

    let quality = reports::compute_data_quality_report(records());
    let file = out_dir.join("data_quality.csv");
    output::write_csv(&file, &quality.fields)?;
    print_quality(&quality, quality.fields.len());
    println!("(Full table exported to {})\n", file.display());

    let summary = Summary {
        generated_at: Utc::now(),
        source: session.source.display().to_string(),
        overview: &overview,
        filter: &session.filter,
        scoring: &session.config.scoring,
        duplicate_companies: quality.duplicate_companies,
        duplicate_company_city: quality.duplicate_company_city,
    };
    output::write_json(&out_dir.join("summary.json"), &summary)?;
    println!(
        "Summary Stats (summary.json): {} companies, {}% with email, {}% with website",
        format_int(overview.total_companies),
        format_number(overview.pct_with_email, 1),
        format_number(overview.pct_with_website, 1)
    );
    Ok(())
}
