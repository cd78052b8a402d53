use crate::types::{
    CityCount, CityDistribution, CompanyCityGraph, CompanyReach, CompanyRecord, DataQualityReport,
    Field, FieldQuality, Overview, ServiceCount, ServiceFrequency,
};
use crate::util::{fold_key, percentage, round_to};
use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};

/// Missing percentages are reported with this many decimals.
pub const PCT_DECIMALS: u32 = 1;

/// Default number of companies kept in the reach ranking.
pub const DEFAULT_TOP_K: usize = 10;

/// Sort `(label, count)` pairs by count descending, then label ascending.
fn ranked_counts(map: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut rows: Vec<(String, usize)> = map.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

pub fn compute_city_distribution<'a, I>(records: I) -> CityDistribution
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let mut map: HashMap<String, usize> = HashMap::new();
    for r in records {
        *map.entry(r.city_label().to_string()).or_default() += 1;
    }
    debug!("City distribution: {} distinct cities", map.len());
    ranked_counts(map)
        .into_iter()
        .map(|(city, count)| CityCount { city, count })
        .collect()
}

pub fn compute_service_frequency<'a, I>(records: I) -> ServiceFrequency
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let mut map: HashMap<String, usize> = HashMap::new();
    for r in records {
        for token in r.keyword_tokens() {
            *map.entry(token).or_default() += 1;
        }
    }
    debug!("Service frequency: {} distinct services", map.len());
    ranked_counts(map)
        .into_iter()
        .map(|(service, count)| ServiceCount { service, count })
        .collect()
}

/// Number of items whose key occurs more than once.
fn count_in_duplicate_groups<K: std::hash::Hash + Eq>(keys: impl IntoIterator<Item = K>) -> usize {
    let mut groups: HashMap<K, usize> = HashMap::new();
    for k in keys {
        *groups.entry(k).or_default() += 1;
    }
    groups.values().filter(|n| **n > 1).sum()
}

pub fn compute_data_quality_report<'a, I>(records: I) -> DataQualityReport
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let records: Vec<&CompanyRecord> = records.into_iter().collect();
    let total = records.len();

    let mut fields: Vec<FieldQuality> = Field::ALL
        .iter()
        .map(|&field| {
            let mut missing = 0usize;
            let mut distinct: HashSet<String> = HashSet::new();
            for r in &records {
                match r.field(field) {
                    Some(v) => {
                        distinct.insert(fold_key(v));
                    }
                    None => missing += 1,
                }
            }
            FieldQuality {
                column: field.column().to_string(),
                missing_pct: round_to(percentage(missing, total), PCT_DECIMALS),
                unique: distinct.len(),
            }
        })
        .collect();
    // Stable: equal percentages keep column order.
    fields.sort_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct));

    let duplicate_companies = count_in_duplicate_groups(records.iter().map(|r| fold_key(&r.name)));
    let duplicate_company_city = count_in_duplicate_groups(
        records
            .iter()
            .map(|r| (fold_key(&r.name), r.city.as_deref().map(fold_key))),
    );

    debug!(
        "Data quality: {} records, {} duplicate by company, {} by company+city",
        total, duplicate_companies, duplicate_company_city
    );
    DataQualityReport {
        total_records: total,
        fields,
        duplicate_companies,
        duplicate_company_city,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Company,
    City,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    label: String,
}

impl Node {
    fn new(kind: NodeKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
        }
    }
}

/// Build the company–city graph and rank companies by reach.
///
/// Companies are identified by their folded name and displayed with the
/// first spelling seen. Cities are matched on their trimmed text.
pub fn compute_company_city_graph<'a, I>(records: I, top_k: usize) -> CompanyCityGraph
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let mut graph: UnGraph<Node, ()> = UnGraph::new_undirected();
    let mut companies: HashMap<String, NodeIndex> = HashMap::new();
    let mut cities: HashMap<String, NodeIndex> = HashMap::new();
    let mut linked: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();

    for r in records {
        let company = *companies
            .entry(fold_key(&r.name))
            .or_insert_with(|| graph.add_node(Node::new(NodeKind::Company, &r.name)));
        if let Some(city) = r.city.as_deref() {
            let city_node = *cities
                .entry(city.to_string())
                .or_insert_with(|| graph.add_node(Node::new(NodeKind::City, city)));
            if linked.insert((company, city_node)) {
                graph.add_edge(company, city_node, ());
            }
        }
    }

    let mut ranking: Vec<CompanyReach> = companies
        .values()
        .map(|&idx| {
            let reach = graph.neighbors(idx).count();
            let co_located: HashSet<NodeIndex> = graph
                .neighbors(idx)
                .flat_map(|city| graph.neighbors(city))
                .filter(|&other| other != idx && graph[other].kind == NodeKind::Company)
                .collect();
            CompanyReach {
                rank: 0,
                company: graph[idx].label.clone(),
                reach,
                co_located: co_located.len(),
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.reach.cmp(&a.reach).then_with(|| a.company.cmp(&b.company)));
    ranking.truncate(top_k);
    for (i, row) in ranking.iter_mut().enumerate() {
        row.rank = i + 1;
    }

    debug!(
        "Company-city graph: {} companies, {} cities, {} edges",
        companies.len(),
        cities.len(),
        graph.edge_count()
    );

    CompanyCityGraph {
        company_nodes: companies.len(),
        city_nodes: cities.len(),
        edges: graph.edge_count(),
        ranking,
    }
}

pub fn compute_overview<'a, I>(records: I) -> Overview
where
    I: IntoIterator<Item = &'a CompanyRecord>,
{
    let records: Vec<&CompanyRecord> = records.into_iter().collect();
    let total = records.len();
    let count = |f: fn(&CompanyRecord) -> bool| records.iter().filter(|&&r| f(r)).count();
    let with_phone = count(CompanyRecord::has_phone);
    let with_email = count(CompanyRecord::has_email);
    let with_website = count(CompanyRecord::has_website);

    let present: Vec<&CompanyRecord> = records.iter().copied().filter(|r| r.has_city()).collect();
    let distribution = compute_city_distribution(present);

    Overview {
        total_companies: total,
        cities_covered: distribution.len(),
        with_phone,
        with_email,
        with_website,
        pct_with_phone: round_to(percentage(with_phone, total), PCT_DECIMALS),
        pct_with_email: round_to(percentage(with_email, total), PCT_DECIMALS),
        pct_with_website: round_to(percentage(with_website, total), PCT_DECIMALS),
        top_city: distribution.into_iter().next().map(|c| c.city),
    }
}
