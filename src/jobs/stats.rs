use crate::document::Document;
use bson::Bson;
use serde::Serialize;
use std::collections::BTreeMap;

/// Salary and position figures for the postings sharing one experience level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    /// Experience level, uppercased.
    #[serde(rename = "_id")]
    pub id: String,
    pub total_jobs: usize,
    pub avg_position: f64,
    pub avg_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
}

fn number(v: Option<&Bson>) -> Option<f64> {
    match v? {
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

#[derive(Default)]
struct Acc {
    count: usize,
    positions: Vec<f64>,
    salaries: Vec<f64>,
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = xs.len() as f64;
    xs.iter().sum::<f64>() / n
}

/// Groups `docs` by uppercased `experience`, ordered by group key.
/// Non-numeric `positions`/`salary` values are left out of the averages.
#[must_use]
pub fn group_by_experience(docs: &[Document]) -> Vec<TopicStats> {
    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    for d in docs {
        let key = d.data.get_str("experience").unwrap_or_default().to_uppercase();
        let acc = groups.entry(key).or_default();
        acc.count += 1;
        acc.positions.extend(number(d.data.get("positions")));
        acc.salaries.extend(number(d.data.get("salary")));
    }
    groups
        .into_iter()
        .map(|(id, acc)| TopicStats {
            id,
            total_jobs: acc.count,
            avg_position: mean(&acc.positions),
            avg_salary: mean(&acc.salaries),
            min_salary: acc.salaries.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_salary: acc.salaries.iter().copied().reduce(f64::max).unwrap_or(0.0),
        })
        .collect()
}
