// src/aggregate/mod.rs
use crate::parse::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Borough → count, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoroughCounts {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl BoroughCounts {
    fn increment(&mut self, borough: &str) {
        match self.index.get(borough) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(borough.to_string(), self.entries.len());
                self.entries.push((borough.to_string(), 1));
            }
        }
    }

    pub fn get(&self, borough: &str) -> Option<usize> {
        self.index.get(borough).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(b, c)| (b.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn largest(&self) -> usize {
        self.entries.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    pub fn sum(&self) -> usize {
        self.entries.iter().map(|(_, c)| *c).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationResult {
    pub total: usize,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub boroughs: BoroughCounts,
}

/// How the year bounds are tracked across records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearTracking {
    /// First record seeds the minimum, second seeds the maximum, later
    /// records move at most one bound. Matches the published reports.
    #[default]
    Sequential,
    /// True running minimum and maximum.
    Corrected,
}

/// `"M/D/YYYY hh:mm:ss AM"` → `"YYYY"`. No validation; whatever sits in the
/// third slash slot of the first word comes back.
pub fn extract_year(date: &str) -> Option<String> {
    date.split(' ').next()?.split('/').nth(2).map(str::to_string)
}

fn is_unset(bound: &Option<String>) -> bool {
    bound.as_deref().map_or(true, str::is_empty)
}

#[derive(Debug, Default)]
struct YearBounds {
    min: Option<String>,
    max: Option<String>,
}

impl YearBounds {
    fn observe_sequential(&mut self, year: Option<String>) {
        if is_unset(&self.min) {
            self.min = year;
        } else if is_unset(&self.max) {
            self.max = year;
        } else if let Some(y) = year {
            // bounds are both set here
            if self.max.as_deref().is_some_and(|m| y.as_str() > m) {
                self.max = Some(y);
            } else if self.min.as_deref().is_some_and(|m| y.as_str() < m) {
                self.min = Some(y);
            }
        }
    }

    fn observe_corrected(&mut self, year: Option<String>) {
        let Some(y) = year.filter(|y| !y.is_empty()) else {
            return;
        };
        if self.min.as_deref().map_or(true, |m| y.as_str() < m) {
            self.min = Some(y.clone());
        }
        if self.max.as_deref().map_or(true, |m| y.as_str() > m) {
            self.max = Some(y);
        }
    }
}

/// Count records per borough and track the year range.
///
/// Records failing `filter` are skipped entirely. Records without a borough
/// are counted under `""` so the counts always sum to `total`.
pub fn aggregate<Y, B, F>(
    records: &[Record],
    year_of: Y,
    borough_of: B,
    filter: Option<F>,
    tracking: YearTracking,
) -> AggregationResult
where
    Y: Fn(&Record) -> Option<String>,
    B: for<'r> Fn(&'r Record) -> Option<&'r str>,
    F: Fn(&Record) -> bool,
{
    let mut boroughs = BoroughCounts::default();
    let mut bounds = YearBounds::default();
    let mut total = 0usize;

    for record in records {
        if let Some(keep) = &filter {
            if !keep(record) {
                continue;
            }
        }
        total += 1;

        let year = year_of(record);
        boroughs.increment(borough_of(record).unwrap_or(""));

        trace!(?year, "observing year");
        match tracking {
            YearTracking::Sequential => bounds.observe_sequential(year),
            YearTracking::Corrected => bounds.observe_corrected(year),
        }
    }

    debug!(
        total,
        boroughs = boroughs.len(),
        min_year = ?bounds.min,
        max_year = ?bounds.max,
        "aggregated records"
    );

    AggregationResult {
        total,
        min_year: bounds.min,
        max_year: bounds.max,
        boroughs,
    }
}

/// Column names the permit report reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub borough: String,
    pub entered_on: String,
    pub event_type: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            borough: "Borough".into(),
            entered_on: "EnteredOn".into(),
            event_type: "EventType".into(),
        }
    }
}

impl Columns {
    /// Aggregate using the configured columns, keeping only records whose
    /// event type equals `permit_type` when one is given.
    pub fn aggregate(
        &self,
        records: &[Record],
        permit_type: Option<&str>,
        tracking: YearTracking,
    ) -> AggregationResult {
        let filter = permit_type.map(|wanted| {
            move |r: &Record| r.get(&self.event_type) == Some(wanted)
        });
        aggregate(
            records,
            |r| r.get(&self.entered_on).and_then(extract_year),
            |r| r.get(&self.borough),
            filter,
            tracking,
        )
    }

    /// Distinct event types in first-seen order.
    pub fn permit_types<'r>(&self, records: &'r [Record]) -> Vec<&'r str> {
        let mut seen = Vec::new();
        for r in records {
            if let Some(t) = r.get(&self.event_type) {
                if !seen.contains(&t) {
                    seen.push(t);
                }
            }
        }
        seen
    }
}
