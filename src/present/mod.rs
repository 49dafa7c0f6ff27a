// src/present/mod.rs
use crate::aggregate::AggregationResult;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Text shown for a year bound that was never set.
const UNSET_YEAR: &str = "undefined";

/// How borough bar widths are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarScale {
    /// count / total * 150
    Total,
    /// count / largest borough count * 100
    LargestBorough,
}

impl BarScale {
    pub fn denominator(&self, result: &AggregationResult) -> usize {
        match self {
            BarScale::Total => result.total,
            BarScale::LargestBorough => result.boroughs.largest(),
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            BarScale::Total => 150.0,
            BarScale::LargestBorough => 100.0,
        }
    }
}

/// Insert `,` separators.
///
/// Only two digit-length bands are handled: 4..=6 digits get one
/// separator, 7..=9 digits get two. Anything shorter or longer comes back
/// as plain digits.
pub fn nice_number(n: usize) -> String {
    let s = n.to_string();
    let len = s.len();

    let out = if (4..7).contains(&len) {
        format!("{},{}", &s[..len - 3], &s[len - 3..])
    } else if (6..10).contains(&len) {
        format!(
            "{},{},{}",
            &s[..len - 6],
            &s[len - 6..len - 3],
            &s[len - 3..]
        )
    } else {
        s.clone()
    };

    trace!(input = n, formatted = %out, "nice number");
    out
}

/// Headline sentence with the year range and total count. `extra_label`
/// names the permit type when the records were filtered.
pub fn format_summary(result: &AggregationResult, extra_label: Option<&str>) -> String {
    let min = result.min_year.as_deref().unwrap_or(UNSET_YEAR);
    let max = result.max_year.as_deref().unwrap_or(UNSET_YEAR);
    let what = match extra_label {
        Some(label) => format!("total <b>{}</b> film permits", label),
        None => "total film permits".to_string(),
    };
    format!(
        "Between <b>{}&ndash;{}</b>\n    there were <b>{}</b> {}\n    issued in New York City.",
        min,
        max,
        nice_number(result.total),
        what
    )
}

/// Bar width in percent. Zero when there is nothing to divide by.
pub fn bar_percent(count: usize, denominator: usize, scale: f64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    count as f64 / denominator as f64 * scale
}

pub fn format_borough_bar(
    borough: &str,
    count: usize,
    denominator: usize,
    scale: f64,
    colour_index: usize,
) -> String {
    let percent = bar_percent(count, denominator, scale);
    format!(
        "<b>{}</b>\n        <span class=\"number\">{}</span>\n        <span class=\"bar color-{}\"\n              style=\"width:{}%;\"></span>",
        borough,
        nice_number(count),
        colour_index,
        percent
    )
}

/// One bar per borough, in first-seen order.
pub fn format_borough_bars(result: &AggregationResult, bars: BarScale) -> Vec<String> {
    let denominator = bars.denominator(result);
    result
        .boroughs
        .iter()
        .enumerate()
        .map(|(i, (borough, count))| {
            format_borough_bar(borough, count, denominator, bars.scale(), i)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Columns, YearTracking};
    use crate::parse::parse;

    #[test]
    fn test_nice_number_bands() {
        assert_eq!(nice_number(0), "0");
        assert_eq!(nice_number(123), "123");
        assert_eq!(nice_number(1234), "1,234");
        assert_eq!(nice_number(12345), "12,345");
        assert_eq!(nice_number(123456), "123,456");
        assert_eq!(nice_number(1234567), "1,234,567");
        assert_eq!(nice_number(123456789), "123,456,789");
        assert_eq!(nice_number(1234567890), "1234567890");
    }

    #[test]
    fn test_bar_percent() {
        assert_eq!(bar_percent(1, 2, 150.0), 75.0);
        assert_eq!(bar_percent(4, 4, 100.0), 100.0);
        assert_eq!(bar_percent(3, 0, 150.0), 0.0);
        // total-based bars run past 100
        assert!(bar_percent(9, 10, 150.0) > 100.0);
    }

    fn sample() -> AggregationResult {
        let records = parse(
            "Borough,EnteredOn,EventType\n\
             Manhattan,1/1/2016 x,Shooting Permit\n\
             Brooklyn,1/1/2014 x,Rigging Permit\n\
             Manhattan,1/1/2019 x,Shooting Permit\n\
             Manhattan,1/1/2018 x,Shooting Permit\n",
        );
        Columns::default().aggregate(&records, None, YearTracking::Sequential)
    }

    #[test]
    fn test_format_summary() {
        let res = sample();
        let s = format_summary(&res, None);
        assert!(s.starts_with("Between <b>2016&ndash;2019</b>"));
        assert!(s.contains("there were <b>4</b> total film permits"));

        let s = format_summary(&res, Some("Shooting Permit"));
        assert!(s.contains("<b>4</b> total <b>Shooting Permit</b> film permits"));
    }

    #[test]
    fn test_format_summary_unset_years() {
        let res = Columns::default().aggregate(&[], None, YearTracking::Sequential);
        let s = format_summary(&res, None);
        assert!(s.contains("undefined&ndash;undefined"));
        assert!(s.contains("<b>0</b>"));
    }

    #[test]
    fn test_format_borough_bars() {
        let res = sample();

        let bars = format_borough_bars(&res, BarScale::Total);
        assert_eq!(bars.len(), 2);
        assert!(bars[0].starts_with("<b>Manhattan</b>"));
        assert!(bars[0].contains("<span class=\"number\">3</span>"));
        assert!(bars[0].contains("color-0"));
        assert!(bars[0].contains("width:112.5%;"));
        assert!(bars[1].contains("color-1"));
        assert!(bars[1].contains("width:37.5%;"));

        let bars = format_borough_bars(&res, BarScale::LargestBorough);
        assert!(bars[0].contains("width:100%;"));
    }
}
