// SPDX-License-Identifier: GPL-3.0-or-later

use crate::models::{PageSummary, Record};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Compute statistics over one page of records.
pub fn summarize(records: &[Record]) -> PageSummary {
    let num_works = records.iter().filter(|r| r.title.is_some()).count();

    // A missing maker counts as one more distinct value.
    let num_unique_makers = records
        .iter()
        .map(|r| r.maker.as_deref())
        .collect::<HashSet<_>>()
        .len();

    PageSummary {
        num_works,
        num_unique_makers,
        most_common_location: most_common_location(records),
        centuries: centuries(records.iter().map(|r| r.construction_date.as_str())),
        distinct_types: distinct_types(records),
    }
}

/// Most frequent non-empty location; ties go to the alphabetically first.
///
/// Locations are compared exactly as sent, so `"Paris "` and `"Paris"` count
/// separately.
pub fn most_common_location(records: &[Record]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let location = record.primary_location.as_str();
        if !location.is_empty() {
            *counts.entry(location).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(a_loc, a_count), (b_loc, b_count)| {
            a_count.cmp(b_count).then_with(|| b_loc.cmp(a_loc))
        })
        .map(|(location, _)| location.to_string())
}

/// Distinct centuries for the dates that are bare years.
///
/// Dates of five characters or more ("c.1850", "1850-1860") are ignored.
/// Shorter ones keep only their digits, so "45" and "c.45" both read as 45.
/// Only ASCII digits count; a year written in another script is skipped.
pub fn centuries<'a>(dates: impl IntoIterator<Item = &'a str>) -> Vec<i64> {
    dates
        .into_iter()
        .filter(|date| date.chars().count() < 5)
        .filter_map(|date| {
            let digits: String = date.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse::<i64>().ok()
        })
        .map(century_of)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Century a year falls in, counting 1..=100 as the first.
pub fn century_of(year: i64) -> i64 {
    1 + (year - 1).div_euclid(100)
}

fn distinct_types(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.object_type.as_str())
        .filter(|object_type| seen.insert(*object_type))
        .map(str::to_string)
        .collect()
}
