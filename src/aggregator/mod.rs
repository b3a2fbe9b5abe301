// Aggregate queries over the usage record collection

pub mod filter;

use crate::models::api::{FeatureTotals, TrendPoint};
use crate::models::record::Feature;
use crate::stores::record_store::RecordStore;
use chrono::NaiveDate;
use filter::RecordFilter;
use std::collections::BTreeMap;

/// Sum every feature across the records accepted by `filter`.
///
/// No matching records yields all-zero totals.
pub fn total_sum(store: &RecordStore, filter: &RecordFilter) -> FeatureTotals {
    store
        .scan(|record| filter.matches(record))
        .iter()
        .fold(FeatureTotals::default(), |mut totals, record| {
            for feature in Feature::ALL {
                totals.add(feature, feature.value_of(record));
            }
            totals
        })
}

/// Per-day sums of one feature, ascending by day, one point per distinct day
pub fn feature_trend(store: &RecordStore, feature: Feature, filter: &RecordFilter) -> Vec<TrendPoint> {
    let by_day = store
        .scan(|record| filter.matches(record))
        .iter()
        .fold(BTreeMap::<NaiveDate, f64>::new(), |mut by_day, record| {
            *by_day.entry(record.day).or_default() += feature.value_of(record);
            by_day
        });

    by_day
        .into_iter()
        .map(|(day, value)| TrendPoint { day, feature, value })
        .collect()
}
