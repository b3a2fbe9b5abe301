use crate::core::error::ApiError;
use crate::models::api::FilterQuery;
use crate::models::record::UsageRecord;
use crate::utils::time::parse_query_date;
use chrono::NaiveDate;

/// One match stage of an aggregation
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    AgeEquals(String),
    GenderEquals(String),
    /// Inclusive on both ends
    DayBetween { from: NaiveDate, to: NaiveDate },
}

impl Filter {
    pub fn matches(&self, record: &UsageRecord) -> bool {
        match self {
            Filter::AgeEquals(age) => record.age == *age,
            Filter::GenderEquals(gender) => {
                record.gender.map(|g| g.as_str()) == Some(gender.as_str())
            }
            Filter::DayBetween { from, to } => *from <= record.day && record.day <= *to,
        }
    }
}

/// Ordered match stages, ANDed together. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    stages: Vec<Filter>,
}

impl RecordFilter {
    /// Build the stages in order age, gender, date range.
    ///
    /// Blank parameters count as absent. The date range only applies when both
    /// bounds are given.
    pub fn from_query(query: &FilterQuery) -> Result<Self, ApiError> {
        let age = present(&query.age).map(|age| Filter::AgeEquals(age.to_string()));
        let gender = present(&query.gender).map(|g| Filter::GenderEquals(g.to_string()));

        let range = match (present(&query.from_date), present(&query.to_date)) {
            (Some(from), Some(to)) => Some(Filter::DayBetween {
                from: parse_bound("fromDate", from)?,
                to: parse_bound("toDate", to)?,
            }),
            _ => None,
        };

        Ok(Self {
            stages: [age, gender, range].into_iter().flatten().collect(),
        })
    }

    pub fn stages(&self) -> &[Filter] {
        &self.stages
    }

    pub fn matches(&self, record: &UsageRecord) -> bool {
        self.stages.iter().all(|stage| stage.matches(record))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    parse_query_date(value)
        .ok_or_else(|| ApiError::InvalidArgument(format!("Invalid {}: '{}'", name, value)))
}
