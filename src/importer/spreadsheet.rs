use crate::core::error::ImportError;
use crate::models::record::{Gender, UsageRecord};
use crate::utils::time::{parse_query_date, serial_to_date};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// Open a workbook and return its first sheet
pub fn read_first_sheet(path: &Path) -> Result<Range<Data>, ImportError> {
    let open_error = |source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(open_error)?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::NoSheet(path.to_path_buf()))?
        .map_err(open_error)
}

/// Positions of the known columns in the header row
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnIndex {
    day: usize,
    age: usize,
    gender: Option<usize>,
    features: [usize; 6],
}

const FEATURE_COLUMNS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

static EMPTY_CELL: Data = Data::Empty;

impl ColumnIndex {
    pub fn from_header(header: &[Data]) -> Result<Self, ImportError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
        };
        let require = |name: &'static str| find(name).ok_or(ImportError::MissingColumn(name));

        let mut features = [0usize; 6];
        for (slot, name) in features.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = require(name)?;
        }

        Ok(Self {
            day: require("Day")?,
            age: require("Age")?,
            gender: find("Gender"),
            features,
        })
    }

    /// Convert one data row. `row_num` is the 1-based sheet row, for messages.
    pub fn record(&self, row: &[Data], row_num: usize) -> Result<UsageRecord, ImportError> {
        let invalid = |reason: String| ImportError::InvalidRow {
            row: row_num,
            reason,
        };
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);

        let day = cell_date(cell(self.day)).ok_or_else(|| invalid("missing or invalid Day".to_string()))?;
        let age = cell_text(cell(self.age)).ok_or_else(|| invalid("missing Age".to_string()))?;

        let gender = match self.gender.map(cell).and_then(cell_text) {
            Some(label) => Some(label.parse::<Gender>().map_err(invalid)?),
            None => None,
        };

        let mut values = [0f64; 6];
        for ((value, idx), name) in values.iter_mut().zip(self.features).zip(FEATURE_COLUMNS) {
            *value = cell_number(cell(idx))
                .ok_or_else(|| invalid(format!("missing or non-numeric {}", name)))?;
            if *value < 0.0 {
                return Err(invalid(format!("negative value for {}", name)));
            }
        }
        let [a, b, c, d, e, f] = values;

        Ok(UsageRecord {
            day,
            age,
            gender,
            a,
            b,
            c,
            d,
            e,
            f,
        })
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::DateTime(dt) => Some(dt.as_f64()),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn cell_date(cell: &Data) -> Option<chrono::NaiveDate> {
    match cell {
        Data::DateTimeIso(s) => parse_query_date(s),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serial_to_date)
            .or_else(|| parse_query_date(s)),
        other => cell_number(other).and_then(serial_to_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn header() -> Vec<Data> {
        ["Day", "Age", "Gender", "A", "B", "C", "D", "E", "F"]
            .into_iter()
            .map(text)
            .collect()
    }

    fn row(day: Data, age: &str, gender: &str) -> Vec<Data> {
        let mut row = vec![day, text(age), text(gender)];
        row.extend([1, 2, 3, 4, 5, 6].into_iter().map(Data::Int));
        row
    }

    #[test]
    fn test_header_mapping() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        assert_eq!(columns.day, 0);
        assert_eq!(columns.gender, Some(2));
        assert_eq!(columns.features, [3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_header_in_any_order() {
        let mut header = header();
        header.reverse();
        let columns = ColumnIndex::from_header(&header).unwrap();
        assert_eq!(columns.day, 8);
        assert_eq!(columns.features[0], 5);
    }

    #[test]
    fn test_header_missing_feature() {
        let mut header = header();
        header.pop();
        assert!(matches!(
            ColumnIndex::from_header(&header),
            Err(ImportError::MissingColumn("F"))
        ));
    }

    #[test]
    fn test_serial_day_conversion() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        let record = columns.record(&row(Data::Float(44000.0), "15-25", "Male"), 2).unwrap();

        assert_eq!(record.day, NaiveDate::from_ymd_opt(2020, 6, 18).unwrap());
        assert_eq!(record.age, "15-25");
        assert_eq!(record.gender, Some(Gender::Male));
        assert_eq!((record.a, record.f), (1.0, 6.0));
    }

    #[test]
    fn test_integer_serial_and_blank_gender() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        let record = columns.record(&row(Data::Int(44838), ">25", ""), 3).unwrap();

        assert_eq!(record.day, NaiveDate::from_ymd_opt(2022, 10, 4).unwrap());
        assert_eq!(record.gender, None);
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        let err = columns.record(&row(Data::Int(44839), ">25", "Other"), 7).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 7, .. }));
    }

    #[test]
    fn test_missing_feature_value_rejected() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        let mut data = row(Data::Int(44839), ">25", "Male");
        data[5] = Data::Empty;
        let err = columns.record(&data, 4).unwrap_err();
        assert!(err.to_string().contains("non-numeric C"));
    }

    #[test]
    fn test_negative_feature_value_rejected() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        let mut data = row(Data::Int(44839), ">25", "Male");
        data[3] = Data::Float(-1.0);
        assert!(columns.record(&data, 4).is_err());
    }

    #[test]
    fn test_short_row_rejected() {
        let columns = ColumnIndex::from_header(&header()).unwrap();
        let data = vec![Data::Int(44839), text(">25")];
        assert!(columns.record(&data, 9).is_err());
    }
}
