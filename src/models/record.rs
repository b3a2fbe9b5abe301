use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// One of the six measured columns of a usage record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::A,
        Feature::B,
        Feature::C,
        Feature::D,
        Feature::E,
        Feature::F,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::A => "A",
            Feature::B => "B",
            Feature::C => "C",
            Feature::D => "D",
            Feature::E => "E",
            Feature::F => "F",
        }
    }

    /// Read this feature's value from a record
    pub fn value_of(&self, record: &UsageRecord) -> f64 {
        match self {
            Feature::A => record.a,
            Feature::B => record.b,
            Feature::C => record.c,
            Feature::D => record.d,
            Feature::E => record.e,
            Feature::F => record.f,
        }
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|feature| feature.name() == s)
            .ok_or_else(|| format!("unknown feature '{}', expected one of A, B, C, D, E, F", s))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single subject's measurements for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "F")]
    pub f: f64,
}

/// A usage record together with its store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub record: UsageRecord,
}
