use crate::models::record::Feature;
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Optional filters shared by the aggregate endpoints
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterQuery {
    pub age: Option<String>,
    pub gender: Option<String>,
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
}

/// Body of POST /users and POST /auth
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Sum of every feature over the matching records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTotals {
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

impl FeatureTotals {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::A => self.a,
            Feature::B => self.b,
            Feature::C => self.c,
            Feature::D => self.d,
            Feature::E => self.e,
            Feature::F => self.f,
        }
    }

    pub fn add(&mut self, feature: Feature, value: f64) {
        let slot = match feature {
            Feature::A => &mut self.a,
            Feature::B => &mut self.b,
            Feature::C => &mut self.c,
            Feature::D => &mut self.d,
            Feature::E => &mut self.e,
            Feature::F => &mut self.f,
        };
        *slot += value;
    }
}

/// One day of a feature trend, serialized as `{"day": ..., "<feature>": sum}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub feature: Feature,
    pub value: f64,
}

impl Serialize for TrendPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("day", &self.day)?;
        map.serialize_entry(self.feature.name(), &self.value)?;
        map.end()
    }
}
