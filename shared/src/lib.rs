use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassificationEntry {
    pub label: String,
    pub probability: f64,
}

/// Body of a successful `POST /upload`.
///
/// `acne` and `eczema` are placeholder scores, not measurements derived from
/// the image. They always sum to 100.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthReport {
    pub acne: f64,
    pub eczema: f64,
    pub model_top_classes: Vec<ClassificationEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ClassifierKind {
    #[strum(serialize = "mobilenet_v2")]
    MobileNetV2,
    Stub,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn health_report_uses_wire_field_names() {
        let report = HealthReport {
            acne: 81.25,
            eczema: 18.75,
            model_top_classes: vec![ClassificationEntry {
                label: "placeholder".into(),
                probability: 0.0,
            }],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["acne"], 81.25);
        assert_eq!(value["eczema"], 18.75);
        assert_eq!(value["model_top_classes"][0]["label"], "placeholder");
        assert_eq!(value["model_top_classes"][0]["probability"], 0.0);
    }

    #[test]
    fn classifier_kind_round_trips_through_its_name() {
        assert_eq!(ClassifierKind::MobileNetV2.to_string(), "mobilenet_v2");
        assert_eq!(ClassifierKind::from_str("stub").unwrap(), ClassifierKind::Stub);
    }
}
