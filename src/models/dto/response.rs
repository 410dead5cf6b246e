use serde::Serialize;

use crate::models::domain::FieldKind;

#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAckResponse {
    pub ok: bool,
    pub id: String,
}

/// Everything the analytics dashboard needs for one form, recomputed in full
/// on every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummaryResponse {
    pub form_id: String,
    pub response_count: usize,
    pub fields: Vec<FieldSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<OutcomeCount>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(flatten)]
    pub data: FieldSummaryData,
}

/// Option order follows the field declaration, so these are lists rather
/// than maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldSummaryData {
    Counts {
        counts: Vec<OptionCount>,
    },
    Grid {
        rows: Vec<GridRowCounts>,
    },
    #[serde(rename_all = "camelCase")]
    Average {
        average: Option<f64>,
        sample_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Texts {
        values: Vec<String>,
        total_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRowCounts {
    pub row: String,
    pub counts: Vec<OptionCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCount {
    pub outcome_id: String,
    pub title: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_summary_flattens_its_data() {
        let summary = FieldSummary {
            name: "q1".to_string(),
            label: "Pick one".to_string(),
            kind: FieldKind::Radio,
            data: FieldSummaryData::Counts {
                counts: vec![
                    OptionCount {
                        option: "A".to_string(),
                        count: 2,
                    },
                    OptionCount {
                        option: "B".to_string(),
                        count: 0,
                    },
                ],
            },
        };

        let json = serde_json::to_value(&summary).expect("summary should serialize");
        assert_eq!(json["type"], "radio");
        assert_eq!(json["counts"][0]["option"], "A");
        assert_eq!(json["counts"][1]["count"], 0);
    }

    #[test]
    fn average_summary_serializes_null_when_empty() {
        let summary = FieldSummary {
            name: "rating".to_string(),
            label: "Rate us".to_string(),
            kind: FieldKind::Range,
            data: FieldSummaryData::Average {
                average: None,
                sample_count: 0,
            },
        };

        let json = serde_json::to_value(&summary).expect("summary should serialize");
        assert!(json["average"].is_null());
        assert_eq!(json["sampleCount"], 0);
    }
}
