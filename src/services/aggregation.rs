use serde_json::Value;

use crate::models::domain::{Field, FieldKind, Form, FormResponse};
use crate::models::dto::response::{
    FieldSummary, FieldSummaryData, FormSummaryResponse, GridRowCounts, OptionCount, OutcomeCount,
};
use crate::services::scoring::score_submission;

/// Free-text answers shown in a summary are capped at this many samples.
const TEXT_SAMPLE_CAP: usize = 50;

/// Builds the full analytics view for one form. Stateless, recomputed from
/// scratch on every call.
pub fn summarize(form: &Form, responses: &[FormResponse]) -> FormSummaryResponse {
    FormSummaryResponse {
        form_id: form.id.clone(),
        response_count: responses.len(),
        fields: aggregate(form, responses),
        outcomes: if form.is_outcome_quiz() {
            Some(outcome_distribution(form, responses))
        } else {
            None
        },
    }
}

/// Per-field rollup over every stored response. Section headers and the
/// submit button carry no answers and are skipped.
///
/// Payloads must already be in canonical shape, with grid answers as an
/// object keyed by row label.
pub fn aggregate(form: &Form, responses: &[FormResponse]) -> Vec<FieldSummary> {
    form.input_fields()
        .map(|field| FieldSummary {
            name: field.name.clone(),
            label: field.label.clone(),
            kind: field.kind,
            data: field_data(field, responses),
        })
        .collect()
}

fn field_data(field: &Field, responses: &[FormResponse]) -> FieldSummaryData {
    match field.kind {
        FieldKind::Radio | FieldKind::Select => {
            let mut counter =
                Counter::seeded(field.options.as_deref().unwrap_or(&[]).iter().map(String::as_str));
            for response in responses {
                let selected = response
                    .payload
                    .get(&field.name)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                if let Some(selected) = selected {
                    counter.bump(selected);
                }
            }
            FieldSummaryData::Counts {
                counts: counter.into_counts(),
            }
        }
        FieldKind::Checkbox => {
            let mut counter =
                Counter::seeded(field.options.as_deref().unwrap_or(&[]).iter().map(String::as_str));
            for response in responses {
                for selected in selections(response.payload.get(&field.name)) {
                    counter.bump(selected);
                }
            }
            FieldSummaryData::Counts {
                counts: counter.into_counts(),
            }
        }
        FieldKind::RadioGrid => {
            let columns = field.columns.as_deref().unwrap_or(&[]);
            let mut rows: Vec<(String, Counter)> = field
                .rows
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(|row| {
                    (
                        row.clone(),
                        Counter::seeded(columns.iter().map(|c| c.label.as_str())),
                    )
                })
                .collect();

            for response in responses {
                let Some(answers) = response.payload.get(&field.name).and_then(Value::as_object)
                else {
                    continue;
                };
                for (row, counter) in rows.iter_mut() {
                    if let Some(column) = answers.get(row).and_then(Value::as_str) {
                        counter.bump(column);
                    }
                }
            }

            FieldSummaryData::Grid {
                rows: rows
                    .into_iter()
                    .map(|(row, counter)| GridRowCounts {
                        row,
                        counts: counter.into_counts(),
                    })
                    .collect(),
            }
        }
        FieldKind::Range => {
            let mut sum = 0.0;
            let mut sample_count = 0usize;
            for response in responses {
                if let Some(sample) = numeric_value(response.payload.get(&field.name)) {
                    sum += sample;
                    sample_count += 1;
                }
            }
            FieldSummaryData::Average {
                average: (sample_count > 0).then(|| sum / sample_count as f64),
                sample_count,
            }
        }
        _ => {
            let mut values = Vec::new();
            let mut total_count = 0usize;
            for response in responses {
                if let Some(text) = text_value(response.payload.get(&field.name)) {
                    total_count += 1;
                    if values.len() < TEXT_SAMPLE_CAP {
                        values.push(text);
                    }
                }
            }
            FieldSummaryData::Texts {
                values,
                total_count,
            }
        }
    }
}

/// Submissions per result page, declared pages first. Identifiers that the
/// scoring rules produced but no page declares are appended at the end.
fn outcome_distribution(form: &Form, responses: &[FormResponse]) -> Vec<OutcomeCount> {
    let pages = form.result_pages.as_deref().unwrap_or(&[]);
    let mut counts: Vec<OutcomeCount> = pages
        .iter()
        .map(|page| OutcomeCount {
            outcome_id: page.outcome_id.clone(),
            title: page.title.clone(),
            count: 0,
        })
        .collect();

    for response in responses {
        let Some(id) = score_submission(form, &response.payload).outcome_id else {
            continue;
        };
        if let Some(entry) = counts.iter_mut().find(|c| c.outcome_id == id) {
            entry.count += 1;
        } else {
            counts.push(OutcomeCount {
                outcome_id: id.clone(),
                title: id,
                count: 1,
            });
        }
    }
    counts
}

/// Ordered option counts, seeded at zero so undeclared answers append after
/// every declared option.
struct Counter(Vec<OptionCount>);

impl Counter {
    fn seeded<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        Counter(
            labels
                .map(|label| OptionCount {
                    option: label.to_string(),
                    count: 0,
                })
                .collect(),
        )
    }

    fn bump(&mut self, label: &str) {
        if let Some(entry) = self.0.iter_mut().find(|c| c.option == label) {
            entry.count += 1;
        } else {
            self.0.push(OptionCount {
                option: label.to_string(),
                count: 1,
            });
        }
    }

    fn into_counts(self) -> Vec<OptionCount> {
        self.0
    }
}

fn selections(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.as_str()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn numeric_value(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{
        GridColumn, Outcome, QuizType, ScoreRange, ScoringRule, Theme,
    };
    use crate::services::payload;
    use serde_json::{json, Map};

    fn base_field(name: &str, kind: FieldKind) -> Field {
        Field {
            label: name.to_string(),
            name: name.to_string(),
            kind,
            placeholder: None,
            helper_text: None,
            validation: None,
            options: None,
            rows: None,
            columns: None,
            correct_answer: None,
            points: None,
            scoring: None,
        }
    }

    fn option_field(name: &str, kind: FieldKind, options: &[&str]) -> Field {
        let mut field = base_field(name, kind);
        field.options = Some(options.iter().map(|o| o.to_string()).collect());
        field
    }

    fn form(fields: Vec<Field>) -> Form {
        Form {
            id: "form-1".to_string(),
            owner_id: "owner-1".to_string(),
            title: "Survey".to_string(),
            description: None,
            is_quiz: false,
            quiz_type: None,
            fields,
            result_pages: None,
            theme: Theme {
                name: "Indigo".to_string(),
                primary_color: "#4F46E5".to_string(),
                background_color: "#EEF2FF".to_string(),
            },
            ai_summary: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn response(form_id: &str, payload: serde_json::Value) -> FormResponse {
        let Value::Object(map) = payload else {
            panic!("expected object payload");
        };
        FormResponse::new(form_id, map, None, None, None, None)
    }

    fn counts_of(summary: &FieldSummary) -> &[OptionCount] {
        match &summary.data {
            FieldSummaryData::Counts { counts } => counts,
            other => panic!("expected counts, got {other:?}"),
        }
    }

    #[test]
    fn radio_counts_cover_declared_options_and_sum_to_answers() {
        let form = form(vec![option_field("q1", FieldKind::Radio, &["A", "B"])]);
        let responses = vec![
            response("form-1", json!({"q1": "A"})),
            response("form-1", json!({"q1": "A"})),
            response("form-1", json!({"q1": "C"})),
            response("form-1", json!({"q1": ""})),
            response("form-1", json!({})),
        ];

        let summaries = aggregate(&form, &responses);
        let counts = counts_of(&summaries[0]);

        assert_eq!(counts[0], OptionCount { option: "A".to_string(), count: 2 });
        assert_eq!(counts[1], OptionCount { option: "B".to_string(), count: 0 });
        assert_eq!(counts[2], OptionCount { option: "C".to_string(), count: 1 });

        // Three responses supplied a non-empty value; the counts sum to three.
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn checkbox_counts_one_pair_per_selection() {
        let form = form(vec![option_field("langs", FieldKind::Checkbox, &["Rust", "Go", "C"])]);
        let responses = vec![
            response("form-1", json!({"langs": ["Rust", "Go"]})),
            response("form-1", json!({"langs": ["Rust"]})),
            response("form-1", json!({"langs": "C"})),
        ];

        let summaries = aggregate(&form, &responses);
        let counts = counts_of(&summaries[0]);

        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 1);
        assert_eq!(counts[2].count, 1);

        // Four (response, selection) pairs in total across three responses.
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 4);
        assert!(total >= responses.len());
    }

    #[test]
    fn grid_counts_match_across_payload_encodings() {
        let mut grid = base_field("grid", FieldKind::RadioGrid);
        grid.rows = Some(vec!["Speed".to_string()]);
        grid.columns = Some(vec![
            GridColumn { label: "Poor".to_string(), points: 0 },
            GridColumn { label: "Good".to_string(), points: 2 },
        ]);
        let form = form(vec![grid]);

        // One legacy bracket submission and one nested submission, both
        // selecting the same column, exactly as stored payloads reach the
        // aggregator after the read-side rewrite.
        let legacy = payload::canonicalize(
            &form.fields,
            Map::from_iter([("grid[0]".to_string(), json!("Good"))]),
        );
        let nested = payload::canonicalize(
            &form.fields,
            Map::from_iter([("grid".to_string(), json!({"Speed": "Good"}))]),
        );
        let responses = vec![
            FormResponse::new("form-1", legacy, None, None, None, None),
            FormResponse::new("form-1", nested, None, None, None, None),
        ];

        let summaries = aggregate(&form, &responses);
        let FieldSummaryData::Grid { rows } = &summaries[0].data else {
            panic!("expected grid data");
        };

        assert_eq!(rows[0].row, "Speed");
        assert_eq!(rows[0].counts[0], OptionCount { option: "Poor".to_string(), count: 0 });
        assert_eq!(rows[0].counts[1], OptionCount { option: "Good".to_string(), count: 2 });
    }

    #[test]
    fn range_average_ignores_unusable_values() {
        let form = form(vec![base_field("rating", FieldKind::Range)]);
        let responses = vec![
            response("form-1", json!({"rating": 4})),
            response("form-1", json!({"rating": "2"})),
            response("form-1", json!({"rating": "abc"})),
            response("form-1", json!({"rating": null})),
            response("form-1", json!({})),
        ];

        let summaries = aggregate(&form, &responses);
        let FieldSummaryData::Average { average, sample_count } = &summaries[0].data else {
            panic!("expected average data");
        };

        assert_eq!(*sample_count, 2);
        assert_eq!(*average, Some(3.0));
    }

    #[test]
    fn range_average_is_null_without_samples() {
        let form = form(vec![base_field("rating", FieldKind::Range)]);

        let summaries = aggregate(&form, &[]);
        let FieldSummaryData::Average { average, sample_count } = &summaries[0].data else {
            panic!("expected average data");
        };

        assert_eq!(*average, None);
        assert_eq!(*sample_count, 0);
    }

    #[test]
    fn text_answers_are_capped_but_fully_counted() {
        let form = form(vec![base_field("feedback", FieldKind::Textarea)]);
        let mut responses: Vec<FormResponse> = (0..60)
            .map(|i| response("form-1", json!({"feedback": format!("note {i}")})))
            .collect();
        responses.push(response("form-1", json!({"feedback": ""})));
        responses.push(response("form-1", json!({"feedback": null})));

        let summaries = aggregate(&form, &responses);
        let FieldSummaryData::Texts { values, total_count } = &summaries[0].data else {
            panic!("expected text data");
        };

        assert_eq!(values.len(), TEXT_SAMPLE_CAP);
        assert_eq!(*total_count, 60);
    }

    #[test]
    fn static_fields_are_excluded_from_summaries() {
        let form = form(vec![
            base_field("intro", FieldKind::Section),
            option_field("q1", FieldKind::Radio, &["A"]),
            base_field("submit", FieldKind::Submit),
        ]);

        let summaries = aggregate(&form, &[]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "q1");
    }

    #[test]
    fn outcome_quiz_summaries_tally_result_pages() {
        let mut q1 = option_field("q1", FieldKind::Radio, &["Early", "Late"]);
        q1.scoring = Some(vec![
            ScoringRule {
                option: Some("Early".to_string()),
                column: None,
                points: 2,
                outcome_id: Some("lark".to_string()),
            },
            ScoringRule {
                option: Some("Late".to_string()),
                column: None,
                points: 0,
                outcome_id: Some("owl".to_string()),
            },
        ]);
        let mut quiz = form(vec![q1]);
        quiz.is_quiz = true;
        quiz.quiz_type = Some(QuizType::Outcome);
        quiz.result_pages = Some(vec![
            Outcome {
                outcome_id: "owl".to_string(),
                title: "Night owl".to_string(),
                description: String::new(),
                score_range: ScoreRange { from: 0, to: 1 },
            },
            Outcome {
                outcome_id: "lark".to_string(),
                title: "Early bird".to_string(),
                description: String::new(),
                score_range: ScoreRange { from: 2, to: 2 },
            },
        ]);

        let responses = vec![
            response("form-1", json!({"q1": "Early"})),
            response("form-1", json!({"q1": "Early"})),
            response("form-1", json!({"q1": "Late"})),
        ];

        let summary = summarize(&quiz, &responses);
        assert_eq!(summary.response_count, 3);
        let outcomes = summary.outcomes.expect("outcome quiz should tally pages");
        assert_eq!(outcomes[0].outcome_id, "owl");
        assert_eq!(outcomes[0].count, 1);
        assert_eq!(outcomes[1].outcome_id, "lark");
        assert_eq!(outcomes[1].count, 2);
    }

    #[test]
    fn plain_forms_have_no_outcome_section() {
        let form = form(vec![option_field("q1", FieldKind::Radio, &["A", "B"])]);
        let responses = vec![
            response("form-1", json!({"q1": "A"})),
            response("form-1", json!({"q1": "A"})),
        ];

        let summary = summarize(&form, &responses);
        assert!(summary.outcomes.is_none());

        // The canonical two-response example: A twice, B never.
        let counts = counts_of(&summary.fields[0]);
        assert_eq!(counts[0], OptionCount { option: "A".to_string(), count: 2 });
        assert_eq!(counts[1], OptionCount { option: "B".to_string(), count: 0 });
    }
}
