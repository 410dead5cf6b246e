use crate::models::domain::{
    Field, FieldKind, Form, FormResponse, GridColumn, Outcome, QuizType, ScoreRange, ScoringRule,
    Theme,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use serde_json::{Map, Value};

    pub fn field(name: &str, kind: FieldKind) -> Field {
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

    pub fn radio_field(name: &str, options: &[&str]) -> Field {
        let mut f = field(name, FieldKind::Radio);
        f.options = Some(options.iter().map(|o| o.to_string()).collect());
        f
    }

    pub fn grid_field(name: &str, rows: &[&str], columns: &[(&str, i64)]) -> Field {
        let mut f = field(name, FieldKind::RadioGrid);
        f.rows = Some(rows.iter().map(|r| r.to_string()).collect());
        f.columns = Some(
            columns
                .iter()
                .map(|(label, points)| GridColumn {
                    label: label.to_string(),
                    points: *points,
                })
                .collect(),
        );
        f
    }

    pub fn submit_field() -> Field {
        let mut f = field("submit", FieldKind::Submit);
        f.label = "Submit".to_string();
        f
    }

    pub fn scoring_rule(option: &str, points: i64, outcome_id: &str) -> ScoringRule {
        ScoringRule {
            option: Some(option.to_string()),
            column: None,
            points,
            outcome_id: Some(outcome_id.to_string()),
        }
    }

    pub fn outcome(id: &str, from: i64, to: i64) -> Outcome {
        Outcome {
            outcome_id: id.to_string(),
            title: format!("Outcome {id}"),
            description: "A result page".to_string(),
            score_range: ScoreRange { from, to },
        }
    }

    pub fn indigo_theme() -> Theme {
        Theme {
            name: "Indigo".to_string(),
            primary_color: "#4F46E5".to_string(),
            background_color: "#EEF2FF".to_string(),
        }
    }

    /// A plain feedback form: one radio, one textarea, one submit.
    pub fn sample_form() -> Form {
        Form {
            id: "form-1".to_string(),
            owner_id: "owner-1".to_string(),
            title: "Customer feedback".to_string(),
            description: Some("Tell us how we did".to_string()),
            is_quiz: false,
            quiz_type: None,
            fields: vec![
                radio_field("rating_choice", &["Great", "Okay", "Poor"]),
                field("comments", FieldKind::Textarea),
                submit_field(),
            ],
            result_pages: None,
            theme: indigo_theme(),
            ai_summary: None,
            created_at: Some(chrono::Utc::now()),
            updated_at: Some(chrono::Utc::now()),
        }
    }

    /// A two-question outcome quiz whose ranges cover 0..=4.
    pub fn outcome_quiz() -> Form {
        let mut q1 = radio_field("q1", &["Early", "Late"]);
        q1.scoring = Some(vec![scoring_rule("Early", 2, "lark"), scoring_rule("Late", 0, "owl")]);
        let mut q2 = radio_field("q2", &["Yes", "No"]);
        q2.scoring = Some(vec![scoring_rule("Yes", 2, "lark"), scoring_rule("No", 0, "owl")]);

        let mut form = sample_form();
        form.id = "quiz-1".to_string();
        form.title = "Morning person quiz".to_string();
        form.is_quiz = true;
        form.quiz_type = Some(QuizType::Outcome);
        form.fields = vec![q1, q2, submit_field()];
        form.result_pages = Some(vec![outcome("owl", 0, 1), outcome("lark", 2, 4)]);
        form
    }

    pub fn response_with(form_id: &str, payload: Value) -> FormResponse {
        let map = match payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        FormResponse::new(form_id, map, None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::FieldKind;

    #[test]
    fn test_fixtures_sample_form() {
        let form = sample_form();
        assert_eq!(form.fields.len(), 3);
        assert_eq!(form.fields.last().map(|f| f.kind), Some(FieldKind::Submit));
        assert!(!form.is_quiz);
    }

    #[test]
    fn test_fixtures_outcome_quiz_ranges_cover_max_score() {
        let quiz = outcome_quiz();
        assert_eq!(quiz.max_possible_score(), 4);
        let pages = quiz.result_pages.as_deref().expect("quiz has result pages");
        assert_eq!(pages.last().map(|p| p.score_range.to), Some(4));
    }

    #[test]
    fn test_fixtures_response_with_wraps_non_object_payloads() {
        let response = response_with("form-1", serde_json::json!("loose"));
        assert!(response.payload.contains_key("value"));
    }
}
