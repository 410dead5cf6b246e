use serde_json::{Map, Value};

use crate::models::domain::{CorrectAnswer, Field, FieldKind, Form, ScoringRule};

/// Point total and the outcome bucket one submission lands in.
///
/// `outcome_id` is only populated for outcome quizzes and may name an
/// identifier that no configured result page declares, when misconfigured
/// scoring rules point somewhere unexpected.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubmission {
    pub score: i64,
    pub max_score: i64,
    pub outcome_id: Option<String>,
}

/// Scores one submission payload against the form's rules.
///
/// Expects the canonical payload shape, so grid answers must already be an
/// object keyed by row label. Outcome selection goes by score range first;
/// when no range contains the total the outcome with the highest accumulated
/// rule points wins, earlier declared outcomes breaking ties.
pub fn score_submission(form: &Form, payload: &Map<String, Value>) -> ScoredSubmission {
    let mut tally = OutcomeTally::default();
    let mut score = 0;
    for field in form.input_fields() {
        score += field_score(field, payload.get(&field.name), &mut tally);
    }

    ScoredSubmission {
        score,
        max_score: form.max_possible_score(),
        outcome_id: pick_outcome(form, score, &tally),
    }
}

/// Points awarded per outcome identifier, in first-encountered order.
#[derive(Debug, Default)]
struct OutcomeTally(Vec<(String, i64)>);

impl OutcomeTally {
    fn add(&mut self, rule: &ScoringRule) {
        let Some(id) = rule.outcome_id.as_deref() else {
            return;
        };
        if let Some(entry) = self.0.iter_mut().find(|(key, _)| key == id) {
            entry.1 += rule.points;
        } else {
            self.0.push((id.to_string(), rule.points));
        }
    }
}

fn field_score(field: &Field, value: Option<&Value>, tally: &mut OutcomeTally) -> i64 {
    let Some(value) = value else {
        return 0;
    };

    match field.kind {
        FieldKind::Radio | FieldKind::Select => match value.as_str().filter(|s| !s.is_empty()) {
            Some(selected) => single_choice_points(field, selected, tally),
            None => 0,
        },
        FieldKind::Checkbox => {
            let selected = string_list(value);
            if selected.is_empty() {
                return 0;
            }
            if field.scoring.is_some() {
                selected
                    .iter()
                    .map(|s| single_choice_points(field, s, tally))
                    .sum()
            } else if let Some(answer) = &field.correct_answer {
                // All-or-nothing: the selection must match the answer set exactly.
                if matches_exactly(answer, &selected) {
                    field.points.unwrap_or(1)
                } else {
                    0
                }
            } else {
                0
            }
        }
        FieldKind::RadioGrid => {
            let Some(rows) = value.as_object() else {
                return 0;
            };
            let mut points = 0;
            for column in rows.values().filter_map(Value::as_str) {
                if let Some(rule) = field.scoring_rule_for(column) {
                    tally.add(rule);
                }
                points += field.column_points(column);
            }
            points
        }
        _ => 0,
    }
}

fn single_choice_points(field: &Field, selected: &str, tally: &mut OutcomeTally) -> i64 {
    // Declared rules are authoritative: an option they do not mention earns
    // nothing. The correct-answer path only applies to rule-less fields.
    if field.scoring.is_some() {
        if let Some(rule) = field.scoring_rule_for(selected) {
            tally.add(rule);
            return rule.points;
        }
        return 0;
    }
    match &field.correct_answer {
        Some(answer) if answer.contains(selected) => field.points.unwrap_or(1),
        _ => 0,
    }
}

fn string_list(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.as_str()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn matches_exactly(answer: &CorrectAnswer, selected: &[&str]) -> bool {
    let expected: Vec<&str> = match answer {
        CorrectAnswer::One(s) => vec![s.as_str()],
        CorrectAnswer::Many(list) => list.iter().map(String::as_str).collect(),
    };
    expected.len() == selected.len() && expected.iter().all(|e| selected.contains(e))
}

fn pick_outcome(form: &Form, score: i64, tally: &OutcomeTally) -> Option<String> {
    if !form.is_outcome_quiz() {
        return None;
    }
    let pages = form.result_pages.as_deref().unwrap_or(&[]);
    if let Some(page) = pages.iter().find(|p| p.score_range.contains(score)) {
        return Some(page.outcome_id.clone());
    }

    // No range matched, so the ranges are misconfigured for this total. Fall
    // back to the outcome that gathered the most rule points, declared
    // outcomes first so ties resolve deterministically.
    let mut ordered: Vec<&(String, i64)> = pages
        .iter()
        .filter_map(|page| tally.0.iter().find(|(id, _)| *id == page.outcome_id))
        .collect();
    for entry in &tally.0 {
        if !pages.iter().any(|p| p.outcome_id == entry.0) {
            ordered.push(entry);
        }
    }

    let mut best: Option<&(String, i64)> = None;
    for entry in ordered {
        if best.map_or(true, |b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.map(|(id, _)| id.clone())
}
