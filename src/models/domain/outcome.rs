use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One named result bucket for outcome-style quizzes, selected by the
/// submitter's cumulative point total.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub outcome_id: String,
    pub title: String,
    pub description: String,
    pub score_range: ScoreRange,
}

/// Inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRange {
    pub from: i64,
    pub to: i64,
}

impl ScoreRange {
    pub fn contains(&self, score: i64) -> bool {
        score >= self.from && score <= self.to
    }
}

/// Checks that outcome ranges partition `0..=total_possible_score`: declared
/// ascending, starting at 0, each range beginning where the previous ended,
/// with no gaps or overlaps.
pub fn validate_outcome_ranges(outcomes: &[Outcome], total_possible_score: i64) -> Result<(), String> {
    if outcomes.is_empty() {
        return Err("an outcome quiz needs at least one result page".to_string());
    }

    let first = &outcomes[0].score_range;
    if first.from != 0 {
        return Err(format!(
            "the first score range must start at 0, found {}",
            first.from
        ));
    }

    let mut previous_to: Option<i64> = None;
    for outcome in outcomes {
        let range = &outcome.score_range;
        if range.from > range.to {
            return Err(format!(
                "outcome '{}' has an inverted score range {}..{}",
                outcome.outcome_id, range.from, range.to
            ));
        }
        if let Some(prev) = previous_to {
            if range.from != prev + 1 {
                return Err(format!(
                    "outcome '{}' must start at {} to continue the previous range, found {}",
                    outcome.outcome_id,
                    prev + 1,
                    range.from
                ));
            }
        }
        previous_to = Some(range.to);
    }

    let last_to = previous_to.unwrap_or(0);
    if last_to != total_possible_score {
        return Err(format!(
            "score ranges end at {} but the maximum achievable score is {}",
            last_to, total_possible_score
        ));
    }

    Ok(())
}
