use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::field::Field;
use crate::models::domain::outcome::Outcome;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_type: Option<QuizType>,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_pages: Option<Vec<Outcome>>,
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizType {
    Knowledge,
    Outcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub primary_color: String,
    pub background_color: String,
}

impl Form {
    pub fn is_outcome_quiz(&self) -> bool {
        self.is_quiz && self.quiz_type == Some(QuizType::Outcome)
    }

    /// Fields that collect a value, skipping section headers and the submit
    /// button.
    pub fn input_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.kind.is_static())
    }

    pub fn max_possible_score(&self) -> i64 {
        crate::models::domain::field::max_possible_score(&self.fields)
    }
}
