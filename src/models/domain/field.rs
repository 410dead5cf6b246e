use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One typed input unit within a form. The JSON key for the kind is `type`,
/// matching what the builder UI and the model both emit.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub label: String,
    pub name: String, // unique snake_case identifier within the form
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<GridColumn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<CorrectAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<Vec<ScoringRule>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Textarea,
    Radio,
    Checkbox,
    Select,
    Date,
    Time,
    File,
    Range,
    RadioGrid,
    Section,
    Submit,
}

impl FieldKind {
    pub const ALL: [FieldKind; 14] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Password,
        FieldKind::Textarea,
        FieldKind::Radio,
        FieldKind::Checkbox,
        FieldKind::Select,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::File,
        FieldKind::Range,
        FieldKind::RadioGrid,
        FieldKind::Section,
        FieldKind::Submit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Textarea => "textarea",
            FieldKind::Radio => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Select => "select",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::File => "file",
            FieldKind::Range => "range",
            FieldKind::RadioGrid => "radioGrid",
            FieldKind::Section => "section",
            FieldKind::Submit => "submit",
        }
    }

    /// radio/checkbox/select carry an `options` array; everything else must not.
    pub fn takes_options(&self) -> bool {
        matches!(self, FieldKind::Radio | FieldKind::Checkbox | FieldKind::Select)
    }

    /// section and submit render but never collect a value.
    pub fn is_static(&self) -> bool {
        matches!(self, FieldKind::Section | FieldKind::Submit)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub label: String,
    #[serde(default)]
    pub points: i64,
}

/// Knowledge quizzes store either a single correct option or several.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CorrectAnswer {
    One(String),
    Many(Vec<String>),
}

impl CorrectAnswer {
    pub fn contains(&self, option: &str) -> bool {
        match self {
            CorrectAnswer::One(answer) => answer == option,
            CorrectAnswer::Many(answers) => answers.iter().any(|a| a == option),
        }
    }
}

/// Outcome-quiz point assignment for one selectable option or grid column.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_id: Option<String>,
}

impl Field {
    /// First scoring rule whose option (or column, for grids) matches the
    /// selected value.
    pub fn scoring_rule_for(&self, selected: &str) -> Option<&ScoringRule> {
        self.scoring.as_deref()?.iter().find(|rule| {
            rule.option.as_deref() == Some(selected) || rule.column.as_deref() == Some(selected)
        })
    }

    pub fn is_required(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.required)
    }

    /// Points one answer to this column is worth: an explicit scoring rule
    /// wins over the column's own point value.
    pub fn column_points(&self, column_label: &str) -> i64 {
        if let Some(rule) = self.scoring_rule_for(column_label) {
            return rule.points;
        }
        self.columns
            .as_deref()
            .and_then(|cols| cols.iter().find(|c| c.label == column_label))
            .map(|c| c.points)
            .unwrap_or(0)
    }

    /// Highest point total one submission can earn from this field. Mirrors
    /// the grading rules: scoring rules when declared, otherwise the
    /// correct-answer points, defaulting to one.
    pub fn max_points(&self) -> i64 {
        match self.kind {
            FieldKind::RadioGrid => {
                let best_column = self
                    .columns
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .map(|c| self.column_points(&c.label))
                    .max()
                    .unwrap_or(0)
                    .max(0);
                let row_count = self.rows.as_deref().map_or(0, |r| r.len()) as i64;
                best_column * row_count
            }
            FieldKind::Checkbox => match self.scoring.as_deref() {
                // every positively scored option can be picked at once
                Some(rules) => rules.iter().map(|rule| rule.points.max(0)).sum(),
                None if self.correct_answer.is_some() => self.points.unwrap_or(1),
                None => 0,
            },
            FieldKind::Radio | FieldKind::Select => match self.scoring.as_deref() {
                Some(rules) => rules.iter().map(|rule| rule.points).max().unwrap_or(0).max(0),
                None if self.correct_answer.is_some() => self.points.unwrap_or(1),
                None => 0,
            },
            _ => 0,
        }
    }
}

/// Maximum achievable score across a field list. Outcome ranges must cover
/// exactly `0..=this`.
pub fn max_possible_score(fields: &[Field]) -> i64 {
    fields.iter().map(Field::max_points).sum()
}
