use std::collections::HashSet;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::themes::{palette_for, DEFAULT_PALETTE};
use crate::models::domain::field::max_possible_score;
use crate::models::domain::outcome::validate_outcome_ranges;
use crate::models::domain::{Field, FieldKind, FieldValidation, Form, Outcome, QuizType, Theme};

static SNAKE_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("snake case pattern is valid"));

/// A form without identity or ownership: what the model is asked to emit,
/// what the builder UI edits, and what the generation endpoints return.
/// The JSON schema derived from this type is embedded in every
/// form-producing prompt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDto {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_type: Option<QuizType>,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_pages: Option<Vec<Outcome>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl FormDto {
    /// Repairs what can be repaired and rejects what cannot. Both the model
    /// and the builder UI are untrusted sources of this shape, so nothing in
    /// it is taken at face value: names are rewritten into unique snake_case,
    /// per-kind structure is enforced, scored fields become required, the
    /// theme is coerced onto the palette, and exactly one submit field ends
    /// up last.
    pub fn normalized(mut self) -> Result<FormDto, String> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err("form title is empty".to_string());
        }

        if self.quiz_type.is_some() {
            self.is_quiz = true;
        }
        if self.is_quiz && self.quiz_type.is_none() {
            self.quiz_type = Some(QuizType::Knowledge);
        }

        // Pull submit fields out; one canonical submit is appended below.
        let mut submit_label: Option<String> = None;
        self.fields.retain(|f| {
            if f.kind == FieldKind::Submit {
                submit_label.get_or_insert_with(|| f.label.clone());
                false
            } else {
                true
            }
        });

        if self.fields.is_empty() {
            return Err("form has no input fields".to_string());
        }

        let mut seen_names = HashSet::new();
        for index in 0..self.fields.len() {
            let field = &mut self.fields[index];
            normalize_field(field, index, &mut seen_names)?;
        }

        self.fields.push(Field {
            label: submit_label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Submit".to_string()),
            name: unique_name("submit", &mut seen_names),
            kind: FieldKind::Submit,
            placeholder: None,
            helper_text: None,
            validation: None,
            options: None,
            rows: None,
            columns: None,
            correct_answer: None,
            points: None,
            scoring: None,
        });

        let palette = self
            .theme
            .as_ref()
            .and_then(|t| palette_for(&t.name))
            .unwrap_or(&DEFAULT_PALETTE);
        self.theme = Some(Theme {
            name: palette.name.to_string(),
            primary_color: palette.primary_color.to_string(),
            background_color: palette.background_color.to_string(),
        });

        if self.quiz_type == Some(QuizType::Outcome) {
            let outcomes = self.result_pages.as_deref().unwrap_or(&[]);
            let total = max_possible_score(&self.fields);
            validate_outcome_ranges(outcomes, total)?;
        } else {
            self.result_pages = None;
        }

        Ok(self)
    }

    /// Normalize and wrap into a new owned form.
    pub fn into_form(self, owner_id: &str) -> Result<Form, String> {
        let dto = self.normalized()?;
        let now = Utc::now();
        let theme = dto.theme.unwrap_or_else(|| Theme {
            name: DEFAULT_PALETTE.name.to_string(),
            primary_color: DEFAULT_PALETTE.primary_color.to_string(),
            background_color: DEFAULT_PALETTE.background_color.to_string(),
        });
        Ok(Form {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: dto.title,
            description: dto.description,
            is_quiz: dto.is_quiz,
            quiz_type: dto.quiz_type,
            fields: dto.fields,
            result_pages: dto.result_pages,
            theme,
            ai_summary: None,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Normalize and replace the editable portion of an existing form,
    /// keeping identity, ownership, creation time and the cached summary.
    pub fn apply_to(self, existing: &Form) -> Result<Form, String> {
        let dto = self.normalized()?;
        let theme = dto.theme.unwrap_or_else(|| existing.theme.clone());
        Ok(Form {
            id: existing.id.clone(),
            owner_id: existing.owner_id.clone(),
            title: dto.title,
            description: dto.description,
            is_quiz: dto.is_quiz,
            quiz_type: dto.quiz_type,
            fields: dto.fields,
            result_pages: dto.result_pages,
            theme,
            ai_summary: existing.ai_summary.clone(),
            created_at: existing.created_at,
            updated_at: Some(Utc::now()),
        })
    }
}

/// Single-field variant of the coercion, for the assist and suggest tasks.
/// A standalone field must collect something, so a submit field is rejected
/// rather than repaired.
pub fn normalize_standalone_field(mut field: Field) -> Result<Field, String> {
    if field.kind == FieldKind::Submit {
        return Err("a suggested field cannot be a submit button".to_string());
    }
    let mut seen = HashSet::new();
    normalize_field(&mut field, 0, &mut seen)?;
    Ok(field)
}

fn normalize_field(
    field: &mut Field,
    index: usize,
    seen_names: &mut HashSet<String>,
) -> Result<(), String> {
    field.label = field.label.trim().to_string();
    if field.label.is_empty() && field.kind != FieldKind::Section {
        field.label = format!("Question {}", index + 1);
    }

    let mut name = if SNAKE_CASE.is_match(&field.name) {
        field.name.clone()
    } else {
        snake_case_name(&field.name)
    };
    if name.is_empty() {
        name = snake_case_name(&field.label);
    }
    if name.is_empty() {
        name = format!("field_{}", index + 1);
    }
    field.name = unique_name(&name, seen_names);

    if field.kind.takes_options() {
        let has_options = field.options.as_ref().is_some_and(|o| !o.is_empty());
        if !has_options {
            return Err(format!(
                "field '{}' is a {} but carries no options",
                field.name,
                field.kind.as_str()
            ));
        }
        field.rows = None;
        field.columns = None;
    } else if field.kind == FieldKind::RadioGrid {
        let has_rows = field.rows.as_ref().is_some_and(|r| !r.is_empty());
        let has_columns = field.columns.as_ref().is_some_and(|c| !c.is_empty());
        if !has_rows || !has_columns {
            return Err(format!(
                "field '{}' is a radioGrid but is missing rows or columns",
                field.name
            ));
        }
        field.options = None;
    } else {
        field.options = None;
        field.rows = None;
        field.columns = None;
    }

    if field.kind.is_static() {
        field.placeholder = None;
        field.validation = None;
        field.correct_answer = None;
        field.points = None;
        field.scoring = None;
        return Ok(());
    }

    let scored = field.correct_answer.is_some()
        || field.scoring.as_ref().is_some_and(|s| !s.is_empty());
    if scored {
        field
            .validation
            .get_or_insert_with(FieldValidation::default)
            .required = true;
    }

    Ok(())
}

fn snake_case_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_was_separator = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            previous_was_separator = false;
        } else if matches!(ch, '_' | '-' | '.' | '/') || ch.is_whitespace() {
            if !out.is_empty() && !previous_was_separator {
                out.push('_');
                previous_was_separator = true;
            }
        }
        // anything else (punctuation, emoji) is dropped
    }
    let trimmed = out.trim_end_matches('_');
    match trimmed.chars().next() {
        Some(c) if c.is_ascii_lowercase() => trimmed.to_string(),
        Some(_) => format!("field_{trimmed}"),
        None => String::new(),
    }
}

fn unique_name(base: &str, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}_{counter}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
