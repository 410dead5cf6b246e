use schemars::{schema_for, JsonSchema};
use serde_json::Value;

use crate::constants::prompts::{
    ANALYZE_REPORT_RULES, ANTI_DUPLICATION_RULES, ASSIST_FIELD_RULES, CONDENSE_MARKER_RESERVE,
    DOCUMENT_TASK_RULES, FORM_ARCHITECT_PROMPT, IMAGE_TASK_RULES, JSON_ONLY_OUTPUT,
    OPTION_COUNT_MAX, OPTION_COUNT_MIN, OUTCOME_RULES, OUTCOME_TRIGGER_KEYWORDS, QUIZ_RULES,
    QUIZ_TRIGGER_KEYWORDS, REFACTOR_RULES, SUGGEST_FIELD_RULES,
};
use crate::constants::themes::THEME_PALETTE;
use crate::models::domain::{Field, FieldKind, QuizType};
use crate::models::dto::FormDto;

/// A compiled instruction pair ready for the gateway.
#[derive(Debug, Clone)]
pub struct CompiledPrompt {
    pub system: String,
    pub user: String,
}

/// Pure prompt compilation. Every business rule the model is asked to follow
/// is rendered here from the constant tables, so the rules stay testable
/// without a network in sight.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    document_char_budget: usize,
    context_json_char_budget: usize,
}

impl PromptBuilder {
    pub fn new(document_char_budget: usize, context_json_char_budget: usize) -> Self {
        Self {
            document_char_budget,
            context_json_char_budget,
        }
    }

    pub fn generate_form(&self, brief: &str) -> CompiledPrompt {
        let mut user = self.form_contract();
        push_mode_rules(&mut user, brief);
        user.push_str("\n\n## BRIEF\n\n");
        user.push_str(brief);
        user.push_str("\n\n");
        user.push_str(JSON_ONLY_OUTPUT);

        CompiledPrompt {
            system: FORM_ARCHITECT_PROMPT.to_string(),
            user,
        }
    }

    pub fn generate_form_from_image(&self, context: Option<&str>) -> CompiledPrompt {
        let mut user = self.form_contract();
        user.push_str("\n\n");
        user.push_str(IMAGE_TASK_RULES);
        push_mode_rules(&mut user, context.unwrap_or_default());
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            user.push_str("\n\n## ADDITIONAL CONTEXT\n\n");
            user.push_str(context);
        }
        user.push_str("\n\n");
        user.push_str(JSON_ONLY_OUTPUT);

        CompiledPrompt {
            system: FORM_ARCHITECT_PROMPT.to_string(),
            user,
        }
    }

    pub fn generate_form_from_document(
        &self,
        document_text: &str,
        brief: Option<&str>,
        context: Option<&str>,
    ) -> CompiledPrompt {
        let mut user = self.form_contract();
        user.push_str("\n\n");
        user.push_str(DOCUMENT_TASK_RULES);

        let trigger_text = format!(
            "{} {}",
            brief.unwrap_or_default(),
            context.unwrap_or_default()
        );
        push_mode_rules(&mut user, &trigger_text);

        if let Some(brief) = brief.filter(|b| !b.trim().is_empty()) {
            user.push_str("\n\n## BRIEF\n\n");
            user.push_str(brief);
        }
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            user.push_str("\n\n## ADDITIONAL CONTEXT\n\n");
            user.push_str(context);
        }
        user.push_str("\n\n## DOCUMENT TEXT\n\n");
        user.push_str(&condense(document_text, self.document_char_budget));
        user.push_str("\n\n");
        user.push_str(JSON_ONLY_OUTPUT);

        CompiledPrompt {
            system: FORM_ARCHITECT_PROMPT.to_string(),
            user,
        }
    }

    pub fn assist_field(&self, instruction: &str) -> CompiledPrompt {
        let mut user = self.field_contract();
        user.push_str("\n\n");
        user.push_str(ASSIST_FIELD_RULES);
        user.push_str("\n\n## INSTRUCTION\n\n");
        user.push_str(instruction);
        user.push_str("\n\n");
        user.push_str(JSON_ONLY_OUTPUT);

        CompiledPrompt {
            system: FORM_ARCHITECT_PROMPT.to_string(),
            user,
        }
    }

    pub fn suggest_field(&self, form: &FormDto) -> CompiledPrompt {
        let mut user = self.field_contract();
        user.push_str("\n\n");
        user.push_str(SUGGEST_FIELD_RULES);

        match form.quiz_type {
            Some(QuizType::Knowledge) => {
                user.push_str("\n\n");
                user.push_str(QUIZ_RULES);
            }
            Some(QuizType::Outcome) => {
                user.push_str("\n\n");
                user.push_str(OUTCOME_RULES);
                user.push_str("\n\n## ALLOWED OUTCOME IDS\n\n");
                for outcome in form.result_pages.as_deref().unwrap_or(&[]) {
                    user.push_str(&format!("- {}\n", outcome.outcome_id));
                }
            }
            None => {}
        }

        user.push_str("\n\n");
        user.push_str(ANTI_DUPLICATION_RULES);
        user.push('\n');
        for field in form.fields.iter().filter(|f| !f.kind.is_static()) {
            user.push_str(&format!("- \"{}\" (name: {})\n", field.label, field.name));
        }

        user.push_str("\n## THE FORM SO FAR\n\n");
        user.push_str(&self.condensed_json(&serde_json::to_value(form).unwrap_or(Value::Null)));
        user.push_str("\n\n");
        user.push_str(JSON_ONLY_OUTPUT);

        CompiledPrompt {
            system: FORM_ARCHITECT_PROMPT.to_string(),
            user,
        }
    }

    pub fn refactor_form(&self, form_json: &Value, command: &str) -> CompiledPrompt {
        let mut user = self.form_contract();
        user.push_str("\n\n");
        user.push_str(REFACTOR_RULES);
        user.push_str("\n\n## COMMAND\n\n");
        user.push_str(command);
        user.push_str("\n\n## CURRENT FORM\n\n");
        user.push_str(&self.condensed_json(form_json));
        user.push_str("\n\n");
        user.push_str(JSON_ONLY_OUTPUT);

        CompiledPrompt {
            system: FORM_ARCHITECT_PROMPT.to_string(),
            user,
        }
    }

    pub fn analyze_responses(&self, form_json: &Value, responses_json: &Value) -> CompiledPrompt {
        let mut user = String::from("## FORM DEFINITION\n\n");
        user.push_str(&self.condensed_json(form_json));
        user.push_str("\n\n## COLLECTED RESPONSES\n\n");
        user.push_str(&self.condensed_json(responses_json));
        user.push_str("\n\nWrite the report now.");

        CompiledPrompt {
            system: ANALYZE_REPORT_RULES.to_string(),
            user,
        }
    }

    fn condensed_json(&self, value: &Value) -> String {
        let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        condense(&rendered, self.context_json_char_budget)
    }

    /// Schema plus the rendered rule tables every form-producing task shares.
    fn form_contract(&self) -> String {
        let mut out = String::from("## OUTPUT SCHEMA\n\n");
        out.push_str("The response MUST be a single JSON object valid against this schema:\n\n");
        out.push_str(&pretty_schema::<FormDto>());
        out.push_str("\n\n");
        out.push_str(&field_kind_rules());
        out.push_str("\n\n");
        out.push_str(&theme_rules());
        out.push_str("\n\n");
        out.push_str(&quiz_trigger_rules());
        out
    }

    /// Schema plus rules for the single-field tasks.
    fn field_contract(&self) -> String {
        let mut out = String::from("## OUTPUT SCHEMA\n\n");
        out.push_str("The response MUST be a single JSON field object valid against this schema:\n\n");
        out.push_str(&pretty_schema::<Field>());
        out.push_str("\n\n");
        out.push_str(&field_kind_rules());
        out
    }
}

/// Head/tail truncation with an explicit omission marker. Identity under the
/// limit, deterministic and idempotent above it. Budgets below the floor are
/// raised to it so the marker always fits.
pub fn condense(text: &str, limit: usize) -> String {
    let limit = limit.max(4 * CONDENSE_MARKER_RESERVE);
    let total = text.chars().count();
    if total <= limit {
        return text.to_string();
    }

    let head_chars = (limit * 3) / 4;
    let tail_chars = (limit / 4).saturating_sub(CONDENSE_MARKER_RESERVE);
    let omitted = total - head_chars - tail_chars;

    let head: String = text.chars().take(head_chars).collect();
    let tail: String = text.chars().skip(total - tail_chars).collect();
    format!("{head}\n...omitted {omitted} chars...\n{tail}")
}

fn push_mode_rules(user: &mut String, trigger_text: &str) {
    let lower = trigger_text.to_lowercase();
    let outcome = OUTCOME_TRIGGER_KEYWORDS.iter().any(|k| lower.contains(k));
    let quiz = QUIZ_TRIGGER_KEYWORDS.iter().any(|k| lower.contains(k));
    if outcome {
        user.push_str("\n\n");
        user.push_str(OUTCOME_RULES);
    } else if quiz {
        user.push_str("\n\n");
        user.push_str(QUIZ_RULES);
    }
}

fn field_kind_rules() -> String {
    let mut out = String::from("## FIELD TYPES\n\n");
    out.push_str("The type of every field MUST be one of: ");
    let kinds: Vec<&str> = FieldKind::ALL.iter().map(|k| k.as_str()).collect();
    out.push_str(&kinds.join(", "));
    out.push_str(".\n\n");
    for kind in FieldKind::ALL {
        out.push_str(&format!("- {}: {}\n", kind.as_str(), kind_rule(kind)));
    }
    out
}

fn kind_rule(kind: FieldKind) -> String {
    match kind {
        FieldKind::Text => "single-line free text".to_string(),
        FieldKind::Email => {
            "email address; give it validation.pattern \"email\"".to_string()
        }
        FieldKind::Password => "masked input; use only when secrecy is the point".to_string(),
        FieldKind::Textarea => "multi-line free text for open answers".to_string(),
        FieldKind::Radio | FieldKind::Select => format!(
            "one choice from options; MUST carry options with {OPTION_COUNT_MIN} to {OPTION_COUNT_MAX} distinct strings"
        ),
        FieldKind::Checkbox => format!(
            "any number of choices; MUST carry options with {OPTION_COUNT_MIN} to {OPTION_COUNT_MAX} distinct strings"
        ),
        FieldKind::Date => "calendar date".to_string(),
        FieldKind::Time => "time of day".to_string(),
        FieldKind::File => "file upload".to_string(),
        FieldKind::Range => "numeric slider; the answer is a number".to_string(),
        FieldKind::RadioGrid => {
            "matrix question; MUST carry rows (array of strings) and columns (array of {label, points}); never options".to_string()
        }
        FieldKind::Section => {
            "visual heading that groups the fields after it; carries no value, options or validation".to_string()
        }
        FieldKind::Submit => "the single final field of the form; exactly one, always last".to_string(),
    }
}

fn theme_rules() -> String {
    let mut out = String::from("## THEMES\n\n");
    out.push_str("theme.name MUST be one of the following, with exactly these colors:\n");
    for palette in THEME_PALETTE {
        out.push_str(&format!(
            "- {}: primaryColor \"{}\", backgroundColor \"{}\"\n",
            palette.name, palette.primary_color, palette.background_color
        ));
    }
    out.push_str("Pick the one that best fits the form's subject; use Indigo when unsure.");
    out
}

fn quiz_trigger_rules() -> String {
    let mut out = String::from("## QUIZ DETECTION\n\n");
    out.push_str("Treat the request as a quiz when the brief mentions any of: ");
    out.push_str(&QUIZ_TRIGGER_KEYWORDS.join(", "));
    out.push_str(".\nOtherwise build a plain form with isQuiz set to false and no scoring anywhere.");
    out
}

fn pretty_schema<T: JsonSchema>() -> String {
    let schema = schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(60_000, 20_000)
    }

    #[test]
    fn condense_is_identity_under_the_limit() {
        let text = "short text";
        assert_eq!(condense(text, 1_000), text);
    }

    #[test]
    fn condense_is_idempotent_past_the_limit() {
        let text = "x".repeat(5_000);
        let once = condense(&text, 1_000);
        let twice = condense(&once, 1_000);

        assert!(once.chars().count() <= 1_000);
        assert_eq!(once, twice);
        assert!(once.contains("...omitted "));
        assert!(once.contains(" chars..."));
    }

    #[test]
    fn condense_keeps_head_and_tail_content() {
        let mut text = String::from("HEAD_MARKER ");
        text.push_str(&"m".repeat(5_000));
        text.push_str(" TAIL_MARKER");

        let condensed = condense(&text, 1_000);
        assert!(condensed.starts_with("HEAD_MARKER"));
        assert!(condensed.ends_with("TAIL_MARKER"));
    }

    #[test]
    fn condense_respects_multibyte_boundaries() {
        let text = "é".repeat(3_000);
        let condensed = condense(&text, 500);

        assert!(condensed.chars().count() <= 500);
        assert!(condensed.contains("...omitted "));
        // must still be valid UTF-8 with intact characters
        assert!(condensed.starts_with('é'));
        assert!(condensed.ends_with('é'));
    }

    #[test]
    fn generate_prompt_embeds_schema_rules_and_brief() {
        let prompt = builder().generate_form("A signup form for my pottery class");

        assert!(prompt.system.contains("form architecture agent"));
        assert!(prompt.user.contains("\"isQuiz\""));
        assert!(prompt.user.contains("radioGrid"));
        assert!(prompt.user.contains("#4F46E5"));
        assert!(prompt.user.contains("A signup form for my pottery class"));
        assert!(prompt.user.contains("Return ONLY the JSON object"));
    }

    #[test]
    fn quiz_brief_pulls_in_quiz_rules() {
        let prompt = builder().generate_form("A trivia quiz about the solar system");

        assert!(prompt.user.contains("## QUIZ MODE"));
        assert!(!prompt.user.contains("## OUTCOME MODE"));
    }

    #[test]
    fn personality_brief_pulls_in_outcome_rules() {
        let prompt = builder().generate_form("A personality quiz: which season are you?");

        assert!(prompt.user.contains("## OUTCOME MODE"));
        assert!(!prompt.user.contains("## QUIZ MODE"));
    }

    #[test]
    fn plain_brief_avoids_both_rule_blocks() {
        let prompt = builder().generate_form("A catering enquiry form");

        assert!(!prompt.user.contains("## QUIZ MODE"));
        assert!(!prompt.user.contains("## OUTCOME MODE"));
    }

    #[test]
    fn suggest_prompt_lists_existing_labels_for_anti_duplication() {
        let form: FormDto = serde_json::from_value(json!({
            "title": "Event feedback",
            "fields": [
                {"label": "How did you hear about us?", "name": "referral", "type": "radio",
                 "options": ["Friend", "Ad"]},
                {"label": "Comments", "name": "comments", "type": "textarea"},
                {"label": "Submit", "name": "submit", "type": "submit"}
            ]
        }))
        .expect("form should parse");

        let prompt = builder().suggest_field(&form);

        assert!(prompt.user.contains("## DO NOT DUPLICATE"));
        assert!(prompt.user.contains("\"How did you hear about us?\" (name: referral)"));
        assert!(prompt.user.contains("\"Comments\" (name: comments)"));
        // static fields are not worth anti-duplicating against
        assert!(!prompt.user.contains("(name: submit)"));
    }

    #[test]
    fn suggest_prompt_for_outcome_quiz_lists_allowed_outcome_ids() {
        let form: FormDto = serde_json::from_value(json!({
            "title": "Which houseplant are you?",
            "isQuiz": true,
            "quizType": "OUTCOME",
            "resultPages": [
                {"outcomeId": "cactus", "title": "Cactus", "description": "",
                 "scoreRange": {"from": 0, "to": 2}},
                {"outcomeId": "fern", "title": "Fern", "description": "",
                 "scoreRange": {"from": 3, "to": 4}}
            ],
            "fields": [
                {"label": "Water often?", "name": "water", "type": "radio",
                 "options": ["Yes", "No"]}
            ]
        }))
        .expect("form should parse");

        let prompt = builder().suggest_field(&form);

        assert!(prompt.user.contains("## ALLOWED OUTCOME IDS"));
        assert!(prompt.user.contains("- cactus"));
        assert!(prompt.user.contains("- fern"));
        assert!(prompt.user.contains("## OUTCOME MODE"));
    }

    #[test]
    fn refactor_prompt_carries_command_and_form() {
        let form_json = json!({"title": "Old title", "fields": []});
        let prompt = builder().refactor_form(&form_json, "Rename the form to New title");

        assert!(prompt.user.contains("## COMMAND"));
        assert!(prompt.user.contains("Rename the form to New title"));
        assert!(prompt.user.contains("Old title"));
    }

    #[test]
    fn document_prompt_condenses_long_extracted_text() {
        let long_text = "lorem ipsum ".repeat(20_000);
        let prompt = PromptBuilder::new(1_000, 20_000)
            .generate_form_from_document(&long_text, Some("registration form"), None);

        assert!(prompt.user.contains("## DOCUMENT TEXT"));
        assert!(prompt.user.contains("...omitted "));
        assert!(prompt.user.contains("registration form"));
    }

    #[test]
    fn analyze_prompt_embeds_form_and_responses() {
        let form_json = json!({"title": "Survey", "fields": []});
        let responses = json!([{"q1": "A"}, {"q1": "B"}]);
        let prompt = builder().analyze_responses(&form_json, &responses);

        assert!(prompt.system.contains("survey analyst"));
        assert!(prompt.user.contains("## FORM DEFINITION"));
        assert!(prompt.user.contains("## COLLECTED RESPONSES"));
        assert!(prompt.user.contains("\"q1\""));
    }

    #[test]
    fn assist_prompt_uses_single_field_contract() {
        let prompt = builder().assist_field("Add a question about dietary requirements");

        assert!(prompt.user.contains("single JSON field object"));
        assert!(prompt.user.contains("dietary requirements"));
        assert!(prompt.user.contains("Never return a submit field"));
    }
}
