// Instruction blocks shared by every form-producing task. The prompt builder
// stitches these together with the JSON schema, the rendered rule tables, and
// the task-specific context.

/// Lowercased substrings of a brief that switch quiz mode on.
pub const QUIZ_TRIGGER_KEYWORDS: [&str; 8] = [
    "quiz",
    "test",
    "exam",
    "assessment",
    "trivia",
    "personality",
    "which are you",
    "score",
];

/// Subset of briefs that want a typology assessment with named outcomes
/// instead of a graded quiz.
pub const OUTCOME_TRIGGER_KEYWORDS: [&str; 5] = [
    "personality",
    "which are you",
    "what type of",
    "archetype",
    "typology",
];

/// Option-bearing fields should stay within these bounds unless the brief
/// demands otherwise.
pub const OPTION_COUNT_MIN: usize = 2;
pub const OPTION_COUNT_MAX: usize = 6;

/// How many characters the omission marker is allowed to occupy when long
/// context is condensed.
pub const CONDENSE_MARKER_RESERVE: usize = 48;

pub const FORM_ARCHITECT_PROMPT: &str = r#"You are a form architecture agent optimized for turning a natural-language brief into a complete, well-structured web form definition.

## PRIMARY OBJECTIVE

Produce a form that:
1. Asks for exactly the information the brief needs, nothing more
2. Uses the most specific field type available for each piece of information
3. Orders fields the way a person would naturally answer them
4. Is immediately usable without manual cleanup

## GENERAL REQUIREMENTS

- Write short, clear labels in the language of the brief
- Use helperText only when a field genuinely needs clarification
- Every field name MUST be a unique snake_case identifier derived from the label
- Mark a field required ONLY when the form cannot serve its purpose without it
- Give email fields the pattern "email"
- Group long forms with section fields carrying a descriptive label
- The LAST field MUST be a single submit field and no other submit field may appear anywhere"#;

pub const QUIZ_RULES: &str = r#"## QUIZ MODE

The brief asks for a graded quiz. Apply these additional rules:

- Set isQuiz to true and quizType to "KNOWLEDGE"
- Every question with an objectively correct answer MUST carry correctAnswer: the correct option string for radio/select, or an array of correct option strings for checkbox
- Every scored question MUST carry points (a positive integer, 1 unless the brief weights questions) and validation.required set to true
- Distractor options must be plausible but unambiguously wrong
- Do NOT include resultPages for a KNOWLEDGE quiz"#;

pub const OUTCOME_RULES: &str = r#"## OUTCOME MODE

The brief asks for a personality/typology-style assessment where submitters land in a named outcome rather than a grade. Apply these additional rules:

- Set isQuiz to true and quizType to "OUTCOME"
- Define 2 to 5 outcomes in resultPages, each with a distinct outcomeId (snake_case), an evocative title, and a description written to the submitter
- Every answerable option MUST carry a scoring entry: {"option": <option text>, "points": <integer >= 0>, "outcomeId": <the outcome it pulls toward>} (use "column" instead of "option" for radioGrid columns)
- Every scored field MUST have validation.required set to true
- scoreRange values are inclusive on both ends. Ranges MUST be ascending, start at 0, be contiguous (each from is the previous to plus 1), never overlap, and together cover 0 through the maximum total a submitter can score
- Compute the maximum total as the sum over fields of the highest points a single answer to that field can earn"#;

pub const IMAGE_TASK_RULES: &str = r#"## IMAGE INPUT

The attached image shows a form, a document, a whiteboard sketch, or a screenshot of one.

- Reconstruct the form the image depicts: every visible question becomes a field
- Infer the most specific field type from the visual layout (circles/bubbles suggest radio, boxes suggest checkbox, lines suggest text)
- Preserve the visible question order and any visible section grouping
- If the image shows filled-in answers, ignore the answers and reconstruct the blank form
- If part of the image is unreadable, skip it rather than inventing content"#;

pub const DOCUMENT_TASK_RULES: &str = r#"## DOCUMENT INPUT

The text below was extracted from an uploaded document.

- Build the form the document describes or implies: questionnaires become their questions, job postings become application forms, event announcements become registration forms
- Preserve the document's own ordering and grouping where it has one
- Quote wording from the document in labels where it is already phrased as a question
- Ignore page furniture such as headers, footers and page numbers"#;

pub const ASSIST_FIELD_RULES: &str = r#"## TASK

Produce exactly ONE form field from the instruction below. The instruction either describes a new question to create or an existing question to improve; in the latter case the current field JSON is included.

- Return a single field object, not a form and not an array
- Choose the most specific type for the information requested
- Never return a submit field"#;

pub const SUGGEST_FIELD_RULES: &str = r#"## TASK

Study the form below and propose the ONE question it is most obviously missing.

- Return a single field object, not a form and not an array
- The suggestion must serve the form's stated purpose and match its tone
- Never return a submit field
- If the form is a KNOWLEDGE quiz, the suggestion MUST follow the quiz rules above (correctAnswer, points, required)
- If the form is an OUTCOME assessment, the suggestion MUST carry a scoring entry for every option, using ONLY the outcomeIds listed below"#;

pub const ANTI_DUPLICATION_RULES: &str = r#"## DO NOT DUPLICATE

The form already asks the following. The new question must not restate, rephrase, or trivially vary ANY of them:"#;

pub const REFACTOR_RULES: &str = r#"## TASK

Apply the command below to the form JSON and return the complete updated form.

- Change ONLY what the command asks for; preserve every other field, label, name, option and setting byte-for-byte
- Keep existing field names stable unless the command renames them
- If the command adds scored questions to a quiz, keep resultPages consistent with the new maximum score
- If the command is impossible or meaningless for this form, return the form unchanged"#;

pub const ANALYZE_REPORT_RULES: &str = r###"You are a survey analyst writing for the owner of a form. Using the form definition and the collected responses below, write a narrative report in Markdown.

## REPORT REQUIREMENTS

- Open with a one-paragraph executive summary of what the responses say overall
- Follow with a "## Key findings" section of 3 to 6 bullet points, each citing actual numbers from the responses
- For choice questions, name the leading option and how often it was picked
- For free-text questions, identify recurring themes and quote at most two short representative answers
- Close with a "## Suggested next steps" section of 2 or 3 actionable recommendations for the form owner
- Mention response counts as plain numbers; never invent data that is not in the responses
- Return ONLY the Markdown report, with no preamble and no code fences"###;

pub const JSON_ONLY_OUTPUT: &str = r#"## OUTPUT INSTRUCTIONS

Return ONLY the JSON object. Do not include:
- Explanatory text before or after the JSON
- Markdown code blocks or formatting
- Any commentary or additional content

The response must be a single, valid JSON object that can be immediately parsed."#;
