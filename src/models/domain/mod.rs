pub mod field;
pub mod form;
pub mod outcome;
pub mod response;
pub use field::{CorrectAnswer, Field, FieldKind, FieldValidation, GridColumn, ScoringRule};
pub use form::{Form, QuizType, Theme};
pub use outcome::{Outcome, ScoreRange};
pub use response::FormResponse;
