pub mod form_handler;
pub mod health_handler;
pub mod response_handler;

pub use form_handler::{
    assist_question, create_form, delete_form, generate_form, generate_form_from_document,
    generate_form_from_image, get_form, list_forms, refactor_form, suggest_question, update_form,
};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use response_handler::{analyze_responses, form_summary, list_responses, submit_response};
