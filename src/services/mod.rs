pub mod aggregation;
pub mod document_text;
pub mod form_service;
pub mod json_extract;
pub mod model_service;
pub mod payload;
pub mod prompt_builder;
pub mod response_service;
pub mod scoring;

pub use form_service::FormService;
pub use model_service::ModelService;
pub use prompt_builder::PromptBuilder;
pub use response_service::ResponseService;
