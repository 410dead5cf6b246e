use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoFormRepository, MongoResponseRepository},
    services::{FormService, ModelService, PromptBuilder, ResponseService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub form_service: Arc<FormService>,
    pub response_service: Arc<ResponseService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let form_repository = Arc::new(MongoFormRepository::new(&db));
        form_repository.ensure_indexes().await?;
        let response_repository = Arc::new(MongoResponseRepository::new(&db));
        response_repository.ensure_indexes().await?;

        let model = Arc::new(ModelService::from_config(&config));
        let prompts = PromptBuilder::new(config.document_char_budget, config.context_json_char_budget);

        let form_service = Arc::new(FormService::new(form_repository.clone(), model, prompts));
        let response_service = Arc::new(ResponseService::new(form_repository, response_repository));

        Ok(Self {
            db,
            config: Arc::new(config),
            form_service,
            response_service,
        })
    }
}
