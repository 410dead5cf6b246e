use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::FormResponse};

/// Append-only store of public submissions. There is deliberately no delete
/// here: responses outlive their form unless an operator cleans them up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn add(&self, response: FormResponse) -> AppResult<FormResponse>;
    async fn list_by_form(&self, form_id: &str) -> AppResult<Vec<FormResponse>>;
    async fn count_by_form(&self, form_id: &str) -> AppResult<u64>;
}

pub struct MongoResponseRepository {
    collection: Collection<FormResponse>,
}

impl MongoResponseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("responses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for responses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let form_index = IndexModel::builder()
            .keys(doc! { "formId": 1 })
            .options(IndexOptions::builder().name("form_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(form_index).await?;

        log::info!("Successfully created indexes for responses collection");
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MongoResponseRepository {
    async fn add(&self, response: FormResponse) -> AppResult<FormResponse> {
        self.collection.insert_one(&response).await?;
        Ok(response)
    }

    async fn list_by_form(&self, form_id: &str) -> AppResult<Vec<FormResponse>> {
        let responses = self
            .collection
            .find(doc! { "formId": form_id })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(responses)
    }

    async fn count_by_form(&self, form_id: &str) -> AppResult<u64> {
        let count = self.collection.count_documents(doc! { "formId": form_id }).await?;
        Ok(count)
    }
}
