use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Form};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create(&self, form: Form) -> AppResult<Form>;
    async fn update(&self, form: Form) -> AppResult<Form>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Form>>;
    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Form>>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn update_ai_summary(&self, id: &str, summary: &str) -> AppResult<()>;
}

pub struct MongoFormRepository {
    collection: Collection<Form>,
}

impl MongoFormRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("forms");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for forms collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "ownerId": 1 })
            .options(IndexOptions::builder().name("owner_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(owner_index).await?;

        log::info!("Successfully created indexes for forms collection");
        Ok(())
    }
}

#[async_trait]
impl FormRepository for MongoFormRepository {
    async fn create(&self, form: Form) -> AppResult<Form> {
        self.collection.insert_one(&form).await?;
        Ok(form)
    }

    async fn update(&self, form: Form) -> AppResult<Form> {
        self.collection
            .replace_one(doc! { "id": &form.id }, &form)
            .await?;
        Ok(form)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Form>> {
        let form = self.collection.find_one(doc! { "id": id }).await?;
        Ok(form)
    }

    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Form>> {
        let forms = self
            .collection
            .find(doc! { "ownerId": owner_id })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(forms)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn update_ai_summary(&self, id: &str, summary: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "aiSummary": summary } },
            )
            .await?;
        Ok(())
    }
}
