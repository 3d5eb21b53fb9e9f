use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection as MongoCollection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Collection};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Collection>>;
    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Collection>, i64)>;
    async fn create(&self, collection: Collection) -> AppResult<Collection>;
    async fn update(&self, collection: Collection) -> AppResult<Collection>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoCollectionRepository {
    collection: MongoCollection<Collection>,
}

impl MongoCollectionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("collections");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for collections collection");

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
            .keys(doc! { "owner_id": 1 })
            .options(IndexOptions::builder().name("owner_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(owner_index).await?;

        Ok(())
    }
}

#[async_trait]
impl CollectionRepository for MongoCollectionRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Collection>> {
        let collection = self.collection.find_one(doc! { "id": id }).await?;
        Ok(collection)
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Collection>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let items: Vec<Collection> = self
            .collection
            .find(doc! {})
            .skip(offset as u64)
            .limit(limit)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn create(&self, collection: Collection) -> AppResult<Collection> {
        self.collection.insert_one(&collection).await?;
        Ok(collection)
    }

    async fn update(&self, collection: Collection) -> AppResult<Collection> {
        self.collection
            .replace_one(doc! { "id": &collection.id }, &collection)
            .await?;
        Ok(collection)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
