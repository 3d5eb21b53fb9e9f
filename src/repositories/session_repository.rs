use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Session};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>>;
    async fn find_by_join_code(&self, join_code: &str) -> AppResult<Option<Session>>;
    async fn create(&self, session: Session) -> AppResult<Session>;
    async fn update(&self, session: Session) -> AppResult<Session>;
}

pub struct MongoSessionRepository {
    collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let join_code_index = IndexModel::builder()
            .keys(doc! { "join_code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("join_code_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(join_code_index).await?;

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn find_by_join_code(&self, join_code: &str) -> AppResult<Option<Session>> {
        let session = self
            .collection
            .find_one(doc! { "join_code": join_code })
            .await?;
        Ok(session)
    }

    async fn create(&self, session: Session) -> AppResult<Session> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn update(&self, session: Session) -> AppResult<Session> {
        self.collection
            .replace_one(doc! { "id": &session.id }, &session)
            .await?;
        Ok(session)
    }
}
