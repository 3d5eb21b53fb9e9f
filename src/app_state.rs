use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoCollectionRepository, MongoSessionRepository, MongoSubmissionRepository},
    services::{collection_service::CollectionService, session_service::SessionService},
};

#[derive(Clone)]
pub struct AppState {
    pub collection_service: Arc<CollectionService>,
    pub session_service: Arc<SessionService>,
    pub config: Arc<Config>,
    pub db: Database,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let collection_repository = Arc::new(MongoCollectionRepository::new(&db));
        collection_repository.ensure_indexes().await?;

        let session_repository = Arc::new(MongoSessionRepository::new(&db));
        session_repository.ensure_indexes().await?;

        let submission_repository = Arc::new(MongoSubmissionRepository::new(&db));
        submission_repository.ensure_indexes().await?;

        let collection_service = Arc::new(CollectionService::new(
            collection_repository.clone(),
            config.conversion_defaults(),
        ));
        let session_service = Arc::new(SessionService::new(
            session_repository,
            submission_repository,
            collection_repository,
            config.scoring(),
        ));

        Ok(Self {
            collection_service,
            session_service,
            config: Arc::new(config),
            db,
        })
    }
}
