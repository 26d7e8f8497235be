use sqlx::{Pool, Postgres};

use crate::{
    dao::village::VillageDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::VillageDetailType,
    },
};

/**
 * Represents the service for reading villages.
 */
pub struct VillageService {
    village_dao: VillageDao,
    connection_pool: Pool<Postgres>,
}

impl VillageService {
    pub fn new(village_dao: VillageDao, connection_pool: Pool<Postgres>) -> Self {
        VillageService { village_dao, connection_pool }
    }

    /**
     * Retrieves all active villages ordered by name.
     */
    pub async fn get_village_list(&self) -> Result<Vec<VillageDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.village_dao.get_village_list(&mut connection).await
    }

    /**
     * Retrieves a village by its ID, including inactive villages.
     */
    pub async fn get_village(&self, village_id: i64) -> Result<VillageDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.village_dao.get_village(&mut connection, village_id).await
    }
}
