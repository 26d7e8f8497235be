use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{VillageDbResp, VillageDetailType},
};

/**
 * SQL query to retrieve active villages alphabetically.
 */
const QUERY_VILLAGE_LIST: &str = "SELECT id, name, pemda, head_name, phone, email, population, is_active FROM villages WHERE is_active = TRUE ORDER BY name";

/**
 * SQL query to retrieve a village regardless of its active flag.
 */
const QUERY_VILLAGE: &str = "SELECT id, name, pemda, head_name, phone, email, population, is_active FROM villages WHERE id = $1";

/**
 * DAO for village lookups. Villages are read-only for this service.
 */
pub struct VillageDao {}

impl VillageDao {
    pub fn new() -> Self {
        VillageDao {}
    }

    /**
     * Retrieves all active villages ordered by name.
     *
     * # Arguments
     * `connection`: The database connection.
     */
    #[instrument(skip(self, connection))]
    pub async fn get_village_list(&self, connection: &mut PgConnection) -> Result<Vec<VillageDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<VillageDbResp> = sqlx::query_as(QUERY_VILLAGE_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get village list: {err}")))?;
        Ok(results.into_iter().map(VillageDetailType::from).collect())
    }

    /**
     * Retrieves a single village, active or not.
     *
     * # Arguments
     * `connection`: The database connection.
     * `village_id`: The ID of the village.
     *
     * # Returns
     * The village, or an `ApplicationError` of type `NotFound`.
     */
    #[instrument(skip(self, connection))]
    pub async fn get_village(&self, connection: &mut PgConnection, village_id: i64) -> Result<VillageDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<VillageDbResp> = sqlx::query_as(QUERY_VILLAGE)
            .bind(village_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get village: {err}")))?;
        let Some(row) = result else {
            tracing::debug!("Village with ID {} not found", village_id);
            return Err(ApplicationError::new(ErrorType::NotFound, "Village not found".to_string()));
        };
        Ok(VillageDetailType::from(row))
    }
}
