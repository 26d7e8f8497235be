use sqlx::{Pool, Postgres};

use crate::{
    dao::atensi::AtensiDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{AtensiAddInputType, AtensiDetailType, AtensiUpdateInputType},
    },
};

/**
 * Represents the service for managing atensi.
 */
pub struct AtensiService {
    /**
     * The DAO for atensi operations.
     */
    atensi_dao: AtensiDao,
    /**
     * Connection pool for database operations.
     */
    connection_pool: Pool<Postgres>,
}

impl AtensiService {
    /**
     * Creates a new instance of `AtensiService`.
     *
     * # Arguments
     * `atensi_dao`: The DAO for atensi operations.
     * `connection_pool`: Connection pool for database operations.
     */
    pub fn new(atensi_dao: AtensiDao, connection_pool: Pool<Postgres>) -> Self {
        AtensiService { atensi_dao, connection_pool }
    }

    /**
     * Retrieves the newest atensi.
     */
    pub async fn get_atensi_list(&self) -> Result<Vec<AtensiDetailType>, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.atensi_dao.get_atensi_list(&mut connection).await
    }

    /**
     * Retrieves a single atensi by its ID.
     *
     * # Arguments
     * `atensi_id`: The ID of the atensi.
     */
    pub async fn get_atensi(&self, atensi_id: i64) -> Result<AtensiDetailType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        self.atensi_dao.get_atensi(&mut connection, atensi_id).await
    }

    /**
     * Adds a new atensi.
     *
     * # Arguments
     * `atensi_add_input`: The fields of the new atensi.
     *
     * # Returns
     * A Result containing the persisted atensi or an `ApplicationError`.
     */
    pub async fn add_atensi(&self, atensi_add_input: AtensiAddInputType) -> Result<AtensiDetailType, ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.atensi_dao.add_atensi(&mut transaction, atensi_add_input).await {
            Ok(atensi) => {
                transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
                tracing::info!("Added atensi with ID {}", atensi.id);
                Ok(atensi)
            }
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                Err(err)
            }
        }
    }

    /**
     * Overwrites an atensi. A missing ID is not reported as an error.
     *
     * # Arguments
     * `atensi_id`: The ID of the atensi to update.
     * `atensi_update_input`: The new field values.
     */
    pub async fn update_atensi(&self, atensi_id: i64, atensi_update_input: AtensiUpdateInputType) -> Result<(), ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.atensi_dao.update_atensi(&mut transaction, atensi_id, atensi_update_input).await {
            Ok(()) => transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?,
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                return Err(err);
            }
        }
        Ok(())
    }

    /**
     * Deletes an atensi by its ID. A missing ID is not reported as an error.
     *
     * # Arguments
     * `atensi_id`: The ID of the atensi to delete.
     */
    pub async fn delete_atensi(&self, atensi_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = self.connection_pool.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))?;
        match self.atensi_dao.delete_atensi(&mut transaction, atensi_id).await {
            Ok(()) => transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?,
            Err(err) => {
                transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
                return Err(err);
            }
        }
        Ok(())
    }
}
