use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{ATENSI_PAGE_SIZE, AtensiAddInputType, AtensiDbResp, AtensiDetailType, AtensiUpdateInputType, STATUS_OPEN},
};

/**
 * SQL query to retrieve the newest atensi with their village names.
 */
const QUERY_ATENSI_LIST: &str = "SELECT a.id, a.title, a.description, a.priority, a.status, a.village_id, COALESCE(v.name, '') AS village_name, a.created_at, a.created_by
                                 FROM atensi a
                                 LEFT JOIN villages v ON a.village_id = v.id
                                 ORDER BY a.created_at DESC, a.id DESC
                                 LIMIT $1";

/**
 * SQL query to retrieve a single atensi by id.
 */
const QUERY_ATENSI: &str = "SELECT a.id, a.title, a.description, a.priority, a.status, a.village_id, COALESCE(v.name, '') AS village_name, a.created_at, a.created_by
                            FROM atensi a
                            LEFT JOIN villages v ON a.village_id = v.id
                            WHERE a.id = $1";

/**
 * SQL statement adding an atensi and returning the persisted row.
 */
const ADD_ATENSI: &str = "WITH inserted AS (
                              INSERT INTO atensi (title, description, priority, status, village_id, created_at, created_by)
                              VALUES ($1, $2, $3, $4, $5, now(), $6)
                              RETURNING id, title, description, priority, status, village_id, created_at, created_by
                          )
                          SELECT i.id, i.title, i.description, i.priority, i.status, i.village_id, COALESCE(v.name, '') AS village_name, i.created_at, i.created_by
                          FROM inserted i
                          LEFT JOIN villages v ON i.village_id = v.id";

/**
 * SQL statement overwriting the mutable fields of an atensi.
 */
const UPDATE_ATENSI: &str = "UPDATE atensi SET title = $1, description = $2, priority = $3, status = $4, village_id = $5 WHERE id = $6";

/**
 * SQL statement deleting an atensi.
 */
const DELETE_ATENSI: &str = "DELETE FROM atensi WHERE id = $1";

/**
 * DAO for atensi-related database operations.
 */
pub struct AtensiDao {}

impl AtensiDao {
    /**
     * Creates a new instance of `AtensiDao`.
     */
    pub fn new() -> Self {
        AtensiDao {}
    }

    /**
     * Retrieves the most recently created atensi, at most `ATENSI_PAGE_SIZE` of them.
     *
     * # Arguments
     * `connection`: The database connection.
     *
     * # Returns
     * A Result containing the atensi newest first or an `ApplicationError`.
     */
    #[instrument(skip(self, connection))]
    pub async fn get_atensi_list(&self, connection: &mut PgConnection) -> Result<Vec<AtensiDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<AtensiDbResp> = sqlx::query_as(QUERY_ATENSI_LIST)
            .bind(ATENSI_PAGE_SIZE)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get atensi list: {err}")))?;
        Ok(results.into_iter().map(AtensiDetailType::from).collect())
    }

    /**
     * Retrieves a single atensi.
     *
     * # Arguments
     * `connection`: The database connection.
     * `atensi_id`: The ID of the atensi.
     *
     * # Returns
     * The atensi, or an `ApplicationError` of type `NotFound` if no row matches.
     */
    #[instrument(skip(self, connection))]
    pub async fn get_atensi(&self, connection: &mut PgConnection, atensi_id: i64) -> Result<AtensiDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<AtensiDbResp> = sqlx::query_as(QUERY_ATENSI)
            .bind(atensi_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get atensi: {err}")))?;
        match result {
            Some(row) => Ok(AtensiDetailType::from(row)),
            None => {
                tracing::debug!("Atensi with ID {} not found", atensi_id);
                Err(ApplicationError::new(ErrorType::NotFound, "Atensi not found".to_string()))
            }
        }
    }

    /**
     * Adds a new atensi. The status is always `OPEN` and the creation time is taken from the database clock.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the statement within.
     * `atensi_add_input`: The fields of the new atensi.
     *
     * # Returns
     * The persisted atensi including its assigned id.
     */
    #[instrument(skip(self, transaction))]
    pub async fn add_atensi(&self, transaction: &mut PgConnection, atensi_add_input: AtensiAddInputType) -> Result<AtensiDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: AtensiDbResp = sqlx::query_as(ADD_ATENSI)
            .bind(atensi_add_input.title)
            .bind(atensi_add_input.description)
            .bind(atensi_add_input.priority)
            .bind(STATUS_OPEN)
            .bind(atensi_add_input.village_id)
            .bind(atensi_add_input.created_by)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute statement to add atensi: {err}")))?;
        Ok(AtensiDetailType::from(row))
    }

    /**
     * Overwrites title, description, priority, status and village of an atensi.
     * Updating a missing id affects no rows and is not an error.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the statement within.
     * `atensi_id`: The ID of the atensi to update.
     * `atensi_update_input`: The new field values.
     */
    #[instrument(skip(self, transaction))]
    pub async fn update_atensi(&self, transaction: &mut PgConnection, atensi_id: i64, atensi_update_input: AtensiUpdateInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_ATENSI)
            .bind(atensi_update_input.title)
            .bind(atensi_update_input.description)
            .bind(atensi_update_input.priority)
            .bind(atensi_update_input.status)
            .bind(atensi_update_input.village_id)
            .bind(atensi_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute statement to update atensi: {err}")))?;
        if result.rows_affected() == 0 {
            tracing::debug!("Atensi with ID {} not found for update", atensi_id);
        }
        Ok(())
    }

    /**
     * Deletes an atensi. Deleting a missing id is not an error.
     *
     * # Arguments
     * `transaction`: The database transaction to execute the statement within.
     * `atensi_id`: The ID of the atensi to delete.
     */
    #[instrument(skip(self, transaction))]
    pub async fn delete_atensi(&self, transaction: &mut PgConnection, atensi_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_ATENSI)
            .bind(atensi_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute statement to delete atensi: {err}")))?;
        if result.rows_affected() == 0 {
            tracing::debug!("Atensi with ID {} not found for deletion", atensi_id);
        }
        Ok(())
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::{insert_atensi_at, insert_village};
    use crate::model::models::STATUS_CLOSED;
    use sqlx::PgPool;

    fn add_input(title: &str, village_id: Option<i64>) -> AtensiAddInputType {
        AtensiAddInputType { title: title.to_string(), description: "Reported by village head".to_string(), priority: "HIGH".to_string(), village_id, created_by: "alice".to_string() }
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_add_then_get_atensi(pool: PgPool) {
        insert_village(&pool, 1, "Sukamaju", true).await;
        let atensi_dao = AtensiDao::new();
        let mut transaction = pool.begin().await.unwrap();
        let added = atensi_dao.add_atensi(&mut transaction, add_input("Road damage", Some(1))).await.unwrap();
        transaction.commit().await.unwrap();
        assert_eq!(added.status, STATUS_OPEN);
        assert_eq!(added.village_name, "Sukamaju");

        let mut connection = pool.acquire().await.unwrap();
        let fetched = atensi_dao.get_atensi(&mut connection, added.id).await.unwrap();
        assert_eq!(fetched, added);
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_get_missing_atensi(pool: PgPool) {
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let result = atensi_dao.get_atensi(&mut connection, 4711).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_atensi_without_village_has_empty_name(pool: PgPool) {
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let added = atensi_dao.add_atensi(&mut connection, add_input("Flood", None)).await.unwrap();
        assert_eq!(added.village_id, None);
        assert_eq!(added.village_name, "");
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_atensi_with_unknown_village_has_empty_name(pool: PgPool) {
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let added = atensi_dao.add_atensi(&mut connection, add_input("Landslide", Some(999))).await.unwrap();
        assert_eq!(added.village_id, Some(999));
        assert_eq!(added.village_name, "");

        let fetched = atensi_dao.get_atensi(&mut connection, added.id).await.unwrap();
        assert_eq!(fetched, added);
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_list_is_limited_and_newest_first(pool: PgPool) {
        insert_village(&pool, 1, "Sukamaju", true).await;
        for minutes_ago in 0..25 {
            insert_atensi_at(&pool, &format!("Atensi {minutes_ago}"), STATUS_OPEN, Some(1), minutes_ago).await;
        }
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let list = atensi_dao.get_atensi_list(&mut connection).await.unwrap();
        assert_eq!(list.len(), 20);
        assert_eq!(list.first().unwrap().title, "Atensi 0");
        assert_eq!(list.last().unwrap().title, "Atensi 19");
        assert!(list.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_update_overwrites_fields(pool: PgPool) {
        insert_village(&pool, 1, "Sukamaju", true).await;
        insert_village(&pool, 2, "Mekarsari", true).await;
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let added = atensi_dao.add_atensi(&mut connection, add_input("Road damage", Some(1))).await.unwrap();
        let update_input = AtensiUpdateInputType {
            title: "Road repaired".to_string(),
            description: "Done".to_string(),
            priority: "LOW".to_string(),
            status: STATUS_CLOSED.to_string(),
            village_id: Some(2),
        };
        atensi_dao.update_atensi(&mut connection, added.id, update_input).await.unwrap();
        let updated = atensi_dao.get_atensi(&mut connection, added.id).await.unwrap();
        assert_eq!(updated.title, "Road repaired");
        assert_eq!(updated.status, STATUS_CLOSED);
        assert_eq!(updated.village_name, "Mekarsari");
        assert_eq!(updated.created_at, added.created_at);
        assert_eq!(updated.created_by, "alice");
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_update_and_delete_missing_atensi_succeed(pool: PgPool) {
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let update_input = AtensiUpdateInputType { title: String::new(), description: String::new(), priority: String::new(), status: STATUS_CLOSED.to_string(), village_id: None };
        assert!(atensi_dao.update_atensi(&mut connection, 4711, update_input).await.is_ok());
        assert!(atensi_dao.delete_atensi(&mut connection, 4711).await.is_ok());
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_add_then_delete_atensi(pool: PgPool) {
        let atensi_dao = AtensiDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let added = atensi_dao.add_atensi(&mut connection, add_input("Bridge", None)).await.unwrap();
        atensi_dao.delete_atensi(&mut connection, added.id).await.unwrap();
        let result = atensi_dao.get_atensi(&mut connection, added.id).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }
}
