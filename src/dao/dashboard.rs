use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{DashboardStatsType, STATUS_CLOSED, STATUS_OPEN},
};

const COUNT_ATENSI: &str = "SELECT COUNT(*) FROM atensi";

const COUNT_ATENSI_BY_STATUS: &str = "SELECT COUNT(*) FROM atensi WHERE status = $1";

const COUNT_ACTIVE_VILLAGES: &str = "SELECT COUNT(*) FROM villages WHERE is_active = TRUE";

/**
 * DAO for the dashboard counters.
 */
pub struct DashboardDao {}

impl DashboardDao {
    pub fn new() -> Self {
        DashboardDao {}
    }

    /**
     * Counts all atensi, open atensi, closed atensi and active villages.
     * The four counts are separate statements outside a transaction.
     *
     * # Arguments
     * `connection`: The database connection.
     */
    #[instrument(skip(self, connection))]
    pub async fn get_dashboard_stats(&self, connection: &mut PgConnection) -> Result<DashboardStatsType, ApplicationError> {
        let span = tracing::Span::current();
        let total_atensi: (i64,) = sqlx::query_as(COUNT_ATENSI)
            .fetch_one(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to count atensi: {err}")))?;
        let open_atensi: (i64,) = sqlx::query_as(COUNT_ATENSI_BY_STATUS)
            .bind(STATUS_OPEN)
            .fetch_one(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to count open atensi: {err}")))?;
        let closed_atensi: (i64,) = sqlx::query_as(COUNT_ATENSI_BY_STATUS)
            .bind(STATUS_CLOSED)
            .fetch_one(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to count closed atensi: {err}")))?;
        let total_villages: (i64,) = sqlx::query_as(COUNT_ACTIVE_VILLAGES)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to count active villages: {err}")))?;
        Ok(DashboardStatsType::new(total_atensi.0, open_atensi.0, closed_atensi.0, total_villages.0))
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::{insert_atensi_at, insert_village};
    use sqlx::PgPool;

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_stats_sum_up(pool: PgPool) {
        insert_village(&pool, 1, "Sukamaju", true).await;
        insert_village(&pool, 2, "Mekarsari", true).await;
        insert_village(&pool, 3, "Cibodas", false).await;
        insert_atensi_at(&pool, "Road damage", STATUS_OPEN, Some(1), 3).await;
        insert_atensi_at(&pool, "Flood", STATUS_OPEN, Some(2), 2).await;
        insert_atensi_at(&pool, "Bridge", STATUS_CLOSED, Some(3), 1).await;
        let dashboard_dao = DashboardDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let stats = dashboard_dao.get_dashboard_stats(&mut connection).await.unwrap();
        assert_eq!(stats, DashboardStatsType::new(3, 2, 1, 2));
        assert_eq!(stats.total_atensi, stats.open_atensi + stats.closed_atensi);
    }

    #[sqlx::test(migrations = "./sqlx-postgresql-migration/migrations")]
    async fn test_stats_with_unknown_status(pool: PgPool) {
        insert_atensi_at(&pool, "Road damage", STATUS_OPEN, None, 3).await;
        insert_atensi_at(&pool, "Flood", "IN_PROGRESS", None, 2).await;
        let dashboard_dao = DashboardDao::new();
        let mut connection = pool.acquire().await.unwrap();
        let stats = dashboard_dao.get_dashboard_stats(&mut connection).await.unwrap();
        assert_eq!(stats.total_atensi, 2);
        assert_eq!(stats.open_atensi, 1);
        assert_eq!(stats.closed_atensi, 0);
        assert_eq!(stats.unclassified_atensi(), 1);
    }
}
