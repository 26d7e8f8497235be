use sqlx::{Pool, Postgres};

use crate::{
    dao::dashboard::DashboardDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::DashboardStatsType,
    },
};

/**
 * Represents the service for the dashboard counters.
 */
pub struct DashboardService {
    dashboard_dao: DashboardDao,
    connection_pool: Pool<Postgres>,
}

impl DashboardService {
    pub fn new(dashboard_dao: DashboardDao, connection_pool: Pool<Postgres>) -> Self {
        DashboardService { dashboard_dao, connection_pool }
    }

    /**
     * Retrieves the dashboard counters.
     *
     * # Returns
     * A Result containing `DashboardStatsType` or an `ApplicationError`.
     */
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStatsType, ApplicationError> {
        let mut connection = self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))?;
        let stats = self.dashboard_dao.get_dashboard_stats(&mut connection).await?;
        if stats.unclassified_atensi() != 0 {
            tracing::debug!("{} atensi are neither open nor closed", stats.unclassified_atensi());
        }
        Ok(stats)
    }
}
