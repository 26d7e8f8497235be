use chrono::{DateTime, Utc};

/**
 * Status given to every newly created atensi.
 */
pub const STATUS_OPEN: &str = "OPEN";

/**
 * Status of a resolved atensi.
 */
pub const STATUS_CLOSED: &str = "CLOSED";

/**
 * Number of atensi returned by the list operation, newest first.
 */
pub const ATENSI_PAGE_SIZE: i64 = 20;

/**
 * Database row for an atensi joined with its village name.
 * (id, title, description, priority, status, village_id, village_name, created_at, created_by)
 */
pub type AtensiDbResp = (i64, String, String, String, String, Option<i64>, String, DateTime<Utc>, String);

/**
 * Database row for a village.
 * (id, name, pemda, head_name, phone, email, population, is_active)
 */
pub type VillageDbResp = (i64, String, String, String, String, String, i64, bool);

/**
 * An atensi as read from the store.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct AtensiDetailType {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub village_id: Option<i64>,
    /**
     * Name of the referenced village, empty when the village is missing.
     */
    pub village_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl From<AtensiDbResp> for AtensiDetailType {
    fn from(row: AtensiDbResp) -> Self {
        let (id, title, description, priority, status, village_id, village_name, created_at, created_by) = row;
        AtensiDetailType { id, title, description, priority, status, village_id, village_name, created_at, created_by }
    }
}

/**
 * Input for creating an atensi. Status and creation time are set by the store.
 */
#[derive(Debug, Clone)]
pub struct AtensiAddInputType {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub village_id: Option<i64>,
    pub created_by: String,
}

/**
 * Input for overwriting an atensi. `created_by` and `created_at` are immutable and not part of it.
 */
#[derive(Debug, Clone)]
pub struct AtensiUpdateInputType {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub village_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VillageDetailType {
    pub id: i64,
    pub name: String,
    pub pemda: String,
    pub head_name: String,
    pub phone: String,
    pub email: String,
    pub population: i64,
    pub is_active: bool,
}

impl From<VillageDbResp> for VillageDetailType {
    fn from(row: VillageDbResp) -> Self {
        let (id, name, pemda, head_name, phone, email, population, is_active) = row;
        VillageDetailType { id, name, pemda, head_name, phone, email, population, is_active }
    }
}

/**
 * Dashboard counters. Each count comes from its own query, so the values are not a consistent snapshot.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStatsType {
    pub total_atensi: i64,
    pub open_atensi: i64,
    pub closed_atensi: i64,
    /**
     * Active villages only.
     */
    pub total_villages: i64,
}

impl DashboardStatsType {
    pub fn new(total_atensi: i64, open_atensi: i64, closed_atensi: i64, total_villages: i64) -> Self {
        DashboardStatsType { total_atensi, open_atensi, closed_atensi, total_villages }
    }

    /**
     * Number of atensi counted in the total but neither open nor closed.
     * Non-zero when a status outside OPEN/CLOSED was stored, or when writes landed between the count queries.
     */
    pub fn unclassified_atensi(&self) -> i64 {
        self.total_atensi - self.open_atensi - self.closed_atensi
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_atensi_from_db_row() {
        let created_at = Utc::now();
        let row: AtensiDbResp = (7, "Road damage".to_string(), "Hole".to_string(), "HIGH".to_string(), STATUS_OPEN.to_string(), None, String::new(), created_at, "alice".to_string());
        let atensi = AtensiDetailType::from(row);
        assert_eq!(atensi.id, 7);
        assert_eq!(atensi.title, "Road damage");
        assert_eq!(atensi.village_id, None);
        assert_eq!(atensi.village_name, "");
        assert_eq!(atensi.created_at, created_at);
        assert_eq!(atensi.created_by, "alice");
    }

    #[test]
    fn test_village_from_db_row() {
        let row: VillageDbResp = (3, "Sukamaju".to_string(), "Kab. Bogor".to_string(), "Budi".to_string(), "0812".to_string(), "desa@example.id".to_string(), 1200, false);
        let village = VillageDetailType::from(row);
        assert_eq!(village.id, 3);
        assert_eq!(village.pemda, "Kab. Bogor");
        assert_eq!(village.head_name, "Budi");
        assert_eq!(village.population, 1200);
        assert!(!village.is_active);
    }

    #[test]
    fn test_dashboard_stats_consistent() {
        let stats = DashboardStatsType::new(5, 3, 2, 4);
        assert_eq!(stats.unclassified_atensi(), 0);
        assert_eq!(stats.total_atensi, stats.open_atensi + stats.closed_atensi);
    }

    #[test]
    fn test_dashboard_stats_with_unknown_status() {
        // One atensi carries a status outside OPEN/CLOSED.
        let stats = DashboardStatsType::new(6, 3, 2, 4);
        assert_eq!(stats.unclassified_atensi(), 1);
        assert_ne!(stats.total_atensi, stats.open_atensi + stats.closed_atensi);
    }
}
