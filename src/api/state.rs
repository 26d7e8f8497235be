use crate::service::{atensi::AtensiService, dashboard::DashboardService, village::VillageService};

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The atensi service for creating, reading, updating and deleting atensi.
     */
    pub atensi_service: AtensiService,
    /**
     * The village service for village lookups.
     */
    pub village_service: VillageService,
    /**
     * The dashboard service for aggregate counters.
     */
    pub dashboard_service: DashboardService,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `atensi_service`: The atensi service.
 * `village_service`: The village service.
 * `dashboard_service`: The dashboard service.
 */
impl AppState {
    pub fn new(atensi_service: AtensiService, village_service: VillageService, dashboard_service: DashboardService) -> Self {
        AppState { atensi_service, village_service, dashboard_service }
    }
}
