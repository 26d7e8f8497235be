use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{AtensiAddInputType, AtensiDetailType, AtensiUpdateInputType, DashboardStatsType, VillageDetailType},
};

/***************** Atensi models *********************/

/**
 * Request body for creating and updating an atensi.
 *
 * Every field is optional and falls back to an empty value. Unknown fields such as `id`,
 * `createdAt` or `villageName` are ignored. `status` is only honoured on update.
 */
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtensiRequest {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub village_id: Option<i64>,
    pub created_by: String,
}

impl From<AtensiRequest> for AtensiAddInputType {
    fn from(request: AtensiRequest) -> Self {
        AtensiAddInputType { title: request.title, description: request.description, priority: request.priority, village_id: request.village_id, created_by: request.created_by }
    }
}

impl From<AtensiRequest> for AtensiUpdateInputType {
    fn from(request: AtensiRequest) -> Self {
        AtensiUpdateInputType { title: request.title, description: request.description, priority: request.priority, status: request.status, village_id: request.village_id }
    }
}

/**
 * Response structure for a single atensi.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtensiResponse {
    id: i64,
    title: String,
    description: String,
    priority: String,
    status: String,
    village_id: Option<i64>,
    /**
     * Name of the referenced village. Empty when the village is missing.
     */
    village_name: String,
    created_at: DateTime<Utc>,
    created_by: String,
}

impl From<AtensiDetailType> for AtensiResponse {
    fn from(atensi: AtensiDetailType) -> Self {
        AtensiResponse {
            id: atensi.id,
            title: atensi.title,
            description: atensi.description,
            priority: atensi.priority,
            status: atensi.status,
            village_id: atensi.village_id,
            village_name: atensi.village_name,
            created_at: atensi.created_at,
            created_by: atensi.created_by,
        }
    }
}

/***************** Village models *********************/

/**
 * Response structure for a single village.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageResponse {
    id: i64,
    name: String,
    pemda: String,
    head_name: String,
    phone: String,
    email: String,
    population: i64,
    is_active: bool,
}

impl From<VillageDetailType> for VillageResponse {
    fn from(village: VillageDetailType) -> Self {
        VillageResponse {
            id: village.id,
            name: village.name,
            pemda: village.pemda,
            head_name: village.head_name,
            phone: village.phone,
            email: village.email,
            population: village.population,
            is_active: village.is_active,
        }
    }
}

/***************** Dashboard models *********************/

/**
 * Response structure for the dashboard counters.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    total_atensi: i64,
    open_atensi: i64,
    closed_atensi: i64,
    total_villages: i64,
}

impl From<DashboardStatsType> for DashboardStatsResponse {
    fn from(stats: DashboardStatsType) -> Self {
        DashboardStatsResponse { total_atensi: stats.total_atensi, open_atensi: stats.open_atensi, closed_atensi: stats.closed_atensi, total_villages: stats.total_villages }
    }
}

/***************** Error models *********************/

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }

    /**
     * Generates a plain-text error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).insert_header(ContentType::plaintext()).body(self.message.clone())
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::NotFound => StatusCode::NOT_FOUND,
        ErrorType::BadRequest => StatusCode::BAD_REQUEST,
        ErrorType::Initialization | ErrorType::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
