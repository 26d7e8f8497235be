use actix_web::{
    HttpRequest, HttpResponse, delete, get, post, put,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{AtensiRequest, AtensiResponse, DashboardStatsResponse, VillageResponse},
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        models::{AtensiAddInputType, AtensiUpdateInputType},
    },
};

/**
 * Endpoint to retrieve the 20 newest atensi.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listAtensi", trace_id = get_trace_id(&http_request)))]
#[get("/atensi")]
pub async fn atensi_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let atensi = app_state.atensi_service.get_atensi_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(atensi.into_iter().map(AtensiResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to retrieve a single atensi.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "getAtensi", trace_id = get_trace_id(&http_request)))]
#[get("/atensi/{id}")]
pub async fn atensi_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let atensi_id = path.into_inner();
    let atensi = app_state.atensi_service.get_atensi(atensi_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(AtensiResponse::from(atensi)))
}

/**
 * Add a new atensi. Status is always OPEN regardless of the request.
 */
#[instrument(level = "info", skip(http_request, request_body, app_state), fields(service = "addAtensi", trace_id = get_trace_id(&http_request)))]
#[post("/atensi")]
pub async fn atensi_add(http_request: HttpRequest, request_body: web::Json<AtensiRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let atensi_add_input = AtensiAddInputType::from(request_body.into_inner());
    let atensi = app_state.atensi_service.add_atensi(atensi_add_input).instrument(span).await?;
    Ok(HttpResponse::Created().json(AtensiResponse::from(atensi)))
}

/**
 * Overwrite an atensi.
 */
#[instrument(skip(http_request, request_body, app_state), fields(service = "updateAtensi", trace_id = get_trace_id(&http_request)))]
#[put("/atensi/{id}")]
pub async fn atensi_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<AtensiRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let atensi_id = path.into_inner();
    let atensi_update_input = AtensiUpdateInputType::from(request_body.into_inner());
    app_state.atensi_service.update_atensi(atensi_id, atensi_update_input).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Delete an atensi.
 */
#[instrument(skip(http_request, app_state), fields(service = "deleteAtensi", trace_id = get_trace_id(&http_request)))]
#[delete("/atensi/{id}")]
pub async fn atensi_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let atensi_id = path.into_inner();
    app_state.atensi_service.delete_atensi(atensi_id).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Endpoint to retrieve active villages.
 */
#[instrument(skip(http_request, app_state), fields(service = "listVillages", trace_id = get_trace_id(&http_request)))]
#[get("/villages")]
pub async fn villages_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let villages = app_state.village_service.get_village_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(villages.into_iter().map(VillageResponse::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to retrieve a single village.
 */
#[instrument(skip(http_request, app_state), fields(service = "getVillage", trace_id = get_trace_id(&http_request)))]
#[get("/villages/{id}")]
pub async fn village_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let village_id = path.into_inner();
    let village = app_state.village_service.get_village(village_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(VillageResponse::from(village)))
}

/**
 * Endpoint to retrieve the dashboard counters.
 */
#[instrument(skip(http_request, app_state), fields(service = "dashboardStats", trace_id = get_trace_id(&http_request)))]
#[get("/dashboard/stats")]
pub async fn dashboard_stats(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let stats = app_state.dashboard_service.get_dashboard_stats().instrument(span).await?;
    Ok(HttpResponse::Ok().json(DashboardStatsResponse::from(stats)))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID")
        .and_then(|v| v.to_str().ok().map(std::string::ToString::to_string))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn test_get_trace_id_exists() {
        let request = TestRequest::default()
            .insert_header(("X-Trace-ID", "test"))
            .to_http_request();
        let trace_id = get_trace_id(&request);
        assert_eq!(trace_id, "test");
    }

    #[actix_web::test]
    async fn test_get_trace_id_not_exists() {
        let request = TestRequest::default()
            .to_http_request();
        let trace_id = get_trace_id(&request);
        assert!(!trace_id.is_empty());
    }
}
