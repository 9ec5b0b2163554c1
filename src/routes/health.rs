use actix_web::HttpResponse;

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Gateway is up", body = String, example = "OK"))
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

/// The gateway has no landing page.
pub async fn root() -> HttpResponse {
    HttpResponse::Unauthorized().finish()
}
