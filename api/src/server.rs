use anyhow::Context;
use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
};
use certvault_common::views::ApiErrorResponse;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::{
    ToSchema,
    openapi::{Info, License, OpenApi, RefOr, path::Operation},
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    config::CertVaultConfig,
    context::ApiContext,
    handlers::{self, certificates},
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application from its configuration, opening the on-disk stores.
pub async fn make(cfg: &CertVaultConfig) -> anyhow::Result<(Router, OpenApi)> {
    let allow_origin = cfg
        .public_url
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid public URL {:?}", cfg.public_url))?;

    let context = ApiContext::from_config(cfg).await?;

    Ok(router(context, allow_origin))
}

pub fn router(context: ApiContext, allow_origin: HeaderValue) -> (Router, OpenApi) {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
            let span = info_span!(
                "http_request",
                method = req.method().to_string(),
                request_id = Option::<&str>::None,
                path = Option::<&str>::None,
            );

            if let Some(request_id) = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
            {
                span.record("request_id", request_id);
            }

            if let Some(path) = req.extensions().get::<MatchedPath>() {
                span.record("path", path.as_str())
            } else {
                span.record("path", req.uri().path())
            };

            span
        }))
        .layer(CorsLayer::new().allow_origin(allow_origin))
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let openapi = OpenApi::builder()
        .info(
            Info::builder()
                .title("CertVault API Reference")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some(
                    "Store, validate and inspect X.509 certificate and private key pairs.",
                ))
                .license(Some(
                    License::builder()
                        .name("Apache 2.0 License")
                        .identifier(Some(env!("CARGO_PKG_LICENSE")))
                        .build(),
                )),
        )
        .build();

    let (r, mut a) = OpenApiRouter::with_openapi(openapi)
        .routes(routes!(
            certificates::list_certificates,
            certificates::upload_certificate
        ))
        .routes(routes!(certificates::list_parent_certificates))
        .routes(routes!(
            certificates::get_certificate,
            certificates::update_certificate,
            certificates::delete_certificate
        ))
        .routes(routes!(certificates::download_certificate))
        .routes(routes!(certificates::download_key))
        .routes(routes!(certificates::download_bundle))
        .route("/api/v1/health", get(handlers::health_check))
        .layer(middleware)
        .with_state(context)
        .split_for_parts();

    a.paths.paths.iter_mut().for_each(|(_path, item)| {
        apply_default_errors(&mut item.get);
        apply_default_errors(&mut item.post);
        apply_default_errors(&mut item.put);
        apply_default_errors(&mut item.delete);
    });

    (r, a)
}

fn apply_default_errors(item: &mut Option<Operation>) {
    if let Some(item) = item {
        item.responses.responses.insert(
            "500".into(),
            RefOr::Ref(
                utoipa::openapi::Ref::builder()
                    .summary("Internal server error")
                    .ref_location_from_schema_name(ApiErrorResponse::name())
                    .build(),
            ),
        );
    }
}
