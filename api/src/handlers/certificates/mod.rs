use std::io::{Cursor, Write};

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use certvault_common::{
    params::{UpdateCertificateParams, UploadCertificateParams},
    views::{Certificate, CertificateDetails, PaginatedList},
};
use certvault_db::{
    blobs::{BlobError, sanitize_filename},
    models::DbCertificate,
    storage::CertificateFilter,
};
use chrono::Utc;
use tracing::{info, instrument, warn};
use ulid::Ulid;
use zip::{ZipWriter, result::ZipResult, write::SimpleFileOptions};

use crate::{context::ApiContext, error::ApiError};


const ALLOWED_EXTENSIONS: [&str; 3] = ["crt", "key", "pem"];
const PEM_CONTENT_TYPE: &str = "application/x-pem-file";
const ZIP_CONTENT_TYPE: &str = "application/zip";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sanitize an uploaded file name and check its extension.
fn upload_filename(name: &str) -> Result<String, ApiError> {
    let filename = sanitize_filename(name);

    let allowed = filename
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| {
            !stem.is_empty() && ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        });

    if allowed {
        Ok(filename)
    } else {
        Err(ApiError::bad_request(format!(
            "File name {name:?} must end in .crt, .key or .pem"
        )))
    }
}

/// Gate a certificate/key pair before anything is written. The pair must
/// match and the certificate must decode in full.
fn check_pair(cert_pem: &[u8], key_pem: &[u8]) -> Result<(), ApiError> {
    if !certvault_x509::validate(cert_pem, key_pem) {
        return Err(ApiError::InvalidKeyPair);
    }

    let metadata = certvault_x509::inspect(cert_pem)
        .map_err(|e| ApiError::bad_request(format!("Invalid certificate: {e}")))?;

    if metadata.is_expired_at(Utc::now()) {
        warn!(valid_to = %metadata.valid_to, "Accepting an expired certificate");
    }

    Ok(())
}

/// Parent references are not enforced. A dangling or non-CA parent is logged
/// and stored as given.
async fn note_parent(ctx: &ApiContext, id: Option<u64>, parent_id: Option<u64>) {
    let Some(parent_id) = parent_id else {
        return;
    };

    if id == Some(parent_id) {
        warn!(parent_id, "Certificate names itself as parent");
        return;
    }

    match ctx.db.get(parent_id).await {
        Ok(Some(parent)) if parent.certificate_type.is_parent_eligible() => {}
        Ok(Some(parent)) => warn!(
            parent_id,
            parent_type = %parent.certificate_type,
            "Parent certificate is not a CA"
        ),
        Ok(None) => warn!(parent_id, "Parent certificate does not exist"),
        Err(e) => warn!(parent_id, "Failed to look up parent certificate: {}", e),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn find(ctx: &ApiContext, id: u64) -> Result<DbCertificate, ApiError> {
    ctx.db.get(id).await?.ok_or(ApiError::NotFound)
}

/// Write a pair under a fresh per-upload directory. Nothing is left behind
/// when either write fails.
async fn store_pair(
    ctx: &ApiContext,
    cert_filename: &str,
    key_filename: &str,
    cert_pem: &[u8],
    key_pem: &[u8],
) -> Result<(String, String), ApiError> {
    let upload_id = Ulid::new();
    let cert_path = format!("{upload_id}/{cert_filename}");
    let key_path = format!("{upload_id}/{key_filename}");

    ctx.blobs.put(&cert_path, cert_pem).await?;
    if let Err(e) = ctx.blobs.put(&key_path, key_pem).await {
        discard_blobs(ctx, [&cert_path]).await;
        return Err(e.into());
    }

    Ok((cert_path, key_path))
}

/// Best-effort removal of blobs no record points at.
async fn discard_blobs<'a>(ctx: &ApiContext, keys: impl IntoIterator<Item = &'a String>) {
    for key in keys {
        match ctx.blobs.delete(key).await {
            Ok(()) | Err(BlobError::NotFound(_)) => {}
            Err(e) => warn!("Failed to clean up {}: {}", key, e),
        }
    }
}

fn attachment(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn bundle_filename(cert_filename: &str) -> String {
    let stem = cert_filename
        .rsplit_once('.')
        .map_or(cert_filename, |(stem, _)| stem);
    format!("{stem}_cert_bundle.zip")
}

/// A ZIP archive holding each file under its own name.
fn zip_bundle(files: &[(&str, &[u8])]) -> ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in files {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Upload a certificate and its private key.
///
/// The pair is rejected unless the key matches the certificate. When no title
/// is given, the certificate's Common Name is used.
#[utoipa::path(
    post,
    path = "/api/v1/certificates",
    tags = ["certificates"],
    request_body = UploadCertificateParams,
    responses(
        (status = 201, description = "Certificate stored", body = Certificate),
        (status = 400, description = "Invalid file name, certificate or key pair"),
    )
)]
#[instrument(skip(ctx, params))]
pub async fn upload_certificate(
    State(ctx): State<ApiContext>,
    Json(params): Json<UploadCertificateParams>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    let cert_filename = upload_filename(&params.cert_filename)?;
    let key_filename = upload_filename(&params.key_filename)?;
    if cert_filename == key_filename {
        return Err(ApiError::bad_request(
            "Certificate and key must have different file names",
        ));
    }

    let cert_pem = params.cert_pem.as_bytes();
    let key_pem = params.key_pem.as_bytes();
    check_pair(cert_pem, key_pem)?;

    let title =
        non_empty(params.title).unwrap_or_else(|| certvault_x509::common_name_of(cert_pem));
    note_parent(&ctx, None, params.parent_id).await;

    let (cert_path, key_path) =
        store_pair(&ctx, &cert_filename, &key_filename, cert_pem, key_pem).await?;

    let record = DbCertificate {
        id: None,
        title,
        cert_filename,
        key_filename,
        cert_path,
        key_path,
        expiration_date: certvault_x509::expiration_of(cert_pem),
        uploaded_at: Utc::now(),
        certificate_type: params.certificate_type,
        parent_id: params.parent_id,
    };

    let created = match ctx.db.insert(record.clone()).await {
        Ok(created) => created,
        Err(e) => {
            discard_blobs(&ctx, [&record.cert_path, &record.key_path]).await;
            return Err(e.into());
        }
    };

    info!(
        id = created.id,
        expiration_date = ?created.expiration_date,
        "Certificate uploaded"
    );

    Ok((StatusCode::CREATED, Json(Certificate::try_from(created)?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates",
    tags = ["certificates"],
    responses(
        (status = 200, description = "All stored certificates", body = PaginatedList<Certificate>),
    )
)]
pub async fn list_certificates(
    State(ctx): State<ApiContext>,
) -> Result<Json<PaginatedList<Certificate>>, ApiError> {
    let items = ctx
        .db
        .list(CertificateFilter::default())
        .await?
        .into_iter()
        .map(Certificate::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(items.into()))
}

/// Certificates that may be chosen as the parent of another certificate:
/// those typed Intermediate CA or Root CA.
#[utoipa::path(
    get,
    path = "/api/v1/certificates/parents",
    tags = ["certificates"],
    responses(
        (
            status = 200,
            description = "Parent-eligible certificates",
            body = PaginatedList<Certificate>
        ),
    )
)]
pub async fn list_parent_certificates(
    State(ctx): State<ApiContext>,
) -> Result<Json<PaginatedList<Certificate>>, ApiError> {
    let items = ctx
        .db
        .list(CertificateFilter::parents())
        .await?
        .into_iter()
        .map(Certificate::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(items.into()))
}

/// A stored certificate with its decoded metadata, its parent and the stored
/// PEM text.
#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}",
    tags = ["certificates"],
    params(("id" = u64, Path, description = "Certificate identifier")),
    responses(
        (status = 200, description = "Certificate details", body = CertificateDetails),
        (status = 404, description = "Not found"),
        (status = 422, description = "Stored certificate cannot be decoded"),
    )
)]
#[instrument(skip(ctx))]
pub async fn get_certificate(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<CertificateDetails>, ApiError> {
    let record = find(&ctx, id).await?;

    let cert_pem = ctx.blobs.get(&record.cert_path).await?;
    let key_pem = ctx.blobs.get(&record.key_path).await?;
    let metadata = certvault_x509::inspect(&cert_pem)?;

    let parent = match record.parent_id {
        Some(parent_id) => ctx
            .db
            .get(parent_id)
            .await?
            .map(Certificate::try_from)
            .transpose()?,
        None => None,
    };

    Ok(Json(CertificateDetails {
        certificate: Certificate::try_from(record)?,
        parent,
        metadata,
        cert_pem: String::from_utf8_lossy(&cert_pem).into_owned(),
        key_pem: String::from_utf8_lossy(&key_pem).into_owned(),
    }))
}

/// Replace the certificate and key of a stored pair.
///
/// The new pair is validated before anything is written and stored beside the
/// old one. The record is switched over to it in a single store update, and
/// only then are the old files removed. The expiration date is re-derived
/// from the new certificate.
#[utoipa::path(
    put,
    path = "/api/v1/certificates/{id}",
    tags = ["certificates"],
    params(("id" = u64, Path, description = "Certificate identifier")),
    request_body = UpdateCertificateParams,
    responses(
        (status = 200, description = "Certificate updated", body = Certificate),
        (status = 400, description = "Invalid certificate or key pair"),
        (status = 404, description = "Not found"),
    )
)]
#[instrument(skip(ctx, params))]
pub async fn update_certificate(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
    Json(params): Json<UpdateCertificateParams>,
) -> Result<Json<Certificate>, ApiError> {
    let existing = find(&ctx, id).await?;

    let cert_pem = params.cert_pem.as_bytes();
    let key_pem = params.key_pem.as_bytes();
    check_pair(cert_pem, key_pem)?;
    note_parent(&ctx, Some(id), params.parent_id).await;

    let (cert_path, key_path) = store_pair(
        &ctx,
        &existing.cert_filename,
        &existing.key_filename,
        cert_pem,
        key_pem,
    )
    .await?;

    let old_paths = [existing.cert_path.clone(), existing.key_path.clone()];
    let title = non_empty(params.title).unwrap_or_else(|| existing.title.clone());
    let certificate_type = params
        .certificate_type
        .unwrap_or(existing.certificate_type);

    let change = DbCertificate {
        title,
        cert_path,
        key_path,
        expiration_date: certvault_x509::expiration_of(cert_pem),
        certificate_type,
        parent_id: params.parent_id,
        ..existing
    };

    let updated = match ctx.db.update(id, change.clone()).await {
        Ok(updated) => updated,
        Err(e) => {
            discard_blobs(&ctx, [&change.cert_path, &change.key_path]).await;
            return Err(e.into());
        }
    };
    discard_blobs(&ctx, &old_paths).await;

    info!(
        expiration_date = ?updated.expiration_date,
        "Certificate updated"
    );

    Ok(Json(Certificate::try_from(updated)?))
}

/// Delete a stored pair and its files.
#[utoipa::path(
    delete,
    path = "/api/v1/certificates/{id}",
    tags = ["certificates"],
    params(("id" = u64, Path, description = "Certificate identifier")),
    responses(
        (status = 204, description = "Certificate deleted"),
        (status = 404, description = "Not found"),
    )
)]
#[instrument(skip(ctx))]
pub async fn delete_certificate(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let record = find(&ctx, id).await?;

    for key in [&record.cert_path, &record.key_path] {
        match ctx.blobs.delete(key).await {
            Ok(()) | Err(BlobError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let removed = ctx.db.remove(id).await?;
    info!(certificate = %removed, "Certificate deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/certificate",
    tags = ["certificates"],
    params(("id" = u64, Path, description = "Certificate identifier")),
    responses(
        (
            status = 200,
            description = "PEM certificate",
            content_type = "application/x-pem-file",
            body = String
        ),
        (status = 404, description = "Not found"),
    )
)]
pub async fn download_certificate(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let record = find(&ctx, id).await?;
    let bytes = ctx.blobs.get(&record.cert_path).await?;

    Ok(attachment(&record.cert_filename, PEM_CONTENT_TYPE, bytes))
}

#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/key",
    tags = ["certificates"],
    params(("id" = u64, Path, description = "Certificate identifier")),
    responses(
        (
            status = 200,
            description = "PEM private key",
            content_type = "application/x-pem-file",
            body = String
        ),
        (status = 404, description = "Not found"),
    )
)]
pub async fn download_key(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let record = find(&ctx, id).await?;
    let bytes = ctx.blobs.get(&record.key_path).await?;

    Ok(attachment(&record.key_filename, PEM_CONTENT_TYPE, bytes))
}

/// The certificate and its private key as a ZIP archive, each under its
/// uploaded file name.
#[utoipa::path(
    get,
    path = "/api/v1/certificates/{id}/bundle",
    tags = ["certificates"],
    params(("id" = u64, Path, description = "Certificate identifier")),
    responses(
        (
            status = 200,
            description = "ZIP bundle",
            content_type = "application/zip",
            body = Vec<u8>
        ),
        (status = 404, description = "Not found"),
    )
)]
pub async fn download_bundle(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let record = find(&ctx, id).await?;

    let cert_pem = ctx.blobs.get(&record.cert_path).await?;
    let key_pem = ctx.blobs.get(&record.key_path).await?;

    let bundle = zip_bundle(&[
        (record.cert_filename.as_str(), cert_pem.as_slice()),
        (record.key_filename.as_str(), key_pem.as_slice()),
    ])
    .map_err(anyhow::Error::from)?;

    Ok(attachment(
        &bundle_filename(&record.cert_filename),
        ZIP_CONTENT_TYPE,
        bundle,
    ))
}
