//! Photo persistence endpoint
//!
//! POST /api/save-photo writes the captured still to
//! `<photos_dir>/<matricula>_<name>.jpg`, then points every roster record
//! with that matrícula at the new file.
//!
//! The body is parsed as JSON whatever the `Content-Type` says. Identity
//! fields may be strings, numbers or `true`; null, `""`, `false` and `0`
//! count as missing.

use axum::{body::Bytes, extract::State, Json};
use carometro_common::events::RosterEvent;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::MISSING_FIELDS;
use crate::{ApiError, ApiResult, AppState};

/// Successful save
#[derive(Debug, Serialize)]
pub struct SavePhotoResponse {
    pub success: bool,
    /// Public path, e.g. `/photos/1001_Ana Souza.jpg`
    pub path: String,
    pub filename: String,
}

/// Fields of a save request after validation
#[derive(Debug, PartialEq, Eq)]
struct SavePhotoFields {
    matricula: String,
    name: String,
    image: String,
}

/// Text form of a scalar field, `None` when the value is falsy
fn field_text(value: Option<&Value>, field: &str) -> ApiResult<Option<String>> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok((i != 0).then(|| i.to_string()));
            }
            if let Some(u) = n.as_u64() {
                return Ok(Some(u.to_string()));
            }
            match n.as_f64() {
                Some(f) if f == 0.0 => Ok(None),
                // 1e3 and 1000 name the same file
                Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(Some(format!("{}", f as i64))),
                Some(f) => Ok(Some(f.to_string())),
                None => Ok(Some(n.to_string())),
            }
        }
        Some(other) => Err(ApiError::SaveFailed(format!(
            "{} has unsupported type: {}",
            field, other
        ))),
    }
}

/// Parse and validate a raw request body
fn parse_request(body: &[u8]) -> ApiResult<SavePhotoFields> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::SaveFailed(format!("Invalid JSON body: {}", e)))?;
    if payload.is_null() {
        return Err(ApiError::SaveFailed("Request body is null".to_string()));
    }

    let matricula = field_text(payload.get("matricula"), "matricula")?;
    let name = field_text(payload.get("name"), "name")?;
    // The image is decoded as text, so only strings make sense here
    let image = match payload.get("image") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        other => field_text(other, "image")?.map(|_| String::new()),
    };

    match (matricula, name, image) {
        (Some(matricula), Some(name), Some(image)) if !image.is_empty() => Ok(SavePhotoFields {
            matricula,
            name,
            image,
        }),
        (Some(_), Some(_), Some(_)) => {
            Err(ApiError::SaveFailed("image is not a string".to_string()))
        }
        _ => Err(ApiError::BadRequest(MISSING_FIELDS.to_string())),
    }
}

/// POST /api/save-photo
///
/// **Request:** `{"matricula": "...", "name": "...", "image": "data:image/jpeg;base64,..."}`
/// **Response:** `{"success": true, "path": "/photos/<file>", "filename": "<file>"}`
///
/// **Errors:**
/// - 400 Bad Request: a field is missing or falsy, or the identity contains a path separator
/// - 413 Payload Too Large: body exceeds the configured upload limit
/// - 500 Internal Server Error: unparsable body, undecodable image, or write failure
pub async fn save_photo(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SavePhotoResponse>> {
    let SavePhotoFields {
        matricula,
        name,
        image,
    } = parse_request(&body)?;

    let saved = state.photos.save(&matricula, &name, &image).await?;

    let records_updated = state
        .roster
        .write()
        .await
        .set_photo_url(&matricula, &saved.path);
    if records_updated == 0 {
        warn!(
            "Saved photo for matricula {} which is not on the current roster",
            matricula
        );
    }
    info!("Saved photo {} ({} roster records updated)", saved.path, records_updated);

    state.event_bus.emit_lossy(RosterEvent::PhotoSaved {
        matricula,
        name,
        path: saved.path.clone(),
        records_updated,
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(SavePhotoResponse {
        success: true,
        path: saved.path,
        filename: saved.filename,
    }))
}
