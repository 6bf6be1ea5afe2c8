//! Roster import and search endpoints

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use carometro_common::events::RosterEvent;
use carometro_common::roster::{parse_roster_csv, ImportSummary};
use carometro_common::Student;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;

/// Response to a CSV import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub summary: ImportSummary,
    pub students: Vec<Student>,
}

/// Query parameters for roster listing
#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    /// Search term; empty or absent lists everything
    #[serde(default)]
    pub q: String,
}

/// Roster listing response
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    /// Records on the roster
    pub total: usize,
    /// Records matching `query`
    pub matched: usize,
    /// Records with a saved photo
    pub photographed: usize,
    pub query: String,
    pub students: Vec<Student>,
}

/// POST /api/roster/import
///
/// Body is the raw CSV text. The roster is replaced wholesale.
pub async fn import_roster(State(state): State<AppState>, body: String) -> Json<ImportResponse> {
    let parsed = parse_roster_csv(&body);
    let summary = parsed.summary;

    {
        let mut roster = state.roster.write().await;
        roster.replace(parsed.students.clone());
    }

    info!(
        "Roster imported: {} students ({} header lines, {} malformed lines skipped)",
        summary.imported, summary.headers_skipped, summary.malformed_lines
    );
    state
        .event_bus
        .emit_lossy(RosterEvent::roster_imported(&summary));

    Json(ImportResponse {
        summary,
        students: parsed.students,
    })
}

/// GET /api/roster?q=term
///
/// Case-insensitive substring match on name or id.
pub async fn list_roster(
    State(state): State<AppState>,
    Query(query): Query<RosterQuery>,
) -> Json<RosterResponse> {
    let roster = state.roster.read().await;
    let students = roster.filter(&query.q);

    Json(RosterResponse {
        total: roster.len(),
        matched: students.len(),
        photographed: roster.photographed(),
        query: query.q,
        students,
    })
}

/// Build roster routes
pub fn roster_routes() -> Router<AppState> {
    Router::new()
        .route("/api/roster", get(list_roster))
        .route("/api/roster/import", post(import_roster))
}
