use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, HealthResponse, MatchQuery, MatchResults, PairScore};
use crate::services::Snapshot;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only view of a snapshot with a name index for lookups
#[derive(Debug)]
pub struct MatchIndex {
    results: MatchResults,
    by_name: HashMap<String, usize>,
}

impl MatchIndex {
    pub fn new(results: MatchResults) -> Self {
        let by_name = results
            .individual_tables
            .iter()
            .enumerate()
            .map(|(idx, table)| (table.name.clone(), idx))
            .collect();

        Self { results, by_name }
    }

    pub fn lookup(&self, name: &str) -> Option<&[PairScore]> {
        self.by_name
            .get(name)
            .map(|&idx| self.results.individual_tables[idx].matches.as_slice())
    }

    pub fn results(&self) -> &MatchResults {
        &self.results
    }
}

impl From<Snapshot> for MatchIndex {
    fn from(snapshot: Snapshot) -> Self {
        Self::new(snapshot.results)
    }
}

/// Application state shared across all handlers
///
/// The index is never mutated after startup, so workers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<MatchIndex>,
}

/// Outcome of a match lookup, independent of the hosting layer
#[derive(Debug, Clone, PartialEq)]
pub enum MatchReply {
    Found(Vec<PairScore>),
    NotFound { name: String },
    Invalid { message: String },
}

impl MatchReply {
    pub fn status(&self) -> StatusCode {
        match self {
            MatchReply::Found(_) => StatusCode::OK,
            MatchReply::NotFound { .. } => StatusCode::NOT_FOUND,
            MatchReply::Invalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = self.status();
        match self {
            MatchReply::Found(matches) => HttpResponse::Ok().json(matches),
            MatchReply::NotFound { name } => HttpResponse::build(status).json(ErrorResponse {
                error: "Name not found".to_string(),
                message: format!("No matches stored for {}", name),
                status_code: status.as_u16(),
            }),
            MatchReply::Invalid { message } => HttpResponse::build(status).json(ErrorResponse {
                error: "Validation failed".to_string(),
                message,
                status_code: status.as_u16(),
            }),
        }
    }
}

/// Look up the stored top matches for the queried name
pub fn handle_match_query(index: &MatchIndex, query: &MatchQuery) -> MatchReply {
    if let Err(errors) = query.validate() {
        return MatchReply::Invalid {
            message: errors.to_string(),
        };
    }

    let name = query.name.as_deref().unwrap_or_default();
    match index.lookup(name) {
        Some(matches) => MatchReply::Found(matches.to_vec()),
        None => {
            tracing::info!("No matches stored for {}", name);
            MatchReply::NotFound {
                name: name.to_string(),
            }
        }
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/get_matches", web::get().to(get_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let results = state.index.results();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        people: results.people_count(),
        pairs: results.matches.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Top matches endpoint
///
/// GET /get_matches?name={name}
///
/// Returns the person's table as
/// ```json
/// [{"Person1": "string", "Person2": "string", "Match Score": 0.0}]
/// ```
async fn get_matches(
    state: web::Data<AppState>,
    query: web::Query<MatchQuery>,
) -> impl Responder {
    handle_match_query(&state.index, &query).into_response()
}
