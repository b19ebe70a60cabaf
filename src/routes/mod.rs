// Route exports
pub mod matches;

use actix_web::web;

pub use matches::{handle_match_query, AppState, MatchIndex, MatchReply};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(matches::configure);
}
