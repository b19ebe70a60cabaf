use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for a person's top matches
///
/// `GET /get_matches?name=<name>`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchQuery {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
}

impl MatchQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
