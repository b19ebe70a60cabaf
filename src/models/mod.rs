// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    columns, Cell, EncodedValue, MatchResults, NormalizedPerson, PairScore, PersonRecord,
    PersonTable, RawRow, RawTable, NO_PREFERENCE,
};
pub use requests::MatchQuery;
pub use responses::{ErrorResponse, HealthResponse};
