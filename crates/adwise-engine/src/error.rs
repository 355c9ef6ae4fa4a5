use thiserror::Error;
use uuid::Uuid;

use adwise_db::DbError;

/// Errors the pipeline is allowed to surface. Signal degradation is handled
/// inside `adwise-signals` and never reaches this enum; only missing
/// preconditions and persistence failures abort a run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no entity found for public id {0}")]
    EntityNotFound(Uuid),
    #[error("channel catalog is empty; seed it before requesting recommendations")]
    EmptyCatalog,
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("failed to encode recommendation payload: {0}")]
    Encode(#[from] serde_json::Error),
}
