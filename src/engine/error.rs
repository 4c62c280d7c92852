use thiserror::Error;

use crate::state::PresetId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown preset id {0}")]
    UnknownPreset(PresetId),
    #[error("countdown engine is not running")]
    Unavailable,
}
