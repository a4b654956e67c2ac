use crate::rules::balls::BallColor;

/// Faults the rules engine absorbs locally. None of them end the session:
/// callers log the error and continue with a safe fallback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RulesError {
    #[error("score update {current} + {delta} is out of range, keeping {current}")]
    InvalidScore { current: i32, delta: i32 },
    #[error("no home position for the {} ball", .0.name())]
    MissingHomePosition(BallColor),
}
