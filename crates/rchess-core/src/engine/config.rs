//! Engine configuration

use crate::search::MAX_DEPTH;
use crate::time::ClockFormat;
use crate::tt::DEFAULT_CAPACITY;
use crate::types::value::CHECKMATE_THRESHOLD;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest iteration a search may reach
    pub max_depth: u32,
    /// Transposition table entries
    pub tt_capacity: usize,
    /// Think on the opponent's time
    pub ponder: bool,
    /// Emit an event after every completed iteration
    pub show_thinking: bool,
    /// Resign when the best score falls below minus this
    pub resign_threshold: i32,
    pub clock_format: ClockFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            tt_capacity: DEFAULT_CAPACITY,
            ponder: false,
            show_thinking: true,
            resign_threshold: CHECKMATE_THRESHOLD,
            clock_format: ClockFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_depth, 128);
        assert_eq!(cfg.tt_capacity, 4_194_304);
        assert!(!cfg.ponder);
        assert!(cfg.show_thinking);
        assert_eq!(cfg.resign_threshold, CHECKMATE_THRESHOLD);
        assert_eq!(
            cfg.clock_format,
            ClockFormat::Tournament {
                moves_per_session: 40,
                base_ms: 1_200_000
            }
        );
    }
}
