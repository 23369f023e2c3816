//! Bound kind of a stored score

/// What a transposition table score means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Bound {
    /// Empty slot
    #[default]
    None = 0,
    /// All-node: no move raised alpha, the true value is at most this
    Upper = 1,
    /// Cut-node: failed high, the true value is at least this
    Lower = 2,
    /// PV-node: exact value
    Exact = 3,
}

impl Bound {
    /// Whether a stored `score` can end the search of a node with window
    /// (`alpha`, `beta`)
    #[inline]
    pub const fn can_cutoff(self, score: i32, alpha: i32, beta: i32) -> bool {
        match self {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
            Bound::None => false,
        }
    }

    #[inline]
    pub const fn from_u8(n: u8) -> Option<Bound> {
        match n {
            0 => Some(Bound::None),
            1 => Some(Bound::Upper),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Exact),
            _ => None,
        }
    }
}
