//! Depth-limited lookahead strategies (MiniMax / MaxMax)
//!
//! The game tree is a chain of alternating choices. At every ply the side to
//! act picks the move that maximizes its *own* payoff against the move it
//! faces, plus the value of the continuation. The opponent is modelled as
//! self-interested rather than adversarial, so every ply is a `max` node.
//!
//! Alpha-beta pruning works on upper bounds: a node's ceiling is the best
//! immediate reply against the move it faces plus the largest payoff for
//! each remaining ply. A node whose ceiling cannot beat `alpha` is cut
//! (fail-low), and a node stops enumerating once `alpha >= beta`. Root values
//! are always exact, so pruning never changes the chosen move.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StrategyError};
use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;
use crate::strategy::{History, Move, Strategy};

const NEG_INF: i64 = -(1 << 40);
const POS_INF: i64 = 1 << 40;

/// How equal root values are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Defect only if strictly better than cooperating
    #[default]
    Cooperate,
    /// Cooperate only if strictly better than defecting
    Defect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pruning {
    #[default]
    AlphaBeta,
    /// Full enumeration; reference for the pruned search
    Exhaustive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookaheadParams {
    /// Plies searched, including the root move
    pub depth: u32,
    #[serde(default)]
    pub tie_break: TieBreak,
    #[serde(default)]
    pub pruning: Pruning,
}

impl LookaheadParams {
    pub fn new(depth: u32) -> Self {
        Self { depth, tie_break: TieBreak::default(), pruning: Pruning::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

/// Value of one root move and the work it took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub value: i64,
    pub nodes: u64,
}

/// The search itself, independent of any match history.
#[derive(Clone, Copy, Debug)]
pub struct Lookahead {
    payoff: PayoffMatrix,
    params: LookaheadParams,
}

impl Lookahead {
    pub fn new(params: LookaheadParams, payoff: PayoffMatrix) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { payoff, params })
    }

    pub fn params(&self) -> &LookaheadParams {
        &self.params
    }

    /// Value of opening with `first` while facing `anchor`.
    pub fn evaluate(&self, first: Move, anchor: Move) -> Evaluation {
        let mut walk = Walk { payoff: &self.payoff, pruning: self.params.pruning, nodes: 1 };
        let gain = self.payoff.score(first, anchor) as i64;
        let rest = walk.search(first, self.params.depth - 1, NEG_INF, POS_INF);
        Evaluation { value: gain + rest, nodes: walk.nodes }
    }

    /// Compare both openings and apply the tie-break.
    pub fn choose(&self, anchor: Move) -> Move {
        let cooperate = self.evaluate(Move::Cooperate, anchor).value;
        let defect = self.evaluate(Move::Defect, anchor).value;
        match self.params.tie_break {
            TieBreak::Cooperate if defect > cooperate => Move::Defect,
            TieBreak::Cooperate => Move::Cooperate,
            TieBreak::Defect if cooperate > defect => Move::Cooperate,
            TieBreak::Defect => Move::Defect,
        }
    }
}

struct Walk<'a> {
    payoff: &'a PayoffMatrix,
    pruning: Pruning,
    nodes: u64,
}

impl Walk<'_> {
    /// Upper bound on any line below a node facing `lookup`.
    fn ceiling(&self, lookup: Move, depth: u32) -> i64 {
        let reply = self
            .payoff
            .score(Move::Cooperate, lookup)
            .max(self.payoff.score(Move::Defect, lookup));
        reply as i64 + (depth as i64 - 1) * self.payoff.max_score() as i64
    }

    /// Best value for the side facing `lookup`. Sides alternate per ply, but
    /// each maximizes its own payoff, so the side is implied by the ply.
    fn search(&mut self, lookup: Move, depth: u32, mut alpha: i64, beta: i64) -> i64 {
        if depth == 0 {
            return 0;
        }
        let prune = self.pruning == Pruning::AlphaBeta;
        let ceiling = self.ceiling(lookup, depth);
        if prune && ceiling <= alpha {
            return ceiling;
        }
        let beta = beta.min(ceiling);

        let mut best = NEG_INF;
        for mv in [Move::Cooperate, Move::Defect] {
            self.nodes += 1;
            let gain = self.payoff.score(mv, lookup) as i64;
            let value = gain + self.search(mv, depth - 1, alpha - gain, beta - gain);
            best = best.max(value);
            if prune {
                alpha = alpha.max(best);
                if alpha >= beta {
                    break;
                }
            }
        }
        best
    }
}

/// Looks ahead from the opponent's last observed move (Cooperate before
/// round 1).
#[derive(Clone, Debug)]
pub struct MiniMax {
    search: Lookahead,
    history: History,
}

impl MiniMax {
    pub const DEFAULT_DEPTH: u32 = 2;

    pub fn new(params: LookaheadParams, payoff: PayoffMatrix) -> Result<Self, ConfigError> {
        Ok(Self { search: Lookahead::new(params, payoff)?, history: History::new() })
    }

    pub fn default_params() -> LookaheadParams {
        LookaheadParams::new(Self::DEFAULT_DEPTH)
    }
}

impl Default for MiniMax {
    fn default() -> Self {
        Self {
            search: Lookahead { payoff: PayoffMatrix::canonical(), params: Self::default_params() },
            history: History::new(),
        }
    }
}

impl Strategy for MiniMax {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        let anchor = self.history.last_opponent().unwrap_or(Move::Cooperate);
        Ok(self.search.choose(anchor))
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// History-blind lookahead: always searches from a cooperative anchor.
#[derive(Clone, Debug)]
pub struct MaxMax {
    search: Lookahead,
}

impl MaxMax {
    pub const DEFAULT_DEPTH: u32 = 5;

    pub fn new(params: LookaheadParams, payoff: PayoffMatrix) -> Result<Self, ConfigError> {
        Ok(Self { search: Lookahead::new(params, payoff)? })
    }

    pub fn default_params() -> LookaheadParams {
        LookaheadParams::new(Self::DEFAULT_DEPTH)
    }
}

impl Default for MaxMax {
    fn default() -> Self {
        Self {
            search: Lookahead { payoff: PayoffMatrix::canonical(), params: Self::default_params() },
        }
    }
}

impl Strategy for MaxMax {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        Ok(self.search.choose(Move::Cooperate))
    }

    fn record_result(&mut self, _own: Move, _opponent: Move) {}
}
