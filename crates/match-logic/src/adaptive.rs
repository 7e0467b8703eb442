//! Adaptive strategies that carry beliefs or counters between rounds
//!
//! - [`Harrington`]: a continuous belief in the opponent's patience, with an
//!   exploring / established / given-up state machine.
//! - [`TidemanChieruzzi`]: run-length retaliation plus statistically
//!   triggered "fresh starts".
//! - [`WindowedProbability`]: periodic re-estimation of a cooperation
//!   probability, with a latch for opponents that look random.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{unit_interval, ConfigError, StrategyError};
use crate::payoff::{PayoffMatrix, Score};
use crate::random::SeededRng;
use crate::strategy::{History, Move, Strategy};

// ── Harrington ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefParams {
    /// Starting belief that the opponent is patient
    pub initial_belief: f64,
    /// Belief change per observed opponent move
    pub belief_step: f64,
    /// Give up once belief drops below this
    pub cooperate_threshold: f64,
    /// Give up if cooperation is not established within this many rounds
    pub exploration_rounds: Option<u32>,
}

impl Default for BeliefParams {
    fn default() -> Self {
        Self {
            initial_belief: 0.5,
            belief_step: 0.1,
            cooperate_threshold: 0.3,
            exploration_rounds: None,
        }
    }
}

impl BeliefParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("initial_belief", self.initial_belief)?;
        unit_interval("cooperate_threshold", self.cooperate_threshold)?;
        if !(self.belief_step > 0.0 && self.belief_step <= 1.0) {
            return Err(ConfigError::OutOfRange { field: "belief_step", value: self.belief_step });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeliefPhase {
    Exploring,
    Established,
    /// Absorbing: defect for the rest of the match
    GivenUp,
}

/// Probes with belief-weighted cooperation until mutual cooperation is
/// established, then holds it until the first betrayal.
#[derive(Clone, Debug)]
pub struct Harrington {
    params: BeliefParams,
    history: History,
    belief: f64,
    phase: BeliefPhase,
}

impl Harrington {
    pub fn new(params: BeliefParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            history: History::new(),
            belief: params.initial_belief,
            phase: BeliefPhase::Exploring,
        })
    }

    pub fn belief(&self) -> f64 {
        self.belief
    }

    pub fn phase(&self) -> BeliefPhase {
        self.phase
    }

    fn give_up(&mut self, reason: &str) -> Move {
        debug!("harrington gives up after {} rounds: {}", self.history.len(), reason);
        self.phase = BeliefPhase::GivenUp;
        Move::Defect
    }
}

impl Default for Harrington {
    fn default() -> Self {
        Self {
            params: BeliefParams::default(),
            history: History::new(),
            belief: BeliefParams::default().initial_belief,
            phase: BeliefPhase::Exploring,
        }
    }
}

impl Strategy for Harrington {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        let mv = match self.phase {
            BeliefPhase::GivenUp => Move::Defect,
            BeliefPhase::Established => {
                if self.history.last_opponent() == Some(Move::Defect) {
                    self.give_up("betrayed after cooperation was established")
                } else {
                    Move::Cooperate
                }
            }
            BeliefPhase::Exploring => {
                let budget_spent = self
                    .params
                    .exploration_rounds
                    .is_some_and(|budget| self.history.len() >= budget as usize);
                if self.belief < self.params.cooperate_threshold {
                    self.give_up("belief below threshold")
                } else if budget_spent {
                    self.give_up("exploration budget spent")
                } else if rng.chance(self.belief) {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
        };
        Ok(mv)
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);

        self.belief = match opponent {
            Move::Cooperate => (self.belief + self.params.belief_step).min(1.0),
            Move::Defect => (self.belief - self.params.belief_step).max(0.0),
        };

        if self.phase == BeliefPhase::Exploring
            && own == Move::Cooperate
            && opponent == Move::Cooperate
        {
            self.phase = BeliefPhase::Established;
        }
    }
}

// ── Tideman & Chieruzzi ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshStartParams {
    /// Always defect this close to the end of the match
    pub endgame_rounds: u32,
    /// Own score must lead by at least this much
    pub score_margin: Score,
    /// Minimum rounds between two fresh starts
    pub min_rounds_between: u32,
    /// Fresh start only if strictly more rounds than this remain
    pub min_rounds_remaining: u32,
    /// Opponent moves needed before the randomness test applies
    pub min_observations: usize,
    /// Required deviation from a fair coin, in standard deviations
    pub sigma: f64,
    /// Consecutive cooperations that make up a fresh start
    pub fresh_start_length: u32,
}

impl Default for FreshStartParams {
    fn default() -> Self {
        Self {
            endgame_rounds: 2,
            score_margin: 10,
            min_rounds_between: 20,
            min_rounds_remaining: 10,
            min_observations: 10,
            sigma: 3.0,
            fresh_start_length: 2,
        }
    }
}

impl FreshStartParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fresh_start_length == 0 {
            return Err(ConfigError::OutOfRange { field: "fresh_start_length", value: 0.0 });
        }
        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(ConfigError::OutOfRange { field: "sigma", value: self.sigma });
        }
        Ok(())
    }
}

/// Mirrors the opponent, punishes defection runs with equally long runs,
/// and occasionally wipes the slate clean to re-attempt cooperation.
#[derive(Clone, Debug)]
pub struct TidemanChieruzzi {
    params: FreshStartParams,
    payoff: PayoffMatrix,
    history: History,
    /// Rounds played this match; survives fresh starts
    round: u32,
    total_rounds: u32,
    retaliation_length: usize,
    retaliation_remaining: usize,
    pending_cooperation: u32,
    reset_on_record: bool,
    last_fresh_start: Option<u32>,
}

impl TidemanChieruzzi {
    pub fn new(params: FreshStartParams, payoff: PayoffMatrix) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            payoff,
            history: History::new(),
            round: 0,
            total_rounds: crate::DEFAULT_TOTAL_ROUNDS,
            retaliation_length: 0,
            retaliation_remaining: 0,
            pending_cooperation: 0,
            reset_on_record: false,
            last_fresh_start: None,
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// (longest punishment so far, punishment rounds still owed)
    pub fn retaliation(&self) -> (usize, usize) {
        (self.retaliation_length, self.retaliation_remaining)
    }

    pub fn fresh_start_pending(&self) -> bool {
        self.pending_cooperation > 0
    }

    fn rounds_left(&self) -> u32 {
        self.total_rounds.saturating_sub(self.round)
    }

    /// Emit one cooperation of a pending fresh start.
    fn continue_fresh_start(&mut self) -> Move {
        self.pending_cooperation -= 1;
        if self.pending_cooperation == 0 {
            self.reset_on_record = true;
        }
        Move::Cooperate
    }

    fn fresh_start_eligible(&self) -> bool {
        let p = &self.params;
        let (mine, theirs) = self.history.scores(&self.payoff);
        if mine < theirs + p.score_margin {
            return false;
        }
        if self.history.last_opponent() == Some(Move::Defect) {
            return false;
        }
        if let Some(last) = self.last_fresh_start {
            if self.round - last < p.min_rounds_between {
                return false;
            }
        }
        if self.rounds_left() <= p.min_rounds_remaining {
            return false;
        }
        let n = self.history.opponent().len();
        if n < p.min_observations {
            return false;
        }
        opponent_looks_nonrandom(self.history.opponent_defections(), n, p.sigma)
    }
}

impl Default for TidemanChieruzzi {
    fn default() -> Self {
        Self {
            params: FreshStartParams::default(),
            payoff: PayoffMatrix::canonical(),
            history: History::new(),
            round: 0,
            total_rounds: crate::DEFAULT_TOTAL_ROUNDS,
            retaliation_length: 0,
            retaliation_remaining: 0,
            pending_cooperation: 0,
            reset_on_record: false,
            last_fresh_start: None,
        }
    }
}

/// Two-sided test of `defections` out of `n` against a fair coin using the
/// normal approximation to the binomial.
pub fn opponent_looks_nonrandom(defections: usize, n: usize, sigma: f64) -> bool {
    if n == 0 {
        return false;
    }
    let expected = n as f64 / 2.0;
    let std_dev = (n as f64 * 0.25).sqrt();
    (defections as f64 - expected).abs() >= sigma * std_dev
}

impl Strategy for TidemanChieruzzi {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        if self.rounds_left() <= self.params.endgame_rounds {
            return Ok(Move::Defect);
        }

        if self.pending_cooperation > 0 {
            return Ok(self.continue_fresh_start());
        }

        if self.retaliation_remaining > 0 {
            self.retaliation_remaining -= 1;
            return Ok(Move::Defect);
        }

        if self.history.last_opponent() == Some(Move::Defect) {
            let run = self.history.opponent_defection_run();
            self.retaliation_length = self.retaliation_length.max(run);
            self.retaliation_remaining = self.retaliation_length;
            return Ok(Move::Defect);
        }

        if self.fresh_start_eligible() {
            debug!("tideman starts a fresh start at round {}", self.round);
            self.pending_cooperation = self.params.fresh_start_length;
            return Ok(self.continue_fresh_start());
        }

        Ok(self.history.last_opponent().unwrap_or(Move::Cooperate))
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.round += 1;
        if self.reset_on_record {
            self.reset_on_record = false;
            self.history = History::new();
            self.retaliation_length = 0;
            self.retaliation_remaining = 0;
            self.last_fresh_start = Some(self.round);
        } else {
            self.history.push(own, opponent);
        }
    }

    fn set_total_rounds(&mut self, total: u32) {
        self.total_rounds = total;
    }
}

// ── Windowed probability ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    pub initial_probability: f64,
    /// Rounds between re-estimates
    pub window: u32,
    /// Defection fraction at or above which cooperation gets rarer
    pub high_threshold: f64,
    /// Defection fraction below which cooperation gets likelier
    pub low_threshold: f64,
    pub step: f64,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            initial_probability: 0.3,
            window: 10,
            high_threshold: 0.6,
            low_threshold: 0.4,
            step: 0.1,
        }
    }
}

impl WindowParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        unit_interval("initial_probability", self.initial_probability)?;
        unit_interval("high_threshold", self.high_threshold)?;
        unit_interval("low_threshold", self.low_threshold)?;
        unit_interval("step", self.step)?;
        if self.low_threshold > self.high_threshold {
            return Err(ConfigError::OutOfRange { field: "low_threshold", value: self.low_threshold });
        }
        Ok(())
    }
}

/// Cooperates with a probability that is nudged every window by how often
/// the opponent defects; an opponent in the indeterminate band is treated
/// as random and defected against forever.
#[derive(Clone, Debug)]
pub struct WindowedProbability {
    params: WindowParams,
    history: History,
    probability: f64,
    opponent_random: bool,
}

impl WindowedProbability {
    pub fn new(params: WindowParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            history: History::new(),
            probability: params.initial_probability,
            opponent_random: false,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn opponent_random(&self) -> bool {
        self.opponent_random
    }

    fn reassess(&mut self) {
        let fraction = self.history.opponent_defections() as f64 / self.history.len() as f64;
        let p = &self.params;
        if fraction >= p.high_threshold {
            self.probability = (self.probability - p.step).max(0.0);
        } else if fraction < p.low_threshold {
            self.probability = (self.probability + p.step).min(1.0);
        } else if !self.opponent_random {
            debug!("opponent defection rate {:.2} looks random", fraction);
            self.opponent_random = true;
        }
    }
}

impl Default for WindowedProbability {
    fn default() -> Self {
        Self {
            params: WindowParams::default(),
            history: History::new(),
            probability: WindowParams::default().initial_probability,
            opponent_random: false,
        }
    }
}

impl Strategy for WindowedProbability {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        if self.opponent_random {
            return Ok(Move::Defect);
        }
        if rng.chance(self.probability) {
            Ok(Move::Cooperate)
        } else {
            Ok(Move::Defect)
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
        if self.history.len() % self.params.window as usize == 0 {
            self.reassess();
        }
    }
}
