//! Match execution engine

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EngineError, Seat};
use crate::payoff::{PayoffMatrix, Score};
use crate::random::SeededRng;
use crate::strategy::{Move, Strategy};

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub move_a: Move,
    pub move_b: Move,
    pub score_a: Score,
    pub score_b: Score,
    pub cumulative_a: u64,
    pub cumulative_b: u64,
}

/// Both moves and both payoffs of one validated round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub move_a: Move,
    pub move_b: Move,
    pub score_a: Score,
    pub score_b: Score,
}

/// Result of a complete match
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Per-round trace, empty unless requested
    pub rounds: Vec<RoundResult>,
    pub total_score_a: u64,
    pub total_score_b: u64,
    pub moves_a: Vec<Move>,
    pub moves_b: Vec<Move>,
    pub round_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    rounds: u32,
    record_trace: bool,
}

impl MatchConfig {
    pub fn new(rounds: u32) -> Result<Self, ConfigError> {
        if rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(Self { rounds, record_trace: false })
    }

    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn record_trace(&self) -> bool {
        self.record_trace
    }
}

fn query(strategy: &mut dyn Strategy, seat: Seat, rng: &mut SeededRng) -> Result<Move, EngineError> {
    strategy
        .next_move(rng)
        .map_err(|err| EngineError::from_strategy(seat, err))
}

/// Play one round.
///
/// Both strategies are queried before either result is validated, A first.
/// Nothing is recorded unless both moves are valid.
pub fn play_round(
    a: &mut dyn Strategy,
    b: &mut dyn Strategy,
    payoff: &PayoffMatrix,
    rng_a: &mut SeededRng,
    rng_b: &mut SeededRng,
) -> Result<RoundOutcome, EngineError> {
    let chosen_a = query(a, Seat::A, rng_a);
    let chosen_b = query(b, Seat::B, rng_b);
    let move_a = chosen_a?;
    let move_b = chosen_b?;

    let (score_a, score_b) = payoff.payoff(move_a, move_b);
    a.record_result(move_a, move_b);
    b.record_result(move_b, move_a);

    Ok(RoundOutcome { move_a, move_b, score_a, score_b })
}

/// Run a complete match between two strategies
///
/// Each seat draws from its own stream forked off `rng`, so one player's
/// randomness never shifts the other's.
pub fn play_game(
    a: &mut dyn Strategy,
    b: &mut dyn Strategy,
    config: &MatchConfig,
    payoff: &PayoffMatrix,
    rng: &SeededRng,
) -> Result<MatchResult, EngineError> {
    let mut rng_a = rng.fork(0);
    let mut rng_b = rng.fork(1);
    a.set_total_rounds(config.rounds);
    b.set_total_rounds(config.rounds);

    let capacity = config.rounds as usize;
    let mut result = MatchResult {
        rounds: Vec::with_capacity(if config.record_trace { capacity } else { 0 }),
        moves_a: Vec::with_capacity(capacity),
        moves_b: Vec::with_capacity(capacity),
        ..Default::default()
    };

    for round in 0..config.rounds {
        let outcome = play_round(a, b, payoff, &mut rng_a, &mut rng_b)?;
        result.total_score_a += outcome.score_a as u64;
        result.total_score_b += outcome.score_b as u64;
        result.moves_a.push(outcome.move_a);
        result.moves_b.push(outcome.move_b);
        result.round_count += 1;

        if config.record_trace {
            result.rounds.push(RoundResult {
                round,
                move_a: outcome.move_a,
                move_b: outcome.move_b,
                score_a: outcome.score_a,
                score_b: outcome.score_b,
                cumulative_a: result.total_score_a,
                cumulative_b: result.total_score_b,
            });
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::reactive::{AlwaysCooperate, AlwaysDefect, RandomChoice, TitForTat};
    use crate::strategy::format_moves;

    /// Returns `value` as a move on the given round, Cooperate otherwise.
    struct Glitch {
        on_round: usize,
        value: &'static str,
        played: usize,
        recorded: usize,
    }

    impl Glitch {
        fn new(on_round: usize, value: &'static str) -> Self {
            Self { on_round, value, played: 0, recorded: 0 }
        }
    }

    impl Strategy for Glitch {
        fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
            self.played += 1;
            if self.played == self.on_round {
                return Err(StrategyError::InvalidMove { value: self.value.to_string() });
            }
            Ok(Move::Cooperate)
        }

        fn record_result(&mut self, _own: Move, _opponent: Move) {
            self.recorded += 1;
        }
    }

    fn seed_rng() -> SeededRng {
        SeededRng::new(&[42u8; 32], 0)
    }

    fn traced(rounds: u32) -> MatchConfig {
        MatchConfig::new(rounds).unwrap().with_trace(true)
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert_eq!(MatchConfig::new(0).unwrap_err(), ConfigError::ZeroRounds);
    }

    #[test]
    fn test_single_round_scores() {
        let mut a = AlwaysDefect;
        let mut b = AlwaysCooperate;
        let mut rng = seed_rng();
        let mut other = seed_rng();
        let outcome =
            play_round(&mut a, &mut b, &PayoffMatrix::canonical(), &mut rng, &mut other).unwrap();
        assert_eq!((outcome.move_a, outcome.move_b), (Move::Defect, Move::Cooperate));
        assert_eq!((outcome.score_a, outcome.score_b), (5, 0));
    }

    #[test]
    fn test_cooperate_vs_cooperate() {
        let result = play_game(
            &mut AlwaysCooperate,
            &mut AlwaysCooperate,
            &traced(20),
            &PayoffMatrix::canonical(),
            &seed_rng(),
        )
        .unwrap();

        for round in &result.rounds {
            assert_eq!(round.move_a, Move::Cooperate);
            assert_eq!(round.move_b, Move::Cooperate);
            assert_eq!((round.score_a, round.score_b), (3, 3));
        }
        assert_eq!(result.round_count, 20);
        assert_eq!(result.total_score_a, 60);
        assert_eq!(result.total_score_b, 60);
    }

    #[test]
    fn test_tft_vs_always_defect() {
        let result = play_game(
            &mut TitForTat::default(),
            &mut AlwaysDefect,
            &traced(5),
            &PayoffMatrix::canonical(),
            &seed_rng(),
        )
        .unwrap();

        assert_eq!(format_moves(&result.moves_a), "CDDDD");
        assert_eq!(format_moves(&result.moves_b), "DDDDD");
        assert_eq!(result.total_score_a, 4);
        assert_eq!(result.total_score_b, 9);
    }

    #[test]
    fn test_cumulative_scores() {
        let result = play_game(
            &mut TitForTat::default(),
            &mut RandomChoice,
            &traced(30),
            &PayoffMatrix::canonical(),
            &seed_rng(),
        )
        .unwrap();

        let mut expected_a = 0u64;
        let mut expected_b = 0u64;
        for (i, round) in result.rounds.iter().enumerate() {
            assert_eq!(round.round, i as u32);
            expected_a += round.score_a as u64;
            expected_b += round.score_b as u64;
            assert_eq!(round.cumulative_a, expected_a);
            assert_eq!(round.cumulative_b, expected_b);
        }
        assert_eq!(result.total_score_a, expected_a);
        assert_eq!(result.total_score_b, expected_b);
    }

    #[test]
    fn test_trace_is_optional() {
        let result = play_game(
            &mut AlwaysCooperate,
            &mut AlwaysDefect,
            &MatchConfig::new(7).unwrap(),
            &PayoffMatrix::canonical(),
            &seed_rng(),
        )
        .unwrap();
        assert!(result.rounds.is_empty());
        assert_eq!(result.moves_a.len(), 7);
        assert_eq!(result.total_score_b, 35);
    }

    #[test]
    fn test_match_determinism() {
        let run = |match_index| {
            play_game(
                &mut RandomChoice,
                &mut TitForTat::default(),
                &traced(40),
                &PayoffMatrix::canonical(),
                &SeededRng::new(&[42u8; 32], match_index),
            )
            .unwrap()
        };
        assert_eq!(run(0), run(0));
        assert_ne!(run(0).moves_a, run(1).moves_a);
    }

    #[test]
    fn test_seats_draw_independent_streams() {
        // A's moves must not depend on whether B also consumes randomness
        let config = MatchConfig::new(40).unwrap();
        let payoff = PayoffMatrix::canonical();
        let with_random = play_game(&mut RandomChoice, &mut RandomChoice, &config, &payoff, &seed_rng())
            .unwrap();
        let with_fixed = play_game(&mut RandomChoice, &mut AlwaysDefect, &config, &payoff, &seed_rng())
            .unwrap();
        assert_eq!(with_random.moves_a, with_fixed.moves_a);
    }

    #[test]
    fn test_invalid_move_names_seat_and_skips_scoring() {
        let mut a = Glitch::new(0, "never");
        let mut b = Glitch::new(3, "X");
        let err = play_game(
            &mut a,
            &mut b,
            &MatchConfig::new(10).unwrap(),
            &PayoffMatrix::canonical(),
            &seed_rng(),
        )
        .unwrap_err();

        assert_eq!(err, EngineError::InvalidMove { seat: Seat::B, value: "X".to_string() });
        assert_eq!(err.seat(), Seat::B);
        // rounds 1 and 2 recorded, the failing round not
        assert_eq!((a.recorded, b.recorded), (2, 2));
    }

    #[test]
    fn test_seat_a_reported_first() {
        let mut a = Glitch::new(1, "?");
        let mut b = Glitch::new(1, "!");
        let err = play_round(
            &mut a,
            &mut b,
            &PayoffMatrix::canonical(),
            &mut seed_rng(),
            &mut seed_rng(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidMove { seat: Seat::A, value: "?".to_string() });
        // both were asked even though A failed
        assert_eq!((a.played, b.played), (1, 1));
        assert_eq!((a.recorded, b.recorded), (0, 0));
    }

    #[test]
    fn test_other_failures_wrap_source() {
        struct Amnesiac;
        impl Strategy for Amnesiac {
            fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
                Err(StrategyError::MissingHistory)
            }
            fn record_result(&mut self, _own: Move, _opponent: Move) {}
        }

        let err = play_round(
            &mut AlwaysCooperate,
            &mut Amnesiac,
            &PayoffMatrix::canonical(),
            &mut seed_rng(),
            &mut seed_rng(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::Strategy { seat: Seat::B, source: StrategyError::MissingHistory }
        );
    }
}
