//! Catalog of built-in strategies and their configurable parameters

use serde::{Deserialize, Serialize};

use crate::adaptive::{
    BeliefParams, FreshStartParams, Harrington, TidemanChieruzzi, WindowParams,
    WindowedProbability,
};
use crate::error::ConfigError;
use crate::lookahead::{LookaheadParams, MaxMax, MiniMax, Pruning, TieBreak};
use crate::payoff::PayoffMatrix;
use crate::reactive::{
    AlwaysCooperate, AlwaysDefect, Davis, Feld, Graaskamp, Grofman, Grudger, Joss, Malthrin,
    Pavlov, RandomChoice, SuspiciousTitForTat, TitForTat, TitForTwoTats,
};
use crate::strategy::Strategy;

/// Built-in strategy type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Copy opponent's last move. Start with cooperate.
    TitForTat,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Cooperate until the opponent defects once, then always defect.
    Grudger,
    /// Grudger under its tournament name.
    Friedman,
    Davis,
    Joss,
    Feld,
    Graaskamp,
    Grofman,
    Malthrin,
    /// Fair coin each round.
    RandomChoice,
    AlwaysCooperate,
    AlwaysDefect,
    /// Win-stay, lose-shift.
    Pavlov,
    /// Defect only if opponent defected twice in a row.
    TitForTwoTats,
    MiniMax,
    MaxMax,
    Harrington,
    TidemanChieruzzi,
    WindowedProbability,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 20] = [
        StrategyKind::TitForTat,
        StrategyKind::SuspiciousTitForTat,
        StrategyKind::Grudger,
        StrategyKind::Friedman,
        StrategyKind::Davis,
        StrategyKind::Joss,
        StrategyKind::Feld,
        StrategyKind::Graaskamp,
        StrategyKind::Grofman,
        StrategyKind::Malthrin,
        StrategyKind::RandomChoice,
        StrategyKind::AlwaysCooperate,
        StrategyKind::AlwaysDefect,
        StrategyKind::Pavlov,
        StrategyKind::TitForTwoTats,
        StrategyKind::MiniMax,
        StrategyKind::MaxMax,
        StrategyKind::Harrington,
        StrategyKind::TidemanChieruzzi,
        StrategyKind::WindowedProbability,
    ];

    /// Default display name in standings.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::TitForTat => "TitForTat",
            StrategyKind::SuspiciousTitForTat => "SuspiciousTitForTat",
            StrategyKind::Grudger => "Grudger",
            StrategyKind::Friedman => "Friedman",
            StrategyKind::Davis => "Davis",
            StrategyKind::Joss => "Joss",
            StrategyKind::Feld => "Feld",
            StrategyKind::Graaskamp => "Graaskamp",
            StrategyKind::Grofman => "Grofman",
            StrategyKind::Malthrin => "Malthrin",
            StrategyKind::RandomChoice => "RandomChoice",
            StrategyKind::AlwaysCooperate => "AlwaysCooperate",
            StrategyKind::AlwaysDefect => "AlwaysDefect",
            StrategyKind::Pavlov => "Pavlov",
            StrategyKind::TitForTwoTats => "TitForTwoTats",
            StrategyKind::MiniMax => "MiniMax",
            StrategyKind::MaxMax => "MaxMax",
            StrategyKind::Harrington => "Harrington",
            StrategyKind::TidemanChieruzzi => "TidemanChieruzzi",
            StrategyKind::WindowedProbability => "WindowedProbability",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            StrategyKind::TitForTat => "Copies opponent's last move. Starts by cooperating.",
            StrategyKind::SuspiciousTitForTat => "Like Tit-for-Tat, but starts with defect.",
            StrategyKind::Grudger | StrategyKind::Friedman => {
                "Cooperates until betrayed, then always defects."
            }
            StrategyKind::Davis => "Cooperates for 11 rounds, then holds a grudge.",
            StrategyKind::Joss => "Tit-for-Tat that sneaks in a defection 10% of the time.",
            StrategyKind::Feld => "Tit-for-Tat whose forgiveness fades to a coin flip.",
            StrategyKind::Graaskamp => {
                "Tit-for-Tat with a probe at round 51, then cooperates only with cooperators."
            }
            StrategyKind::Grofman => "Cooperates after a mismatch with probability 2/7.",
            StrategyKind::Malthrin => {
                "Grudger for 7 rounds, Tit-for-Tat after, defects on the last round."
            }
            StrategyKind::RandomChoice => "Randomly cooperates or defects each round.",
            StrategyKind::AlwaysCooperate => "Never defects. Always cooperates.",
            StrategyKind::AlwaysDefect => "Never cooperates. Always defects.",
            StrategyKind::Pavlov => "Repeats move if outcome was good, switches if bad.",
            StrategyKind::TitForTwoTats => "Only retaliates after two consecutive defections.",
            StrategyKind::MiniMax => "Searches ahead from the opponent's last move.",
            StrategyKind::MaxMax => "Searches ahead assuming the opponent cooperates.",
            StrategyKind::Harrington => {
                "Probes for a patient opponent, gives up once belief runs low."
            }
            StrategyKind::TidemanChieruzzi => {
                "Escalating retaliation with occasional fresh starts."
            }
            StrategyKind::WindowedProbability => {
                "Tunes its cooperation rate to the opponent's recent defections."
            }
        }
    }
}

/// A strategy plus its parameters, as it appears in configuration.
///
/// Parameters left out take their defaults, e.g. `{"kind": "MiniMax"}` or
/// `{"kind": "Harrington", "belief_step": 0.2}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StrategySpec {
    TitForTat,
    SuspiciousTitForTat,
    Grudger,
    Friedman,
    Davis,
    Joss,
    Feld,
    Graaskamp,
    Grofman,
    Malthrin,
    RandomChoice,
    AlwaysCooperate,
    AlwaysDefect,
    Pavlov,
    TitForTwoTats,
    MiniMax {
        #[serde(default)]
        depth: Option<u32>,
        #[serde(default)]
        tie_break: TieBreak,
        #[serde(default)]
        pruning: Pruning,
    },
    MaxMax {
        #[serde(default)]
        depth: Option<u32>,
        #[serde(default)]
        tie_break: TieBreak,
        #[serde(default)]
        pruning: Pruning,
    },
    Harrington(BeliefParams),
    TidemanChieruzzi(FreshStartParams),
    WindowedProbability(WindowParams),
}

impl StrategySpec {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategySpec::TitForTat => StrategyKind::TitForTat,
            StrategySpec::SuspiciousTitForTat => StrategyKind::SuspiciousTitForTat,
            StrategySpec::Grudger => StrategyKind::Grudger,
            StrategySpec::Friedman => StrategyKind::Friedman,
            StrategySpec::Davis => StrategyKind::Davis,
            StrategySpec::Joss => StrategyKind::Joss,
            StrategySpec::Feld => StrategyKind::Feld,
            StrategySpec::Graaskamp => StrategyKind::Graaskamp,
            StrategySpec::Grofman => StrategyKind::Grofman,
            StrategySpec::Malthrin => StrategyKind::Malthrin,
            StrategySpec::RandomChoice => StrategyKind::RandomChoice,
            StrategySpec::AlwaysCooperate => StrategyKind::AlwaysCooperate,
            StrategySpec::AlwaysDefect => StrategyKind::AlwaysDefect,
            StrategySpec::Pavlov => StrategyKind::Pavlov,
            StrategySpec::TitForTwoTats => StrategyKind::TitForTwoTats,
            StrategySpec::MiniMax { .. } => StrategyKind::MiniMax,
            StrategySpec::MaxMax { .. } => StrategyKind::MaxMax,
            StrategySpec::Harrington(_) => StrategyKind::Harrington,
            StrategySpec::TidemanChieruzzi(_) => StrategyKind::TidemanChieruzzi,
            StrategySpec::WindowedProbability(_) => StrategyKind::WindowedProbability,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check parameters without building an instance.
    pub fn validate(&self, payoff: &PayoffMatrix) -> Result<(), ConfigError> {
        self.factory(payoff).map(drop)
    }

    /// Fresh instance with its own empty history.
    pub fn build(&self, payoff: &PayoffMatrix) -> Result<Box<dyn Strategy + Send>, ConfigError> {
        Ok(self.factory(payoff)?())
    }

    /// Validate once, then hand out fresh instances on every call.
    pub fn factory(&self, payoff: &PayoffMatrix) -> Result<StrategyFactory, ConfigError> {
        let factory = match self {
            StrategySpec::TitForTat => prototype(TitForTat::default()),
            StrategySpec::SuspiciousTitForTat => prototype(SuspiciousTitForTat::default()),
            StrategySpec::Grudger | StrategySpec::Friedman => prototype(Grudger::default()),
            StrategySpec::Davis => prototype(Davis::default()),
            StrategySpec::Joss => prototype(Joss::default()),
            StrategySpec::Feld => prototype(Feld::default()),
            StrategySpec::Graaskamp => prototype(Graaskamp::default()),
            StrategySpec::Grofman => prototype(Grofman::default()),
            StrategySpec::Malthrin => prototype(Malthrin::default()),
            StrategySpec::RandomChoice => prototype(RandomChoice),
            StrategySpec::AlwaysCooperate => prototype(AlwaysCooperate),
            StrategySpec::AlwaysDefect => prototype(AlwaysDefect),
            StrategySpec::Pavlov => prototype(Pavlov::default()),
            StrategySpec::TitForTwoTats => prototype(TitForTwoTats::default()),
            StrategySpec::MiniMax { depth, tie_break, pruning } => {
                let params = LookaheadParams {
                    depth: depth.unwrap_or(MiniMax::DEFAULT_DEPTH),
                    tie_break: *tie_break,
                    pruning: *pruning,
                };
                prototype(MiniMax::new(params, *payoff)?)
            }
            StrategySpec::MaxMax { depth, tie_break, pruning } => {
                let params = LookaheadParams {
                    depth: depth.unwrap_or(MaxMax::DEFAULT_DEPTH),
                    tie_break: *tie_break,
                    pruning: *pruning,
                };
                prototype(MaxMax::new(params, *payoff)?)
            }
            StrategySpec::Harrington(params) => prototype(Harrington::new(*params)?),
            StrategySpec::TidemanChieruzzi(params) => {
                prototype(TidemanChieruzzi::new(*params, *payoff)?)
            }
            StrategySpec::WindowedProbability(params) => {
                prototype(WindowedProbability::new(*params)?)
            }
        };
        Ok(factory)
    }
}

/// Produces a fresh strategy instance per match.
pub type StrategyFactory = Box<dyn Fn() -> Box<dyn Strategy + Send> + Send + Sync>;

fn prototype<S>(initial: S) -> StrategyFactory
where
    S: Strategy + Clone + Send + Sync + 'static,
{
    Box::new(move || -> Box<dyn Strategy + Send> { Box::new(initial.clone()) })
}

impl From<StrategyKind> for StrategySpec {
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::TitForTat => StrategySpec::TitForTat,
            StrategyKind::SuspiciousTitForTat => StrategySpec::SuspiciousTitForTat,
            StrategyKind::Grudger => StrategySpec::Grudger,
            StrategyKind::Friedman => StrategySpec::Friedman,
            StrategyKind::Davis => StrategySpec::Davis,
            StrategyKind::Joss => StrategySpec::Joss,
            StrategyKind::Feld => StrategySpec::Feld,
            StrategyKind::Graaskamp => StrategySpec::Graaskamp,
            StrategyKind::Grofman => StrategySpec::Grofman,
            StrategyKind::Malthrin => StrategySpec::Malthrin,
            StrategyKind::RandomChoice => StrategySpec::RandomChoice,
            StrategyKind::AlwaysCooperate => StrategySpec::AlwaysCooperate,
            StrategyKind::AlwaysDefect => StrategySpec::AlwaysDefect,
            StrategyKind::Pavlov => StrategySpec::Pavlov,
            StrategyKind::TitForTwoTats => StrategySpec::TitForTwoTats,
            StrategyKind::MiniMax => StrategySpec::MiniMax {
                depth: None,
                tie_break: TieBreak::default(),
                pruning: Pruning::default(),
            },
            StrategyKind::MaxMax => StrategySpec::MaxMax {
                depth: None,
                tie_break: TieBreak::default(),
                pruning: Pruning::default(),
            },
            StrategyKind::Harrington => StrategySpec::Harrington(BeliefParams::default()),
            StrategyKind::TidemanChieruzzi => {
                StrategySpec::TidemanChieruzzi(FreshStartParams::default())
            }
            StrategyKind::WindowedProbability => {
                StrategySpec::WindowedProbability(WindowParams::default())
            }
        }
    }
}

/// Every built-in strategy with default parameters.
pub fn standard_roster() -> Vec<StrategySpec> {
    StrategyKind::ALL.iter().map(|kind| StrategySpec::from(*kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{play_game, MatchConfig};
    use crate::random::SeededRng;
    use crate::strategy::Move;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = StrategyKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), StrategyKind::ALL.len());
    }

    #[test]
    fn test_every_kind_builds_and_plays() {
        let payoff = PayoffMatrix::canonical();
        let config = MatchConfig::new(60).unwrap();
        let rng = SeededRng::new(&[42u8; 32], 0);
        for spec in standard_roster() {
            assert_eq!(StrategySpec::from(spec.kind()), spec);
            assert!(!spec.kind().describe().is_empty());
            let mut a = spec.build(&payoff).unwrap();
            let mut b = StrategySpec::TitForTat.build(&payoff).unwrap();
            let result = play_game(&mut a, &mut b, &config, &payoff, &rng).unwrap();
            assert_eq!(result.round_count, 60, "{}", spec.name());
        }
    }

    #[test]
    fn test_factory_instances_are_independent() {
        let factory = StrategySpec::TitForTat.factory(&PayoffMatrix::canonical()).unwrap();
        let mut rng = SeededRng::from_u64(0);
        let mut first = factory();
        first.record_result(Move::Cooperate, Move::Defect);
        assert_eq!(first.next_move(&mut rng).unwrap(), Move::Defect);
        let mut second = factory();
        assert_eq!(second.next_move(&mut rng).unwrap(), Move::Cooperate);
    }

    #[test]
    fn test_friedman_plays_as_grudger() {
        let payoff = PayoffMatrix::canonical();
        let config = MatchConfig::new(30).unwrap();
        let rng = SeededRng::new(&[1u8; 32], 3);
        let mut grudger = StrategySpec::Grudger.build(&payoff).unwrap();
        let mut friedman = StrategySpec::Friedman.build(&payoff).unwrap();
        let mut x = StrategySpec::RandomChoice.build(&payoff).unwrap();
        let mut y = StrategySpec::RandomChoice.build(&payoff).unwrap();
        let g = play_game(&mut grudger, &mut x, &config, &payoff, &rng).unwrap();
        let f = play_game(&mut friedman, &mut y, &config, &payoff, &rng).unwrap();
        assert_eq!(g, f);
    }

    #[test]
    fn test_spec_from_json_uses_defaults() {
        let spec: StrategySpec = serde_json::from_str(r#"{"kind": "MiniMax"}"#).unwrap();
        assert_eq!(spec, StrategySpec::from(StrategyKind::MiniMax));

        let spec: StrategySpec =
            serde_json::from_str(r#"{"kind": "Harrington", "belief_step": 0.2}"#).unwrap();
        assert_eq!(
            spec,
            StrategySpec::Harrington(BeliefParams { belief_step: 0.2, ..Default::default() })
        );
    }

    #[test]
    fn test_bad_params_rejected() {
        let payoff = PayoffMatrix::canonical();
        let spec = StrategySpec::MaxMax {
            depth: Some(0),
            tie_break: TieBreak::Cooperate,
            pruning: Pruning::AlphaBeta,
        };
        assert_eq!(spec.validate(&payoff).unwrap_err(), ConfigError::ZeroDepth);

        let spec = StrategySpec::WindowedProbability(WindowParams { window: 0, ..Default::default() });
        assert_eq!(spec.validate(&payoff).unwrap_err(), ConfigError::ZeroWindow);
    }
}
