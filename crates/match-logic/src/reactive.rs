//! Reactive strategies: decisions driven directly by the visible history

use crate::error::StrategyError;
use crate::random::SeededRng;
use crate::strategy::{History, Move, Strategy};

/// Copy opponent's last move, start with cooperate
#[derive(Clone, Debug, Default)]
pub struct TitForTat {
    history: History,
}

impl Strategy for TitForTat {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        Ok(self.history.last_opponent().unwrap_or(Move::Cooperate))
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Tit-for-Tat but start with defect
#[derive(Clone, Debug, Default)]
pub struct SuspiciousTitForTat {
    history: History,
}

impl Strategy for SuspiciousTitForTat {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        Ok(self.history.last_opponent().unwrap_or(Move::Defect))
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Cooperate until the opponent defects once, then always defect
#[derive(Clone, Debug, Default)]
pub struct Grudger {
    history: History,
}

impl Strategy for Grudger {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        if self.history.opponent_has_defected() {
            Ok(Move::Defect)
        } else {
            Ok(Move::Cooperate)
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Cooperate unconditionally for a grace period, then hold a grudge.
#[derive(Clone, Debug)]
pub struct Davis {
    history: History,
    grace_rounds: usize,
}

impl Davis {
    pub const GRACE_ROUNDS: usize = 11;
}

impl Default for Davis {
    fn default() -> Self {
        Self { history: History::new(), grace_rounds: Self::GRACE_ROUNDS }
    }
}

impl Strategy for Davis {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        if self.history.len() < self.grace_rounds || !self.history.opponent_has_defected() {
            Ok(Move::Cooperate)
        } else {
            Ok(Move::Defect)
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Tit-for-Tat that sneaks in a defection 10% of the time
#[derive(Clone, Debug, Default)]
pub struct Joss {
    history: History,
}

impl Joss {
    pub const SNEAK_PROBABILITY: f64 = 0.1;
}

impl Strategy for Joss {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        match self.history.last_opponent() {
            None => Ok(Move::Cooperate),
            Some(_) if rng.chance(Self::SNEAK_PROBABILITY) => Ok(Move::Defect),
            Some(last) => Ok(last),
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Retaliates at once; forgiveness decays from certain to a coin flip over
/// 200 rounds.
#[derive(Clone, Debug, Default)]
pub struct Feld {
    history: History,
}

impl Feld {
    const DECAY: f64 = 0.0025;
    const FLOOR: f64 = 0.5;

    fn cooperate_probability(&self) -> f64 {
        let decays = self.history.len().saturating_sub(1) as f64;
        (1.0 - Self::DECAY * decays).max(Self::FLOOR)
    }
}

impl Strategy for Feld {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        match self.history.last_opponent() {
            None => Ok(Move::Cooperate),
            Some(Move::Defect) => Ok(Move::Defect),
            Some(Move::Cooperate) => {
                if rng.chance(self.cooperate_probability()) {
                    Ok(Move::Cooperate)
                } else {
                    Ok(Move::Defect)
                }
            }
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Tit-for-Tat with a probing defection at round 51; afterwards cooperates
/// only with opponents that look nice.
#[derive(Clone, Debug, Default)]
pub struct Graaskamp {
    history: History,
}

impl Graaskamp {
    const PROBE_ROUND: usize = 51;
    const OBSERVE_UNTIL: usize = 55;
    const NICE_RATE: f64 = 0.8;
}

impl Strategy for Graaskamp {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        let played = self.history.len();
        let mirror = self.history.last_opponent().unwrap_or(Move::Cooperate);
        let mv = if played == Self::PROBE_ROUND {
            Move::Defect
        } else if played <= Self::OBSERVE_UNTIL {
            mirror
        } else if self.history.opponent_cooperation_rate() > Self::NICE_RATE {
            Move::Cooperate
        } else {
            Move::Defect
        };
        Ok(mv)
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// After a round where the players disagreed, cooperate with probability 2/7.
#[derive(Clone, Debug, Default)]
pub struct Grofman {
    history: History,
}

impl Grofman {
    const MISMATCH_COOPERATION: f64 = 2.0 / 7.0;
}

impl Strategy for Grofman {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        match (self.history.last_own(), self.history.last_opponent()) {
            (Some(mine), Some(theirs)) if mine != theirs => {
                if rng.chance(Self::MISMATCH_COOPERATION) {
                    Ok(Move::Cooperate)
                } else {
                    Ok(Move::Defect)
                }
            }
            _ => Ok(Move::Cooperate),
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Grudger during the opening, Tit-for-Tat afterwards, defects on the last
/// round of the match.
#[derive(Clone, Debug)]
pub struct Malthrin {
    history: History,
    total_rounds: u32,
}

impl Malthrin {
    const OPENING: usize = 7;
}

impl Default for Malthrin {
    fn default() -> Self {
        Self { history: History::new(), total_rounds: crate::DEFAULT_TOTAL_ROUNDS }
    }
}

impl Strategy for Malthrin {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        let played = self.history.len();
        let mv = match self.history.last_opponent() {
            None => Move::Cooperate,
            Some(_) if played < Self::OPENING => {
                if self.history.opponent_has_defected() {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
            Some(_) if played as u64 + 1 >= self.total_rounds as u64 => Move::Defect,
            Some(last) => last,
        };
        Ok(mv)
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }

    fn set_total_rounds(&mut self, total: u32) {
        self.total_rounds = total;
    }
}

/// Fair coin every round
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomChoice;

impl Strategy for RandomChoice {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        if rng.chance(0.5) {
            Ok(Move::Cooperate)
        } else {
            Ok(Move::Defect)
        }
    }

    fn record_result(&mut self, _own: Move, _opponent: Move) {}
}

/// Never defects
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysCooperate;

impl Strategy for AlwaysCooperate {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        Ok(Move::Cooperate)
    }

    fn record_result(&mut self, _own: Move, _opponent: Move) {}
}

/// Never cooperates
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysDefect;

impl Strategy for AlwaysDefect {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        Ok(Move::Defect)
    }

    fn record_result(&mut self, _own: Move, _opponent: Move) {}
}

/// Win-stay, lose-switch
///
/// A round is "won" when the opponent cooperated (reward or temptation);
/// after a win the move is repeated, after a loss it is switched.
#[derive(Clone, Debug, Default)]
pub struct Pavlov {
    history: History,
}

impl Strategy for Pavlov {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        match (self.history.last_own(), self.history.last_opponent()) {
            (Some(mine), Some(Move::Cooperate)) => Ok(mine),
            (Some(mine), Some(Move::Defect)) => Ok(mine.flip()),
            _ => Ok(Move::Cooperate),
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

/// Defect only if opponent defected twice in a row
#[derive(Clone, Debug, Default)]
pub struct TitForTwoTats {
    history: History,
}

impl Strategy for TitForTwoTats {
    fn next_move(&mut self, _rng: &mut SeededRng) -> Result<Move, StrategyError> {
        if self.history.opponent_defection_run() >= 2 {
            Ok(Move::Defect)
        } else {
            Ok(Move::Cooperate)
        }
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        self.history.push(own, opponent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::parse_moves;
    use Move::{Cooperate as C, Defect as D};

    fn make_rng() -> SeededRng {
        SeededRng::new(&[42u8; 32], 0)
    }

    /// Feed a scripted opponent and return the strategy's replies.
    fn replay<S: Strategy>(strategy: &mut S, opponent: &str) -> Vec<Move> {
        let mut rng = make_rng();
        parse_moves(opponent)
            .unwrap()
            .into_iter()
            .map(|theirs| {
                let mine = strategy.next_move(&mut rng).unwrap();
                strategy.record_result(mine, theirs);
                mine
            })
            .collect()
    }

    #[test]
    fn test_tit_for_tat_mirrors() {
        let moves = replay(&mut TitForTat::default(), "DCDD");
        assert_eq!(moves, vec![C, D, C, D]);
    }

    #[test]
    fn test_suspicious_tft_starts_defect() {
        let moves = replay(&mut SuspiciousTitForTat::default(), "CCD");
        assert_eq!(moves, vec![D, C, C]);
    }

    #[test]
    fn test_grudger_never_forgives() {
        let moves = replay(&mut Grudger::default(), "CDCCC");
        assert_eq!(moves, vec![C, C, D, D, D]);
    }

    #[test]
    fn test_davis_grace_period() {
        let opponent = format!("D{}", "C".repeat(12));
        let moves = replay(&mut Davis::default(), &opponent);
        assert!(moves[..11].iter().all(|m| *m == C));
        assert!(moves[11..].iter().all(|m| *m == D));
    }

    #[test]
    fn test_davis_stays_nice_with_nice_opponent() {
        let moves = replay(&mut Davis::default(), &"C".repeat(20));
        assert!(moves.iter().all(|m| *m == C));
    }

    #[test]
    fn test_joss_retaliates_and_sometimes_sneaks() {
        let moves = replay(&mut Joss::default(), "D");
        assert_eq!(moves, vec![C]);

        let moves = replay(&mut Joss::default(), &"C".repeat(400));
        let sneaks = moves.iter().filter(|m| **m == D).count();
        assert!(sneaks > 10 && sneaks < 80, "{} sneaky defections", sneaks);

        let moves = replay(&mut Joss::default(), &"D".repeat(20));
        assert!(moves[1..].iter().all(|m| *m == D));
    }

    #[test]
    fn test_feld_probability_decays_to_floor() {
        let mut feld = Feld::default();
        assert_eq!(feld.cooperate_probability(), 1.0);
        let mut rng = make_rng();
        for _ in 0..300 {
            let mv = feld.next_move(&mut rng).unwrap();
            feld.record_result(mv, C);
        }
        assert_eq!(feld.cooperate_probability(), 0.5);
    }

    #[test]
    fn test_feld_retaliates_immediately() {
        let moves = replay(&mut Feld::default(), "DD");
        assert_eq!(moves, vec![C, D]);
    }

    #[test]
    fn test_graaskamp_probe_and_judgement() {
        let moves = replay(&mut Graaskamp::default(), &"C".repeat(60));
        assert_eq!(moves[51], D);
        assert!(moves.iter().enumerate().all(|(i, m)| i == 51 || *m == C));

        let opponent = format!("{}{}", "C".repeat(40), "D".repeat(20));
        let moves = replay(&mut Graaskamp::default(), &opponent);
        // cooperation rate 40/56 < 0.8 after the probe window
        assert_eq!(moves[56], D);
    }

    #[test]
    fn test_grofman_cooperates_after_agreement() {
        let moves = replay(&mut Grofman::default(), "CCCC");
        assert_eq!(moves, vec![C, C, C, C]);
    }

    #[test]
    fn test_grofman_mostly_defects_after_mismatch() {
        let mut rng = make_rng();
        let mut defections = 0;
        for _ in 0..700 {
            let mut g = Grofman::default();
            g.record_result(C, D);
            if g.next_move(&mut rng).unwrap() == D {
                defections += 1;
            }
        }
        // expected 500 of 700
        assert!(defections > 430 && defections < 570, "{} defections", defections);
    }

    #[test]
    fn test_malthrin_opening_grudge_then_tft() {
        let moves = replay(&mut Malthrin::default(), "CDCCCCCCDC");
        // rounds 0..7 grudge after the first defection, then mirror
        assert_eq!(&moves[..7], &[C, C, D, D, D, D, D]);
        assert_eq!(&moves[7..], &[C, C, D]);
    }

    #[test]
    fn test_malthrin_defects_last_round() {
        let mut m = Malthrin::default();
        m.set_total_rounds(10);
        let moves = replay(&mut m, &"C".repeat(10));
        assert_eq!(moves[9], D);
        assert!(moves[..9].iter().all(|mv| *mv == C));
    }

    #[test]
    fn test_random_choice_mixes() {
        let mut rng = make_rng();
        let mut s = RandomChoice;
        let coop = (0..1000)
            .filter(|_| s.next_move(&mut rng).unwrap() == C)
            .count();
        assert!(coop > 400 && coop < 600);
    }

    #[test]
    fn test_constant_strategies() {
        assert_eq!(replay(&mut AlwaysCooperate, "DDD"), vec![C, C, C]);
        assert_eq!(replay(&mut AlwaysDefect, "CCC"), vec![D, D, D]);
    }

    #[test]
    fn test_pavlov_win_stay_lose_switch() {
        // C vs D (loss) -> switch to D; D vs D (loss) -> C; C vs C (win) -> stay C
        let moves = replay(&mut Pavlov::default(), "DDCC");
        assert_eq!(moves, vec![C, D, C, C]);

        // D vs C (win) -> stay D
        let mut p = Pavlov::default();
        p.record_result(D, C);
        assert_eq!(p.next_move(&mut make_rng()).unwrap(), D);
    }

    #[test]
    fn test_tit_for_two_tats() {
        let moves = replay(&mut TitForTwoTats::default(), "DCDDC");
        assert_eq!(moves, vec![C, C, C, C, D]);
    }
}
