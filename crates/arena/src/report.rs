//! Standings and report rows

use std::fmt::Write as _;

use crate::tournament::{MatchRecord, TournamentResult};

/// Cumulative score per strategy, in roster order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Standings {
    totals: Vec<(String, u64)>,
}

impl Standings {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self { totals: names.into_iter().map(|n| (n.to_string(), 0)).collect() }
    }

    /// Credit `score` to `name`, adding the name if it is new.
    pub fn add(&mut self, name: &str, score: u64) {
        match self.totals.iter_mut().find(|(n, _)| n == name) {
            Some((_, total)) => *total += score,
            None => self.totals.push((name.to_string(), score)),
        }
    }

    pub fn score(&self, name: &str) -> Option<u64> {
        self.totals.iter().find(|(n, _)| n == name).map(|(_, total)| *total)
    }

    /// Highest total first; ties keep roster order.
    pub fn ranking(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.totals.iter().map(|(n, t)| (n.as_str(), *t)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// `final score,<name>,<total>,` per strategy, best first.
    pub fn summary_lines(&self) -> Vec<String> {
        self.ranking()
            .into_iter()
            .map(|(name, total)| format!("final score,{name},{total},"))
            .collect()
    }
}

impl MatchRecord {
    /// `name_a,name_b,score_a,score_b`
    pub fn csv_row(&self) -> String {
        format!("{},{},{},{}", self.name_a, self.name_b, self.score_a, self.score_b)
    }
}

impl TournamentResult {
    /// One row per completed match followed by the summary lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.matches {
            let _ = writeln!(out, "{}", record.csv_row());
        }
        for line in self.standings.summary_lines() {
            let _ = writeln!(out, "{line}");
        }
        out
    }
}
