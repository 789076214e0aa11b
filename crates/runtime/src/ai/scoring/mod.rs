//! Priority scoring for leaf actions.
//!
//! A scorer holds weighted evaluators. For each decision it initializes them
//! once against the acting unit and the board, scores every candidate as the
//! weighted sum of their outputs, and keeps the highest.
//!
//! # Determinism
//!
//! Scoring is pure and candidates are enumerated in board order, so every
//! instance makes the same choice. Ties go to the first candidate seen.

mod cell;
mod unit;

pub use cell::{DamageCellEvaluator, DistanceToEnemyEvaluator, HeightCellEvaluator};
pub use unit::{DamageUnitEvaluator, HealthUnitEvaluator, KillUnitEvaluator};

use game_core::{CellCoord, Unit, UnitId, World};

/// Scores a destination cell for the acting unit.
pub trait CellEvaluator: Send {
    fn name(&self) -> &'static str;

    /// Called once per decision before any [`evaluate`](Self::evaluate).
    fn initialize(&mut self, _unit: &Unit, _world: &World) {}

    /// Score in `0.0..=1.0`.
    fn evaluate(&self, cell: CellCoord, unit: &Unit, world: &World) -> f32;
}

/// Scores a target unit for the acting unit.
pub trait UnitEvaluator: Send {
    fn name(&self) -> &'static str;

    /// Called once per decision before any [`evaluate`](Self::evaluate).
    fn initialize(&mut self, _unit: &Unit, _world: &World) {}

    /// Score in `0.0..=1.0`.
    fn evaluate(&self, target: &Unit, unit: &Unit, world: &World) -> f32;
}

/// A candidate and its weighted score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<T> {
    pub candidate: T,
    pub score: f32,
}

/// Keeps the highest score; the first candidate wins ties and NaN never
/// wins.
pub fn pick_best<T>(
    candidates: impl IntoIterator<Item = T>,
    mut score: impl FnMut(&T) -> f32,
) -> Option<Scored<T>> {
    let mut best: Option<Scored<T>> = None;
    for candidate in candidates {
        let value = score(&candidate);
        if value.is_nan() {
            continue;
        }
        if best.as_ref().is_none_or(|b| value > b.score) {
            best = Some(Scored {
                candidate,
                score: value,
            });
        }
    }
    best
}

/// Weighted cell evaluators.
pub struct CellScorer {
    evaluators: Vec<(Box<dyn CellEvaluator>, f32)>,
}

impl CellScorer {
    pub fn empty() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    pub fn with(mut self, evaluator: impl CellEvaluator + 'static, weight: f32) -> Self {
        self.evaluators.push((Box::new(evaluator), weight));
        self
    }

    pub fn score(&self, cell: CellCoord, unit: &Unit, world: &World) -> f32 {
        self.evaluators
            .iter()
            .map(|(evaluator, weight)| weight * evaluator.evaluate(cell, unit, world))
            .sum()
    }

    /// Initializes every evaluator, then returns the best of `candidates`.
    pub fn best(
        &mut self,
        candidates: impl IntoIterator<Item = CellCoord>,
        unit: &Unit,
        world: &World,
        trace: bool,
    ) -> Option<Scored<CellCoord>> {
        for (evaluator, _) in &mut self.evaluators {
            evaluator.initialize(unit, world);
        }
        pick_best(candidates, |cell| {
            let score = self.score(*cell, unit, world);
            if trace {
                tracing::debug!(target: "runtime::ai", unit = %unit.id, %cell, score, "cell candidate");
            }
            score
        })
    }
}

impl Default for CellScorer {
    /// Prefers cells with targets in reach, then closing distance, then
    /// high ground.
    fn default() -> Self {
        Self::empty()
            .with(DamageCellEvaluator::default(), 1.0)
            .with(DistanceToEnemyEvaluator::default(), 0.5)
            .with(HeightCellEvaluator::default(), 0.1)
    }
}

/// Weighted unit evaluators.
pub struct UnitScorer {
    evaluators: Vec<(Box<dyn UnitEvaluator>, f32)>,
}

impl UnitScorer {
    pub fn empty() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    pub fn with(mut self, evaluator: impl UnitEvaluator + 'static, weight: f32) -> Self {
        self.evaluators.push((Box::new(evaluator), weight));
        self
    }

    pub fn score(&self, target: &Unit, unit: &Unit, world: &World) -> f32 {
        self.evaluators
            .iter()
            .map(|(evaluator, weight)| weight * evaluator.evaluate(target, unit, world))
            .sum()
    }

    /// Initializes every evaluator, then returns the best of `candidates`.
    pub fn best(
        &mut self,
        candidates: impl IntoIterator<Item = UnitId>,
        unit: &Unit,
        world: &World,
        trace: bool,
    ) -> Option<Scored<UnitId>> {
        for (evaluator, _) in &mut self.evaluators {
            evaluator.initialize(unit, world);
        }
        pick_best(candidates, |id| {
            let Some(target) = world.unit(*id) else {
                return f32::NAN;
            };
            let score = self.score(target, unit, world);
            if trace {
                tracing::debug!(target: "runtime::ai", unit = %unit.id, target = %id, score, "target candidate");
            }
            score
        })
    }
}

impl Default for UnitScorer {
    /// Prefers kills, then raw damage, then already weakened targets.
    fn default() -> Self {
        Self::empty()
            .with(KillUnitEvaluator, 1.0)
            .with(DamageUnitEvaluator, 0.5)
            .with(HealthUnitEvaluator, 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_wins_ties() {
        let best = pick_best(["a", "b", "c"], |c| if *c == "a" { 1.0 } else { 1.0 });
        assert_eq!(best.map(|s| s.candidate), Some("a"));

        let best = pick_best([1, 2, 3, 2], |c| *c as f32);
        assert_eq!(best, Some(Scored { candidate: 3, score: 3.0 }));
    }

    #[test]
    fn nan_never_wins() {
        let best = pick_best([0, 1], |c| if *c == 0 { f32::NAN } else { -5.0 });
        assert_eq!(best.map(|s| s.candidate), Some(1));
        assert_eq!(pick_best(Vec::<u8>::new(), |_| 1.0), None);
    }
}
