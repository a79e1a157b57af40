//! Initial guess selection for the iterative solver.
//!
//! Two analytical solutions are computed: (input #0, input #1) which we call pair "a",
//! and (input #0, last input) which we call pair "b". Each one proposes a right and a left
//! candidate. The true point is the one that comes back (almost) twice.
use itertools::Itertools;
use log::debug;
use nalgebra::Vector3;

/// Candidate of pair "a" retained as initial guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedChoice {
    /// Right of segment (#0, #1)
    Right,
    /// Left of segment (#0, #1)
    Left,
}

/// One of the four candidate pairings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Right of pair "a" against right of pair "b"
    RightRight,
    /// Right of pair "a" against left of pair "b"
    RightLeft,
    /// Left of pair "a" against right of pair "b"
    LeftRight,
    /// Left of pair "a" against left of pair "b"
    LeftLeft,
}

impl Pairing {
    /// Candidate of pair "a" this [Pairing] designates
    pub fn choice(&self) -> SeedChoice {
        match self {
            Self::RightRight | Self::RightLeft => SeedChoice::Right,
            Self::LeftRight | Self::LeftLeft => SeedChoice::Left,
        }
    }
}

/// [SeedDecision]: initial guess selection and ambiguity verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedDecision {
    /// Candidate of pair "a" to start iterating from
    pub choice: SeedChoice,
    /// Best [Pairing] and its distance (m)
    pub best: (Pairing, f64),
    /// True when the ratio test failed
    pub ambiguous: bool,
}

/// Right and left solutions of both analytical pairs, in the local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedCandidates {
    /// Right solution of (#0, #1)
    pub right_a: Vector3<f64>,
    /// Left solution of (#0, #1)
    pub left_a: Vector3<f64>,
    /// Right solution of (#0, last input)
    pub right_b: Vector3<f64>,
    /// Left solution of (#0, last input)
    pub left_b: Vector3<f64>,
}

impl SeedCandidates {
    /// Distances between candidates for each [Pairing]
    pub fn distances(&self) -> [(Pairing, f64); 4] {
        [
            (Pairing::RightRight, (self.right_a - self.right_b).norm()),
            (Pairing::RightLeft, (self.right_a - self.left_b).norm()),
            (Pairing::LeftRight, (self.left_a - self.right_b).norm()),
            (Pairing::LeftLeft, (self.left_a - self.left_b).norm()),
        ]
    }

    /// Selects the initial guess.
    ///
    /// When both analytical pairs were precise, the closest pairing wins, without further test.
    /// Ties resolve to the left candidate, unless right-right is strictly the closest.
    ///
    /// Otherwise, the four distances are sorted and the solution is declared ambiguous
    /// unless `ratio` times the smallest distance remains below the second smallest.
    /// The smallest distance still designates the initial guess.
    pub fn resolve(&self, imprecise: bool, ratio: f64) -> SeedDecision {
        let [rr, rl, lr, ll] = self.distances();

        if !imprecise {
            let best = if rr.1 < rl.1 && rr.1 < lr.1 && rr.1 < ll.1 {
                rr
            } else if rl.1 < lr.1 && rl.1 < ll.1 {
                rl
            } else if lr.1 < ll.1 {
                lr
            } else {
                ll
            };

            debug!("initial guess: {:?} (|d|={:.4E}m)", best.0, best.1);

            return SeedDecision {
                choice: best.0.choice(),
                best,
                ambiguous: false,
            };
        }

        let sorted = [rr, rl, lr, ll]
            .into_iter()
            .sorted_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
            .collect::<Vec<_>>();

        let (best, second) = (sorted[0], sorted[1]);
        let ambiguous = ratio * best.1 >= second.1;

        debug!(
            "initial guess: {:?} (|d|={:.4E}m) - ratio test {} (2nd best {:?} |d|={:.4E}m)",
            best.0,
            best.1,
            if ambiguous { "failed" } else { "passed" },
            second.0,
            second.1,
        );

        SeedDecision {
            choice: best.0.choice(),
            best,
            ambiguous,
        }
    }
}
