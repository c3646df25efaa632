// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-leaf scores and their aggregation.

use alloc::string::String;

use multi_item::Tree;
use serde::{Deserialize, Serialize};

/// A leaf's score, or the composite score of several leaves.
///
/// Scores combine with [`Score::combine`], an associative operator whose identity is
/// [`Score::ZERO`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Score {
    /// Points earned out of a possible total.
    Points {
        /// Points awarded.
        earned: u32,
        /// Points available.
        total: u32,
        /// Optional feedback for the user.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// The input could not be graded, e.g. it does not parse.
    Invalid {
        /// Optional explanation for the user.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Default for Score {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Score {
    /// No points out of none; the identity of [`Score::combine`].
    pub const ZERO: Self = Self::Points {
        earned: 0,
        total: 0,
        message: None,
    };

    /// `earned` out of `total`, without a message.
    pub const fn points(earned: u32, total: u32) -> Self {
        Self::Points {
            earned,
            total,
            message: None,
        }
    }

    /// An invalid score carrying `message`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: Some(message.into()),
        }
    }

    /// Points earned; zero when invalid.
    pub fn earned(&self) -> u32 {
        match self {
            Self::Points { earned, .. } => *earned,
            Self::Invalid { .. } => 0,
        }
    }

    /// Points available; zero when invalid.
    pub fn total(&self) -> u32 {
        match self {
            Self::Points { total, .. } => *total,
            Self::Invalid { .. } => 0,
        }
    }

    /// Whether every available point was earned. An empty score is not complete.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Points { earned, total, .. } if *total > 0 && earned >= total)
    }

    /// Combine two scores.
    ///
    /// - Points add up pairwise (saturating) and keep the first message present.
    /// - An invalid score absorbs points on either side.
    /// - Two invalid scores stay invalid and keep the first message present.
    ///
    /// ```
    /// use multi_item_renderer::Score;
    ///
    /// let total = Score::points(1, 1).combine(Score::points(0, 1));
    /// assert_eq!(total, Score::points(1, 2));
    /// assert_eq!(Score::ZERO.combine(total.clone()), total);
    /// ```
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (
                Self::Points {
                    earned: e1,
                    total: t1,
                    message: m1,
                },
                Self::Points {
                    earned: e2,
                    total: t2,
                    message: m2,
                },
            ) => Self::Points {
                earned: e1.saturating_add(e2),
                total: t1.saturating_add(t2),
                message: m1.or(m2),
            },
            (Self::Invalid { message: m1 }, Self::Invalid { message: m2 }) => Self::Invalid {
                message: m1.or(m2),
            },
            (Self::Invalid { message }, Self::Points { .. })
            | (Self::Points { .. }, Self::Invalid { message }) => Self::Invalid { message },
        }
    }
}

/// Binary operator folding leaf scores into a composite, see [`Score::combine`].
pub type CombineFn = fn(Score, Score) -> Score;

/// A mounted content leaf's current input together with its score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafScore<G> {
    /// The leaf's current user input.
    pub guess: G,
    /// The leaf's own score for that input.
    pub score: Score,
}

/// Result of [`MultiRenderer::score`](crate::MultiRenderer::score).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graded<G> {
    /// Left fold of every mounted content leaf's score, starting from [`Score::ZERO`].
    pub score: Score,
    /// Each content leaf replaced by its current input (`None` when unmounted).
    ///
    /// `None` when the renderer holds a build error.
    pub guesses: Option<Tree<Option<G>, (), ()>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn samples() -> Vec<Score> {
        vec![
            Score::ZERO,
            Score::points(1, 1),
            Score::Points {
                earned: 2,
                total: 5,
                message: Some("close".into()),
            },
            Score::invalid("unparseable"),
            Score::Invalid { message: None },
            Score::points(u32::MAX, u32::MAX),
        ]
    }

    #[test]
    fn zero_is_identity() {
        for s in samples() {
            assert_eq!(Score::ZERO.combine(s.clone()), s);
            assert_eq!(s.clone().combine(Score::ZERO), s);
        }
    }

    #[test]
    fn combine_is_associative() {
        let all = samples();
        for a in &all {
            for b in &all {
                for c in &all {
                    let left = a.clone().combine(b.clone()).combine(c.clone());
                    let right = a.clone().combine(b.clone().combine(c.clone()));
                    assert_eq!(left, right, "({a:?} + {b:?}) + {c:?}");
                }
            }
        }
    }

    #[test]
    fn invalid_absorbs_points() {
        let bad = Score::invalid("nope");
        assert_eq!(Score::points(3, 4).combine(bad.clone()), bad);
        assert_eq!(bad.clone().combine(Score::points(3, 4)), bad);
        assert_eq!(
            Score::Invalid { message: None }.combine(bad.clone()),
            bad,
            "first present message wins"
        );
        assert_eq!(bad.earned(), 0);
        assert!(!bad.is_complete());
    }

    #[test]
    fn completeness() {
        assert!(!Score::ZERO.is_complete());
        assert!(Score::points(2, 2).is_complete());
        assert!(!Score::points(1, 2).is_complete());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Score::points(1, 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "points", "earned": 1, "total": 2})
        );
        let back: Score =
            serde_json::from_value(serde_json::json!({"type": "invalid", "message": "x"})).unwrap();
        assert_eq!(back, Score::invalid("x"));
    }
}
