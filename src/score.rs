use std::fmt;

use serde::Deserialize;

use crate::stats::StatsRecord;

/// Weighting policy for the contribution score.
///
/// The defaults give `commits/10 + prs*0.6 + stars*0.15 + contributed_to`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    /// Commits needed for one point. Must be positive.
    pub commits_per_point: f64,
    pub pr: f64,
    pub star: f64,
    pub contributed_to: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            commits_per_point: 10.0,
            pr: 0.6,
            star: 0.15,
            contributed_to: 1.0,
        }
    }
}

/// Bounded contribution score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    /// Builds a score from a raw value, clamping anything above 100.
    pub fn new(value: u8) -> Self {
        Score(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Fraction of the full ring the score covers.
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Letter grade, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    D,
    C,
    B,
    A,
    APlus,
    APlusPlus,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::APlusPlus => "A++",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted sum of the record's counters, clamped to `0..=100` and truncated.
pub fn score(stats: &StatsRecord, weights: &ScoreWeights) -> Score {
    let raw = stats.total_commits as f64 / weights.commits_per_point
        + stats.total_prs as f64 * weights.pr
        + stats.total_stars as f64 * weights.star
        + stats.contributed_to as f64 * weights.contributed_to;

    // `as` saturates and maps NaN to 0.
    Score::new(raw.clamp(0.0, f64::from(Score::MAX)) as u8)
}

pub fn grade(score: Score) -> Grade {
    match score.value() {
        90.. => Grade::APlusPlus,
        75.. => Grade::APlus,
        60.. => Grade::A,
        40.. => Grade::B,
        20.. => Grade::C,
        _ => Grade::D,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(commits: u64, prs: u64, stars: u64, contributed_to: u64) -> StatsRecord {
        StatsRecord {
            total_commits: commits,
            total_prs: prs,
            total_stars: stars,
            contributed_to,
            ..StatsRecord::default()
        }
    }

    #[test]
    fn reference_record_scores_24_and_grades_c() {
        let s = score(&record(100, 10, 20, 5), &ScoreWeights::default());
        assert_eq!(s.value(), 24);
        assert_eq!(grade(s), Grade::C);
    }

    #[test]
    fn empty_record_scores_zero() {
        let s = score(&StatsRecord::default(), &ScoreWeights::default());
        assert_eq!(s.value(), 0);
        assert_eq!(grade(s), Grade::D);
    }

    #[test]
    fn large_record_is_clamped_to_100() {
        let s = score(&record(1_000_000, 5_000, 90_000, 400), &ScoreWeights::default());
        assert_eq!(s.value(), 100);
        assert_eq!(grade(s), Grade::APlusPlus);
    }

    #[test]
    fn fractional_points_are_truncated() {
        // 19 commits -> 1.9 points
        let s = score(&record(19, 0, 0, 0), &ScoreWeights::default());
        assert_eq!(s.value(), 1);
    }

    #[test]
    fn custom_weights_change_the_score() {
        let weights = ScoreWeights {
            commits_per_point: 1.0,
            pr: 0.0,
            star: 0.0,
            contributed_to: 0.0,
        };
        let s = score(&record(42, 100, 100, 100), &weights);
        assert_eq!(s.value(), 42);
    }

    #[test]
    fn grade_thresholds() {
        let cases = [
            (100, Grade::APlusPlus),
            (90, Grade::APlusPlus),
            (89, Grade::APlus),
            (75, Grade::APlus),
            (74, Grade::A),
            (60, Grade::A),
            (59, Grade::B),
            (40, Grade::B),
            (39, Grade::C),
            (20, Grade::C),
            (19, Grade::D),
            (0, Grade::D),
        ];
        for (value, expected) in cases {
            assert_eq!(grade(Score::new(value)), expected, "score {value}");
        }
    }

    #[test]
    fn grade_labels() {
        assert_eq!(Grade::APlusPlus.to_string(), "A++");
        assert_eq!(Grade::APlus.to_string(), "A+");
        assert_eq!(Grade::D.to_string(), "D");
    }

    #[test]
    fn score_new_clamps() {
        assert_eq!(Score::new(250).value(), 100);
        assert_eq!(Score::new(100).fraction(), 1.0);
    }

    #[test]
    fn grade_is_monotonic_over_full_range() {
        let grades: Vec<Grade> = (0..=100).map(|v| grade(Score::new(v))).collect();
        assert!(grades.windows(2).all(|w| w[0] <= w[1]));
    }

    proptest! {
        /// Property: any non-negative counters land inside 0..=100.
        #[test]
        fn score_is_bounded(
            commits in any::<u64>(),
            prs in any::<u64>(),
            stars in any::<u64>(),
            contributed_to in any::<u64>(),
        ) {
            let s = score(&record(commits, prs, stars, contributed_to), &ScoreWeights::default());
            prop_assert!(s.value() <= 100);
        }

        /// Property: adding activity never lowers the score.
        #[test]
        fn score_is_monotonic_in_commits(
            commits in 0u64..100_000,
            extra in 0u64..100_000,
            prs in 0u64..1_000,
        ) {
            let weights = ScoreWeights::default();
            let low = score(&record(commits, prs, 0, 0), &weights);
            let high = score(&record(commits + extra, prs, 0, 0), &weights);
            prop_assert!(low <= high);
            prop_assert!(grade(low) <= grade(high));
        }
    }
}
