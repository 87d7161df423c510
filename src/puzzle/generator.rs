//! Seeded puzzle generation
//!
//! Produces a random table and a goal query shaped by difficulty. Goals are
//! always valid; generation retries until the goal result is non-empty.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::query::{Aggregator, ComparisonOp, Filter, Query, Selection, TAKE_CAP};
use crate::table::{Column, Row, Table};

use super::errors::{PuzzleError, PuzzleResult};
use super::puzzle::Puzzle;

/// Distinct group keys drawn for the grouping column
const GROUP_KEY_SPREAD: i64 = 3;

/// Largest magnitude allowed for generated values
pub const VALUE_LIMIT: i64 = 1_000_000;

/// Puzzle difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Projection with one comparison
    Easy,
    /// Two-leaf AND/OR filter with skip/take
    Medium,
    /// Grouping with aggregates
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Number of data columns in generated tables
    pub fn table_width(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 4,
            Difficulty::Hard => 5,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(PuzzleError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Rows per generated table
    pub table_rows: usize,
    /// Smallest generated value
    pub min_value: i64,
    /// Largest generated value
    pub max_value: i64,
    /// Attempts before giving up on a non-empty goal result
    pub max_attempts: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            table_rows: 10,
            min_value: 0,
            max_value: 9,
            max_attempts: 64,
        }
    }
}

impl GeneratorSettings {
    /// Validates ranges
    pub fn validate(&self) -> PuzzleResult<()> {
        if self.table_rows == 0 || self.table_rows > TAKE_CAP {
            return Err(PuzzleError::InvalidSettings(format!(
                "table_rows must be in 1..={}, got {}",
                TAKE_CAP, self.table_rows
            )));
        }
        if self.min_value < -VALUE_LIMIT || self.max_value > VALUE_LIMIT {
            return Err(PuzzleError::InvalidSettings(format!(
                "values must lie in -{limit}..={limit}, got {}..={}",
                self.min_value,
                self.max_value,
                limit = VALUE_LIMIT
            )));
        }
        if self.min_value > self.max_value {
            return Err(PuzzleError::InvalidSettings(format!(
                "min_value {} exceeds max_value {}",
                self.min_value, self.max_value
            )));
        }
        if self.max_attempts == 0 {
            return Err(PuzzleError::InvalidSettings(
                "max_attempts must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Seeded puzzle generator.
///
/// The same seed and settings always yield the same sequence of puzzles.
pub struct PuzzleGenerator {
    settings: GeneratorSettings,
    rng: StdRng,
}

impl PuzzleGenerator {
    /// Creates a generator, validating its settings
    pub fn new(settings: GeneratorSettings, seed: u64) -> PuzzleResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Generates a puzzle whose goal result has at least one row
    pub fn generate(&mut self, difficulty: Difficulty) -> PuzzleResult<Puzzle> {
        let scope = ObservationScope::with_fields(
            "PUZZLE_GENERATE",
            &[("difficulty", difficulty.as_str())],
        );

        let data = Column::DATA;
        let columns = &data[..difficulty.table_width()];

        for attempt in 1..=self.settings.max_attempts {
            let goal = self.random_query(difficulty, columns);
            let table = self.random_table(columns, goal.group_by.column);

            let puzzle = match Puzzle::new(table, goal) {
                Ok(puzzle) => puzzle,
                Err(err) => {
                    scope.fail(err.message());
                    return Err(err.into());
                }
            };

            if !puzzle.expected().is_empty() {
                let attempts = attempt.to_string();
                let rows = puzzle.expected().len().to_string();
                scope.complete_with_fields(&[("attempts", attempts.as_str())]);
                log_event_with_fields(
                    Event::PuzzleGenerated,
                    &[
                        ("difficulty", difficulty.as_str()),
                        ("expected_rows", rows.as_str()),
                    ],
                );
                return Ok(puzzle);
            }
        }

        scope.fail("no non-empty goal result");
        Err(PuzzleError::Exhausted(self.settings.max_attempts))
    }

    /// Random table over `columns`; the grouping column gets a narrow key range
    fn random_table(&mut self, columns: &[Column], group_column: Column) -> Table {
        let (min, max) = (self.settings.min_value, self.settings.max_value);
        let key_max = max.min(min.saturating_add(GROUP_KEY_SPREAD - 1));

        (0..self.settings.table_rows)
            .map(|_| {
                let pairs: Vec<(Column, i64)> = columns
                    .iter()
                    .map(|&col| {
                        let upper = if col == group_column { key_max } else { max };
                        (col, self.rng.gen_range(min..=upper))
                    })
                    .collect();
                Row::from_pairs(&pairs)
            })
            .collect()
    }

    fn random_query(&mut self, difficulty: Difficulty, columns: &[Column]) -> Query {
        match difficulty {
            Difficulty::Easy => {
                let mut query = self.random_projection(columns, 1, 3);
                query.set_filter(self.random_leaf(columns));
                query
            }
            Difficulty::Medium => {
                let mut query = self.random_projection(columns, 2, 3);
                let left = self.random_leaf(columns);
                let right = self.random_leaf(columns);
                query.set_filter(if self.rng.gen_bool(0.5) {
                    Filter::and(left, right)
                } else {
                    Filter::or(left, right)
                });
                let skip = self.rng.gen_range(0..=2);
                let take = if self.rng.gen_bool(0.5) {
                    0
                } else {
                    self.rng.gen_range(1..=5)
                };
                query.limit(skip, take)
            }
            Difficulty::Hard => {
                let group = self.random_column(columns);
                let mut query = Query::new().select(group).group_by(group);
                for _ in 0..self.rng.gen_range(1..=2) {
                    let index = self.rng.gen_range(0..Aggregator::AGGREGATES.len());
                    let aggregator = Aggregator::AGGREGATES[index];
                    let column = self.random_column(columns);
                    query.push_selection(Selection::aggregate(aggregator, column));
                }
                if self.rng.gen_bool(0.5) {
                    query.set_filter(self.random_leaf(columns));
                }
                query
            }
        }
    }

    /// Query selecting between `min` and `max` distinct columns
    fn random_projection(&mut self, columns: &[Column], min: usize, max: usize) -> Query {
        let count = self.rng.gen_range(min..=max.min(columns.len()));
        columns
            .choose_multiple(&mut self.rng, count)
            .fold(Query::new(), |query, &col| query.select(col))
    }

    fn random_leaf(&mut self, columns: &[Column]) -> Filter {
        let column = self.random_column(columns);
        let op = ComparisonOp::ALL[self.rng.gen_range(0..ComparisonOp::ALL.len())];
        let value = self
            .rng
            .gen_range(self.settings.min_value..=self.settings.max_value);
        Filter::compare(column, op, value)
    }

    fn random_column(&mut self, columns: &[Column]) -> Column {
        columns[self.rng.gen_range(0..columns.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryValidator;

    fn generator(seed: u64) -> PuzzleGenerator {
        PuzzleGenerator::new(GeneratorSettings::default(), seed).unwrap()
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let a = generator(42).generate(Difficulty::Hard).unwrap();
        let b = generator(42).generate(Difficulty::Hard).unwrap();
        assert_eq!(a.table(), b.table());
        assert_eq!(a.goal(), b.goal());
    }

    #[test]
    fn test_goals_are_valid_and_non_empty() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut gen = generator(7);
            for _ in 0..20 {
                let puzzle = gen.generate(difficulty).unwrap();
                assert!(QueryValidator::validate(puzzle.goal()).is_ok());
                assert!(!puzzle.expected().is_empty());
                assert!(puzzle.check(puzzle.goal()).is_solved());
            }
        }
    }

    #[test]
    fn test_difficulty_shapes() {
        let mut gen = generator(3);

        let easy = gen.generate(Difficulty::Easy).unwrap();
        assert!(!easy.goal().group_by.is_grouping());
        assert!(matches!(easy.goal().filter, Some(Filter::Comparison { .. })));
        assert_eq!(easy.table().rows()[0].width(), 3);

        let medium = gen.generate(Difficulty::Medium).unwrap();
        assert_eq!(medium.goal().filter.as_ref().unwrap().depth(), 2);

        let hard = gen.generate(Difficulty::Hard).unwrap();
        assert!(hard.goal().group_by.is_grouping());
        assert_eq!(hard.goal().selections[0].column, hard.goal().group_by.column);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = GeneratorSettings {
            min_value: 5,
            max_value: 1,
            ..GeneratorSettings::default()
        };
        assert!(matches!(
            PuzzleGenerator::new(settings, 0),
            Err(PuzzleError::InvalidSettings(_))
        ));

        let settings = GeneratorSettings {
            table_rows: 0,
            ..GeneratorSettings::default()
        };
        assert!(PuzzleGenerator::new(settings, 0).is_err());
    }

    #[test]
    fn test_extreme_values_rejected() {
        let settings = GeneratorSettings {
            min_value: i64::MAX - 10,
            max_value: i64::MAX,
            ..GeneratorSettings::default()
        };
        assert!(matches!(
            PuzzleGenerator::new(settings, 0),
            Err(PuzzleError::InvalidSettings(_))
        ));

        let settings = GeneratorSettings {
            min_value: -VALUE_LIMIT - 1,
            ..GeneratorSettings::default()
        };
        assert!(PuzzleGenerator::new(settings, 0).is_err());
    }

    #[test]
    fn test_hard_puzzles_at_value_limits() {
        let settings = GeneratorSettings {
            min_value: VALUE_LIMIT - 5,
            max_value: VALUE_LIMIT,
            table_rows: 999,
            ..GeneratorSettings::default()
        };
        let mut gen = PuzzleGenerator::new(settings, 5).unwrap();
        for _ in 0..10 {
            let puzzle = gen.generate(Difficulty::Hard).unwrap();
            assert!(puzzle.check(puzzle.goal()).is_solved());
        }
    }

    #[test]
    fn test_exhaustion() {
        // All values are 0: any <>, < or > goal filter leaves nothing
        let settings = GeneratorSettings {
            table_rows: 1,
            min_value: 0,
            max_value: 0,
            max_attempts: 1,
        };
        let exhausted = (0..64u64).any(|seed| {
            matches!(
                PuzzleGenerator::new(settings, seed).unwrap().generate(Difficulty::Easy),
                Err(PuzzleError::Exhausted(1))
            )
        });
        assert!(exhausted);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
