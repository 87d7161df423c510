//! Per-group accumulators
//!
//! Each accumulator follows a feed → finish lifecycle over one group's values.
//! All arithmetic is integer arithmetic. Sums are held in `i128`, which cannot
//! overflow for any group a table can hold; a sum outside `i64` saturates.

use super::ast::Aggregator;

/// Stateful aggregate computation over one group
pub trait Accumulator {
    /// Feeds a single value
    fn feed(&mut self, value: i64);

    /// Produces the final aggregate value
    fn finish(&self) -> i64;
}

/// Creates an accumulator for `aggregator`.
///
/// The pass-through aggregator has no accumulator; callers emit the group key.
pub fn create_accumulator(aggregator: Aggregator) -> Option<Box<dyn Accumulator>> {
    match aggregator {
        Aggregator::None => None,
        Aggregator::Count => Some(Box::new(CountAccumulator { count: 0 })),
        Aggregator::Sum => Some(Box::new(SumAccumulator { sum: 0 })),
        Aggregator::Avg => Some(Box::new(AvgAccumulator { sum: 0, count: 0 })),
        Aggregator::Min => Some(Box::new(MinAccumulator { min: None })),
        Aggregator::Max => Some(Box::new(MaxAccumulator { max: None })),
    }
}

/// Divides with rounding to the nearest integer, ties to even.
///
/// `count` must be positive.
pub fn div_round_half_even(sum: i128, count: i128) -> i128 {
    let quotient = sum.div_euclid(count);
    let twice_rem = 2 * sum.rem_euclid(count);

    if twice_rem < count {
        quotient
    } else if twice_rem > count || quotient % 2 != 0 {
        quotient + 1
    } else {
        quotient
    }
}

struct CountAccumulator {
    count: i64,
}

impl Accumulator for CountAccumulator {
    fn feed(&mut self, _value: i64) {
        self.count += 1;
    }

    fn finish(&self) -> i64 {
        self.count
    }
}

struct SumAccumulator {
    sum: i128,
}

impl Accumulator for SumAccumulator {
    fn feed(&mut self, value: i64) {
        self.sum += i128::from(value);
    }

    fn finish(&self) -> i64 {
        saturate(self.sum)
    }
}

/// Mean rounded half-to-even
struct AvgAccumulator {
    sum: i128,
    count: i128,
}

impl Accumulator for AvgAccumulator {
    fn feed(&mut self, value: i64) {
        self.sum += i128::from(value);
        self.count += 1;
    }

    fn finish(&self) -> i64 {
        if self.count == 0 {
            0
        } else {
            // A mean of i64 values always fits in i64
            saturate(div_round_half_even(self.sum, self.count))
        }
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

struct MinAccumulator {
    min: Option<i64>,
}

impl Accumulator for MinAccumulator {
    fn feed(&mut self, value: i64) {
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
    }

    fn finish(&self) -> i64 {
        self.min.unwrap_or(0)
    }
}

struct MaxAccumulator {
    max: Option<i64>,
}

impl Accumulator for MaxAccumulator {
    fn feed(&mut self, value: i64) {
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn finish(&self) -> i64 {
        self.max.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(aggregator: Aggregator, values: &[i64]) -> i64 {
        let mut acc = create_accumulator(aggregator).unwrap();
        for v in values {
            acc.feed(*v);
        }
        acc.finish()
    }

    #[test]
    fn test_basic_aggregates() {
        let values = [4, -2, 9, 1];
        assert_eq!(run(Aggregator::Count, &values), 4);
        assert_eq!(run(Aggregator::Sum, &values), 12);
        assert_eq!(run(Aggregator::Min, &values), -2);
        assert_eq!(run(Aggregator::Max, &values), 9);
        assert_eq!(run(Aggregator::Avg, &values), 3);
    }

    #[test]
    fn test_passthrough_has_no_accumulator() {
        assert!(create_accumulator(Aggregator::None).is_none());
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(div_round_half_even(5, 2), 2); // 2.5
        assert_eq!(div_round_half_even(7, 2), 4); // 3.5
        assert_eq!(div_round_half_even(-5, 2), -2); // -2.5
        assert_eq!(div_round_half_even(-7, 2), -4); // -3.5
        assert_eq!(div_round_half_even(10, 4), 2); // 2.5
        assert_eq!(div_round_half_even(11, 4), 3); // 2.75
        assert_eq!(div_round_half_even(-11, 4), -3); // -2.75
        assert_eq!(div_round_half_even(9, 4), 2); // 2.25
        assert_eq!(div_round_half_even(6, 3), 2);
    }

    #[test]
    fn test_sum_saturates_instead_of_overflowing() {
        assert_eq!(run(Aggregator::Sum, &[i64::MAX, 1]), i64::MAX);
        assert_eq!(run(Aggregator::Sum, &[i64::MIN, -1]), i64::MIN);
        assert_eq!(run(Aggregator::Sum, &[i64::MAX, 1, -2]), i64::MAX - 1);
    }

    #[test]
    fn test_avg_of_extreme_values() {
        assert_eq!(run(Aggregator::Avg, &[i64::MAX, i64::MAX]), i64::MAX);
        assert_eq!(run(Aggregator::Avg, &[i64::MIN, i64::MIN]), i64::MIN);
        assert_eq!(run(Aggregator::Avg, &[i64::MAX, i64::MIN]), 0); // -0.5
    }

    #[test]
    fn test_avg_uses_banker_rounding() {
        assert_eq!(run(Aggregator::Avg, &[2, 3]), 2);
        assert_eq!(run(Aggregator::Avg, &[3, 4]), 4);
        assert_eq!(run(Aggregator::Avg, &[1, 1, 2]), 1);
    }
}
