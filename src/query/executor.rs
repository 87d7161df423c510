//! Query executor for tabquery
//!
//! Applies a query to a table, producing a fresh table.
//!
//! Execution flow (strict order):
//! 1. Validate selection/grouping shape (fails before any output exists)
//! 2. Filter rows, preserving source order
//! 3. Shape rows: group and aggregate, or project
//! 4. Apply skip, then take
//! 5. Return the new table

use std::collections::HashMap;

use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::table::{Row, Table};

use super::aggregate::create_accumulator;
use super::ast::{Aggregator, Query};
use super::errors::QueryResult;
use super::filters::FilterEvaluator;
use super::validator::QueryValidator;

/// Rows sharing one group key, in filtered order
struct Group<'t> {
    key: i64,
    rows: Vec<&'t Row>,
}

/// Query executor
///
/// Holds no state between runs; the same executor may run any number of
/// queries. Counters are recorded only when a registry is attached.
#[derive(Default)]
pub struct QueryExecutor<'a> {
    metrics: Option<&'a MetricsRegistry>,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor without metrics
    pub fn new() -> Self {
        Self { metrics: None }
    }

    /// Creates an executor recording into `metrics`
    pub fn with_metrics(metrics: &'a MetricsRegistry) -> Self {
        Self {
            metrics: Some(metrics),
        }
    }

    /// Executes a query against a table.
    ///
    /// Deterministic: same query + same table = same result. The source table
    /// is never modified.
    pub fn execute(&self, query: &Query, table: &Table) -> QueryResult<Table> {
        // Step 1: Shape validation
        if let Err(err) = QueryValidator::validate(query) {
            if let Some(metrics) = self.metrics {
                metrics.increment_queries_rejected();
            }
            log_event_with_fields(
                Event::QueryRejected,
                &[("code", err.code().code()), ("query", query.canonical().as_str())],
            );
            return Err(err);
        }

        // Step 2: Filter pass
        let filtered: Vec<&Row> = table
            .iter()
            .filter(|row| FilterEvaluator::matches(row, query.filter.as_ref()))
            .collect();

        // Step 3: Shaping
        let (shaped, group_count) = if query.group_by.is_grouping() {
            let groups = Self::partition(query, &filtered);
            let count = groups.len();
            (Self::aggregate_groups(query, &groups), count)
        } else {
            (Self::project(query, &filtered), 0)
        };

        // Step 4: Limit
        let result: Table = shaped
            .into_iter()
            .skip(query.limit.skip)
            .take(query.limit.effective_take())
            .collect();

        if let Some(metrics) = self.metrics {
            metrics.increment_queries_applied();
            metrics.add_rows_scanned(table.len() as u64);
            metrics.add_rows_returned(result.len() as u64);
            metrics.add_groups_formed(group_count as u64);
        }

        Logger::trace(
            Event::QueryApplied.as_str(),
            &[
                ("filtered", filtered.len().to_string().as_str()),
                ("returned", result.len().to_string().as_str()),
                ("scanned", table.len().to_string().as_str()),
            ],
        );

        Ok(result)
    }

    /// Partitions rows by group key in first-occurrence order.
    ///
    /// Rows not carrying the group column join no group.
    fn partition<'t>(query: &Query, rows: &[&'t Row]) -> Vec<Group<'t>> {
        let group_column = query.group_by.column;
        let mut groups: Vec<Group<'t>> = Vec::new();
        let mut positions: HashMap<i64, usize> = HashMap::new();

        for &row in rows {
            let Some(key) = row.get(group_column) else {
                continue;
            };
            let position = *positions.entry(key).or_insert_with(|| {
                groups.push(Group {
                    key,
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            groups[position].rows.push(row);
        }

        groups
    }

    /// Emits one row per group, one value per selection.
    ///
    /// Count yields the group's row count whatever column it names.
    fn aggregate_groups(query: &Query, groups: &[Group<'_>]) -> Vec<Row> {
        groups
            .iter()
            .map(|group| {
                let values = query
                    .output_selections()
                    .map(|selection| match create_accumulator(selection.aggregator) {
                        // Validation guarantees this selection names the group column
                        None => group.key,
                        Some(mut acc) => {
                            for row in &group.rows {
                                match row.get(selection.column) {
                                    Some(value) => acc.feed(value),
                                    None if selection.aggregator == Aggregator::Count => acc.feed(0),
                                    None => {}
                                }
                            }
                            acc.finish()
                        }
                    })
                    .collect();
                Row::new(values)
            })
            .collect()
    }

    /// Emits one row per filtered row, compacting inactive selections away
    fn project(query: &Query, rows: &[&Row]) -> Vec<Row> {
        rows.iter()
            .map(|row| {
                let values = query
                    .output_selections()
                    .filter_map(|selection| row.get(selection.column))
                    .collect();
                Row::new(values)
            })
            .collect()
    }
}

impl Query {
    /// Applies this query to `table`, returning a new table.
    ///
    /// Fails with a configuration error, producing nothing, when the
    /// selection list does not fit the grouping configuration.
    pub fn apply(&self, table: &Table) -> QueryResult<Table> {
        QueryExecutor::new().execute(self, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ComparisonOp, Filter, QueryErrorCode};
    use crate::table::Column;

    fn abc(rows: &[(i64, i64, i64)]) -> Table {
        rows.iter()
            .map(|&(a, b, c)| Row::from_pairs(&[(Column::A, a), (Column::B, b), (Column::C, c)]))
            .collect()
    }

    fn values(table: &Table) -> Vec<Vec<i64>> {
        table.iter().map(|r| r.values().to_vec()).collect()
    }

    #[test]
    fn test_end_to_end_grouped_min() {
        let table = abc(&[(1, 5, 7), (2, 3, 7), (3, 9, 8)]);
        let query = Query::new()
            .with_filter(Filter::ne(Column::C, 7))
            .select(Column::C)
            .select_agg(Aggregator::Min, Column::B)
            .select_agg(Aggregator::Min, Column::A)
            .group_by(Column::C);

        let result = query.apply(&table).unwrap();
        assert_eq!(values(&result), vec![vec![8, 9, 3]]);
    }

    #[test]
    fn test_groups_in_first_occurrence_order() {
        let table = abc(&[(1, 0, 9), (2, 0, 3), (3, 0, 9), (4, 0, 5), (5, 0, 3)]);
        let query = Query::new()
            .select(Column::C)
            .select_agg(Aggregator::Sum, Column::A)
            .select_agg(Aggregator::Count, Column::A)
            .group_by(Column::C);

        let result = query.apply(&table).unwrap();
        assert_eq!(
            values(&result),
            vec![vec![9, 4, 2], vec![3, 7, 2], vec![5, 4, 1]]
        );
    }

    #[test]
    fn test_all_aggregators() {
        let table = abc(&[(1, 2, 0), (1, 3, 0), (1, 8, 0)]);
        let query = Query::new()
            .select_agg(Aggregator::Min, Column::B)
            .select_agg(Aggregator::Max, Column::B)
            .select_agg(Aggregator::Avg, Column::B)
            .select_agg(Aggregator::Sum, Column::B)
            .select_agg(Aggregator::Count, Column::B)
            .group_by(Column::A);

        let result = query.apply(&table).unwrap();
        // mean 13/3 rounds to 4
        assert_eq!(values(&result), vec![vec![2, 8, 4, 13, 3]]);
    }

    #[test]
    fn test_projection_compacts_inactive_selection() {
        let table = abc(&[(1, 2, 3)]);
        let query = Query::new()
            .select(Column::A)
            .select(Column::None)
            .select(Column::C);

        let result = query.apply(&table).unwrap();
        assert_eq!(values(&result), vec![vec![1, 3]]);
    }

    #[test]
    fn test_grouped_count_on_sentinel_column() {
        let table = abc(&[(1, 0, 8), (2, 0, 8), (3, 0, 5)]);
        let query = Query::new()
            .select(Column::C)
            .select_agg(Aggregator::Count, Column::None)
            .select_agg(Aggregator::Sum, Column::None)
            .group_by(Column::C);

        let result = query.apply(&table).unwrap();
        assert_eq!(values(&result), vec![vec![8, 2, 0], vec![5, 1, 0]]);
    }

    #[test]
    fn test_projection_reorders_columns() {
        let table = abc(&[(1, 2, 3), (4, 5, 6)]);
        let query = Query::new().select(Column::C).select(Column::A).select(Column::A);

        let result = query.apply(&table).unwrap();
        assert_eq!(values(&result), vec![vec![3, 1, 1], vec![6, 4, 4]]);
    }

    #[test]
    fn test_limit_skip_and_take() {
        let table = abc(&[(1, 0, 0), (2, 0, 0), (3, 0, 0), (4, 0, 0)]);
        let query = Query::new().select(Column::A).limit(1, 2);
        assert_eq!(values(&query.apply(&table).unwrap()), vec![vec![2], vec![3]]);

        let query = Query::new().select(Column::A).limit(10, 0);
        assert!(query.apply(&table).unwrap().is_empty());
    }

    #[test]
    fn test_rejection_produces_no_table() {
        let table = abc(&[(1, 2, 3)]);
        let query = Query::new().select(Column::A).group_by(Column::C);

        let err = query.apply(&table).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::AggregateOrGroupRequired);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let table = abc(&[(1, 2, 3)]);
        let query = Query::new()
            .select(Column::A)
            .with_filter(Filter::compare(Column::A, ComparisonOp::Gt, 100));

        let result = query.apply(&table).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_source_table_untouched() {
        let table = abc(&[(1, 2, 3), (4, 5, 6)]);
        let before = table.clone();
        let query = Query::new().select(Column::B).limit(1, 1);
        let _ = query.apply(&table).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = MetricsRegistry::new();
        let executor = QueryExecutor::with_metrics(&metrics);
        let table = abc(&[(1, 0, 7), (2, 0, 7), (3, 0, 8)]);

        let query = Query::new()
            .select(Column::C)
            .select_agg(Aggregator::Count, Column::A)
            .group_by(Column::C);
        executor.execute(&query, &table).unwrap();

        let bad = Query::new().select_agg(Aggregator::Sum, Column::A);
        assert!(executor.execute(&bad, &table).is_err());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.queries_applied, 1);
        assert_eq!(snapshot.queries_rejected, 1);
        assert_eq!(snapshot.rows_scanned, 3);
        assert_eq!(snapshot.rows_returned, 2);
        assert_eq!(snapshot.groups_formed, 2);
    }
}
