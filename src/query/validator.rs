//! Shape validation
//!
//! Checks the relationship between selections and grouping before any row is
//! shaped. Outcomes depend on the query alone, never on table contents.

use super::ast::Query;
use super::errors::{QueryError, QueryResult};

/// Validates query shape
pub struct QueryValidator;

impl QueryValidator {
    /// Validates every selection against the grouping configuration.
    ///
    /// - Grouping: each selection aggregates or names the group column.
    /// - Not grouping: no selection aggregates.
    ///
    /// Inactive selections are checked too. The first offending selection is
    /// reported.
    pub fn validate(query: &Query) -> QueryResult<()> {
        let group = query.group_by;

        for (i, selection) in query.selections.iter().enumerate() {
            if group.is_grouping() {
                if selection.aggregator.is_none() && selection.column != group.column {
                    return Err(QueryError::aggregate_or_group_required(i));
                }
            } else if !selection.aggregator.is_none() {
                return Err(QueryError::aggregate_without_grouping(i));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Aggregator, QueryErrorCode};
    use crate::table::Column;

    #[test]
    fn test_grouped_requires_aggregate_or_key() {
        let query = Query::new()
            .select(Column::A)
            .group_by(Column::C);

        let err = QueryValidator::validate(&query).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::AggregateOrGroupRequired);
        assert_eq!(err.selection(), Some(0));
    }

    #[test]
    fn test_grouped_accepts_key_and_aggregates() {
        let query = Query::new()
            .select(Column::C)
            .select_agg(Aggregator::Min, Column::B)
            .select_agg(Aggregator::Count, Column::A)
            .group_by(Column::C);

        assert!(QueryValidator::validate(&query).is_ok());
    }

    #[test]
    fn test_ungrouped_rejects_aggregate() {
        let query = Query::new()
            .select(Column::A)
            .select_agg(Aggregator::Sum, Column::B);

        let err = QueryValidator::validate(&query).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::AggregateWithoutGrouping);
        assert_eq!(err.selection(), Some(1));
    }

    #[test]
    fn test_inactive_selection_still_checked() {
        let query = Query::new()
            .select(Column::C)
            .select(Column::None)
            .group_by(Column::C);

        let err = QueryValidator::validate(&query).unwrap_err();
        assert_eq!(err.selection(), Some(1));
    }

    #[test]
    fn test_empty_selection_list_is_valid() {
        assert!(QueryValidator::validate(&Query::new()).is_ok());
        assert!(QueryValidator::validate(&Query::new().group_by(Column::A)).is_ok());
    }
}
