//! Query structures
//!
//! Queries are built programmatically, either by the puzzle generator or by a
//! driving application mutating one field at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::Column;

/// Upper bound on returned rows when `take` is zero
pub const TAKE_CAP: usize = 999;

/// Comparison operators for leaf filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl ComparisonOp {
    /// All operators, in display order
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Lt,
        ComparisonOp::Lte,
        ComparisonOp::Gt,
        ComparisonOp::Gte,
    ];

    /// Applies the operator to two integers
    pub fn compare(&self, left: i64, right: i64) -> bool {
        match self {
            ComparisonOp::Eq => left == right,
            ComparisonOp::Ne => left != right,
            ComparisonOp::Lt => left < right,
            ComparisonOp::Lte => left <= right,
            ComparisonOp::Gt => left > right,
            ComparisonOp::Gte => left >= right,
        }
    }

    /// Returns the operator symbol for rendered queries
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
        }
    }
}

/// Boolean combinator for combination filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Right branch is inactive; result is the left branch
    #[default]
    None,
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::None => "NONE",
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

/// Predicate tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Leaf: `column op value`
    Comparison {
        column: Column,
        op: ComparisonOp,
        value: i64,
    },
    /// Node: `left op right`. An absent right branch is never evaluated.
    Combination {
        left: Box<Filter>,
        op: Combinator,
        #[serde(default)]
        right: Option<Box<Filter>>,
    },
}

impl Filter {
    /// Create a comparison leaf
    pub fn compare(column: Column, op: ComparisonOp, value: i64) -> Self {
        Filter::Comparison { column, op, value }
    }

    /// Shorthand for an equality leaf
    pub fn eq(column: Column, value: i64) -> Self {
        Self::compare(column, ComparisonOp::Eq, value)
    }

    /// Shorthand for an inequality leaf
    pub fn ne(column: Column, value: i64) -> Self {
        Self::compare(column, ComparisonOp::Ne, value)
    }

    /// Create a combination node
    pub fn combine(left: Filter, op: Combinator, right: Option<Filter>) -> Self {
        Filter::Combination {
            left: Box::new(left),
            op,
            right: right.map(Box::new),
        }
    }

    /// `left AND right`
    pub fn and(left: Filter, right: Filter) -> Self {
        Self::combine(left, Combinator::And, Some(right))
    }

    /// `left OR right`
    pub fn or(left: Filter, right: Filter) -> Self {
        Self::combine(left, Combinator::Or, Some(right))
    }

    /// Combination whose right branch is inactive
    pub fn passthrough(left: Filter, right: Option<Filter>) -> Self {
        Self::combine(left, Combinator::None, right)
    }

    /// Columns read when evaluating this filter, in tree order.
    ///
    /// The right branch of a pass-through combination is never read.
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Filter::Comparison { column, .. } => vec![*column],
            Filter::Combination { left, op, right } => {
                let mut columns = left.columns();
                if let (Combinator::And | Combinator::Or, Some(right)) = (op, right) {
                    columns.extend(right.columns());
                }
                columns
            }
        }
    }

    /// Depth of the tree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Filter::Comparison { .. } => 1,
            Filter::Combination { left, right, .. } => {
                let right_depth = right.as_ref().map_or(0, |r| r.depth());
                1 + left.depth().max(right_depth)
            }
        }
    }
}

impl fmt::Display for Filter {
    /// Inactive branches are not rendered.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Comparison { column, op, value } => {
                write!(f, "{} {} {}", column, op.symbol(), value)
            }
            Filter::Combination { left, op, right } => match (op, right) {
                (Combinator::And | Combinator::Or, Some(right)) => {
                    write!(f, "({} {} {})", left, op.as_str(), right)
                }
                _ => write!(f, "{}", left),
            },
        }
    }
}

/// Aggregation applied to a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    /// Pass the value through
    #[default]
    None,
    Min,
    Max,
    Avg,
    Sum,
    Count,
}

impl Aggregator {
    /// All real aggregators (excludes the pass-through)
    pub const AGGREGATES: [Aggregator; 5] = [
        Aggregator::Min,
        Aggregator::Max,
        Aggregator::Avg,
        Aggregator::Sum,
        Aggregator::Count,
    ];

    pub fn is_none(&self) -> bool {
        matches!(self, Aggregator::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::None => "NONE",
            Aggregator::Min => "MIN",
            Aggregator::Max => "MAX",
            Aggregator::Avg => "AVG",
            Aggregator::Sum => "SUM",
            Aggregator::Count => "COUNT",
        }
    }
}

/// One output column descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub column: Column,
    #[serde(default)]
    pub aggregator: Aggregator,
}

impl Selection {
    /// Plain column projection
    pub fn column(column: Column) -> Self {
        Self {
            column,
            aggregator: Aggregator::None,
        }
    }

    /// Aggregated column
    pub fn aggregate(aggregator: Aggregator, column: Column) -> Self {
        Self { column, aggregator }
    }

    /// Inactive selections (sentinel column) produce no output column when
    /// projecting
    pub fn is_active(&self) -> bool {
        !self.column.is_none()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.aggregator {
            Aggregator::None => write!(f, "{}", self.column),
            agg => write!(f, "{}({})", agg.as_str(), self.column),
        }
    }
}

/// Grouping column; `Column::None` means no grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSpec {
    pub column: Column,
}

impl GroupSpec {
    /// No grouping
    pub fn none() -> Self {
        Self::default()
    }

    /// Group by `column`
    pub fn by(column: Column) -> Self {
        Self { column }
    }

    /// Returns true if rows are grouped
    pub fn is_grouping(&self) -> bool {
        !self.column.is_none()
    }
}

/// Skip / take window over the shaped rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default)]
    pub skip: usize,
    /// Zero means "up to TAKE_CAP"
    #[serde(default)]
    pub take: usize,
}

impl Limit {
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }

    /// No skipping, up to TAKE_CAP rows
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Number of rows kept after skipping
    pub fn effective_take(&self) -> usize {
        if self.take == 0 {
            TAKE_CAP
        } else {
            self.take
        }
    }
}

/// A complete query.
///
/// Long-lived; a driving application replaces one field at a time between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Absent filter matches every row
    #[serde(default)]
    pub filter: Option<Filter>,
    /// Output columns, in output order
    #[serde(default)]
    pub selections: Vec<Selection>,
    #[serde(default)]
    pub group_by: GroupSpec,
    #[serde(default)]
    pub limit: Limit,
}

impl Query {
    /// Creates an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Adds a plain column selection
    pub fn select(mut self, column: Column) -> Self {
        self.selections.push(Selection::column(column));
        self
    }

    /// Adds an aggregated selection
    pub fn select_agg(mut self, aggregator: Aggregator, column: Column) -> Self {
        self.selections.push(Selection::aggregate(aggregator, column));
        self
    }

    /// Sets the grouping column
    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by = GroupSpec::by(column);
        self
    }

    /// Sets skip and take
    pub fn limit(mut self, skip: usize, take: usize) -> Self {
        self.limit = Limit::new(skip, take);
        self
    }

    // Single-field mutators for interactive editing

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = Some(filter);
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// Replaces the selection at `index`, growing the list with inactive
    /// selections if needed.
    pub fn set_selection(&mut self, index: usize, selection: Selection) {
        if index >= self.selections.len() {
            self.selections.resize(index + 1, Selection::default());
        }
        self.selections[index] = selection;
    }

    pub fn push_selection(&mut self, selection: Selection) {
        self.selections.push(selection);
    }

    /// Removes and returns the selection at `index`, if present
    pub fn remove_selection(&mut self, index: usize) -> Option<Selection> {
        if index < self.selections.len() {
            Some(self.selections.remove(index))
        } else {
            None
        }
    }

    pub fn set_group_by(&mut self, group_by: GroupSpec) {
        self.group_by = group_by;
    }

    pub fn set_limit(&mut self, limit: Limit) {
        self.limit = limit;
    }

    /// Selections that produce an output column, in output order.
    ///
    /// Grouped queries emit every selection; projections skip inactive ones.
    pub fn output_selections(&self) -> impl Iterator<Item = &Selection> {
        let grouping = self.group_by.is_grouping();
        self.selections
            .iter()
            .filter(move |s| grouping || s.is_active())
    }

    /// Data columns this query reads from source rows
    pub fn referenced_columns(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self.filter.iter().flat_map(Filter::columns).collect();
        columns.extend(self.selections.iter().map(|s| s.column));
        columns.push(self.group_by.column);
        columns.retain(|c| !c.is_none());
        columns.sort();
        columns.dedup();
        columns
    }

    /// Canonical text form.
    ///
    /// Deterministic SQL-like rendering. Every selection is rendered, inactive
    /// ones as `-`, since they still take part in validation. Inactive filter
    /// branches are omitted and the limit is always rendered with its
    /// effective take.
    pub fn canonical(&self) -> String {
        let columns: Vec<String> = self.selections.iter().map(|s| s.to_string()).collect();

        let mut out = String::from("SELECT ");
        if columns.is_empty() {
            out.push_str("NOTHING");
        } else {
            out.push_str(&columns.join(", "));
        }

        if let Some(filter) = &self.filter {
            out.push_str(&format!(" WHERE {}", filter));
        }
        if self.group_by.is_grouping() {
            out.push_str(&format!(" GROUP BY {}", self.group_by.column));
        }
        out.push_str(&format!(
            " LIMIT {}, {}",
            self.limit.skip,
            self.limit.effective_take()
        ));
        out
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder() {
        let query = Query::new()
            .select(Column::C)
            .select_agg(Aggregator::Min, Column::B)
            .with_filter(Filter::ne(Column::C, 7))
            .group_by(Column::C);

        assert_eq!(query.selections.len(), 2);
        assert!(query.group_by.is_grouping());
        assert_eq!(
            query.canonical(),
            "SELECT C, MIN(B) WHERE C <> 7 GROUP BY C LIMIT 0, 999"
        );
    }

    #[test]
    fn test_take_zero_and_cap_render_identically() {
        let a = Query::new().select(Column::A).limit(2, 0);
        let b = Query::new().select(Column::A).limit(2, TAKE_CAP);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_inactive_parts_not_rendered() {
        let query = Query::new()
            .select(Column::A)
            .select(Column::None)
            .with_filter(Filter::passthrough(
                Filter::eq(Column::A, 1),
                Some(Filter::eq(Column::B, 2)),
            ));
        assert_eq!(query.canonical(), "SELECT A WHERE A = 1 LIMIT 0, 999");
    }

    #[test]
    fn test_inactive_selection_rendered() {
        let valid = Query::new().select(Column::C).group_by(Column::C);
        let rejected = Query::new()
            .select(Column::C)
            .select(Column::None)
            .group_by(Column::C);

        assert_eq!(valid.canonical(), "SELECT C GROUP BY C LIMIT 0, 999");
        assert_eq!(rejected.canonical(), "SELECT C, - GROUP BY C LIMIT 0, 999");
        assert_ne!(valid.canonical(), rejected.canonical());

        let counted = Query::new()
            .select(Column::C)
            .select_agg(Aggregator::Count, Column::None)
            .group_by(Column::C);
        assert_eq!(counted.canonical(), "SELECT C, COUNT(-) GROUP BY C LIMIT 0, 999");
    }

    #[test]
    fn test_output_selections_by_path() {
        let projection = Query::new().select(Column::A).select(Column::None);
        assert_eq!(projection.output_selections().count(), 1);

        let grouped = Query::new()
            .select(Column::A)
            .select_agg(Aggregator::Count, Column::None)
            .group_by(Column::A);
        assert_eq!(grouped.output_selections().count(), 2);
    }

    #[test]
    fn test_referenced_columns() {
        let query = Query::new()
            .with_filter(Filter::passthrough(
                Filter::eq(Column::E, 1),
                Some(Filter::eq(Column::G, 2)),
            ))
            .select(Column::C)
            .select(Column::None)
            .select_agg(Aggregator::Sum, Column::A)
            .group_by(Column::C);

        assert_eq!(query.referenced_columns(), vec![Column::A, Column::C, Column::E]);
        assert!(Query::new().referenced_columns().is_empty());
    }

    #[test]
    fn test_combination_rendering() {
        let filter = Filter::or(Filter::eq(Column::A, 0), Filter::compare(Column::B, ComparisonOp::Gte, 3));
        assert_eq!(filter.to_string(), "(A = 0 OR B >= 3)");
        assert_eq!(filter.depth(), 2);
    }

    #[test]
    fn test_set_selection_grows_list() {
        let mut query = Query::new();
        query.set_selection(2, Selection::column(Column::D));
        assert_eq!(query.selections.len(), 3);
        assert!(!query.selections[0].is_active());
        assert_eq!(query.selections[2].column, Column::D);

        assert_eq!(query.remove_selection(0), Some(Selection::default()));
        assert_eq!(query.remove_selection(5), None);
    }

    #[test]
    fn test_mutators_touch_one_field() {
        let mut query = Query::new().select(Column::A).limit(1, 2);
        query.set_group_by(GroupSpec::by(Column::A));
        assert_eq!(query.limit, Limit::new(1, 2));
        assert_eq!(query.selections, vec![Selection::column(Column::A)]);
        query.clear_filter();
        assert!(query.filter.is_none());
    }

    #[test]
    fn test_json_shape() {
        let value = json!({
            "filter": {
                "kind": "combination",
                "left": {"kind": "comparison", "column": "A", "op": "=", "value": 0},
                "op": "and",
                "right": {"kind": "comparison", "column": "B", "op": "!=", "value": 1}
            },
            "selections": [{"column": "C", "aggregator": "count"}, {"column": "A"}],
            "group_by": "A",
            "limit": {"skip": 1}
        });

        let query: Query = serde_json::from_value(value).unwrap();
        assert_eq!(
            query.filter,
            Some(Filter::and(Filter::eq(Column::A, 0), Filter::ne(Column::B, 1)))
        );
        assert_eq!(query.selections[0], Selection::aggregate(Aggregator::Count, Column::C));
        assert_eq!(query.selections[1], Selection::column(Column::A));
        assert_eq!(query.group_by, GroupSpec::by(Column::A));
        assert_eq!(query.limit, Limit::new(1, 0));
    }

    #[test]
    fn test_effective_take() {
        assert_eq!(Limit::unbounded().effective_take(), TAKE_CAP);
        assert_eq!(Limit::new(0, 3).effective_take(), 3);
    }
}
