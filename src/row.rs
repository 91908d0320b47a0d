//! Row-oriented records.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One record of the row-oriented representation.
///
/// Equality compares the cost lists element-wise by total order, so a `NaN`
/// cost equals itself and `Row` can be `Eq`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    pub id: i64,
    pub component: i64,
    /// Costs of this row's component, in order. May be empty.
    pub component_cost: Vec<f64>,
}

impl Row {
    #[must_use]
    pub const fn new(id: i64, component: i64, component_cost: Vec<f64>) -> Self {
        Self {
            id,
            component,
            component_cost,
        }
    }

    /// Borrow this row as a [`RowView`].
    #[must_use]
    pub fn as_view(&self) -> RowView<'_> {
        RowView {
            id: self.id,
            component: self.component,
            component_cost: &self.component_cost,
        }
    }
}

/// A row decoded without copying: `component_cost` points into the values
/// buffer of the [`Table`](crate::Table) it came from and cannot outlive it.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    pub id: i64,
    pub component: i64,
    pub component_cost: &'a [f64],
}

impl RowView<'_> {
    /// Copy the view into an owned [`Row`].
    #[must_use]
    pub fn to_row(&self) -> Row {
        Row {
            id: self.id,
            component: self.component,
            component_cost: self.component_cost.to_vec(),
        }
    }
}

fn costs_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| OrderedFloat(*x) == OrderedFloat(*y))
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.component == other.component
            && costs_eq(&self.component_cost, &other.component_cost)
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.component.hash(state);
        self.component_cost.len().hash(state);
        for c in &self.component_cost {
            OrderedFloat(*c).hash(state);
        }
    }
}

impl PartialEq for RowView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.component == other.component
            && costs_eq(self.component_cost, other.component_cost)
    }
}

impl PartialEq<Row> for RowView<'_> {
    fn eq(&self, other: &Row) -> bool {
        *self == other.as_view()
    }
}

impl From<RowView<'_>> for Row {
    fn from(view: RowView<'_>) -> Self {
        view.to_row()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_view().fmt(f)
    }
}

impl fmt::Display for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} {:?}}}", self.id, self.component, self.component_cost)
    }
}
