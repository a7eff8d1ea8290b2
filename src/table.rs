//! Table construction from aggregated groups.
//!
//! A [`Table`] is plain string data: a header row and body rows. Column
//! widths are derived from the content so that the renderer can align
//! every cell without knowing anything about the value type.

use crate::aggregate::AggregationGroup;
use crate::hostlist::natural_cmp;
use crate::render::{RenderOptions, display_width};

pub const HOSTS_HEADER: &str = "Hosts";

/// One logical field of an aggregated value
pub struct Column<'a, V> {
    pub name: String,
    accessor: Box<dyn Fn(&V) -> String + 'a>,
}

impl<'a, V> Column<'a, V> {
    pub fn new(name: impl Into<String>, accessor: impl Fn(&V) -> String + 'a) -> Self {
        Column { name: name.into(), accessor: Box::new(accessor) }
    }

    pub fn value(&self, item: &V) -> String {
        (self.accessor)(item)
    }
}

/// How rows of a group table are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Order in which each outcome was first observed
    FirstSeen,
    /// Ascending host label, numbers compared by value
    HostLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Table { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Build a table listing `items` one per row
    pub fn from_items<V>(items: &[V], columns: &[Column<'_, V>]) -> Self {
        let mut table = Table::new(columns.iter().map(|c| c.name.clone()));
        for item in items {
            table.push_row(columns.iter().map(|c| c.value(item)).collect());
        }
        table
    }

    /// Append a row; short rows are padded with empty cells
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len().max(row.len()), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display width of each column across header and rows
    pub fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(display_width(cell));
                } else {
                    widths.push(display_width(cell));
                }
            }
        }
        widths
    }
}

/// Compressed host label of a group under the given options
pub fn host_label<V>(group: &AggregationGroup<V>, opts: &RenderOptions) -> String {
    group.hosts.compress_with(opts.include_ports)
}

/// Groups paired with their labels, in the requested order. Groups without
/// hosts are dropped.
pub fn labelled_groups<'g, V>(
    groups: &'g [AggregationGroup<V>],
    opts: &RenderOptions,
    order: RowOrder,
) -> Vec<(String, &'g AggregationGroup<V>)> {
    let mut labelled: Vec<(String, &AggregationGroup<V>)> =
        groups.iter().filter(|g| !g.hosts.is_empty()).map(|g| (host_label(g, opts), g)).collect();

    if order == RowOrder::HostLabel {
        // Stable sort keeps first-seen order between equal labels
        labelled.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    }
    labelled
}

/// Build a table with a leading `Hosts` column and one row per group.
///
/// Every column reads the group's representative value; all hosts in a
/// group hold an equal value, so any one of them would give the same cells.
pub fn build<V>(
    groups: &[AggregationGroup<V>],
    columns: &[Column<'_, V>],
    opts: &RenderOptions,
    order: RowOrder,
) -> Table {
    let mut table = Table::new(std::iter::once(HOSTS_HEADER.to_string()).chain(columns.iter().map(|c| c.name.clone())));

    for (label, group) in labelled_groups(groups, opts, order) {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(label);
        row.extend(columns.iter().map(|c| c.value(&group.value)));
        table.push_row(row);
    }
    table
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
