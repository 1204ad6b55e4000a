use rust_decimal::Decimal;
use serde::Serialize;

use super::cell::Cell;
use crate::format::Formatter;
use crate::layout::{Align, ColumnPlan, FieldKind};
use crate::model::Row;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub align: Align,
    pub summable: bool,
    /// Share of the content width, `0.0..=1.0`.
    pub width: f32,
}

impl Column {
    /// Columns of a plan, with widths normalized to shares of the plan's
    /// total width.
    pub fn from_plan(plan: &ColumnPlan) -> Vec<Column> {
        let total: f32 = plan.columns.iter().map(|c| c.width).sum();
        plan.columns
            .iter()
            .map(|c| Column {
                key: c.key.clone(),
                label: c.label.clone(),
                kind: c.kind,
                align: c.align,
                summable: c.summable,
                width: if total > 0.0 { c.width / total } else { 0.0 },
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
    pub totals: Option<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            totals: None,
        }
    }

    pub fn from_plan(plan: &ColumnPlan) -> Self {
        Self::new(Column::from_plan(plan))
    }

    /// One cell per planned column for every row; fields a row lacks are empty.
    pub fn from_rows(plan: &ColumnPlan, rows: &[Row], fmt: &Formatter) -> Self {
        let mut table = Self::from_plan(plan);
        for row in rows {
            let cells = table
                .columns
                .iter()
                .map(|col| Cell::from_value(row.get(&col.key), col.kind, fmt))
                .collect();
            table.rows.push(cells);
        }
        table
    }

    pub fn push(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Sum of a column's numeric cells.
    pub fn sum(&self, index: usize) -> Decimal {
        self.rows
            .iter()
            .filter_map(|r| r.get(index).and_then(Cell::decimal))
            .sum()
    }

    pub fn sum_key(&self, key: &str) -> Decimal {
        self.column_index(key).map(|i| self.sum(i)).unwrap_or_default()
    }

    /// Add a totals row summing every summable column. The label goes in the
    /// first column when that column is not itself summed. Tables without a
    /// summable column get no totals row.
    pub fn with_totals(mut self, label: &str, fmt: &Formatter) -> Self {
        if !self.columns.iter().any(|c| c.summable) {
            return self;
        }
        let totals = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                if col.summable {
                    let sum = self.sum(i);
                    match col.kind {
                        FieldKind::Currency => Cell::currency(sum, fmt),
                        _ => Cell::number(sum, fmt),
                    }
                } else if i == 0 {
                    Cell::text(label)
                } else {
                    Cell::empty()
                }
            })
            .collect();
        self.totals = Some(totals);
        self
    }

    /// Totals row with explicit cells (for tables whose totals are not plain sums).
    pub fn with_totals_row(mut self, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.totals = Some(cells);
        self
    }

    /// Display strings of the totals row, keyed by column key.
    pub fn totals_display(&self) -> Vec<(&str, &str)> {
        match &self.totals {
            Some(cells) => self
                .columns
                .iter()
                .zip(cells)
                .map(|(c, cell)| (c.key.as_str(), cell.display.as_str()))
                .collect(),
            None => Vec::new(),
        }
    }
}
