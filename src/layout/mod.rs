//! Column layout: field semantics and the column planner.

mod planner;
mod semantics;

pub use planner::{
    plan_columns, plan_fixed, policy_for, ColumnPlan, ColumnPolicy, CuratedRule, FixedColumn,
    PlannedColumn, Slot, EXPENSE_RULE, MAX_CURATED_COLUMNS, MIN_CURATED_SLOTS,
};
pub use semantics::{semantics, Align, FieldKind, FieldSemantics, CURRENCY_TERMS};
