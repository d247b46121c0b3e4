//! Views module - named row (ticker) and column (metric) selections.

mod views_model;

#[cfg(test)]
mod views_model_tests;

pub use views_model::{
    default_view_selection, default_views, ClassViews, ColumnGroup, ColumnView, RowView, View,
    ViewSelection, ViewsAvailable,
};
