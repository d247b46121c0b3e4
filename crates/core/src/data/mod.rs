//! Data module - per-asset records, the merge engine and consolidation.

mod consolidation;
mod data_model;
mod merge;


pub use consolidation::consolidate;
pub use data_model::{
    AssetClass, ClassedDataSet, DataEntry, DataSet, MetricValue, SeriesSummary,
    SourceAttribution,
};
pub use merge::{merge_data_sets, merge_depth1, merge_depth2, merge_depth3};
