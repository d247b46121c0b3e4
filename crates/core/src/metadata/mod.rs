//! Metadata module - what the metadata collaborator tells us about each
//! asset class.

mod metadata_model;


pub use metadata_model::{
    asset_class_of, partition_by_asset_class, AssetClassMetadata, Metadata, SourceInfo,
};
