//! Property snapshot input record and file loaders

mod data;
pub mod loader;

pub use data::{PropertySnapshot, loan_to_value};
pub use loader::{
    load_properties, load_properties_from_reader, load_snapshot_json, LoadedPortfolio,
    LoadedProperty, RejectedRow,
};
