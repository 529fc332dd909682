// Service exports
pub mod catalog;

pub use catalog::{
    BookedRange, CatalogError, CatalogPost, ConfiguredUnit, InMemoryCatalog, ProductRecord, ProductType,
};
