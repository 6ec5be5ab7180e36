// Domain entities

pub mod benford;
pub mod config;
pub mod dataset;
pub mod query;

pub use benford::*;
pub use config::*;
pub use dataset::*;
pub use query::*;
