pub mod benford_handlers;
pub mod ops_handlers;
pub mod query_handlers;

pub use benford_handlers::*;
pub use ops_handlers::*;
pub use query_handlers::*;
