// Domain services

pub mod analyzer;

pub use analyzer::*;
