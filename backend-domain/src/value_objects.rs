// Domain value objects
pub mod leading_digit;

pub use leading_digit::*;
