pub mod dataset_files;

pub use dataset_files::*;
