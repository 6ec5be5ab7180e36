pub mod dataset_queries;
