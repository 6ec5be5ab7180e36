pub mod benford_commands;
pub mod dataset_commands;
