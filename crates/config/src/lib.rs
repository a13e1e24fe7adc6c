pub mod ai;
pub mod settings;
