pub mod import;
pub mod integrations;
pub mod publishers;
