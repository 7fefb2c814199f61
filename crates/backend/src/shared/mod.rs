pub mod config;
pub mod data;
pub mod error;
pub mod llm;
pub mod marketplaces;
