pub mod config;
pub mod sections;

pub use config::EngineConfig;
pub use sections::SectionList;
