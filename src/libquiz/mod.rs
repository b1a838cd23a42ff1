pub mod edit;
pub mod error;
pub mod export;
pub mod files;
pub mod model;
pub mod project_file;
pub mod session;
pub mod success_audio;
