pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod nutrition;
pub mod ranking;
pub mod server;

pub use dataset::Dataset;
pub use error::AppError;
pub use model::Recipe;
