//! Rubric Client - attribute definition service over HTTP
//!
//! Connects an [`rubric_engine::AttributeFormController`] to the catalogue
//! service's REST API.
//!
//! # Example
//!
//! ```ignore
//! use rubric_client::{ClientConfig, HttpDefinitionService};
//! use rubric_engine::{AttributeFormController, FormConfig};
//!
//! let service = HttpDefinitionService::new(&ClientConfig::from_env())?;
//! let mut form = AttributeFormController::new(service, FormConfig::default(), Default::default());
//! form.select_categories(["shoes"]).await;
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logger;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpDefinitionService;
pub use logger::{init_logger, init_logger_with_file};

// Re-export shared types for convenience
pub use shared::error::{ApiResponse, AppError, ErrorCode};
