//! Persistence port for the scheduling core.
//!
//! This module provides abstractions for storage operations via the
//! Repository pattern, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, binaries)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (crate::services) - Orchestration        │
//! │  - Eligibility checks + guarded admission               │
//! │  - Cancellation → promotion sequencing                  │
//! │  - Validation + expansion                               │
//! └───────────────────┬─────────────────────────────────────┘
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository.rs) - Abstract Interface │
//! └───────────────────┬─────────────────────────────────────┘
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no process-global repository instance: the port is
//! an explicit parameter everywhere, so the scheduling logic carries no
//! ambient connection state.

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;

pub use config::AppConfig;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    BookingAdmission, BookingRepository, FullRepository, InstanceRepository, TemplateRepository,
    WaitlistRepository,
};
