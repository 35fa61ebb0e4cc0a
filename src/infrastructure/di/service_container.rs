//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::{BatchService, VisualizeService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub visualize: Arc<VisualizeService>,
    pub batch: BatchService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let visualize = Arc::new(VisualizeService::new(settings.layout));
        let batch = BatchService::new(Arc::clone(&fs), Arc::clone(&visualize));

        Self {
            settings: Arc::new(settings),
            fs,
            visualize,
            batch,
        }
    }
}
