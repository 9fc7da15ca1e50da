//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CatalogService, DependencyService, MergeService};
use crate::config::Settings;
use crate::infrastructure::store::CatalogStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub store: CatalogStore,
    pub catalog: CatalogService,
    pub dependency: DependencyService,
    pub merge: MergeService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self {
            store: CatalogStore::new(Arc::clone(&fs), settings.output.pretty),
            catalog: CatalogService::new(Arc::clone(&settings)),
            dependency: DependencyService::new(Arc::clone(&settings)),
            merge: MergeService::new(Arc::clone(&settings)),
            settings,
            fs,
        }
    }
}
