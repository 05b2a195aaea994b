use std::sync::Arc;

use application::Catalog;
use domain::Translator;

/// Shared, read-only after startup
pub struct AppState {
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            catalog: Catalog::new(translator),
        }
    }
}
