pub mod api;
pub mod error;
pub mod state;

use domain::Translator;
use state::AppState;
use std::sync::Arc;

pub fn setup_app_state(translator: Arc<dyn Translator>) -> Arc<AppState> {
    Arc::new(AppState::new(translator))
}
