use lumina_analysis::Analyzer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}
