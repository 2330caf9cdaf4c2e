use forno::catalog::{import_menu_str, InMemoryCatalog};
use forno::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Demo menu shipped with the binary; production deployments replace it by
/// seeding the catalog from their own export.
pub(crate) const MENU_CSV: &str = include_str!("../assets/menu.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn seed_catalog() -> Result<InMemoryCatalog, AppError> {
    let (products, addons) = import_menu_str(MENU_CSV)?;
    Ok(InMemoryCatalog::new(products, addons))
}
