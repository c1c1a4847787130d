//! Shared application state for axum handlers.

use std::sync::Arc;

use ecohub_app::facade::EnergyFacade;
use ecohub_app::hub::Hub;
use ecohub_app::ports::Adapters;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the adapter bundle itself does not need
/// to be `Clone`: only the `Arc` inside the facade is cloned.
pub struct AppState<A: Adapters> {
    /// Business logic shared by both request surfaces.
    pub facade: EnergyFacade<A>,
}

impl<A: Adapters> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            facade: self.facade.clone(),
        }
    }
}

impl<A: Adapters> AppState<A> {
    /// Create the state from a hub that may also be shared with background
    /// tasks.
    pub fn new(hub: Arc<Hub<A>>) -> Self {
        Self {
            facade: EnergyFacade::new(hub),
        }
    }
}
