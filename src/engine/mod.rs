mod feedback_api;
mod helpers;
mod route_api;

use std::sync::Arc;

use crate::{
    api::API,
    config::SearchConfig,
    db::Store,
    external::{Directions, Geocoder},
    risk::RiskSource,
};

/// Implements the API on top of a store, the external providers and a
/// source of segment risk inputs.
pub struct Engine {
    store: Arc<dyn Store>,
    geocoder: Arc<dyn Geocoder>,
    directions: Arc<dyn Directions>,
    risk: Arc<dyn RiskSource>,
    search: SearchConfig,
}

impl Engine {
    pub fn new(
        store: Arc<dyn Store>,
        geocoder: Arc<dyn Geocoder>,
        directions: Arc<dyn Directions>,
        risk: Arc<dyn RiskSource>,
        search: SearchConfig,
    ) -> Self {
        Self {
            store,
            geocoder,
            directions,
            risk,
            search,
        }
    }
}

impl API for Engine {}
