//! The `LocalSearch` trait -- the adapter interface for place search.
//!
//! Menu recommendations are enriched with nearby restaurants, and place
//! keywords resolve to coordinates. Both come from a local-search
//! provider; the concrete provider lives behind this seam so tests can
//! substitute a scripted implementation.

mod kakao;

pub use kakao::{KakaoLocalClient, PlacesConfig};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Error;

/// A restaurant hit near the caller's position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub place_name: String,
    /// Road address when available, lot-number address otherwise.
    pub address: String,
    /// Distance from the search position, e.g. "120m".
    pub distance: String,
}

/// A resolved geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Adapter interface for a local place-search provider.
///
/// Provider or transport failures map to [`Error::Upstream`]; no retries
/// happen at this layer.
#[async_trait]
pub trait LocalSearch: Send + Sync {
    /// Restaurants serving `menu` near the given position.
    ///
    /// An empty list is a valid answer (nothing nearby), not an error.
    async fn restaurants_near(
        &self,
        menu: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<Restaurant>, Error>;

    /// Resolve a place keyword to coordinates.
    ///
    /// `None` when the provider knows no place by that keyword.
    async fn locate_keyword(&self, keyword: &str) -> Result<Option<GeoPoint>, Error>;
}

// Compile-time assertion: LocalSearch must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn LocalSearch) {}
};
