//! Request routing policy.
//!
//! A [`PolicyTable`] maps each [`RequestCategory`] to a [`Strategy`]. The two
//! behaviors the interceptor supports are two named tables rather than two
//! code paths.

use precache_core::PolicyName;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::{InterceptedRequest, is_same_origin};

/// What kind of request is being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Navigation,
    CoreAsset,
    Other,
}

/// How a request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Preload, then network; on success refresh the main document, on
    /// failure fall back to the cached document, then the offline page.
    NetworkFirst,
    /// Cache, then network with a background write of the copy.
    CacheFirst,
    /// Cache, then network. No write.
    CacheOrNetwork { offline_fallback: bool },
}

/// Category to strategy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    pub name: PolicyName,
    /// Cross-origin requests are always [`RequestCategory::Other`].
    pub same_origin_only: bool,
    /// Enable navigation preload on activation when the host supports it.
    pub navigation_preload: bool,
    navigation: Strategy,
    core_asset: Strategy,
    other: Strategy,
}

impl PolicyTable {
    /// Network-first navigations with preload, cache-first core assets,
    /// offline page for everything else. The default.
    pub fn offline_first() -> Self {
        Self {
            name: PolicyName::OfflineFirst,
            same_origin_only: true,
            navigation_preload: true,
            navigation: Strategy::NetworkFirst,
            core_asset: Strategy::CacheFirst,
            other: Strategy::CacheOrNetwork { offline_fallback: true },
        }
    }

    /// Every request answered from cache, then network, errors propagate.
    #[deprecated(note = "superseded by `PolicyTable::offline_first`")]
    pub fn cache_then_network() -> Self {
        let uniform = Strategy::CacheOrNetwork { offline_fallback: false };
        Self {
            name: PolicyName::CacheThenNetwork,
            same_origin_only: false,
            navigation_preload: false,
            navigation: uniform,
            core_asset: uniform,
            other: uniform,
        }
    }

    #[allow(deprecated)]
    pub fn from_name(name: PolicyName) -> Self {
        match name {
            PolicyName::OfflineFirst => Self::offline_first(),
            PolicyName::CacheThenNetwork => Self::cache_then_network(),
        }
    }

    pub fn strategy_for(&self, category: RequestCategory) -> Strategy {
        match category {
            RequestCategory::Navigation => self.navigation,
            RequestCategory::CoreAsset => self.core_asset,
            RequestCategory::Other => self.other,
        }
    }

    /// Classify a request. Precedence: origin, navigation, core asset path.
    pub fn classify(&self, request: &InterceptedRequest, origin: &Url, core_assets: &[String]) -> RequestCategory {
        if self.same_origin_only && !is_same_origin(&request.url, origin) {
            return RequestCategory::Other;
        }
        if request.is_navigation() {
            return RequestCategory::Navigation;
        }
        if core_assets.iter().any(|path| path == request.url.path()) {
            return RequestCategory::CoreAsset;
        }
        RequestCategory::Other
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::offline_first()
    }
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://lectura.app").unwrap()
    }

    fn assets() -> Vec<String> {
        vec!["/".into(), "/index.html".into(), "/style.css".into(), "/offline.html".into()]
    }

    fn get(url: &str) -> InterceptedRequest {
        InterceptedRequest::get(Url::parse(url).unwrap())
    }

    #[test]
    fn test_offline_first_table() {
        let table = PolicyTable::offline_first();
        assert_eq!(table.strategy_for(RequestCategory::Navigation), Strategy::NetworkFirst);
        assert_eq!(table.strategy_for(RequestCategory::CoreAsset), Strategy::CacheFirst);
        assert_eq!(
            table.strategy_for(RequestCategory::Other),
            Strategy::CacheOrNetwork { offline_fallback: true }
        );
        assert!(table.navigation_preload);
    }

    #[test]
    fn test_cache_then_network_is_uniform() {
        let table = PolicyTable::cache_then_network();
        let expected = Strategy::CacheOrNetwork { offline_fallback: false };
        for category in [RequestCategory::Navigation, RequestCategory::CoreAsset, RequestCategory::Other] {
            assert_eq!(table.strategy_for(category), expected);
        }
        assert!(!table.navigation_preload);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(PolicyTable::from_name(PolicyName::OfflineFirst), PolicyTable::offline_first());
        assert_eq!(PolicyTable::from_name(PolicyName::CacheThenNetwork).name, PolicyName::CacheThenNetwork);
    }

    #[test]
    fn test_classify_navigation() {
        let table = PolicyTable::offline_first();
        let req = InterceptedRequest::navigate(Url::parse("https://lectura.app/libro/7").unwrap());
        assert_eq!(table.classify(&req, &origin(), &assets()), RequestCategory::Navigation);
    }

    #[test]
    fn test_classify_navigation_beats_core_asset() {
        let table = PolicyTable::offline_first();
        let req = InterceptedRequest::navigate(Url::parse("https://lectura.app/index.html").unwrap());
        assert_eq!(table.classify(&req, &origin(), &assets()), RequestCategory::Navigation);
    }

    #[test]
    fn test_classify_core_asset_ignores_query() {
        let table = PolicyTable::offline_first();
        let req = get("https://lectura.app/style.css?v=12");
        assert_eq!(table.classify(&req, &origin(), &assets()), RequestCategory::CoreAsset);
    }

    #[test]
    fn test_classify_other_same_origin() {
        let table = PolicyTable::offline_first();
        assert_eq!(table.classify(&get("https://lectura.app/api/books"), &origin(), &assets()), RequestCategory::Other);
    }

    #[test]
    fn test_classify_cross_origin_is_other() {
        let table = PolicyTable::offline_first();
        let nav = InterceptedRequest::navigate(Url::parse("https://cdn.example.com/").unwrap());
        assert_eq!(table.classify(&nav, &origin(), &assets()), RequestCategory::Other);

        let asset = get("https://cdn.example.com/style.css");
        assert_eq!(table.classify(&asset, &origin(), &assets()), RequestCategory::Other);
    }
}
