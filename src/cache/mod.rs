//! Indexed read cache for GatewayRoute objects
//!
//! A namespace-indexed, read-only view of watched objects for consumers that
//! need "fetch by namespace+name" or "list by namespace and label selector"
//! without hitting the API server. The cache is fed by [`run_route_watch`];
//! the admission validators never consult it - validation is a pure function
//! of the request payload.
//!
//! Lookup semantics: absence of a key is a `None` result, not an error.
//! Namespace filtering is an index lookup; label filtering is a linear
//! scan-and-match over the (possibly pre-filtered) result, applied only when
//! a selector is supplied.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use futures::TryStreamExt;
use kube::core::{Labels, Selector};
use kube::runtime::watcher;
use kube::{Api, Client, Resource, ResourceExt};
use tracing::{debug, info};

use crate::crd::GatewayRoute;
use crate::{Error, Result};

/// Concurrent object cache indexed by namespace, then name
///
/// Cluster-scoped objects are indexed under the empty namespace.
pub struct ObjectCache<K> {
    by_namespace: DashMap<String, HashMap<String, Arc<K>>>,
}

impl<K> Default for ObjectCache<K> {
    fn default() -> Self {
        Self {
            by_namespace: DashMap::new(),
        }
    }
}

impl<K: Resource> ObjectCache<K> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object, indexed by its namespace and name
    pub fn insert(&self, obj: K) {
        let namespace = obj.namespace().unwrap_or_default();
        let name = obj.name_any();
        self.by_namespace
            .entry(namespace)
            .or_default()
            .insert(name, Arc::new(obj));
    }

    /// Remove an object by the namespace and name of the given snapshot
    pub fn remove(&self, obj: &K) {
        let namespace = obj.namespace().unwrap_or_default();
        if let Some(mut entry) = self.by_namespace.get_mut(namespace.as_str()) {
            entry.remove(&obj.name_any());
        }
    }

    /// Drop every cached object
    pub fn clear(&self) {
        self.by_namespace.clear();
    }

    /// Fetch a single object by namespace and name
    ///
    /// `None` means the key is not cached; it is not a lookup failure.
    pub fn get(&self, namespace: &str, name: &str) -> Option<Arc<K>> {
        self.by_namespace.get(namespace)?.get(name).cloned()
    }

    /// List objects, optionally scoped to a namespace and label selector
    ///
    /// With a namespace the equality index is consulted; without one every
    /// namespace is walked. The selector, when present, is matched against
    /// each candidate's labels.
    pub fn list(&self, namespace: Option<&str>, selector: Option<&Selector>) -> Vec<Arc<K>> {
        let candidates: Vec<Arc<K>> = match namespace {
            Some(ns) => self
                .by_namespace
                .get(ns)
                .map(|entry| entry.values().cloned().collect())
                .unwrap_or_default(),
            None => self
                .by_namespace
                .iter()
                .flat_map(|entry| entry.values().cloned().collect::<Vec<_>>())
                .collect(),
        };

        match selector {
            Some(sel) => candidates
                .into_iter()
                .filter(|obj| sel.matches(&Labels::from(obj.labels().clone())))
                .collect(),
            None => candidates,
        }
    }

    /// Number of cached objects across all namespaces
    pub fn len(&self) -> usize {
        self.by_namespace.iter().map(|entry| entry.len()).sum()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Watch GatewayRoutes and keep the cache in sync
///
/// Runs until the watch stream fails; restarts and re-lists are handled by
/// the watcher itself, and a re-list clears the cache before repopulating so
/// deletions missed while disconnected do not linger.
pub async fn run_route_watch(client: Client, cache: Arc<ObjectCache<GatewayRoute>>) -> Result<()> {
    let api: Api<GatewayRoute> = Api::all(client);
    let stream = watcher(api, watcher::Config::default());
    futures::pin_mut!(stream);

    while let Some(event) = stream
        .try_next()
        .await
        .map_err(|e| Error::cache(e.to_string()))?
    {
        match event {
            watcher::Event::Init => cache.clear(),
            watcher::Event::InitApply(route) | watcher::Event::Apply(route) => {
                debug!(
                    name = %route.name_any(),
                    namespace = ?route.namespace(),
                    "Caching GatewayRoute"
                );
                cache.insert(route);
            }
            watcher::Event::InitDone => {
                info!(routes = cache.len(), "GatewayRoute cache primed");
            }
            watcher::Event::Delete(route) => cache.remove(&route),
        }
    }
    Ok(())
}
