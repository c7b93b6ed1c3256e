//! # Route Table
//!
//! Static mapping from normalized path to handler, built once at startup
//! and read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::handler::{Handler, NotFoundHandler};
use super::request::trim_path;

/// Immutable path-to-handler lookup
pub struct RouteTable {
    routes: HashMap<String, Arc<dyn Handler>>,
    not_found: Arc<dyn Handler>,
}

impl RouteTable {
    /// Start building a table
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Handler for a trimmed path, or the not-found handler
    pub fn resolve(&self, trimmed_path: &str) -> &dyn Handler {
        self.routes
            .get(trimmed_path)
            .unwrap_or(&self.not_found)
            .as_ref()
    }

    /// Whether a path has a registered handler
    pub fn contains(&self, trimmed_path: &str) -> bool {
        self.routes.contains_key(trimmed_path)
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<_> = self.routes.keys().collect();
        paths.sort();
        f.debug_struct("RouteTable").field("routes", &paths).finish()
    }
}

/// Builder for [`RouteTable`]
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: HashMap<String, Arc<dyn Handler>>,
}

impl RouteTableBuilder {
    /// Register a handler; the path is normalized like request paths are
    pub fn route(mut self, path: &str, handler: impl Handler + 'static) -> Self {
        self.routes.insert(trim_path(path), Arc::new(handler));
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
            not_found: Arc::new(NotFoundHandler),
        }
    }
}
