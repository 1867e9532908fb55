//! Regex routing table.
//!
//! A [`Router`] holds an ordered list of routes. Each route is a regular
//! expression anchored to the whole request path plus the handlers registered
//! for it, keyed by method. Routes added with [`RouterBuilder::route`] are
//! consulted before the ones added with [`RouterBuilder::default_route`], each
//! group in insertion order; the first route that matches the path and has a
//! handler for the method wins.
//!
//! ```
//! use mini_web::router::{get, post, Router};
//!
//! let router = Router::builder()
//!     .route("/match/([0-9a-zA-Z]+)", get(|writer, request| {
//!         let id = request.path_match().get(1).unwrap_or_default();
//!         writer.put_slice(id.as_bytes());
//!     }))
//!     .route("/string", post(|_writer, _request| {}))
//!     .build()
//!     .unwrap();
//!
//! assert!(router.resolve("GET", "/match/abc123").is_some());
//! assert!(router.resolve("GET", "/string").is_none());
//! ```

use std::collections::HashMap;
use std::fmt;

use http::Method;
use mini_http::handler::{Handler, Outcome};
use mini_http::protocol::{PathMatch, Request, ResponseWriter};
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, trace};

/// A function answering a routed request.
///
/// Handlers run inline on a worker thread and must not block.
pub type RouteHandler = dyn Fn(&mut ResponseWriter, &Request) + Send + Sync;

type BoxedRouteHandler = Box<RouteHandler>;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("method {method} is registered twice for route {pattern:?}")]
    DuplicateHandler { pattern: String, method: String },
}

/// Immutable routing table, shared by every connection.
pub struct Router {
    routes: Vec<Route>,
}

struct Route {
    source: String,
    pattern: Regex,
    handlers: HashMap<String, BoxedRouteHandler>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Finds the handler for `method` and `path`.
    ///
    /// A route whose pattern matches but which has no handler for the method
    /// does not stop the scan.
    pub fn resolve(&self, method: &str, path: &str) -> Option<(&RouteHandler, PathMatch)> {
        self.routes.iter().find_map(|route| {
            let handler = route.handlers.get(method)?;
            let captures = route.pattern.captures(path)?;
            trace!(route = %route.source, method, path, "route matched");
            Some((handler.as_ref(), route.path_match(&captures)))
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Route {
    fn path_match(&self, captures: &Captures<'_>) -> PathMatch {
        let groups = captures.iter().map(|group| group.map(|group| group.as_str().to_owned())).collect();
        let names = self
            .pattern
            .capture_names()
            .enumerate()
            .filter_map(|(index, name)| name.map(|name| (name.to_owned(), index)))
            .collect();

        PathMatch::new(groups, names)
    }
}

impl Handler for Router {
    fn call(&self, writer: &mut ResponseWriter, request: &mut Request) -> Outcome {
        let Some((handler, path_match)) = self.resolve(request.method(), request.path()) else {
            debug!(method = request.method(), path = request.path(), "no route for request");
            return Outcome::Unmatched;
        };

        request.set_path_match(path_match);
        handler(writer, &*request);
        Outcome::Responded
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods = self.handlers.keys().collect::<Vec<_>>();
        methods.sort();
        f.debug_struct("Route").field("pattern", &self.source).field("methods", &methods).finish()
    }
}

/// Collects routes and validates them into a [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<(String, MethodRouter)>,
    default_routes: Vec<(String, MethodRouter)>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: impl Into<String>, method_router: MethodRouter) -> Self {
        self.routes.push((pattern.into(), method_router));
        self
    }

    /// Adds a route consulted only after every route added with
    /// [`route`](Self::route).
    #[must_use]
    pub fn default_route(mut self, pattern: impl Into<String>, method_router: MethodRouter) -> Self {
        self.default_routes.push((pattern.into(), method_router));
        self
    }

    /// Compiles every pattern.
    ///
    /// Registering the same pattern text twice in one group merges the
    /// handlers into the first registration's position.
    pub fn build(self) -> Result<Router, RouterError> {
        let mut routes = compile(self.routes)?;
        routes.extend(compile(self.default_routes)?);

        debug!(routes = routes.len(), "router built");
        Ok(Router { routes })
    }
}

fn compile(entries: Vec<(String, MethodRouter)>) -> Result<Vec<Route>, RouterError> {
    let mut routes: Vec<Route> = Vec::with_capacity(entries.len());

    for (source, method_router) in entries {
        let index = match routes.iter().position(|route| route.source == source) {
            Some(index) => index,
            None => {
                let pattern = Regex::new(&format!("^(?:{source})$"))
                    .map_err(|e| RouterError::InvalidPattern { pattern: source.clone(), source: e })?;
                routes.push(Route { source, pattern, handlers: HashMap::new() });
                routes.len() - 1
            }
        };

        let route = &mut routes[index];
        for (method, handler) in method_router.handlers {
            if route.handlers.contains_key(&method) {
                return Err(RouterError::DuplicateHandler { pattern: route.source.clone(), method });
            }
            route.handlers.insert(method, handler);
        }
    }

    Ok(routes)
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns = |entries: &[(String, MethodRouter)]| entries.iter().map(|(p, _)| p.clone()).collect::<Vec<_>>();
        f.debug_struct("RouterBuilder")
            .field("routes", &patterns(&self.routes))
            .field("default_routes", &patterns(&self.default_routes))
            .finish()
    }
}

/// Handlers of one route, keyed by method.
#[derive(Default)]
pub struct MethodRouter {
    handlers: Vec<(String, BoxedRouteHandler)>,
}

impl MethodRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for an arbitrary method token, e.g. `M-SEARCH`.
    #[must_use]
    pub fn on<H>(mut self, method: impl Into<String>, handler: H) -> Self
    where
        H: Fn(&mut ResponseWriter, &Request) + Send + Sync + 'static,
    {
        self.handlers.push((method.into(), Box::new(handler)));
        self
    }
}

impl fmt::Debug for MethodRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.handlers.iter().map(|(method, _)| method)).finish()
    }
}

/// Registers `handler` for any method token.
pub fn on<H>(method: impl Into<String>, handler: H) -> MethodRouter
where
    H: Fn(&mut ResponseWriter, &Request) + Send + Sync + 'static,
{
    MethodRouter::new().on(method, handler)
}

macro_rules! method_router {
    ($($name:ident => $method:expr),* $(,)?) => {
        $(
            pub fn $name<H>(handler: H) -> MethodRouter
            where
                H: Fn(&mut ResponseWriter, &Request) + Send + Sync + 'static,
            {
                MethodRouter::new().on($method.as_str(), handler)
            }
        )*

        impl MethodRouter {
            $(
                #[must_use]
                pub fn $name<H>(self, handler: H) -> Self
                where
                    H: Fn(&mut ResponseWriter, &Request) + Send + Sync + 'static,
                {
                    self.on($method.as_str(), handler)
                }
            )*
        }
    };
}

method_router! {
    get => Method::GET,
    post => Method::POST,
    put => Method::PUT,
    delete => Method::DELETE,
    head => Method::HEAD,
    options => Method::OPTIONS,
    patch => Method::PATCH,
}
