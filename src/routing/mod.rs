//! Routing module
//!
//! Maps method + path templates (`/update-movie/:titleToUpdate`) to
//! endpoints, binding named path parameters along the way.

mod matcher;

pub use matcher::{match_pattern, PathParams};

use hyper::Method;

/// Endpoints served by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Home,
    SaveUserInfo,
    ShowUserInfo,
    NewMovie,
    AllMovies,
    UpdateMovie,
    DeleteMovie,
}

/// A route template bound to an endpoint
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: &'static str,
    pub endpoint: Endpoint,
}

/// Result of resolving a request against the route table
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A route matched method and path
    Matched(&'a Route, PathParams),
    /// Preflight/introspection: methods registered for the path
    Options(Vec<Method>),
    NotFound,
}

/// Ordered route table, first match wins
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Route table of the movie list application
    pub fn movie_routes() -> Self {
        let route = |method: Method, pattern: &'static str, endpoint: Endpoint| Route {
            method,
            pattern,
            endpoint,
        };
        Self::new(vec![
            route(Method::GET, "/", Endpoint::Home),
            route(Method::GET, "/save-user-info", Endpoint::SaveUserInfo),
            route(Method::GET, "/show-user-info", Endpoint::ShowUserInfo),
            route(Method::POST, "/new-movie", Endpoint::NewMovie),
            route(Method::GET, "/all-movies", Endpoint::AllMovies),
            route(
                Method::PUT,
                "/update-movie/:titleToUpdate",
                Endpoint::UpdateMovie,
            ),
            route(
                Method::DELETE,
                "/delete-movie/:titleToDelete",
                Endpoint::DeleteMovie,
            ),
        ])
    }

    /// Resolve a request
    ///
    /// `HEAD` is served by `GET` routes. `OPTIONS` lists the methods
    /// registered for the path instead of dispatching.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        if *method == Method::OPTIONS {
            let allowed = self.allowed_methods(path);
            return if allowed.is_empty() {
                Resolution::NotFound
            } else {
                Resolution::Options(allowed)
            };
        }

        let effective = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        self.routes
            .iter()
            .filter(|route| route.method == *effective)
            .find_map(|route| {
                match_pattern(route.pattern, path).map(|params| Resolution::Matched(route, params))
            })
            .unwrap_or(Resolution::NotFound)
    }

    /// Methods with a route matching `path`, `HEAD` implied by `GET`
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in &self.routes {
            if match_pattern(route.pattern, path).is_none() {
                continue;
            }
            if !methods.contains(&route.method) {
                methods.push(route.method.clone());
            }
            if route.method == Method::GET && !methods.contains(&Method::HEAD) {
                methods.push(Method::HEAD);
            }
        }
        methods
    }
}
