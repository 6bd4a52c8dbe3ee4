//! Records the endpoints mapped onto an axum router together with their metadata.

use std::fmt;

use axum::{
    Router,
    handler::Handler,
    http::{Extensions, Method},
    routing::{MethodRouter, get},
};
use tracing::debug;

/// One part of a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePatternPart {
    /// Text matched verbatim.
    Literal(String),
    /// A `{name}` capture or a `{*name}` catch-all.
    Parameter {
        /// Capture name.
        name: String,
        /// Whether the capture consumes the rest of the path.
        catch_all: bool,
    },
}

/// A `/`-delimited segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutePatternPathSegment {
    /// Literal text and captures, in order.
    pub parts: Vec<RoutePatternPart>,
}

impl RoutePatternPathSegment {
    /// Literal parts of the segment concatenated.
    pub fn literal_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                RoutePatternPart::Literal(text) => Some(text.as_str()),
                RoutePatternPart::Parameter { .. } => None,
            })
            .collect()
    }

    fn parse(text: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    if !literal.is_empty() {
                        parts.push(RoutePatternPart::Literal(std::mem::take(&mut literal)));
                    }
                    let capture: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    let (name, catch_all) = match capture.strip_prefix('*') {
                        Some(name) => (name.to_string(), true),
                        None => (capture, false),
                    };
                    parts.push(RoutePatternPart::Parameter { name, catch_all });
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            parts.push(RoutePatternPart::Literal(literal));
        }
        Self { parts }
    }
}

/// Parsed form of an axum route path such as `/status/{component}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw_text: String,
    path_segments: Vec<RoutePatternPathSegment>,
}

impl RoutePattern {
    /// Parse axum 0.8 route syntax (`{name}`, `{*rest}`, `{{`/`}}` escapes).
    pub fn parse(text: &str) -> Self {
        let path_segments = text
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(RoutePatternPathSegment::parse)
            .collect();
        Self {
            raw_text: text.to_string(),
            path_segments,
        }
    }

    /// The pattern as it was registered.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Segments of the pattern, without empty segments.
    pub fn path_segments(&self) -> &[RoutePatternPathSegment] {
        &self.path_segments
    }

    /// Names of every capture in the pattern.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.path_segments
            .iter()
            .flat_map(|segment| segment.parts.iter())
            .filter_map(|part| match part {
                RoutePatternPart::Parameter { name, .. } => Some(name.as_str()),
                RoutePatternPart::Literal(_) => None,
            })
    }

    /// Whether the pattern captures anything.
    pub fn has_parameters(&self) -> bool {
        self.parameters().next().is_some()
    }

    /// Literal parts of each segment joined with `/`, without a leading slash.
    pub fn literal_path(&self) -> String {
        self.path_segments
            .iter()
            .map(RoutePatternPathSegment::literal_text)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text)
    }
}

/// An endpoint mapped through [`EndpointRouteBuilder`].
#[derive(Debug, Clone)]
pub struct RouteEndpoint {
    pattern: RoutePattern,
    methods: Vec<Method>,
    display_name: String,
    metadata: Extensions,
}

impl RouteEndpoint {
    fn new(path: &str, methods: &[Method]) -> Self {
        let method_names: Vec<_> = methods.iter().map(Method::as_str).collect();
        Self {
            pattern: RoutePattern::parse(path),
            methods: methods.to_vec(),
            display_name: format!("HTTP: {} {path}", method_names.join(", ")),
            metadata: Extensions::new(),
        }
    }

    /// Route pattern of the endpoint.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// HTTP methods the endpoint answers.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Name used in logs.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Typed metadata attached at registration.
    pub fn metadata(&self) -> &Extensions {
        &self.metadata
    }
}

/// Every endpoint registered with an [`EndpointRouteBuilder`].
#[derive(Debug, Clone, Default)]
pub struct EndpointDataSource {
    endpoints: Vec<RouteEndpoint>,
}

impl EndpointDataSource {
    /// Endpoints in registration order.
    pub fn endpoints(&self) -> &[RouteEndpoint] {
        &self.endpoints
    }
}

/// Builds an axum [`Router`] while keeping a record of each mapped endpoint.
pub struct EndpointRouteBuilder<S = ()> {
    router: Router<S>,
    endpoints: Vec<RouteEndpoint>,
}

impl<S> Default for EndpointRouteBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            router: Router::new(),
            endpoints: Vec::new(),
        }
    }
}

impl<S> EndpointRouteBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `method_router` at `path` and record it as answering `methods`.
    pub fn map(
        &mut self,
        path: &str,
        methods: &[Method],
        method_router: MethodRouter<S>,
    ) -> EndpointConventionBuilder<'_> {
        let router = std::mem::take(&mut self.router);
        self.router = router.route(path, method_router);
        let endpoint = RouteEndpoint::new(path, methods);
        debug!(endpoint = %endpoint.display_name, "mapped endpoint");
        let index = self.endpoints.len();
        self.endpoints.push(endpoint);
        EndpointConventionBuilder {
            endpoint: &mut self.endpoints[index],
        }
    }

    /// Map a GET handler at `path`.
    pub fn map_get<H, T>(&mut self, path: &str, handler: H) -> EndpointConventionBuilder<'_>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.map(path, &[Method::GET], get(handler))
    }

    /// Split into the router to serve and the record of its endpoints.
    pub fn into_parts(self) -> (Router<S>, EndpointDataSource) {
        (
            self.router,
            EndpointDataSource {
                endpoints: self.endpoints,
            },
        )
    }
}

/// Fluent access to the endpoint just mapped.
pub struct EndpointConventionBuilder<'a> {
    endpoint: &'a mut RouteEndpoint,
}

impl EndpointConventionBuilder<'_> {
    /// Attach typed metadata; a later value of the same type replaces the earlier one.
    pub fn with_metadata<T>(self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.endpoint.metadata.insert(value);
        self
    }

    /// Replace the display name used in logs.
    pub fn with_display_name(self, name: impl Into<String>) -> Self {
        self.endpoint.display_name = name.into();
        self
    }
}
