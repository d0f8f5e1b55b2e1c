use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;

/// Route names, shared by the router and the link builder.
pub mod names {
    pub const ROOT: &str = "api_root";
    pub const STATUS: &str = "api_status";
    pub const DOC: &str = "api_doc";
    pub const ADMIN_LOGIN: &str = "api_admin_login";
    pub const CLIENT_LOGIN: &str = "api_client_login";
    pub const PRODUCTS_LIST: &str = "api_products_list";
    pub const PRODUCTS_SHOW: &str = "api_products_show";
    pub const CLIENTS_PROFILE: &str = "api_clients_list";
    pub const CLIENTS_LIST_USERS: &str = "api_clients_list_users";
    pub const CLIENTS_SHOW_USER: &str = "api_clients_show_user";
    pub const CLIENTS_CREATE_USER: &str = "api_clients_create_user";
    pub const CLIENTS_UPDATE_USER: &str = "api_clients_update_user";
    pub const CLIENTS_DELETE_USER: &str = "api_clients_delete_user";
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Missing parameter '{param}' for route {route}")]
    MissingParameter { route: String, param: String },
}

/// Ordered route parameters. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(IndexMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Display) {
        self.0.insert(key.into(), value.to_string());
    }

    /// Parameters from `self`, overridden and extended by `other`.
    pub fn merged(&self, other: &RouteParams) -> RouteParams {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turns a route name plus parameters into a URI.
pub trait RouteResolver: Send + Sync {
    /// Resolves a concrete URI. Parameters that match a `{placeholder}` fill the
    /// path; the rest become the query string, in order.
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError>;

    /// Returns the URI with its placeholders left unresolved, for documentation
    /// links such as `/api/products/{id}`.
    fn resolve_template(&self, route: &str) -> Result<String, RouteError>;
}

/// Static route table with an optional public base URL prefix.
#[derive(Debug, Clone)]
pub struct RouteTable {
    base_url: String,
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            routes: HashMap::new(),
        }
    }

    pub fn route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }

    /// The routes served by this application.
    pub fn bilemo(base_url: impl Into<String>) -> Self {
        use names::*;

        Self::new(base_url)
            .route(ROOT, "/api")
            .route(STATUS, "/api/status")
            .route(DOC, "/api/doc.json")
            .route(ADMIN_LOGIN, "/api/admin/login")
            .route(CLIENT_LOGIN, "/api/client/login")
            .route(PRODUCTS_LIST, "/api/products")
            .route(PRODUCTS_SHOW, "/api/products/{id}")
            .route(CLIENTS_PROFILE, "/api/clients")
            .route(CLIENTS_LIST_USERS, "/api/clients/users")
            .route(CLIENTS_SHOW_USER, "/api/clients/users/{userId}")
            .route(CLIENTS_CREATE_USER, "/api/clients/users")
            .route(CLIENTS_UPDATE_USER, "/api/clients/users/{userId}")
            .route(CLIENTS_DELETE_USER, "/api/clients/users/{userId}")
    }

    fn template(&self, route: &str) -> Result<&str, RouteError> {
        self.routes
            .get(route)
            .map(String::as_str)
            .ok_or_else(|| RouteError::UnknownRoute(route.to_string()))
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
        let template = self.template(route)?;

        let mut path = String::with_capacity(template.len());
        let mut used: Vec<&str> = Vec::new();
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else { break };
            let name = &rest[start + 1..start + len];
            let value = params.get(name).ok_or_else(|| RouteError::MissingParameter {
                route: route.to_string(),
                param: name.to_string(),
            })?;
            path.push_str(&rest[..start]);
            path.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
            used.push(name);
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in params.iter().filter(|(k, _)| !used.contains(k)) {
            query.append_pair(key, value);
            has_query = true;
        }

        let mut uri = format!("{}{}", self.base_url, path);
        if has_query {
            uri.push('?');
            uri.push_str(&query.finish());
        }
        Ok(uri)
    }

    fn resolve_template(&self, route: &str) -> Result<String, RouteError> {
        Ok(format!("{}{}", self.base_url, self.template(route)?))
    }
}
