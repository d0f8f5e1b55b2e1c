//! Hypermedia link construction.
//!
//! [`LinkBuilder`] turns route names into [`Link`]s through an injected
//! [`RouteResolver`]. It performs no I/O; the only failure is a route that the
//! resolver does not know or a missing path parameter.

use std::sync::Arc;

use axum::http::Method;
use serde::Serialize;

use super::link::{Link, LinkSet};
use super::routes::{names, RouteError, RouteParams, RouteResolver};
use super::views::Pagination;

/// A resource payload with its `_links` block merged in at the top level.
/// The block is left out entirely when no links were supplied.
#[derive(Debug, Clone, Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub resource: T,
    #[serde(rename = "_links", skip_serializing_if = "LinkSet::is_empty")]
    pub links: LinkSet,
}

/// Resource kinds that carry a standard set of links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Product,
    User,
}

impl ResourceKind {
    fn show_route(self) -> &'static str {
        match self {
            ResourceKind::Product => names::PRODUCTS_SHOW,
            ResourceKind::User => names::CLIENTS_SHOW_USER,
        }
    }

    fn list_route(self) -> &'static str {
        match self {
            ResourceKind::Product => names::PRODUCTS_LIST,
            ResourceKind::User => names::CLIENTS_LIST_USERS,
        }
    }

    fn id_param(self) -> &'static str {
        match self {
            ResourceKind::Product => "id",
            ResourceKind::User => "userId",
        }
    }

    fn list_title(self) -> &'static str {
        match self {
            ResourceKind::Product => "Back to the products list",
            ResourceKind::User => "Back to the users list",
        }
    }

    /// Products are read-only through the API.
    fn is_writable(self) -> bool {
        matches!(self, ResourceKind::User)
    }
}

/// Link with a route, parameters, and optional method/title, resolved in bulk by
/// [`LinkBuilder::relation_links`].
#[derive(Debug, Clone)]
pub struct Relation {
    pub relation: String,
    pub route: String,
    pub params: RouteParams,
    pub method: Method,
    pub title: Option<String>,
}

impl Relation {
    pub fn new(relation: impl Into<String>, route: impl Into<String>, params: RouteParams) -> Self {
        Self {
            relation: relation.into(),
            route: route.into(),
            params,
            method: Method::GET,
            title: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Clone)]
pub struct LinkBuilder {
    routes: Arc<dyn RouteResolver>,
}

impl LinkBuilder {
    pub fn new(routes: Arc<dyn RouteResolver>) -> Self {
        Self { routes }
    }

    /// Builds a single link. `method` defaults to GET when `None`.
    pub fn link(
        &self,
        relation: &str,
        href: impl Into<String>,
        method: Option<Method>,
        title: Option<&str>,
    ) -> Link {
        let mut link = Link::new(relation, href).with_method(method.unwrap_or(Method::GET));
        if let Some(title) = title {
            link = link.with_title(title);
        }
        link
    }

    fn routed(
        &self,
        relation: &str,
        route: &str,
        params: &RouteParams,
        method: Method,
        title: Option<&str>,
    ) -> Result<Link, RouteError> {
        let href = self.routes.resolve(route, params)?;
        Ok(self.link(relation, href, Some(method), title))
    }

    /// `self`, `first`, `prev`, `next`, `last` links for a paged collection.
    ///
    /// Each href carries `extra` followed by `page` and `limit`. `first` and
    /// `prev` exist only past page one; `next` and `last` only before the last
    /// page, so an empty collection gets `self` alone.
    pub fn pagination_links(
        &self,
        page: u64,
        limit: u64,
        total: u64,
        route: &str,
        extra: &RouteParams,
    ) -> Result<LinkSet, RouteError> {
        let pagination = Pagination::new(page, limit, total);
        let (page, limit, pages) = (pagination.page, pagination.limit, pagination.pages);
        let at = |p: u64| extra.merged(&RouteParams::new().with("page", p).with("limit", limit));

        let mut links = LinkSet::new();
        links.insert(self.routed("self", route, &at(page), Method::GET, Some(&format!("Page {}", page)))?);

        if pagination.has_previous() {
            links.insert(self.routed("first", route, &at(1), Method::GET, Some("First page"))?);
            links.insert(self.routed("prev", route, &at(page - 1), Method::GET, Some("Previous page"))?);
        }

        if pagination.has_next() {
            links.insert(self.routed("next", route, &at(page + 1), Method::GET, Some("Next page"))?);
            links.insert(self.routed(
                "last",
                route,
                &at(pages),
                Method::GET,
                Some(&format!("Last page (page {})", pages)),
            )?);
        }

        Ok(links)
    }

    /// `self` link to a single resource.
    pub fn resource_link(&self, route: &str, params: &RouteParams, title: Option<&str>) -> Result<Link, RouteError> {
        self.routed("self", route, params, Method::GET, title)
    }

    pub fn create_link(&self, route: &str, params: &RouteParams, title: Option<&str>) -> Result<Link, RouteError> {
        self.routed(
            "create",
            route,
            params,
            Method::POST,
            Some(title.unwrap_or("Create a new resource")),
        )
    }

    pub fn update_link(&self, route: &str, params: &RouteParams, title: Option<&str>) -> Result<Link, RouteError> {
        self.routed("update", route, params, Method::PUT, Some(title.unwrap_or("Update the resource")))
    }

    pub fn delete_link(&self, route: &str, params: &RouteParams, title: Option<&str>) -> Result<Link, RouteError> {
        self.routed("delete", route, params, Method::DELETE, Some(title.unwrap_or("Delete the resource")))
    }

    pub fn relation_links(&self, relations: impl IntoIterator<Item = Relation>) -> Result<LinkSet, RouteError> {
        relations
            .into_iter()
            .map(|r| self.routed(&r.relation, &r.route, &r.params, r.method, r.title.as_deref()))
            .collect()
    }

    /// Standard links of one resource: `self`, the write actions its kind
    /// supports, and `list` unless the resource is embedded in a collection.
    pub fn resource_links(
        &self,
        kind: ResourceKind,
        id: i64,
        name: &str,
        include_list: bool,
    ) -> Result<LinkSet, RouteError> {
        let params = RouteParams::new().with(kind.id_param(), id);
        let mut links = LinkSet::new();
        links.insert(self.resource_link(kind.show_route(), &params, Some(name))?);

        if kind.is_writable() {
            links.insert(self.update_link(names::CLIENTS_UPDATE_USER, &params, Some(&format!("Update {}", name)))?);
            links.insert(self.delete_link(names::CLIENTS_DELETE_USER, &params, Some(&format!("Delete {}", name)))?);
        }

        if include_list {
            links.insert(self.routed("list", kind.list_route(), &RouteParams::new(), Method::GET, Some(kind.list_title()))?);
        }

        Ok(links)
    }

    /// Recovery links for a missing resource of `kind`.
    pub fn not_found_links(&self, kind: ResourceKind, include_create: bool) -> Result<LinkSet, RouteError> {
        let mut links = LinkSet::new();
        links.insert(self.routed("list", kind.list_route(), &RouteParams::new(), Method::GET, Some(kind.list_title()))?);

        if include_create && kind.is_writable() {
            links.insert(self.create_link(names::CLIENTS_CREATE_USER, &RouteParams::new(), Some("Create a new user"))?);
        }

        Ok(links)
    }

    /// Links of the authenticated client's profile.
    pub fn client_links(&self, name: &str) -> Result<LinkSet, RouteError> {
        let none = RouteParams::new();
        let mut links = LinkSet::new();
        links.insert(self.resource_link(names::CLIENTS_PROFILE, &none, Some(name))?);
        links.insert(self.routed("users", names::CLIENTS_LIST_USERS, &none, Method::GET, Some(&format!("Users of {}", name)))?);
        links.insert(self.routed("create_user", names::CLIENTS_CREATE_USER, &none, Method::POST, Some("Create a new user"))?);
        Ok(links)
    }

    /// Links of the client's user collection.
    pub fn users_collection_links(&self) -> Result<LinkSet, RouteError> {
        let none = RouteParams::new();
        let mut links = LinkSet::new();
        links.insert(self.routed("self", names::CLIENTS_LIST_USERS, &none, Method::GET, Some("Users list"))?);
        links.insert(self.routed("client", names::CLIENTS_PROFILE, &none, Method::GET, Some("Client profile"))?);
        links.insert(self.routed("create_user", names::CLIENTS_CREATE_USER, &none, Method::POST, Some("Create a new user"))?);
        Ok(links)
    }

    /// Discovery links served at the API root.
    pub fn root_links(&self) -> Result<LinkSet, RouteError> {
        let mut links = LinkSet::new();
        links.insert(self.link("self", self.root_url()?, None, Some("API root endpoint")));
        links.insert(self.link("products", self.products_list_url()?, None, Some("BileMo product catalog")));
        links.insert(self.routed("documentation", names::DOC, &RouteParams::new(), Method::GET, Some("OpenAPI description"))?);
        links.insert(self.link(
            "product_detail",
            self.routes.resolve_template(names::PRODUCTS_SHOW)?,
            None,
            Some("Product details (template)"),
        ));
        links.insert(self.link("admin_login", self.admin_login_url()?, Some(Method::POST), Some("Administrator login")));
        links.insert(self.link("client_login", self.client_login_url()?, Some(Method::POST), Some("Client login")));
        links.insert(self.link(
            "client_profile",
            self.client_profile_url()?,
            None,
            Some("Authenticated client profile (requires auth)"),
        ));
        links.insert(self.link(
            "client_users",
            self.client_users_url()?,
            None,
            Some("Users of the authenticated client (requires auth)"),
        ));
        Ok(links)
    }

    pub fn status_links(&self) -> Result<LinkSet, RouteError> {
        let mut links = LinkSet::new();
        links.insert(self.link("self", self.status_url()?, None, Some("Current API status")));
        links.insert(self.link("root", self.root_url()?, None, Some("Back to the API root")));
        Ok(links)
    }

    /// Attaches `links` to `resource`.
    pub fn add_links<T>(&self, resource: T, links: LinkSet) -> Linked<T> {
        Linked { resource, links }
    }

    pub fn root_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::ROOT, &RouteParams::new())
    }

    pub fn status_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::STATUS, &RouteParams::new())
    }

    pub fn admin_login_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::ADMIN_LOGIN, &RouteParams::new())
    }

    pub fn client_login_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::CLIENT_LOGIN, &RouteParams::new())
    }

    pub fn products_list_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::PRODUCTS_LIST, &RouteParams::new())
    }

    pub fn client_profile_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::CLIENTS_PROFILE, &RouteParams::new())
    }

    pub fn client_users_url(&self) -> Result<String, RouteError> {
        self.routes.resolve(names::CLIENTS_LIST_USERS, &RouteParams::new())
    }
}
