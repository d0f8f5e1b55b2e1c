use std::sync::Arc;

use crate::api::{ErrorTranslator, LinkBuilder, RouteTable};
use crate::auth::{JwtCodec, JwtError};
use crate::cache::{CacheGateway, MemoryCache};
use crate::config::AppConfig;
use crate::database::Repositories;

/// Shared per-request context. Cloning is cheap; everything sits behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub cache: CacheGateway,
    pub links: LinkBuilder,
    pub errors: ErrorTranslator,
    pub jwt: Arc<JwtCodec>,
}

impl AppState {
    /// Wires the collaborators from `config`, with a fresh in-process cache.
    pub fn new(config: AppConfig, repos: Repositories) -> Result<Self, JwtError> {
        let jwt = JwtCodec::from_config(&config.security)?;
        let cache = CacheGateway::new(
            Arc::new(MemoryCache::with_capacity(config.cache.max_entries)),
            config.cache.prefix.clone(),
            config.cache.default_ttl(),
        );
        let links = LinkBuilder::new(Arc::new(RouteTable::bilemo(config.server.public_base_url.clone())));

        Ok(Self {
            errors: ErrorTranslator::new(links.clone()),
            config: Arc::new(config),
            repos,
            cache,
            links,
            jwt: Arc::new(jwt),
        })
    }
}
