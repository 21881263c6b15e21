//! Shared application state handed to every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::cart::service::CartService;
use crate::cart::store::PgCartStore;
use crate::catalog::store::PgCatalogStore;
use crate::catalog::view::AssetUrls;
use crate::config::Config;
use crate::orders::store::PgOrderStore;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub assets: AssetUrls,
    pub auth: AuthService,
    pub catalog: PgCatalogStore,
    pub cart: CartService<PgCartStore, PgCatalogStore>,
    pub orders: PgOrderStore,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        let assets = AssetUrls::new(&config.asset_base_url);
        Self {
            auth: AuthService::new(db.clone()),
            catalog: PgCatalogStore::new(db.clone()),
            cart: CartService::new(
                PgCartStore::new(db.clone()),
                PgCatalogStore::new(db.clone()),
                assets.clone(),
            ),
            orders: PgOrderStore::new(db.clone()),
            assets,
            config: Arc::new(config),
            db,
        }
    }
}
