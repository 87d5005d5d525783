use std::sync::Arc;

use platform::{identity::Identity, store::Store};

use crate::{config::Config, models::Article};

pub struct AppState {
    pub config: Config,
    pub identity: Identity,
    pub articles: Store<Article>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let identity = Identity::new(config.login_url.clone(), config.logout_url.clone());

        Arc::new(Self {
            config,
            identity,
            articles: Store::new("article"),
        })
    }
}
