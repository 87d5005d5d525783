use std::sync::Arc;

use platform::{blobs::BlobStore, identity::Identity, store::Store};

use crate::{
    config::Config,
    models::{Answer, Question, UserInfo, UserPhoto},
};

pub struct AppState {
    pub config: Config,
    pub identity: Identity,
    pub blobs: BlobStore,
    pub user_infos: Store<UserInfo>,
    pub questions: Store<Question>,
    pub answers: Store<Answer>,
    pub photos: Store<UserPhoto>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let identity = Identity::new(config.login_url.clone(), config.logout_url.clone());

        Arc::new(Self {
            config,
            identity,
            blobs: BlobStore::new(),
            user_infos: Store::new("userinfo"),
            questions: Store::new("question"),
            answers: Store::new("answer"),
            photos: Store::new("photo"),
        })
    }
}
