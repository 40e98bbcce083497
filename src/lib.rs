pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use crate::services::{
    application_service::ApplicationService, campus_service::CampusService,
    job_service::JobService, user_service::UserService,
};
use crate::store::Store;
use crate::utils::token::TokenKeys;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenKeys,
    pub user_service: UserService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub campus_service: CampusService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys) -> Self {
        let user_service = UserService::new(store.clone(), tokens.clone());
        let job_service = JobService::new(store.clone());
        let application_service = ApplicationService::new(store.clone());
        let campus_service = CampusService::new(store.clone());

        Self {
            store,
            tokens,
            user_service,
            job_service,
            application_service,
            campus_service,
        }
    }
}
