use application::api::router::MainRouter;
use config::{Config, StoreBackend};
use domain::person::{PersonManager, PersonRepository};
use dotenv::dotenv;
use infrastructure::person::{
    memory::memory_repository::MemoryPersonRepository,
    postgres::postgres_repository::PostgresPersonRepository,
};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod application;
mod config;
mod domain;
mod infrastructure;
fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
    // Check of env variables before starting the app.
    let config = Config::from_env().expect("Invalid configuration");
    info!("Using the {} person store", config.store);

    let rt = Runtime::new().expect("Cannot start the tokio runtime");
    rt.block_on(async {
        let person_repository: Box<dyn PersonRepository> = match &config.store {
            StoreBackend::Memory => Box::new(MemoryPersonRepository::seeded()),
            StoreBackend::Postgres { url, timeout } => Box::new(
                PostgresPersonRepository::new(url, *timeout)
                    .await
                    .expect("Cannot connect to the DB"),
            ),
        };
        let person_manager = PersonManager::new(person_repository);
        let main_router = MainRouter::new(person_manager, config.port);
        main_router.run().await.expect("An error occured");
    })
}
