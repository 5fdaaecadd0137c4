//! Renewal Desk HTTP server entry point.
//!
//! Loads configuration, installs logging, wires the task store and
//! automation trigger chosen by configuration, and serves the API.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use renewal_desk::{
    api,
    config::ServiceConfig,
    logging,
    task::{
        adapters::{
            LoggingAutomationTrigger, WebhookAutomationTrigger, memory::InMemoryTaskRepository,
            postgres::PostgresTaskRepository,
        },
        ports::{AutomationTrigger, TaskRepository},
        services::TaskWorkflowService,
    },
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = ServiceConfig::from_env()?;
    logging::init(&config.log_filter, config.log_format)?;

    let listener = TcpListener::bind(config.bind).await?;
    if let Some(url) = config.database_url.as_deref() {
        let pool = Pool::builder()
            .max_size(config.db_pool_size)
            .build(ConnectionManager::<PgConnection>::new(url))?;
        info!(pool_size = config.db_pool_size, "using PostgreSQL task store");
        with_trigger(&config, Arc::new(PostgresTaskRepository::new(pool)), listener).await
    } else {
        warn!("DATABASE_URL not set; tasks are kept in memory and lost on exit");
        with_trigger(&config, Arc::new(InMemoryTaskRepository::new()), listener).await
    }
}

async fn with_trigger<R>(
    config: &ServiceConfig,
    repository: Arc<R>,
    listener: TcpListener,
) -> eyre::Result<()>
where
    R: TaskRepository + 'static,
{
    if let Some(url) = config.automation_url.as_deref() {
        let trigger = WebhookAutomationTrigger::new(url, config.automation_timeout)?;
        info!(endpoint = trigger.endpoint(), "automation webhook configured");
        run(repository, Arc::new(trigger), listener).await
    } else {
        info!("no automation executor configured; signals will be logged");
        run(repository, Arc::new(LoggingAutomationTrigger), listener).await
    }
}

async fn run<R, T>(repository: Arc<R>, trigger: Arc<T>, listener: TcpListener) -> eyre::Result<()>
where
    R: TaskRepository + 'static,
    T: AutomationTrigger + 'static,
{
    let workflow = Arc::new(TaskWorkflowService::new(
        repository,
        trigger,
        Arc::new(DefaultClock),
    ));
    api::serve(listener, api::router(workflow)).await?;
    Ok(())
}
