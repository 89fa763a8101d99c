use std::sync::Arc;

use billing_service::api::{routes, AppState};
use billing_service::config::Config;
use billing_service::infrastructure::messaging::{Consumer, RabbitPublisher};
use billing_service::infrastructure::persistence::PostgresUnitOfWork;
use billing_service::use_cases::{CreditUserBalance, DebitUserBalance, RefundTransaction};
use lapin::options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties, ExchangeKind};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("starting billing service");

    let config = Config::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db.dsn())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("connected to database and applied migrations");

    let connection =
        Connection::connect(&config.rabbitmq.uri, ConnectionProperties::default()).await?;

    let consume_channel = connection.create_channel().await?;
    let mut queue_names = Vec::with_capacity(config.rabbitmq.queues.len());
    for queue in &config.rabbitmq.queues {
        consume_channel
            .exchange_declare(
                &queue.exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        consume_channel
            .queue_declare(
                &queue.name,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        consume_channel
            .queue_bind(
                &queue.name,
                &queue.exchange,
                &queue.routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;
        queue_names.push(queue.name.clone());
    }

    let publish_channel = connection.create_channel().await?;
    publish_channel
        .exchange_declare(
            &config.rabbitmq.publish_exchange,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    let uow = Arc::new(PostgresUnitOfWork::new(pool));
    let publisher = Arc::new(RabbitPublisher::new(
        publish_channel,
        config.rabbitmq.publish_exchange.clone(),
        config.rabbitmq.publish_routing_key.clone(),
    ));

    let debit_use_case = Arc::new(DebitUserBalance::new(uow.clone(), publisher));
    let credit_use_case = Arc::new(CreditUserBalance::new(uow.clone()));
    let refund_use_case = Arc::new(RefundTransaction::new(uow));

    let shutdown = CancellationToken::new();

    let consumer = Arc::new(Consumer::new(
        consume_channel,
        debit_use_case,
        refund_use_case,
        shutdown.clone(),
    ));
    let consumer_task = tokio::spawn(async move {
        if let Err(err) = consumer.run(queue_names).await {
            tracing::error!(error = %err, "message consumer exited with an error");
        }
    });

    let app_state = Arc::new(AppState { credit_use_case });
    let app = routes(app_state);

    let listener = tokio::net::TcpListener::bind(config.http.addr()).await?;
    info!(addr = %config.http.addr(), "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    let _ = consumer_task.await;
    Ok(())
}

/// Espera SIGINT o SIGTERM y retorna, dejando que `axum::serve` cierre el
/// listener ordenadamente. El servicio sale con codigo 0 en cualquiera de
/// los dos casos.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
