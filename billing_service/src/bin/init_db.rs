use billing_service::config::Config;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    println!("Connecting to {}...", config.db.dsn());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db.dsn())
        .await
        .map_err(|e| format!("Failed to connect: {e}"))?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| format!("Migration failed: {e}"))?;

    println!("billing_service database initialized successfully");
    Ok(())
}
