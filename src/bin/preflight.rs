use app_registry::infra::config::redact_url;
use app_registry::{ApplicationStore, Config, PostgresApplicationStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-schema]\n\
         \n\
         Requires env vars:\n\
           API_KEY\n\
         And either DATABASE_URL or DB_ROLE / DB_PASSWORD / DB_HOST / DB_NAME\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let init_schema = args.iter().any(|a| a == "--init-schema");

    // Force-read config (nice error messages if missing)
    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  DATABASE_URL={}", redact_url(&config.database_url));
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DB_MAX_CONNECTIONS={}", config.max_connections);

    let store = PostgresApplicationStore::connect(&config.database_url, 1)
        .await
        .map_err(|e| anyhow::anyhow!("Could not connect to the database: {}", e))?;
    store.ping().await?;
    println!("  Database is reachable.");

    if store.schema_exists().await? {
        println!("  applications table exists.");
    } else if init_schema {
        println!("  applications table missing -> creating it...");
        store.ensure_schema().await?;
        println!("  applications table created.");
    } else {
        return Err(anyhow::anyhow!(
            "applications table does not exist. Re-run with --init-schema"
        ));
    }

    println!("  Registered applications: {}", store.count().await?);
    println!("> Preflight OK.");
    Ok(())
}
