//! Postgres store test. Needs a reachable database:
//!   DATABASE_URL=postgres://... cargo test --test test_postgres_store -- --nocapture
//! Without DATABASE_URL the test returns early.

use app_registry::{
    AppId, ApplicationRecord, ApplicationStore, PostgresApplicationStore, RegistrationService,
    ServiceError, StoreError,
};
use std::sync::Arc;

fn record(id: &AppId, email: &str, wallet: Option<&str>) -> ApplicationRecord {
    ApplicationRecord {
        id: id.clone(),
        email: email.to_string(),
        name: "Al".to_string(),
        app_name: "App1".to_string(),
        public_wallet: wallet.map(str::to_string),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_store_constraints() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        println!("DATABASE_URL not set; skipping Postgres store test");
        return Ok(());
    };

    let store = PostgresApplicationStore::connect(&database_url, 2).await?;
    store.ensure_schema().await?;
    store.ping().await?;
    assert!(store.schema_exists().await?);

    // Unique per run so reruns against the same database do not collide.
    let service = RegistrationService::new(Arc::new(store.clone()));
    let id_a = service.generate_unused_id().await?;
    let id_b = service.generate_unused_id().await?;
    let suffix = id_a.as_str().to_lowercase();
    let email_a = format!("pg-a-{}@example.com", suffix);
    let email_b = format!("pg-b-{}@example.com", suffix);
    let wallet = format!("G{}{}", id_a.as_str().to_uppercase(), "Z".repeat(51));

    store.insert(&record(&id_a, &email_a, Some(&wallet))).await?;
    assert!(store.contains(&id_a).await?);
    assert_eq!(
        store.find(&id_a).await?,
        Some(record(&id_a, &email_a, Some(&wallet)))
    );

    // Same wallet under a different id and email is rejected and rolled back.
    let dup = store.insert(&record(&id_b, &email_b, Some(&wallet))).await;
    assert!(matches!(dup, Err(StoreError::Conflict(_))));
    assert!(!store.contains(&id_b).await?);

    // The reserved id is refused by the table itself.
    let reserved = AppId::parse("anon").expect("well-formed id");
    let refused = store.insert(&record(&reserved, &email_b, None)).await;
    assert!(matches!(refused, Err(StoreError::Conflict(_))));

    let mut changed = record(&id_a, &email_a, None);
    changed.app_name = "Renamed".to_string();
    assert!(store.update(&changed).await?);
    assert_eq!(store.find(&id_a).await?, Some(changed));

    assert!(store.delete(&id_a).await?);
    assert!(!store.delete(&id_a).await?);
    assert_eq!(store.find(&id_a).await?, None);

    let ghost_update = service
        .update(
            app_registry::domain::application::UpdateRequest {
                app_id: Some(id_a.to_string()),
                email: Some(email_a.clone()),
                ..Default::default()
            }
            .validate()?,
        )
        .await;
    assert!(matches!(ghost_update, Err(ServiceError::NotFound)));
    Ok(())
}
