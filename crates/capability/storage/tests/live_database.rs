use lucid_config::AppConfig;
use lucid_storage::{MAX_CONNECTIONS, connect_pool};

#[tokio::test]
async fn connects_and_answers_queries() {
    let Some(database_url) = std::env::var("LUCID_TEST_DATABASE_URL").ok() else {
        eprintln!("skipping live database test: set LUCID_TEST_DATABASE_URL to run it");
        return;
    };

    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some(database_url.clone()),
        _ => None,
    });

    let pool = connect_pool(&config).await.expect("pool");
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&pool)
        .await
        .expect("select 1");
    assert_eq!(one, 1);
    assert!(pool.size() >= 1);
    assert!(pool.size() <= MAX_CONNECTIONS);

    pool.close().await;
}
