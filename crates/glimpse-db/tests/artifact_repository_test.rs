//! Postgres repository tests against a throwaway container.
//!
//! Run with: `cargo test -p glimpse-db --test artifact_repository_test`
//! Needs a Docker daemon; without one each test logs a notice and returns.

use glimpse_core::models::NewArtifact;
use glimpse_db::{ArtifactStore, PgArtifactRepository};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;

struct TestDb {
    repo: PgArtifactRepository,
    _container: ContainerAsync<Postgres>,
}

impl TestDb {
    fn pool(&self) -> &PgPool {
        self.repo.pool()
    }
}

/// Start Postgres, run the workspace migrations and wrap the pool in a repository.
async fn setup_test_db() -> Option<TestDb> {
    let container = match Postgres::default().start().await {
        Ok(container) => container,
        Err(e) => {
            eprintln!("skipping Postgres test, container did not start: {e}");
            return None;
        }
    };

    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("mapped Postgres port");
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(TestDb {
        repo: PgArtifactRepository::new(pool),
        _container: container,
    })
}

fn artifact(name: &str, caption: &str) -> NewArtifact {
    NewArtifact {
        file_name: name.to_string(),
        storage_key: format!("uploads/{}", name),
        caption: caption.to_string(),
    }
}

#[tokio::test]
async fn test_insert_returns_mapped_record() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let record = db
        .repo
        .insert(artifact("cat.jpg", "A cat on a sofa."))
        .await
        .unwrap();

    assert!(record.id > 0);
    assert_eq!(record.file_name, "cat.jpg");
    assert_eq!(record.storage_key, "uploads/cat.jpg");
    assert_eq!(record.caption, "A cat on a sofa.");

    // The renamed fields land in the historical column names.
    let (s3_key, description): (String, String) =
        sqlx::query_as("SELECT s3_key, description FROM image_metadata WHERE id = $1")
            .bind(record.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(s3_key, "uploads/cat.jpg");
    assert_eq!(description, "A cat on a sofa.");
}

#[tokio::test]
async fn test_list_recent_orders_by_created_at_then_id() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let first = db.repo.insert(artifact("first.jpg", "one")).await.unwrap();
    let second = db.repo.insert(artifact("second.jpg", "two")).await.unwrap();
    let third = db.repo.insert(artifact("third.jpg", "three")).await.unwrap();

    let names: Vec<String> = db
        .repo
        .list_recent()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.file_name)
        .collect();
    assert_eq!(names, vec!["third.jpg", "second.jpg", "first.jpg"]);

    // Timestamps decide before ids do.
    sqlx::query("UPDATE image_metadata SET created_at = now() + interval '1 hour' WHERE id = $1")
        .bind(first.id)
        .execute(db.pool())
        .await
        .unwrap();

    // Equal timestamps fall back to the newer id.
    sqlx::query("UPDATE image_metadata SET created_at = '2025-01-01T00:00:00Z' WHERE id IN ($1, $2)")
        .bind(second.id)
        .bind(third.id)
        .execute(db.pool())
        .await
        .unwrap();

    let ids: Vec<i64> = db
        .repo
        .list_recent()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![first.id, third.id, second.id]);
}

#[tokio::test]
async fn test_empty_table_lists_nothing_and_pings() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    assert!(db.repo.list_recent().await.unwrap().is_empty());
    db.repo.ping().await.unwrap();
}
