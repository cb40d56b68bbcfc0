use session_service::domain::entities::CreateSessionRequest;
use session_service::infrastructure::persistence::Database;
use std::path::PathBuf;
use uuid::Uuid;

pub struct TestDatabase {
    db: Database,
    path: PathBuf,
    url: String,
}

impl TestDatabase {
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Opens an independent pool on the same database file.
    pub async fn connect_again(&self) -> Database {
        Database::connect(&self.url)
            .await
            .expect("Failed to open second connection to test database")
    }
}

pub async fn setup_test_db() -> TestDatabase {
    // File-based SQLite, unique per test so tests can run in parallel
    let path = std::env::temp_dir().join(format!("sessions_test_{}.db", Uuid::new_v4()));
    let db_url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to apply migrations to test database");

    TestDatabase {
        db,
        path,
        url: db_url,
    }
}

pub async fn teardown_test_db(test_db: TestDatabase) {
    test_db.db.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = test_db.path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub fn session_request(id: &str, user_id: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        id: id.to_string(),
        ip_address: "10.0.0.1".to_string(),
        user_id: user_id.to_string(),
        fcm_token: format!("fcm-{}", id),
        platform_name: "iPhone 14".to_string(),
        platform_type: "mobile".to_string(),
    }
}
