use std::sync::Arc;

use callcenter_core::domain::conversation::Role;
use callcenter_db::migrations::run_pending;
use callcenter_db::{
    connect_with_settings, HistoryRepository, InMemoryHistoryRepository, SqlHistoryRepository,
};

async fn repositories() -> Vec<(&'static str, Arc<dyn HistoryRepository>)> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    run_pending(&pool).await.expect("migrations");
    vec![
        ("sql", Arc::new(SqlHistoryRepository::new(pool))),
        ("memory", Arc::new(InMemoryHistoryRepository::default())),
    ]
}

#[tokio::test]
async fn both_backends_keep_the_same_transcript() {
    for (name, repo) in repositories().await {
        repo.append("05559876543", Role::User, "Faturamı ödemek istiyorum").await.expect(name);
        repo.append("05559876543", Role::Bot, "Ödemeniz alındı.").await.expect(name);
        repo.append("05551234567", Role::User, "merhaba").await.expect(name);

        let lines = repo.list("05559876543", None).await.expect(name);
        let roles: Vec<Role> = lines.iter().map(|line| line.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot], "{name}");
        assert!(lines.iter().all(|line| line.user_id == "05559876543"), "{name}");

        let last = repo.list("05559876543", Some(1)).await.expect(name);
        assert_eq!(last.len(), 1, "{name}");
        assert_eq!(last[0].message, "Ödemeniz alındı.", "{name}");

        assert_eq!(repo.clear("05559876543").await.expect(name), 2, "{name}");
        assert_eq!(repo.list("05551234567", None).await.expect(name).len(), 1, "{name}");
    }
}

#[tokio::test]
async fn zero_limit_returns_nothing() {
    for (name, repo) in repositories().await {
        repo.append("u1", Role::User, "selam").await.expect(name);
        assert!(repo.list("u1", Some(0)).await.expect(name).is_empty(), "{name}");
    }
}
