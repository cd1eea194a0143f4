use accounts_api::users::repo::{PgUserRepo, RepoError, UserRepo};
use accounts_api::users::repo_types::{ProfileChanges, User};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> sqlx::PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to database")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn can_connect_to_database() {
    let pool = connect().await;
    let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
    assert_eq!(one, 1);
    pool.close().await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn pg_repo_user_lifecycle() {
    let pool = connect().await;
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    let repo = PgUserRepo::new(pool.clone());
    repo.delete("pg-repo-test").await.unwrap();

    let user = User {
        username: "pg-repo-test".into(),
        name: "test".into(),
        password: "hash".into(),
        token: None,
    };
    repo.create(user.clone()).await.unwrap();
    assert!(matches!(repo.create(user).await, Err(RepoError::UsernameTaken)));

    assert!(repo.set_token("pg-repo-test", Some("pg-token")).await.unwrap());
    let found = repo.find_by_token("pg-token").await.unwrap().unwrap();
    assert_eq!(found.username, "pg-repo-test");

    let updated = repo
        .update_profile(
            "pg-repo-test",
            ProfileChanges {
                name: Some("renamed".into()),
                password_hash: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.password, "hash");

    assert!(repo.set_token("pg-repo-test", None).await.unwrap());
    assert!(repo.find_by_token("pg-token").await.unwrap().is_none());
    assert!(repo.delete("pg-repo-test").await.unwrap());
    pool.close().await;
}
