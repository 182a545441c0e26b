use engine::{Engine, User};
use migration::MigratorTrait;
use sea_orm::Database;

pub async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub async fn user(engine: &Engine, name: &str) -> User {
    engine.create_user(name, "not-a-real-hash").await.unwrap()
}
