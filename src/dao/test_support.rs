//! Seeding helpers shared by the database integration tests.

use sqlx::PgPool;

pub async fn insert_village(pool: &PgPool, id: i64, name: &str, is_active: bool) {
    sqlx::query("INSERT INTO villages (id, name, pemda, head_name, phone, email, population, is_active) VALUES ($1, $2, 'Kab. Bogor', 'Budi', '0812000000', 'desa@example.id', 1500, $3)")
        .bind(id)
        .bind(name)
        .bind(is_active)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_atensi_at(pool: &PgPool, title: &str, status: &str, village_id: Option<i64>, minutes_ago: i32) {
    sqlx::query("INSERT INTO atensi (title, description, priority, status, village_id, created_at, created_by) VALUES ($1, '', 'MEDIUM', $2, $3, now() - make_interval(mins => $4), 'seed')")
        .bind(title)
        .bind(status)
        .bind(village_id)
        .bind(minutes_ago)
        .execute(pool)
        .await
        .unwrap();
}
