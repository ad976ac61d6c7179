//! Media metadata storage

use shelf_core::{error::Result, LibraryEntry, MediaRecord, NodeId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::path::PathBuf;

fn row_to_record(row: &SqliteRow) -> MediaRecord {
    MediaRecord {
        node_id: row.get("node_id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        genre: row.get("genre"),
        track_number: row.get::<Option<i64>, _>("track_number").map(|n| n as u32),
        duration_seconds: row.get("duration_seconds"),
    }
}

/// Get the record owned by a node
pub async fn get_by_node(conn: &mut SqliteConnection, node_id: NodeId) -> Result<Option<MediaRecord>> {
    let row = sqlx::query(
        "SELECT node_id, title, artist, album, genre, track_number, duration_seconds
         FROM media WHERE node_id = ?",
    )
    .bind(node_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(row_to_record))
}

/// Insert a record, or replace every field of the existing one
pub async fn upsert(conn: &mut SqliteConnection, record: &MediaRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO media (node_id, title, artist, album, genre, track_number, duration_seconds)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(node_id) DO UPDATE SET
            title = excluded.title,
            artist = excluded.artist,
            album = excluded.album,
            genre = excluded.genre,
            track_number = excluded.track_number,
            duration_seconds = excluded.duration_seconds
        "#,
    )
    .bind(record.node_id)
    .bind(&record.title)
    .bind(&record.artist)
    .bind(&record.album)
    .bind(&record.genre)
    .bind(record.track_number.map(i64::from))
    .bind(record.duration_seconds)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete the record owned by a node, returning whether one existed
pub async fn delete(conn: &mut SqliteConnection, node_id: NodeId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM media WHERE node_id = ?")
        .bind(node_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All records joined with their node path, ordered by path
pub async fn get_all_with_paths(conn: &mut SqliteConnection) -> Result<Vec<LibraryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT n.path, m.node_id, m.title, m.artist, m.album, m.genre,
               m.track_number, m.duration_seconds
        FROM media m
        INNER JOIN nodes n ON n.id = m.node_id
        ORDER BY n.path
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| LibraryEntry {
            path: PathBuf::from(row.get::<String, _>("path")),
            media: row_to_record(row),
        })
        .collect())
}

/// Delete records whose node row is missing (single pass)
pub async fn delete_orphans(conn: &mut SqliteConnection) -> Result<u64> {
    let result = sqlx::query("DELETE FROM media WHERE node_id NOT IN (SELECT id FROM nodes)")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Number of metadata records
pub async fn count(conn: &mut SqliteConnection) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count as u64)
}
