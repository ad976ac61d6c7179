//! Node storage (the mirrored tree)
//!
//! Every function takes a bare connection so it can run inside the caller's
//! transaction.

use shelf_core::{error::Result, NewNode, NodeId, ShelfError, TreeNode, ROOT_NODE_ID};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::path::PathBuf;

const NODE_COLUMNS: &str = "id, parent_id, name, path, mtime, is_dir";

fn row_to_node(row: &SqliteRow) -> TreeNode {
    TreeNode {
        id: row.get("id"),
        parent_id: row.get("parent_id"),
        name: row.get("name"),
        path: PathBuf::from(row.get::<String, _>("path")),
        mtime: row.get("mtime"),
        is_dir: row.get::<i64, _>("is_dir") != 0,
    }
}

/// Get node by ID
pub async fn get_by_id(conn: &mut SqliteConnection, id: NodeId) -> Result<Option<TreeNode>> {
    let row = sqlx::query(&format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.as_ref().map(row_to_node))
}

/// Get the direct children of a node, ordered by name
pub async fn get_children(conn: &mut SqliteConnection, parent_id: NodeId) -> Result<Vec<TreeNode>> {
    let rows = sqlx::query(&format!(
        "SELECT {NODE_COLUMNS} FROM nodes WHERE parent_id = ? ORDER BY name"
    ))
    .bind(parent_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(row_to_node).collect())
}

/// Create new node
pub async fn create(conn: &mut SqliteConnection, node: NewNode) -> Result<TreeNode> {
    let path = node.path.to_string_lossy().to_string();

    let result = sqlx::query(
        "INSERT INTO nodes (parent_id, name, path, mtime, is_dir) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(node.parent_id)
    .bind(&node.name)
    .bind(&path)
    .bind(node.mtime)
    .bind(i64::from(node.is_dir))
    .execute(&mut *conn)
    .await?;

    Ok(TreeNode {
        id: result.last_insert_rowid(),
        parent_id: Some(node.parent_id),
        name: node.name,
        path: node.path,
        mtime: node.mtime,
        is_dir: node.is_dir,
    })
}

/// Delete a node together with its subtree and the metadata it owns
///
/// The subtree is collected explicitly so the cascade holds even on a
/// connection opened without `foreign_keys`.
pub async fn delete(conn: &mut SqliteConnection, id: NodeId) -> Result<()> {
    if id == ROOT_NODE_ID {
        return Err(ShelfError::invalid_input("the root node cannot be deleted"));
    }

    sqlx::query(
        r#"
        WITH RECURSIVE subtree(id) AS (
            SELECT ?
            UNION ALL
            SELECT n.id FROM nodes n JOIN subtree s ON n.parent_id = s.id
        )
        DELETE FROM media WHERE node_id IN (SELECT id FROM subtree)
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        WITH RECURSIVE subtree(id) AS (
            SELECT ?
            UNION ALL
            SELECT n.id FROM nodes n JOIN subtree s ON n.parent_id = s.id
        )
        DELETE FROM nodes WHERE id IN (SELECT id FROM subtree)
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Set the modification time of a node
pub async fn set_mtime(conn: &mut SqliteConnection, id: NodeId, mtime: i64) -> Result<()> {
    let result = sqlx::query("UPDATE nodes SET mtime = ? WHERE id = ?")
        .bind(mtime)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ShelfError::not_found("Node", id.to_string()));
    }

    Ok(())
}

/// Delete non-root nodes whose parent row is missing (single pass)
pub async fn delete_orphans(conn: &mut SqliteConnection) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM nodes
         WHERE id != ?
         AND (parent_id IS NULL OR parent_id NOT IN (SELECT id FROM nodes))",
    )
    .bind(ROOT_NODE_ID)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Number of nodes, root included
pub async fn count(conn: &mut SqliteConnection) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nodes")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count as u64)
}
