//! Database operations for categories.
//!
//! Every query is scoped by the owning user, so a category that belongs to someone else
//! behaves exactly like one that does not exist.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    CategoryId, Error, UserID,
    category::{Category, CategoryName, NewCategory},
};

/// Create a category owned by `user_id` and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    new_category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category (user_id, name, kind, icon, color, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            user_id.as_i64(),
            new_category.name.as_ref(),
            new_category.kind,
            &new_category.icon,
            &new_category.color,
            created_at,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id,
        name: new_category.name,
        kind: new_category.kind,
        icon: new_category.icon,
        color: new_category.color,
        created_at,
    })
}

/// Retrieve the category `category_id` if it belongs to `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, kind, icon, color, created_at FROM category
            WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the categories of `user_id` in the order they were created.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, kind, icon, color, created_at FROM category
            WHERE user_id = :user_id ORDER BY id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete the category `category_id` owned by `user_id`.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingCategory] if the category does not exist or belongs to
/// another user.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            icon TEXT NOT NULL,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_user_id = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let kind = row.get(3)?;
    let icon = row.get(4)?;
    let color = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Category {
        id,
        user_id: UserID::new(raw_user_id),
        name: CategoryName::new_unchecked(&raw_name),
        kind,
        icon,
        color,
        created_at,
    })
}
