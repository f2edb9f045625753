//! Library CRUD and sharing lookups

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Library;

use super::parse_timestamp;

const LIBRARY_COLUMNS: &str = "id, name, description, owner, share_code, created_at";

pub fn insert_library(conn: &Connection, library: &Library) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO libraries (name, description, owner, share_code, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
        params![
            library.name,
            library.description,
            library.owner,
            library.share_code,
            library.created_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_library(conn: &Connection, id: i64) -> Result<Option<Library>> {
    conn.query_row(
        &format!("SELECT {} FROM libraries WHERE id = ?1", LIBRARY_COLUMNS),
        params![id],
        row_to_library,
    )
    .optional()
}

pub fn get_library_by_share_code(conn: &Connection, code: &str) -> Result<Option<Library>> {
    conn.query_row(
        &format!("SELECT {} FROM libraries WHERE share_code = ?1", LIBRARY_COLUMNS),
        params![code],
        row_to_library,
    )
    .optional()
}

/// Libraries owned by `owner`, oldest first
pub fn list_libraries(conn: &Connection, owner: &str) -> Result<Vec<Library>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM libraries WHERE owner = ?1 ORDER BY id ASC",
        LIBRARY_COLUMNS
    ))?;

    let libraries = stmt
        .query_map(params![owner], row_to_library)?
        .collect::<Result<Vec<_>>>()?;
    Ok(libraries)
}

/// Returns false if the library does not exist
pub fn update_library(
    conn: &Connection,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE libraries SET name = ?1, description = ?2 WHERE id = ?3",
        params![name, description, id],
    )?;
    Ok(updated > 0)
}

/// Deletes the library, its cards and their review logs
pub fn delete_library(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM libraries WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn set_share_code(conn: &Connection, id: i64, code: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE libraries SET share_code = ?1 WHERE id = ?2",
        params![code, id],
    )?;
    Ok(updated > 0)
}

fn row_to_library(row: &rusqlite::Row) -> Result<Library> {
    let created_at: String = row.get(5)?;

    Ok(Library {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        owner: row.get(3)?,
        share_code: row.get(4)?,
        created_at: parse_timestamp(&created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;

    fn library(owner: &str, name: &str) -> Library {
        Library::new(name.to_string(), None, owner.to_string())
    }

    #[test]
    fn test_insert_and_get() {
        let env = TestEnv::new().unwrap();
        let id = insert_library(&env.conn, &library("ana", "Spanish")).unwrap();

        let loaded = get_library(&env.conn, id).unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.name, "Spanish");
        assert_eq!(loaded.owner, "ana");
        assert!(loaded.share_code.is_none());
    }

    #[test]
    fn test_get_missing() {
        let env = TestEnv::new().unwrap();
        assert!(get_library(&env.conn, 99).unwrap().is_none());
    }

    #[test]
    fn test_list_filters_by_owner() {
        let env = TestEnv::new().unwrap();
        insert_library(&env.conn, &library("ana", "One")).unwrap();
        insert_library(&env.conn, &library("ben", "Two")).unwrap();
        insert_library(&env.conn, &library("ana", "Three")).unwrap();

        let names: Vec<String> = list_libraries(&env.conn, "ana")
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["One", "Three"]);
    }

    #[test]
    fn test_update_and_delete() {
        let env = TestEnv::new().unwrap();
        let id = insert_library(&env.conn, &library("ana", "Old")).unwrap();

        assert!(update_library(&env.conn, id, "New", Some("desc")).unwrap());
        let loaded = get_library(&env.conn, id).unwrap().unwrap();
        assert_eq!(loaded.name, "New");
        assert_eq!(loaded.description.as_deref(), Some("desc"));

        assert!(delete_library(&env.conn, id).unwrap());
        assert!(!delete_library(&env.conn, id).unwrap());
        assert!(!update_library(&env.conn, id, "x", None).unwrap());
    }

    #[test]
    fn test_share_code_lookup() {
        let env = TestEnv::new().unwrap();
        let id = insert_library(&env.conn, &library("ana", "Shared")).unwrap();
        assert!(set_share_code(&env.conn, id, "abc123").unwrap());

        let found = get_library_by_share_code(&env.conn, "abc123").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(get_library_by_share_code(&env.conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_unreadable_created_at_still_loads() {
        let env = TestEnv::new().unwrap();
        let id = insert_library(&env.conn, &library("ana", "Legacy")).unwrap();
        env.conn
            .execute(
                "UPDATE libraries SET created_at = 'not a date' WHERE id = ?1",
                params![id],
            )
            .unwrap();

        let before = chrono::Utc::now();
        let loaded = get_library(&env.conn, id).unwrap().unwrap();
        assert_eq!(loaded.name, "Legacy");
        assert!(loaded.created_at >= before);
    }
}
