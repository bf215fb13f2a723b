//! Child roster repository.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::child::{Child, ChildId};
use crate::model::target::AgeBand;
use rusqlite::{params, Connection, Row};

const CHILD_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    birth_date,
    class_label,
    age_band,
    teacher
FROM children";

pub trait ChildRepository {
    fn create_child(&self, child: &Child) -> RepoResult<ChildId>;
    fn get_child(&self, id: ChildId) -> RepoResult<Option<Child>>;
    /// Roster in insertion order.
    fn list_children(&self) -> RepoResult<Vec<Child>>;
}

pub struct SqliteChildRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChildRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ChildRepository for SqliteChildRepository<'_> {
    fn create_child(&self, child: &Child) -> RepoResult<ChildId> {
        child.validate()?;
        self.conn.execute(
            "INSERT INTO children (uuid, name, birth_date, class_label, age_band, teacher)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                child.id.to_string(),
                child.name.as_str(),
                child.birth_date.as_str(),
                child.class_label.as_str(),
                child.age_band.as_str(),
                child.teacher.as_str(),
            ],
        )?;
        Ok(child.id)
    }

    fn get_child(&self, id: ChildId) -> RepoResult<Option<Child>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CHILD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_child_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_children(&self) -> RepoResult<Vec<Child>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CHILD_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut children = Vec::new();
        while let Some(row) = rows.next()? {
            children.push(parse_child_row(row)?);
        }
        Ok(children)
    }
}

fn parse_child_row(row: &Row<'_>) -> RepoResult<Child> {
    let uuid_text: String = row.get("uuid")?;
    let age_band_text: String = row.get("age_band")?;
    let age_band = AgeBand::parse(&age_band_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid age band `{age_band_text}` in children.age_band"
        ))
    })?;

    let child = Child {
        id: parse_uuid(&uuid_text, "children.uuid")?,
        name: row.get("name")?,
        birth_date: row.get("birth_date")?,
        class_label: row.get("class_label")?,
        age_band,
        teacher: row.get("teacher")?,
    };
    child.validate()?;
    Ok(child)
}
