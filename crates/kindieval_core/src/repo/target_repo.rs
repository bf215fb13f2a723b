//! Target catalog repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Catalog reads return targets in insertion order (`rowid ASC`).
//! - Codes are unique; a second insert with the same code is rejected.
//! - Targets are append-only; there is no update or delete path.

use super::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use crate::model::target::{AgeBand, Domain, Target, TargetId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TARGET_SELECT_SQL: &str = "SELECT
    uuid,
    code,
    age_band,
    domain,
    content
FROM targets";

/// Optional catalog filters. Pure in-memory filtering lives in
/// [`crate::assess::filter`]; this narrows at the storage level.
#[derive(Debug, Clone, Default)]
pub struct TargetListQuery {
    pub age_band: Option<AgeBand>,
    pub domain: Option<Domain>,
}

pub trait TargetRepository {
    fn create_target(&self, target: &Target) -> RepoResult<TargetId>;
    fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>>;
    fn get_target_by_code(&self, code: &str) -> RepoResult<Option<Target>>;
    fn list_targets(&self, query: &TargetListQuery) -> RepoResult<Vec<Target>>;
}

/// SQLite-backed target catalog.
pub struct SqliteTargetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTargetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TargetRepository for SqliteTargetRepository<'_> {
    fn create_target(&self, target: &Target) -> RepoResult<TargetId> {
        target.validate()?;

        self.conn
            .execute(
                "INSERT INTO targets (uuid, code, age_band, domain, content)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    target.id.to_string(),
                    target.code.as_str(),
                    target.age_band.as_str(),
                    target.domain.as_str(),
                    target.content.as_str(),
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateCode(target.code.clone())
                } else {
                    err.into()
                }
            })?;

        Ok(target.id)
    }

    fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TARGET_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_target_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_target_by_code(&self, code: &str) -> RepoResult<Option<Target>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TARGET_SELECT_SQL} WHERE code = ?1;"))?;
        let mut rows = stmt.query([code.trim()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_target_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_targets(&self, query: &TargetListQuery) -> RepoResult<Vec<Target>> {
        let mut sql = format!("{TARGET_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(age_band) = query.age_band {
            sql.push_str(" AND age_band = ?");
            bind_values.push(Value::Text(age_band.as_str().to_string()));
        }
        if let Some(domain) = query.domain {
            sql.push_str(" AND domain = ?");
            bind_values.push(Value::Text(domain.as_str().to_string()));
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut targets = Vec::new();
        while let Some(row) = rows.next()? {
            targets.push(parse_target_row(row)?);
        }
        Ok(targets)
    }
}

fn parse_target_row(row: &Row<'_>) -> RepoResult<Target> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "targets.uuid")?;

    let age_band_text: String = row.get("age_band")?;
    let age_band = AgeBand::parse(&age_band_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid age band `{age_band_text}` in targets.age_band"))
    })?;

    let domain_text: String = row.get("domain")?;
    let domain = Domain::parse(&domain_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid domain `{domain_text}` in targets.domain"))
    })?;

    let target = Target {
        id,
        code: row.get("code")?,
        age_band,
        domain,
        content: row.get("content")?,
    };
    target.validate()?;
    Ok(target)
}
