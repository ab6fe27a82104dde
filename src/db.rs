use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::model::{ContactForm, NormalizedRecord};

/// Handle to the project/contact document store. Opened once per run and
/// passed to whoever needs it.
pub struct Store {
    conn: Connection,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProject {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub record: NormalizedRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredContact {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub form: ContactForm,
}

pub struct Stats {
    pub projects: usize,
    pub contacts: usize,
    pub by_city: Vec<(String, usize)>,
}

impl Store {
    pub fn open(path: &str) -> Result<Self> {
        if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating database directory {}", dir.display()))?;
        }
        let conn = Connection::open(path).with_context(|| format!("opening database {}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Store { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS projects (
                id           TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(10)))),
                project_name TEXT NOT NULL,
                doc          TEXT NOT NULL,
                created_at   TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(project_name);

            CREATE TABLE IF NOT EXISTS contacts (
                id         TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(10)))),
                name       TEXT NOT NULL,
                email      TEXT NOT NULL,
                phone      TEXT NOT NULL,
                service    TEXT NOT NULL,
                message    TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_contacts_service ON contacts(service);
            ",
        )?;
        Ok(())
    }

    // ── Projects ──

    /// Stores the record with server timestamps; returns the assigned id.
    pub fn insert_project(&self, record: &NormalizedRecord) -> Result<String> {
        let doc = serde_json::to_string(record)?;
        let id = self.conn.query_row(
            "INSERT INTO projects (project_name, doc) VALUES (?1, ?2) RETURNING id",
            params![record.project_name, doc],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    /// Exact equality on the project name.
    pub fn project_exists(&self, name: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM projects WHERE project_name = ?1 LIMIT 1",
                params![name],
                |r| r.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Every stored project, newest first.
    pub fn fetch_projects(&self) -> Result<Vec<StoredProject>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, updated_at, doc FROM projects
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(id, created_at, updated_at, doc)| project_from_row(id, created_at, updated_at, &doc))
            .collect()
    }

    pub fn get_project(&self, id: &str) -> Result<Option<StoredProject>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, created_at, updated_at, doc FROM projects WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        row.map(|(id, created_at, updated_at, doc)| project_from_row(id, created_at, updated_at, &doc))
            .transpose()
    }

    /// Replaces the stored document and bumps `updated_at`. False if no such id.
    pub fn update_project(&self, id: &str, record: &NormalizedRecord) -> Result<bool> {
        let doc = serde_json::to_string(record)?;
        let changed = self.conn.execute(
            "UPDATE projects SET project_name = ?1, doc = ?2, updated_at = datetime('now')
             WHERE id = ?3",
            params![record.project_name, doc, id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_project(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Contacts ──

    pub fn insert_contact(&self, form: &ContactForm) -> Result<String> {
        let id = self.conn.query_row(
            "INSERT INTO contacts (name, email, phone, service, message)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
            params![form.name, form.email, form.phone, form.service, form.message],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    /// Every submission, newest first.
    pub fn fetch_contacts(&self) -> Result<Vec<StoredContact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, name, email, phone, service, message FROM contacts
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredContact {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    form: ContactForm {
                        name: row.get(2)?,
                        email: row.get(3)?,
                        phone: row.get(4)?,
                        service: row.get(5)?,
                        message: row.get(6)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Stats ──

    pub fn get_stats(&self) -> Result<Stats> {
        let projects: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?;
        let contacts: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?;

        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(json_extract(doc, '$.location.city'), ''), COUNT(*)
             FROM projects GROUP BY 1 ORDER BY 2 DESC, 1",
        )?;
        let by_city = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Stats {
            projects,
            contacts,
            by_city,
        })
    }
}

fn project_from_row(
    id: String,
    created_at: String,
    updated_at: String,
    doc: &str,
) -> Result<StoredProject> {
    let record = serde_json::from_str(doc)
        .with_context(|| format!("stored project {} is not a valid document", id))?;
    Ok(StoredProject {
        id,
        created_at,
        updated_at,
        record,
    })
}

// ── Tests ──
