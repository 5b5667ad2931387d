//! Participant Storage
//! Mission: Injectable storage backends behind one interface

use crate::participants::models::{
    Gender, Participant, ParticipantError, ParticipantStatus, StudyGroup,
};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use parking_lot::RwLock;
use rusqlite::{params, Connection, ErrorCode};
use uuid::Uuid;

/// Storage interface for participant records.
///
/// `insert` enforces subject-id uniqueness itself (write lock or UNIQUE
/// constraint), so the invariant holds even when the repository's pre-check
/// races with a concurrent create.
pub trait ParticipantStore: Send + Sync {
    /// All records in insertion order.
    fn list(&self) -> Result<Vec<Participant>, ParticipantError>;

    fn get(&self, id: Uuid) -> Result<Option<Participant>, ParticipantError>;

    fn subject_id_exists(&self, subject_id: &str) -> Result<bool, ParticipantError>;

    /// Append a record. Fails with `DuplicateSubjectId` on a subject-id clash.
    fn insert(&self, participant: Participant) -> Result<(), ParticipantError>;

    /// Overwrite the record with the same `participant_id`.
    fn replace(&self, participant: Participant) -> Result<(), ParticipantError>;

    /// Remove a record. Fails with `NotFound` if the id is absent.
    fn delete(&self, id: Uuid) -> Result<(), ParticipantError>;
}

/// In-memory store: a `Vec` behind a `parking_lot` RwLock.
///
/// Mutations are serialized by the write lock, which is the whole
/// transaction discipline this backend needs at demo scale.
pub struct MemoryStore {
    records: RwLock<Vec<Participant>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticipantStore for MemoryStore {
    fn list(&self) -> Result<Vec<Participant>, ParticipantError> {
        Ok(self.records.read().clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<Participant>, ParticipantError> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|p| p.participant_id == id)
            .cloned())
    }

    fn subject_id_exists(&self, subject_id: &str) -> Result<bool, ParticipantError> {
        Ok(self
            .records
            .read()
            .iter()
            .any(|p| p.subject_id == subject_id))
    }

    fn insert(&self, participant: Participant) -> Result<(), ParticipantError> {
        let mut records = self.records.write();
        if records
            .iter()
            .any(|p| p.subject_id == participant.subject_id)
        {
            return Err(ParticipantError::DuplicateSubjectId);
        }
        records.push(participant);
        Ok(())
    }

    fn replace(&self, participant: Participant) -> Result<(), ParticipantError> {
        let mut records = self.records.write();
        match records
            .iter_mut()
            .find(|p| p.participant_id == participant.participant_id)
        {
            Some(slot) => {
                *slot = participant;
                Ok(())
            }
            None => Err(ParticipantError::NotFound),
        }
    }

    fn delete(&self, id: Uuid) -> Result<(), ParticipantError> {
        let mut records = self.records.write();
        let before = records.len();
        // Filter rebuild; survivor order is insertion order.
        records.retain(|p| p.participant_id != id);
        if records.len() == before {
            return Err(ParticipantError::NotFound);
        }
        Ok(())
    }
}

/// SQLite-backed store, connection per call.
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Open the store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS participants (
                participant_id TEXT PRIMARY KEY,
                subject_id TEXT UNIQUE NOT NULL,
                study_group TEXT NOT NULL,
                enrollment_date TEXT NOT NULL,
                status TEXT NOT NULL,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create participants table")?;

        Ok(())
    }

    fn open(&self) -> Result<Connection, ParticipantError> {
        Connection::open(&self.db_path)
            .context("Failed to open participant database")
            .map_err(ParticipantError::Storage)
    }
}

type ParticipantRow = (String, String, String, String, String, i64, String);

fn row_to_participant(row: ParticipantRow) -> Result<Participant, ParticipantError> {
    let (id, subject_id, group, date, status, age, gender) = row;
    let convert = || -> Result<Participant> {
        Ok(Participant {
            participant_id: Uuid::parse_str(&id).context("bad participant_id in database")?,
            subject_id,
            study_group: StudyGroup::from_str(&group)
                .ok_or_else(|| anyhow!("bad study_group in database: {group}"))?,
            enrollment_date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .context("bad enrollment_date in database")?,
            status: ParticipantStatus::from_str(&status)
                .ok_or_else(|| anyhow!("bad status in database: {status}"))?,
            age,
            gender: Gender::from_str(&gender)
                .ok_or_else(|| anyhow!("bad gender in database: {gender}"))?,
        })
    };
    convert().map_err(ParticipantError::Storage)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl ParticipantStore for SqliteStore {
    fn list(&self) -> Result<Vec<Participant>, ParticipantError> {
        let conn = self.open()?;

        let rows = (|| -> Result<Vec<ParticipantRow>> {
            let mut stmt = conn.prepare(
                "SELECT participant_id, subject_id, study_group, enrollment_date,
                        status, age, gender
                 FROM participants ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })()
        .map_err(ParticipantError::Storage)?;

        rows.into_iter().map(row_to_participant).collect()
    }

    fn get(&self, id: Uuid) -> Result<Option<Participant>, ParticipantError> {
        let conn = self.open()?;

        let row = (|| -> Result<Option<ParticipantRow>> {
            let mut stmt = conn.prepare(
                "SELECT participant_id, subject_id, study_group, enrollment_date,
                        status, age, gender
                 FROM participants WHERE participant_id = ?1",
            )?;
            let result = stmt.query_row(params![id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })()
        .map_err(ParticipantError::Storage)?;

        row.map(row_to_participant).transpose()
    }

    fn subject_id_exists(&self, subject_id: &str) -> Result<bool, ParticipantError> {
        let conn = self.open()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM participants WHERE subject_id = ?1",
                params![subject_id],
                |row| row.get(0),
            )
            .context("Failed to check subject_id")
            .map_err(ParticipantError::Storage)?;
        Ok(count > 0)
    }

    fn insert(&self, participant: Participant) -> Result<(), ParticipantError> {
        let conn = self.open()?;
        let result = conn.execute(
            "INSERT INTO participants
                 (participant_id, subject_id, study_group, enrollment_date, status, age, gender)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                participant.participant_id.to_string(),
                participant.subject_id,
                participant.study_group.as_str(),
                participant.enrollment_date.format("%Y-%m-%d").to_string(),
                participant.status.as_str(),
                participant.age,
                participant.gender.as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ParticipantError::DuplicateSubjectId),
            Err(e) => Err(ParticipantError::Storage(e.into())),
        }
    }

    fn replace(&self, participant: Participant) -> Result<(), ParticipantError> {
        let conn = self.open()?;
        let rows_affected = conn
            .execute(
                "UPDATE participants
                 SET study_group = ?2, enrollment_date = ?3, status = ?4, age = ?5, gender = ?6
                 WHERE participant_id = ?1",
                params![
                    participant.participant_id.to_string(),
                    participant.study_group.as_str(),
                    participant.enrollment_date.format("%Y-%m-%d").to_string(),
                    participant.status.as_str(),
                    participant.age,
                    participant.gender.as_str(),
                ],
            )
            .context("Failed to update participant")
            .map_err(ParticipantError::Storage)?;

        if rows_affected == 0 {
            return Err(ParticipantError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<(), ParticipantError> {
        let conn = self.open()?;
        let rows_affected = conn
            .execute(
                "DELETE FROM participants WHERE participant_id = ?1",
                params![id.to_string()],
            )
            .context("Failed to delete participant")
            .map_err(ParticipantError::Storage)?;

        if rows_affected == 0 {
            return Err(ParticipantError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample(subject_id: &str, age: i64) -> Participant {
        Participant {
            participant_id: Uuid::new_v4(),
            subject_id: subject_id.to_string(),
            study_group: StudyGroup::Treatment,
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: ParticipantStatus::Active,
            age,
            gender: Gender::M,
        }
    }

    fn create_sqlite_store() -> (SqliteStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteStore::new(temp_file.path().to_str().unwrap()).unwrap();
        (store, temp_file)
    }

    fn check_store(store: &dyn ParticipantStore) {
        let first = sample("P001", 45);
        let second = sample("P002", 52);

        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();

        // Insertion order preserved
        let all = store.list().unwrap();
        assert_eq!(all, vec![first.clone(), second.clone()]);

        assert!(store.subject_id_exists("P001").unwrap());
        assert!(!store.subject_id_exists("P003").unwrap());

        // Duplicate subject id rejected
        let dup = sample("P001", 30);
        assert!(matches!(
            store.insert(dup).unwrap_err(),
            ParticipantError::DuplicateSubjectId
        ));
        assert_eq!(store.list().unwrap().len(), 2);

        // Replace overwrites fields in place
        let mut updated = first.clone();
        updated.age = 46;
        updated.status = ParticipantStatus::Completed;
        store.replace(updated.clone()).unwrap();
        assert_eq!(store.get(first.participant_id).unwrap(), Some(updated));

        // Replace of a missing id fails
        assert!(matches!(
            store.replace(sample("P009", 33)).unwrap_err(),
            ParticipantError::NotFound
        ));

        // Delete removes exactly the target, order among survivors kept
        store.delete(first.participant_id).unwrap();
        assert_eq!(store.list().unwrap(), vec![second.clone()]);

        // Delete of a missing id fails and leaves the store unchanged
        assert!(matches!(
            store.delete(first.participant_id).unwrap_err(),
            ParticipantError::NotFound
        ));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_store_contract() {
        check_store(&MemoryStore::new());
    }

    #[test]
    fn test_sqlite_store_contract() {
        let (store, _temp) = create_sqlite_store();
        check_store(&store);
    }

    #[test]
    fn test_sqlite_store_persists_across_opens() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let participant = sample("P001", 45);
        {
            let store = SqliteStore::new(&path).unwrap();
            store.insert(participant.clone()).unwrap();
        }

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![participant]);
    }
}
