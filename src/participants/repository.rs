//! Participant Repository
//! Mission: Apply enrollment rules on top of the storage backend

use crate::participants::models::{
    Participant, ParticipantCreate, ParticipantError, StudyGroup,
};
use crate::participants::store::ParticipantStore;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const MIN_AGE: i64 = 18;
const MAX_AGE: i64 = 100;

/// Repository over an injectable store.
///
/// Creation runs the validation rules in a fixed order: subject-id
/// uniqueness, age range, study-group membership. Updates go through the
/// typed-setter mapping on `Participant`; rule re-validation on update is
/// opt-in via `strict_updates` (the legacy behavior trusts the caller).
pub struct ParticipantRepository {
    store: Arc<dyn ParticipantStore>,
    strict_updates: bool,
}

impl ParticipantRepository {
    pub fn new(store: Arc<dyn ParticipantStore>, strict_updates: bool) -> Self {
        Self {
            store,
            strict_updates,
        }
    }

    /// All participants, insertion order.
    pub fn list(&self) -> Result<Vec<Participant>, ParticipantError> {
        self.store.list()
    }

    /// Validate and append a new participant with a fresh id.
    pub fn create(&self, candidate: ParticipantCreate) -> Result<Participant, ParticipantError> {
        if self.store.subject_id_exists(&candidate.subject_id)? {
            return Err(ParticipantError::DuplicateSubjectId);
        }

        if !(MIN_AGE..=MAX_AGE).contains(&candidate.age) {
            return Err(ParticipantError::InvalidAge);
        }

        let study_group = StudyGroup::from_str(&candidate.study_group)
            .ok_or(ParticipantError::InvalidStudyGroup)?;

        let participant = Participant {
            participant_id: Uuid::new_v4(),
            subject_id: candidate.subject_id,
            study_group,
            enrollment_date: candidate.enrollment_date,
            status: candidate.status,
            age: candidate.age,
            gender: candidate.gender,
        };

        // The store re-checks uniqueness under its own lock/constraint, so a
        // concurrent create cannot slip a duplicate past the check above.
        self.store.insert(participant.clone())?;

        info!(
            participant_id = %participant.participant_id,
            subject_id = %participant.subject_id,
            "participant created"
        );

        Ok(participant)
    }

    /// Overwrite fields of an existing participant.
    ///
    /// All-or-nothing: a rejected field leaves the record untouched.
    pub fn update(
        &self,
        id: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<Participant, ParticipantError> {
        let mut updated = self.store.get(id)?.ok_or(ParticipantError::NotFound)?;

        for (name, value) in fields {
            updated.apply_field(name, value)?;
        }

        if self.strict_updates && !(MIN_AGE..=MAX_AGE).contains(&updated.age) {
            return Err(ParticipantError::InvalidAge);
        }

        self.store.replace(updated.clone())?;

        info!(participant_id = %id, "participant updated");

        Ok(updated)
    }

    /// Remove a participant. Fails with `NotFound` if the id is unknown.
    pub fn delete(&self, id: Uuid) -> Result<(), ParticipantError> {
        self.store.delete(id)?;
        info!(participant_id = %id, "participant deleted");
        Ok(())
    }
}
