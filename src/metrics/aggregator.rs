//! Metrics Aggregator
//! Mission: Derive summary counts and averages from a repository snapshot

use crate::participants::models::{Gender, Participant, ParticipantStatus, StudyGroup};
use serde::Serialize;

/// Participant counts per gender.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct GenderDistribution {
    #[serde(rename = "M")]
    pub m: usize,
    #[serde(rename = "F")]
    pub f: usize,
    #[serde(rename = "Other")]
    pub other: usize,
}

/// Aggregate view returned by GET /metrics/.
#[derive(Debug, Serialize, PartialEq)]
pub struct MetricsSummary {
    pub total_participants: usize,
    pub active_participants: usize,
    pub completed_studies: usize,
    pub treatment_group: usize,
    pub control_group: usize,
    pub average_age: f64,
    pub gender_distribution: GenderDistribution,
}

/// Compute the summary over a snapshot.
///
/// Everything is recomputed fresh on every call; at this data volume there
/// is nothing worth caching. `average_age` is the arithmetic mean rounded to
/// one decimal place, defined as 0 for an empty snapshot.
pub fn summarize(participants: &[Participant]) -> MetricsSummary {
    let total = participants.len();

    let mut active = 0;
    let mut completed = 0;
    let mut treatment = 0;
    let mut control = 0;
    let mut age_sum: i64 = 0;
    let mut genders = GenderDistribution::default();

    for p in participants {
        match p.status {
            ParticipantStatus::Active => active += 1,
            ParticipantStatus::Completed => completed += 1,
            ParticipantStatus::Withdrawn => {}
        }
        match p.study_group {
            StudyGroup::Treatment => treatment += 1,
            StudyGroup::Control => control += 1,
        }
        match p.gender {
            Gender::M => genders.m += 1,
            Gender::F => genders.f += 1,
            Gender::Other => genders.other += 1,
        }
        age_sum += p.age;
    }

    let average_age = if total == 0 {
        0.0
    } else {
        (age_sum as f64 / total as f64 * 10.0).round() / 10.0
    };

    MetricsSummary {
        total_participants: total,
        active_participants: active,
        completed_studies: completed,
        treatment_group: treatment,
        control_group: control,
        average_age,
        gender_distribution: genders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn participant(
        subject_id: &str,
        age: i64,
        gender: Gender,
        group: StudyGroup,
        status: ParticipantStatus,
    ) -> Participant {
        Participant {
            participant_id: Uuid::new_v4(),
            subject_id: subject_id.to_string(),
            study_group: group,
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status,
            age,
            gender,
        }
    }

    #[test]
    fn test_empty_snapshot_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(
            summary,
            MetricsSummary {
                total_participants: 0,
                active_participants: 0,
                completed_studies: 0,
                treatment_group: 0,
                control_group: 0,
                average_age: 0.0,
                gender_distribution: GenderDistribution::default(),
            }
        );
    }

    #[test]
    fn test_two_participant_scenario() {
        let snapshot = vec![
            participant(
                "P001",
                45,
                Gender::M,
                StudyGroup::Treatment,
                ParticipantStatus::Active,
            ),
            participant(
                "P002",
                52,
                Gender::F,
                StudyGroup::Control,
                ParticipantStatus::Active,
            ),
        ];

        let summary = summarize(&snapshot);
        assert_eq!(summary.total_participants, 2);
        assert_eq!(summary.active_participants, 2);
        assert_eq!(summary.completed_studies, 0);
        assert_eq!(summary.treatment_group, 1);
        assert_eq!(summary.control_group, 1);
        assert_eq!(summary.average_age, 48.5);
        assert_eq!(
            summary.gender_distribution,
            GenderDistribution { m: 1, f: 1, other: 0 }
        );
    }

    #[test]
    fn test_withdrawn_counts_in_total_only() {
        let snapshot = vec![
            participant(
                "P001",
                40,
                Gender::Other,
                StudyGroup::Treatment,
                ParticipantStatus::Withdrawn,
            ),
            participant(
                "P002",
                60,
                Gender::F,
                StudyGroup::Control,
                ParticipantStatus::Completed,
            ),
        ];

        let summary = summarize(&snapshot);
        assert_eq!(summary.total_participants, 2);
        assert_eq!(summary.active_participants, 0);
        assert_eq!(summary.completed_studies, 1);
        assert_eq!(summary.gender_distribution.other, 1);
    }

    #[test]
    fn test_average_age_rounds_to_one_decimal() {
        let snapshot = vec![
            participant(
                "P001",
                20,
                Gender::M,
                StudyGroup::Treatment,
                ParticipantStatus::Active,
            ),
            participant(
                "P002",
                21,
                Gender::M,
                StudyGroup::Treatment,
                ParticipantStatus::Active,
            ),
            participant(
                "P003",
                21,
                Gender::M,
                StudyGroup::Treatment,
                ParticipantStatus::Active,
            ),
        ];

        // 62 / 3 = 20.666... -> 20.7
        assert_eq!(summarize(&snapshot).average_age, 20.7);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(summarize(&[])).unwrap();
        assert_eq!(json["total_participants"], 0);
        assert_eq!(json["average_age"], 0.0);
        assert_eq!(json["gender_distribution"]["M"], 0);
        assert_eq!(json["gender_distribution"]["F"], 0);
        assert_eq!(json["gender_distribution"]["Other"], 0);
    }
}
