//! Study state domain model.
//!
//! # Responsibility
//! - Define the persisted shape of topics, exercises and the exam checklist.
//! - Provide constructors for freshly generated entities.
//!
//! # Invariants
//! - Entity ids are opaque strings; generated ids are UUID v4.
//! - `Topic::exercise_count` mirrors `exercises.len()` after count-changing edits.
//! - Serialized field names are camelCase to stay compatible with stored blobs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a topic, exercise or checklist item.
pub type EntityId = String;

/// Generates a fresh entity identifier.
///
/// No uniqueness check is performed; v4 collisions are assumed not to occur.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Completion state of one exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    /// Not touched yet.
    #[default]
    NotStarted,
    /// Work has begun.
    InProgress,
    /// Finished; the only status counted as completed.
    Done,
}

impl ExerciseStatus {
    /// Stable wire/display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Parses the wire name produced by [`ExerciseStatus::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// One exercise inside a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique within the owning topic.
    pub id: EntityId,
    pub title: String,
    pub status: ExerciseStatus,
}

impl Exercise {
    /// Creates a `not_started` exercise with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            title: title.into(),
            status: ExerciseStatus::NotStarted,
        }
    }

    /// Creates the placeholder exercise for 1-based `position`.
    pub fn placeholder(position: usize) -> Self {
        Self::new(format!("Exercise {position}"))
    }
}

/// One syllabus topic with its exercises and free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TopicRecord")]
pub struct Topic {
    /// Unique within the store.
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Declared exercise count; realigned with `exercises` when edited.
    pub exercise_count: u32,
    /// Stored verbatim, never trimmed.
    pub note: String,
    pub exercises: Vec<Exercise>,
}

/// Lenient wire shape accepted when reading persisted topics.
///
/// Older blobs carry neither `exerciseCount` nor `note`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicRecord {
    id: EntityId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    exercise_count: Option<u32>,
    #[serde(default)]
    note: String,
    #[serde(default)]
    exercises: Vec<Exercise>,
}

impl From<TopicRecord> for Topic {
    fn from(value: TopicRecord) -> Self {
        let exercise_count = value
            .exercise_count
            .unwrap_or_else(|| count_to_u32(value.exercises.len()));
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            exercise_count,
            note: value.note,
            exercises: value.exercises,
        }
    }
}

impl Topic {
    /// Creates a topic with `exercise_count` placeholder exercises.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        exercise_count: u32,
    ) -> Self {
        Self {
            id: new_entity_id(),
            title: title.into(),
            description: description.into(),
            exercise_count,
            note: String::new(),
            exercises: build_placeholders(0, exercise_count as usize),
        }
    }

    /// Finds one exercise by id.
    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.id == exercise_id)
    }

    /// Number of exercises marked `done`.
    pub fn completed_count(&self) -> usize {
        self.exercises
            .iter()
            .filter(|exercise| exercise.status == ExerciseStatus::Done)
            .count()
    }
}

/// One exam-preparation task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: EntityId,
    /// Non-empty, trimmed.
    pub text: String,
    pub done: bool,
}

impl ChecklistItem {
    /// Creates an open item with a generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            text: text.into(),
            done: false,
        }
    }
}

/// Aggregate root persisted once per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyState {
    /// Newest first.
    pub topics: Vec<Topic>,
    /// ISO-8601 timestamp, stored verbatim.
    pub exam_date: String,
    /// Newest first.
    pub checklist: Vec<ChecklistItem>,
}

impl StudyState {
    /// Finds one topic by id.
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == topic_id)
    }

    /// Finds one checklist item by id.
    pub fn checklist_item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.checklist.iter().find(|item| item.id == item_id)
    }
}

/// Partial topic edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Negative values clamp to zero.
    pub exercise_count: Option<i64>,
}

impl TopicChanges {
    /// Returns whether no field would be touched.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.exercise_count.is_none()
    }
}

/// Clamps a signed count into the stored range.
pub fn clamp_exercise_count(raw: i64) -> u32 {
    raw.clamp(0, i64::from(u32::MAX)) as u32
}

/// Normalizes free-form numeric input (for example a form field) into a count.
///
/// Fractions are floored; negatives and non-finite values become zero.
pub fn normalize_exercise_count(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let floored = raw.floor();
    if floored >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        floored as u32
    }
}

/// Grows or shrinks `current` to exactly `target` exercises.
///
/// Shrinking keeps the first `target` items and drops the tail together with any
/// progress recorded on it. Growing appends `Exercise {n}` placeholders numbered
/// after the existing items.
pub fn align_exercises(current: &[Exercise], target: usize) -> Vec<Exercise> {
    if target <= current.len() {
        return current[..target].to_vec();
    }
    let mut aligned = current.to_vec();
    aligned.extend(build_placeholders(current.len(), target));
    aligned
}

fn build_placeholders(existing: usize, target: usize) -> Vec<Exercise> {
    (existing + 1..=target).map(Exercise::placeholder).collect()
}

pub(crate) fn count_to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
