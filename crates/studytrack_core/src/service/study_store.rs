//! Study store: canonical per-identity study state.
//!
//! # Responsibility
//! - Hydrate state for one identity from key-value storage, falling back to defaults.
//! - Strip stale legacy seed topics on load.
//! - Apply topic, exercise and checklist mutations and persist after each change.
//! - Derive topic, overall and checklist progress.
//!
//! # Invariants
//! - Mutations never fail. Blank input and unknown ids are silent no-ops.
//! - Each state change produces exactly one storage write; no-ops and loads write nothing.
//! - Writes only happen while the hydrated key equals the current identity key.
//! - `exercises.len() == exercise_count` after every count-changing edit.

use crate::config::AppConfig;
use crate::model::seed::{default_state, strip_legacy_topics, DefaultSyllabus};
use crate::model::session::{identity_storage_key, IdentityProvider};
use crate::model::study::{
    align_exercises, clamp_exercise_count, count_to_u32, ChecklistItem, EntityId, Exercise,
    ExerciseStatus, StudyState, Topic, TopicChanges,
};
use crate::service::progress::{mean_percent, Progress};
use crate::storage::KeyValueStore;
use log::{debug, info, warn};

/// Owner of the live `StudyState` for the active identity.
pub struct StudyStore<S: KeyValueStore> {
    storage: S,
    key_prefix: String,
    default_syllabus: DefaultSyllabus,
    identity: Option<String>,
    storage_key: String,
    hydrated_key: Option<String>,
    state: StudyState,
}

impl<S: KeyValueStore> StudyStore<S> {
    /// Hydrates a store for whatever identity `provider` reports.
    pub fn open(storage: S, config: &AppConfig, provider: &dyn IdentityProvider) -> Self {
        Self::with_identity(storage, config, provider.current_identity().as_deref())
    }

    /// Hydrates a store for an explicit identity (`None` = guest).
    pub fn with_identity(storage: S, config: &AppConfig, identity: Option<&str>) -> Self {
        let key_prefix = config.progress_key_prefix();
        let storage_key = identity_storage_key(&key_prefix, identity);
        let state = load_state(&storage, &storage_key, config.default_syllabus);
        Self {
            storage,
            key_prefix,
            default_syllabus: config.default_syllabus,
            identity: identity.map(str::to_string),
            hydrated_key: Some(storage_key.clone()),
            storage_key,
            state,
        }
    }

    /// Swaps to another identity's state, discarding the in-memory state.
    ///
    /// Loading and re-arming writes happen in one step, so the previous identity's
    /// state can never be written under the new key. Returns `false` when the
    /// identity maps to the key that is already active.
    pub fn switch_identity(&mut self, identity: Option<&str>) -> bool {
        let next_key = identity_storage_key(&self.key_prefix, identity);
        if next_key == self.storage_key {
            return false;
        }

        self.hydrated_key = None;
        self.storage_key = next_key;
        self.identity = identity.map(str::to_string);
        self.state = load_state(&self.storage, &self.storage_key, self.default_syllabus);
        self.hydrated_key = Some(self.storage_key.clone());
        info!(
            "event=identity_switch module=study status=ok guest={} topics={}",
            self.identity.is_none(),
            self.state.topics.len()
        );
        true
    }

    /// Re-reads `provider` and switches when its identity changed.
    pub fn sync_identity(&mut self, provider: &dyn IdentityProvider) -> bool {
        let identity = provider.current_identity();
        self.switch_identity(identity.as_deref())
    }

    /// Active identity, `None` for guest.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Storage key of the active identity.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Borrowed view of the live state.
    pub fn state(&self) -> &StudyState {
        &self.state
    }

    /// Owned copy of the live state; later mutations do not affect it.
    pub fn snapshot(&self) -> StudyState {
        self.state.clone()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.state.topics
    }

    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.state.topic(topic_id)
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.state.checklist
    }

    pub fn exam_date(&self) -> &str {
        &self.state.exam_date
    }

    /// Prepends a topic with `exercise_count` placeholder exercises.
    ///
    /// Title and description are trimmed; a negative count becomes zero.
    pub fn add_topic(&mut self, title: &str, description: &str, exercise_count: i64) -> EntityId {
        let topic = Topic::new(
            title.trim(),
            description.trim(),
            clamp_exercise_count(exercise_count),
        );
        let topic_id = topic.id.clone();
        debug!(
            "event=topic_add module=study status=ok exercise_count={}",
            topic.exercise_count
        );
        self.apply(|state| {
            state.topics.insert(0, topic);
            true
        });
        topic_id
    }

    /// Updates the given topic fields; a count change realigns the exercise list.
    ///
    /// Shrinking drops exercises from the tail, including their recorded status.
    pub fn update_topic(&mut self, topic_id: &str, changes: TopicChanges) -> bool {
        if changes.is_empty() {
            return false;
        }
        self.apply_to_topic(topic_id, |topic| {
            if let Some(title) = &changes.title {
                topic.title = title.trim().to_string();
            }
            if let Some(description) = &changes.description {
                topic.description = description.trim().to_string();
            }
            if let Some(raw_count) = changes.exercise_count {
                let target = clamp_exercise_count(raw_count);
                topic.exercises = align_exercises(&topic.exercises, target as usize);
                topic.exercise_count = target;
            }
            true
        })
    }

    /// Removes a topic.
    pub fn delete_topic(&mut self, topic_id: &str) -> bool {
        self.apply(|state| {
            let before = state.topics.len();
            state.topics.retain(|topic| topic.id != topic_id);
            state.topics.len() != before
        })
    }

    /// Appends an exercise and bumps the topic's count to the new length.
    pub fn add_exercise(&mut self, topic_id: &str, title: &str) -> Option<EntityId> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return None;
        }
        let exercise = Exercise::new(trimmed);
        let exercise_id = exercise.id.clone();
        let applied = self.apply_to_topic(topic_id, move |topic| {
            topic.exercises.push(exercise);
            topic.exercise_count = count_to_u32(topic.exercises.len());
            true
        });
        applied.then_some(exercise_id)
    }

    /// Renames an exercise to the trimmed `title`.
    pub fn update_exercise_title(&mut self, topic_id: &str, exercise_id: &str, title: &str) -> bool {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.apply_to_exercise(topic_id, exercise_id, |exercise| {
            exercise.title = trimmed.to_string();
        })
    }

    pub fn update_exercise_status(
        &mut self,
        topic_id: &str,
        exercise_id: &str,
        status: ExerciseStatus,
    ) -> bool {
        self.apply_to_exercise(topic_id, exercise_id, |exercise| {
            exercise.status = status;
        })
    }

    /// Replaces the topic note verbatim (no trimming).
    pub fn update_topic_note(&mut self, topic_id: &str, note: &str) -> bool {
        self.apply_to_topic(topic_id, |topic| {
            topic.note = note.to_string();
            true
        })
    }

    /// Prepends an open checklist item with trimmed `text`.
    pub fn add_checklist_item(&mut self, text: &str) -> Option<EntityId> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let item = ChecklistItem::new(trimmed);
        let item_id = item.id.clone();
        self.apply(|state| {
            state.checklist.insert(0, item);
            true
        });
        Some(item_id)
    }

    /// Flips `done` on one checklist item.
    pub fn toggle_checklist_item(&mut self, item_id: &str) -> bool {
        self.apply(|state| match state.checklist.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.done = !item.done;
                true
            }
            None => false,
        })
    }

    /// Replaces the exam date verbatim; callers supply a valid ISO-8601 timestamp.
    pub fn update_exam_date(&mut self, iso_date: &str) -> bool {
        self.apply(|state| {
            state.exam_date = iso_date.to_string();
            true
        })
    }

    /// Progress of one topic, recomputed from live state. Unknown ids yield zeros.
    pub fn topic_progress(&self, topic_id: &str) -> Progress {
        self.state
            .topic(topic_id)
            .map(Progress::of_topic)
            .unwrap_or_default()
    }

    /// Mean of per-topic percentages; every topic counts once regardless of size.
    pub fn overall_progress(&self) -> u8 {
        mean_percent(
            self.state
                .topics
                .iter()
                .map(|topic| Progress::of_topic(topic).percent),
        )
    }

    /// Share of checklist items marked done.
    pub fn checklist_progress(&self) -> Progress {
        let done = self.state.checklist.iter().filter(|item| item.done).count();
        Progress::new(done, self.state.checklist.len())
    }

    fn apply(&mut self, mutate: impl FnOnce(&mut StudyState) -> bool) -> bool {
        let mut next = self.state.clone();
        if !mutate(&mut next) {
            return false;
        }
        self.state = next;
        self.persist();
        true
    }

    fn apply_to_topic(&mut self, topic_id: &str, mutate: impl FnOnce(&mut Topic) -> bool) -> bool {
        self.apply(|state| {
            state
                .topics
                .iter_mut()
                .find(|topic| topic.id == topic_id)
                .is_some_and(mutate)
        })
    }

    fn apply_to_exercise(
        &mut self,
        topic_id: &str,
        exercise_id: &str,
        mutate: impl FnOnce(&mut Exercise),
    ) -> bool {
        self.apply_to_topic(topic_id, |topic| {
            match topic
                .exercises
                .iter_mut()
                .find(|exercise| exercise.id == exercise_id)
            {
                Some(exercise) => {
                    mutate(exercise);
                    true
                }
                None => false,
            }
        })
    }

    fn persist(&self) {
        if self.hydrated_key.as_deref() != Some(self.storage_key.as_str()) {
            warn!("event=study_persist module=study status=skipped reason=identity_not_hydrated");
            return;
        }

        let payload = match serde_json::to_string(&self.state) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=study_persist module=study status=error error_code=serialize_failed error={err}"
                );
                return;
            }
        };

        if let Err(err) = self.storage.set(&self.storage_key, &payload) {
            warn!("event=study_persist module=study status=error error_code=write_failed error={err}");
        }
    }
}

/// Reads and normalizes the persisted state under `key`.
///
/// Absent, unreadable or malformed blobs fall back to the default state.
pub fn load_state<S: KeyValueStore + ?Sized>(
    storage: &S,
    key: &str,
    syllabus: DefaultSyllabus,
) -> StudyState {
    let stored = match storage.get(key) {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            info!("event=study_load module=study status=ok source=default");
            return default_state(syllabus);
        }
        Err(err) => {
            warn!("event=study_load module=study status=error error_code=read_failed error={err}");
            return default_state(syllabus);
        }
    };

    match serde_json::from_str::<StudyState>(&stored) {
        Ok(mut state) => {
            let stripped = strip_legacy_topics(&mut state);
            info!(
                "event=study_load module=study status=ok source=storage topics={} legacy_stripped={}",
                state.topics.len(),
                stripped
            );
            state
        }
        Err(err) => {
            warn!(
                "event=study_load module=study status=error error_code=malformed_state line={} column={}",
                err.line(),
                err.column()
            );
            default_state(syllabus)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StudyStore;
    use crate::config::AppConfig;
    use crate::model::study::{ExerciseStatus, TopicChanges};
    use crate::storage::MemoryStore;

    fn guest_store(storage: &MemoryStore) -> StudyStore<&MemoryStore> {
        StudyStore::with_identity(storage, &AppConfig::default(), None)
    }

    #[test]
    fn opening_does_not_write() {
        let storage = MemoryStore::new();
        let _store = guest_store(&storage);
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn each_change_writes_once_and_no_ops_write_nothing() {
        let storage = MemoryStore::new();
        let mut store = guest_store(&storage);

        let topic_id = store.add_topic("Hooks", "", 2);
        assert_eq!(storage.write_count(), 1);

        assert!(!store.update_topic_note("missing", "text"));
        assert!(store.add_exercise(&topic_id, "   ").is_none());
        assert!(!store.update_topic(&topic_id, TopicChanges::default()));
        assert_eq!(storage.write_count(), 1);

        store.update_topic_note(&topic_id, "remember cleanup");
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn add_topic_trims_text_and_clamps_count() {
        let storage = MemoryStore::new();
        let mut store = guest_store(&storage);
        let topic_id = store.add_topic("  Forms ", " Validation  ", -3);
        let topic = store.topic(&topic_id).unwrap();
        assert_eq!(topic.title, "Forms");
        assert_eq!(topic.description, "Validation");
        assert_eq!(topic.exercise_count, 0);
        assert!(topic.exercises.is_empty());
    }

    #[test]
    fn note_is_stored_verbatim() {
        let storage = MemoryStore::new();
        let mut store = guest_store(&storage);
        let topic_id = store.add_topic("Notes", "", 0);
        store.update_topic_note(&topic_id, "  keep spacing \n");
        assert_eq!(store.topic(&topic_id).unwrap().note, "  keep spacing \n");
    }

    #[test]
    fn exercise_status_and_title_updates() {
        let storage = MemoryStore::new();
        let mut store = guest_store(&storage);
        let topic_id = store.add_topic("Effects", "", 1);
        let exercise_id = store.topic(&topic_id).unwrap().exercises[0].id.clone();

        assert!(store.update_exercise_status(&topic_id, &exercise_id, ExerciseStatus::Done));
        assert!(store.update_exercise_title(&topic_id, &exercise_id, "  Cleanup  "));
        assert!(!store.update_exercise_title(&topic_id, &exercise_id, "  "));
        assert!(!store.update_exercise_status(&topic_id, "missing", ExerciseStatus::Done));

        let exercise = store.topic(&topic_id).unwrap().exercise(&exercise_id).unwrap();
        assert_eq!(exercise.title, "Cleanup");
        assert_eq!(exercise.status, ExerciseStatus::Done);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let storage = MemoryStore::new();
        let mut store = guest_store(&storage);
        let before = store.snapshot();
        store.add_checklist_item("Review notes");
        assert_eq!(before.checklist.len() + 1, store.checklist().len());
    }
}
