//! Built-in default study state and legacy seed detection.
//!
//! # Invariants
//! - `LEGACY_TOPIC_IDS` is fixed; it only identifies old bundled demo data.
//! - Default states are rebuilt on every call so callers never share ids.

use crate::model::study::{ChecklistItem, Exercise, StudyState, Topic};

/// Exam date used when no persisted state exists.
pub const DEFAULT_EXAM_DATE: &str = "2025-10-28T09:00:00Z";

/// Topic ids of the previously bundled demo syllabus.
pub const LEGACY_TOPIC_IDS: [&str; 9] = [
    "kickoff",
    "components",
    "state-events",
    "lists-forms",
    "routing",
    "hooks",
    "context",
    "testing",
    "performance",
];

/// Which syllabus a fresh identity starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DefaultSyllabus {
    /// No topics; the user builds the syllabus.
    #[default]
    Empty,
    /// A small generic starter syllabus.
    Starter,
}

impl DefaultSyllabus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "empty" => Some(Self::Empty),
            "starter" => Some(Self::Starter),
            _ => None,
        }
    }
}

const STARTER_CHECKLIST: [(&str, &str); 4] = [
    ("chk-topics", "Finish the remaining topic exercises"),
    ("chk-notes", "Review topic notes and takeaways"),
    ("chk-weak-spots", "Revisit weak spots from practice"),
    ("chk-mock", "Do one full mock exam under time"),
];

const STARTER_TOPICS: [(&str, &str, &str, &[&str]); 3] = [
    (
        "starter-fundamentals",
        "Fundamentals",
        "Core vocabulary, tooling and the first worked examples.",
        &["Set up the workspace", "Summarize the key terms"],
    ),
    (
        "starter-practice",
        "Guided Practice",
        "Exercises that apply the fundamentals end to end.",
        &["Solve the guided exercise", "Repeat it without notes"],
    ),
    (
        "starter-review",
        "Review & Mock Exam",
        "Consolidate notes and rehearse under exam conditions.",
        &["Write a one-page summary", "Take a timed mock exam"],
    ),
];

/// Builds the default state for an identity without persisted data.
pub fn default_state(syllabus: DefaultSyllabus) -> StudyState {
    let checklist = STARTER_CHECKLIST
        .iter()
        .map(|(id, text)| ChecklistItem {
            id: (*id).to_string(),
            text: (*text).to_string(),
            done: false,
        })
        .collect();

    let topics = match syllabus {
        DefaultSyllabus::Empty => Vec::new(),
        DefaultSyllabus::Starter => STARTER_TOPICS
            .iter()
            .map(|(id, title, description, exercises)| starter_topic(id, title, description, exercises))
            .collect(),
    };

    StudyState {
        topics,
        exam_date: DEFAULT_EXAM_DATE.to_string(),
        checklist,
    }
}

fn starter_topic(id: &str, title: &str, description: &str, exercises: &[&str]) -> Topic {
    let exercises: Vec<Exercise> = exercises
        .iter()
        .enumerate()
        .map(|(idx, title)| Exercise {
            id: format!("{id}-{}", idx + 1),
            ..Exercise::new(*title)
        })
        .collect();
    Topic {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        exercise_count: exercises.len() as u32,
        note: String::new(),
        exercises,
    }
}

/// Returns whether `topic_id` belongs to the legacy demo syllabus.
pub fn is_legacy_topic_id(topic_id: &str) -> bool {
    LEGACY_TOPIC_IDS.contains(&topic_id)
}

/// Drops all topics when every one of them is legacy demo content.
///
/// Checklist and exam date are kept. A state with no topics, or with at least one
/// non-legacy topic, is returned unchanged. Returns whether topics were dropped.
pub fn strip_legacy_topics(state: &mut StudyState) -> bool {
    if state.topics.is_empty() {
        return false;
    }
    if state.topics.iter().all(|topic| is_legacy_topic_id(&topic.id)) {
        state.topics.clear();
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{default_state, is_legacy_topic_id, DefaultSyllabus, DEFAULT_EXAM_DATE};

    #[test]
    fn empty_default_has_checklist_but_no_topics() {
        let state = default_state(DefaultSyllabus::Empty);
        assert!(state.topics.is_empty());
        assert_eq!(state.checklist.len(), 4);
        assert!(state.checklist.iter().all(|item| !item.done));
        assert_eq!(state.exam_date, DEFAULT_EXAM_DATE);
    }

    #[test]
    fn starter_syllabus_is_consistent_and_not_legacy() {
        let state = default_state(DefaultSyllabus::Starter);
        assert_eq!(state.topics.len(), 3);
        for topic in &state.topics {
            assert_eq!(topic.exercise_count as usize, topic.exercises.len());
            assert!(!is_legacy_topic_id(&topic.id));
        }
    }

    #[test]
    fn syllabus_parse_is_case_insensitive() {
        assert_eq!(DefaultSyllabus::parse(" Starter "), Some(DefaultSyllabus::Starter));
        assert_eq!(DefaultSyllabus::parse("empty"), Some(DefaultSyllabus::Empty));
        assert_eq!(DefaultSyllabus::parse("demo"), None);
    }
}
