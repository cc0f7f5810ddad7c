//! Identifier generation
//!
//! Task ids are supplied by callers; these helpers cover the cases where the
//! engine (or the CLI on the caller's behalf) has to mint one.

/// Generate a fresh column id
///
/// UUID v7 keeps ids unique and roughly ordered by creation time.
pub fn generate_column_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Generate a task id for callers that don't bring their own
pub fn generate_task_id() -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    // The last 12 hex chars are the random tail; the head is the timestamp
    format!("task-{}", &uuid[uuid.len() - 12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_ids_are_unique() {
        let ids: HashSet<String> = (0..100).map(|_| generate_column_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_task_id_format() {
        let id = generate_task_id();
        assert!(id.starts_with("task-"));
        assert_eq!(id.len(), "task-".len() + 12);
        assert!(id["task-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
