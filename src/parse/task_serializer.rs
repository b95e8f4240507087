use crate::model::task::{TaskLine, format_date};

/// Serialize a task to a single line (no newline).
///
/// Order is fixed: `x` and completion date, priority, creation date,
/// description. The description is emitted as-is, so tag tokens stay where
/// the caller put them.
pub fn serialize_line(task: &TaskLine) -> String {
    let mut parts: Vec<String> = Vec::new();

    if task.completed {
        parts.push("x".to_string());
        if let Some(date) = task.completion_date {
            parts.push(format_date(date));
        }
    }
    if let Some(priority) = task.priority {
        parts.push(priority.to_string());
    }
    if let Some(date) = task.creation_date {
        parts.push(format_date(date));
    }
    if !task.description.is_empty() {
        parts.push(task.description.clone());
    }

    parts.join(" ")
}
