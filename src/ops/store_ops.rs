use crate::model::store::Store;

/// Error type for in-memory line edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("line {} is out of range (file has {len} lines)", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },
    #[error("line {} changed since it was listed; list again and retry", .index + 1)]
    Changed { index: usize },
}

/// Append a line at the end of the store
pub fn append(store: &mut Store, line: &str) {
    store.lines.push(single_line(line));
}

/// Overwrite exactly one physical line
pub fn replace_line(store: &mut Store, index: usize, new_line: &str) -> Result<(), EditError> {
    check_index(store, index)?;
    store.lines[index] = single_line(new_line);
    Ok(())
}

/// Remove exactly one physical line, returning its text
pub fn delete_line(store: &mut Store, index: usize) -> Result<String, EditError> {
    check_index(store, index)?;
    Ok(store.lines.remove(index))
}

/// Check that the line at `index` still reads `expected`.
///
/// Commands resolve numbers from an unlocked read; this guards the locked
/// write against a file that changed in between.
pub fn expect_line(store: &Store, index: usize, expected: &str) -> Result<(), EditError> {
    check_index(store, index)?;
    if store.lines[index] != expected {
        return Err(EditError::Changed { index });
    }
    Ok(())
}

fn check_index(store: &Store, index: usize) -> Result<(), EditError> {
    if index >= store.lines.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: store.lines.len(),
        });
    }
    Ok(())
}

/// A task is one line; embedded line breaks would split it in two
fn single_line(line: &str) -> String {
    line.replace(['\r', '\n'], " ")
}
