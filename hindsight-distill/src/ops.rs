//! Parsing of critique output into insight operations
//!
//! Model critiques arrive as free text with one operation per line, e.g.:
//!
//! ```text
//! AGREE 2: Prefer searching over guessing when unsure.
//! EDIT 1: Verify the passage answers the question before finishing.
//! ADD: Cite an observation when finishing.
//! ```
//!
//! [`parse_operations`] extracts the well-formed lines;
//! [`sanitize`] then reconciles them against the current insight store
//! before they are applied.

use hindsight_core::{InsightStore, Operation};
use regex::Regex;
use std::sync::LazyLock;

/// One operation per line: keyword, optional 1-based position, colon, text.
static OPERATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ADD|AGREE|REMOVE|EDIT)(?:\s+(\d+))?\s*:\s*(.+)$").expect("hardcoded regex")
});

/// Parse raw critique output into operations, one per matching line.
///
/// Lines that do not fit the `KEYWORD [n]: text` shape are ignored, as are
/// operations with empty text. A position is required on `EDIT` (it has no
/// text to locate the target by) and parsed-but-discarded on the other
/// keywords, where the text drives the lookup instead.
pub fn parse_operations(response: &str) -> Vec<Operation> {
    let mut operations = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        let Some(captures) = OPERATION_LINE.captures(line) else {
            continue;
        };

        let keyword = &captures[1];
        let position = captures
            .get(2)
            .and_then(|m| m.as_str().parse::<usize>().ok());
        let text = captures[3].trim().to_string();
        if text.is_empty() {
            continue;
        }

        let operation = match keyword {
            "ADD" => Operation::Add(text),
            "AGREE" => Operation::Agree(text),
            "REMOVE" => Operation::Remove(text),
            "EDIT" => {
                let Some(position) = position else {
                    log::debug!("dropping EDIT without a position: {line}");
                    continue;
                };
                Operation::Edit { position, text }
            }
            _ => continue,
        };
        operations.push(operation);
    }

    operations
}

/// Reconcile parsed operations with the current store.
///
/// - `Add` of a text that fuzzily matches an existing insight becomes
///   `Agree`.
/// - `Edit` with a position outside the store is dropped.
/// - `Agree` and `Remove` pass through unchanged; their lookup misses
///   remain no-ops at apply time.
///
/// Positions are checked against the store as it is now, not as earlier
/// operations in the same batch would leave it.
pub fn sanitize(operations: Vec<Operation>, store: &InsightStore) -> Vec<Operation> {
    operations
        .into_iter()
        .filter_map(|operation| match operation {
            Operation::Add(text) => {
                if store.position_of(&text).is_some() {
                    log::debug!("converting duplicate add to agreement");
                    Some(Operation::Agree(text))
                } else {
                    Some(Operation::Add(text))
                }
            }
            Operation::Edit { position, text } => {
                if (1..=store.len()).contains(&position) {
                    Some(Operation::Edit { position, text })
                } else {
                    log::debug!(
                        "dropping EDIT {position}: store holds {} insights",
                        store.len()
                    );
                    None
                }
            }
            other => Some(other),
        })
        .collect()
}
