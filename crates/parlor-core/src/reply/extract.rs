//! Defensive extraction of reply text from an untrusted completion response.
//!
//! The provider's response shape is not fully trusted, so extraction works
//! over the generic JSON tree in two phases: a fixed list of known field
//! paths for OpenAI-like completions, then a depth- and count-bounded
//! traversal that gathers any non-empty strings it can find (covering
//! streaming deltas returned as arrays and other unexpected nestings).

use serde_json::Value;

/// Stop the fallback traversal after this many collected strings.
const MAX_STRINGS: usize = 50;

/// Stop the fallback traversal below this depth.
const MAX_DEPTH: usize = 8;

/// Known completion field paths, tried in priority order.
const CANDIDATE_PATHS: &[&str] = &[
    "/choices/0/message/content",
    "/choices/0/delta/content",
    "/choices/0/text",
    "/choices/0/content",
    "/message/content",
    "/content",
    "/output/0/content",
    "/output/0/text",
];

/// Extract reply text from a completion response.
///
/// Returns `None` when no usable text exists anywhere in the tree; the
/// caller substitutes the fixed fallback sentence in that case.
pub fn extract_reply(completion: &Value) -> Option<String> {
    for path in CANDIDATE_PATHS {
        if let Some(text) = completion.pointer(path).and_then(Value::as_str) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    let mut gathered = Vec::new();
    collect_strings(completion, &mut gathered, 0);
    if gathered.is_empty() {
        return None;
    }

    // Join with single spaces and collapse any whitespace runs inside the
    // collected fragments.
    let joined = gathered.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Gather non-empty strings from the tree, arrays element-wise and objects
/// key-wise, skipping keys that look like binary payloads.
fn collect_strings(value: &Value, acc: &mut Vec<String>, depth: usize) {
    if depth > MAX_DEPTH || acc.len() >= MAX_STRINGS {
        return;
    }
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                acc.push(trimmed.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_strings(item, acc, depth + 1);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                if key == "binary" || key == "blob" {
                    continue;
                }
                collect_strings(item, acc, depth + 1);
            }
        }
        _ => {}
    }
}
