//! Common-prefix naming for combined reports

/// Name used when the combined reports share no usable prefix.
pub const DEFAULT_SUMMARY_NAME: &str = "Combined Summary";

/// Fixed name for meta-summaries; never prefix-derived.
pub const META_SUMMARY_NAME: &str = "Combined Overall Summary";

/// Character-wise longest common prefix, not word-aware.
pub fn longest_common_prefix(names: &[&str]) -> String {
    let mut iter = names.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.chars().collect();
    for name in iter {
        let mut shared = 0;
        for (a, b) in prefix.iter().zip(name.chars()) {
            if *a != b {
                break;
            }
            shared += 1;
        }
        prefix.truncate(shared);
        if prefix.is_empty() {
            break;
        }
    }
    prefix.into_iter().collect()
}

/// Derive a summary's display name and its per-source labels.
///
/// The name is the longest common prefix with trailing whitespace trimmed,
/// falling back to [`DEFAULT_SUMMARY_NAME`] when nothing usable remains. Each
/// label is the source name minus that trimmed prefix, trimmed of surrounding
/// whitespace; labels may come out empty.
pub fn derive_summary_naming(names: &[&str]) -> (String, Vec<String>) {
    let prefix = longest_common_prefix(names);
    let trimmed = prefix.trim_end();

    let summary_name = if trimmed.is_empty() {
        DEFAULT_SUMMARY_NAME.to_string()
    } else {
        trimmed.to_string()
    };

    // `trimmed` is a byte prefix of every name, so slicing is safe.
    let labels = names
        .iter()
        .map(|name| name[trimmed.len()..].trim().to_string())
        .collect();

    (summary_name, labels)
}
