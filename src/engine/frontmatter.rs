//! Split and parse the YAML frontmatter block of a note file.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Frontmatter fields the engine cares about. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NoteFrontmatter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub custom: HashMap<String, Value>,
}

/// Splits note content into (frontmatter YAML, body).
///
/// Returns `None` for the YAML part when the file has no `---` fenced block
/// at its very start.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let rest = if let Some(r) = content.strip_prefix("---\n") {
        r
    } else if let Some(r) = content.strip_prefix("---\r\n") {
        r
    } else {
        return (None, content);
    };

    // An empty block closes immediately.
    if let Some(body) = rest.strip_prefix("---") {
        return (Some(""), body.trim_start_matches(['\r', '\n']));
    }

    let closing = rest
        .find("\n---\n")
        .map(|i| (i, i + 5))
        .or_else(|| rest.find("\n---\r\n").map(|i| (i, i + 6)))
        .or_else(|| {
            if rest.ends_with("\n---") {
                Some((rest.len() - 4, rest.len()))
            } else {
                None
            }
        });

    match closing {
        Some((yaml_end, body_start)) => (Some(&rest[..yaml_end]), &rest[body_start..]),
        None => (None, content),
    }
}

/// Parses the frontmatter of a note.
///
/// A missing block yields the default (empty) frontmatter; malformed YAML is
/// an error carrying the YAML parser's message.
pub fn parse_frontmatter(content: &str) -> Result<NoteFrontmatter, String> {
    match split_frontmatter(content) {
        (Some(yaml), _) if yaml.trim().is_empty() => Ok(NoteFrontmatter::default()),
        (Some(yaml), _) => serde_yaml::from_str(yaml).map_err(|e| e.to_string()),
        (None, _) => Ok(NoteFrontmatter::default()),
    }
}
