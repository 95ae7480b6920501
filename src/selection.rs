//! Turns selected text into a [`LinkDescriptor`].
//!
//! Understands wikilinks in the forms `[[target]]`, `[[alias|target]]`,
//! `[[target#anchor]]` and `[[dendron://vault/target#anchor]]`, plus the
//! same forms written without brackets.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::goto::SelectionSource;
use crate::types::LinkDescriptor;

/// Prefix of a vault-qualified link target.
pub const VAULT_LINK_PREFIX: &str = "dendron://";

static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("wikilink regex is valid"));
static BARE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s\[\]]+$").expect("bare link regex is valid"));

/// Parses link text into a descriptor.
///
/// `text` is either one wikilink (surrounding whitespace allowed) or the bare
/// inside of one. Returns `None` when it is neither or names no target.
pub fn parse_link(text: &str) -> Option<LinkDescriptor> {
    let trimmed = text.trim();
    if let Some(caps) = WIKILINK_RE.captures(trimmed) {
        let whole = caps.get(0)?;
        if whole.start() == 0 && whole.end() == trimmed.len() {
            return parse_link_body(caps.get(1)?.as_str());
        }
        return None;
    }
    if BARE_LINK_RE.is_match(trimmed) {
        return parse_link_body(trimmed);
    }
    None
}

/// Parses the text between `[[` and `]]`.
fn parse_link_body(body: &str) -> Option<LinkDescriptor> {
    let (alias, target) = match body.split_once('|') {
        Some((alias, target)) => (non_empty(alias), target.trim()),
        None => (None, body.trim()),
    };

    let (vault_name, target) = match target.strip_prefix(VAULT_LINK_PREFIX) {
        Some(rest) => {
            let (vault, rest) = rest.split_once('/')?;
            (Some(non_empty(vault)?), rest)
        }
        None => (None, target),
    };

    let (value, anchor_header) = match target.split_once('#') {
        Some((value, anchor)) => (value.trim(), non_empty(anchor)),
        None => (target.trim(), None),
    };

    if value.is_empty() {
        return None;
    }

    Some(LinkDescriptor {
        value: value.to_string(),
        vault_name,
        anchor_header,
        alias,
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// A fixed piece of editor text with an optional cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    /// Byte offset of the cursor inside `text`.
    pub offset: Option<usize>,
}

impl Selection {
    /// A selection whose text is exactly the link.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: None,
        }
    }

    /// A cursor placed at `offset` in a line of text.
    pub fn at_cursor(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset: Some(offset),
        }
    }

    /// Resolves the link this selection refers to.
    ///
    /// With a cursor, that is the wikilink whose brackets enclose the cursor
    /// (bracket positions included). Without one, the whole text is parsed;
    /// failing that, the first wikilink found in it.
    pub fn link(&self) -> Option<LinkDescriptor> {
        match self.offset {
            Some(offset) => WIKILINK_RE
                .captures_iter(&self.text)
                .find(|caps| {
                    caps.get(0)
                        .is_some_and(|m| m.start() <= offset && offset <= m.end())
                })
                .and_then(|caps| parse_link_body(caps.get(1)?.as_str())),
            None => parse_link(&self.text).or_else(|| {
                WIKILINK_RE
                    .captures(&self.text)
                    .and_then(|caps| parse_link_body(caps.get(1)?.as_str()))
            }),
        }
    }
}

#[async_trait]
impl SelectionSource for Selection {
    async fn link(&self) -> Option<LinkDescriptor> {
        Selection::link(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_wikilink() {
        let link = parse_link("[[foo]]").unwrap();
        assert_eq!(link, LinkDescriptor::new("foo"));
    }

    #[test]
    fn test_parse_alias_and_anchor() {
        let link = parse_link("[[My Foo|proj.foo#setup-steps]]").unwrap();
        assert_eq!(link.value, "proj.foo");
        assert_eq!(link.alias.as_deref(), Some("My Foo"));
        assert_eq!(link.anchor_header.as_deref(), Some("setup-steps"));
        assert!(link.vault_name.is_none());
    }

    #[test]
    fn test_parse_vault_qualified() {
        let link = parse_link("[[dendron://work/proj.foo#intro]]").unwrap();
        assert_eq!(link.value, "proj.foo");
        assert_eq!(link.vault_name.as_deref(), Some("work"));
        assert_eq!(link.anchor_header.as_deref(), Some("intro"));
    }

    #[test]
    fn test_parse_block_anchor_keeps_caret() {
        let link = parse_link("[[foo#^abc123]]").unwrap();
        assert_eq!(link.anchor_header.as_deref(), Some("^abc123"));
    }

    #[test]
    fn test_parse_bare_target() {
        let link = parse_link("  proj.foo#intro ").unwrap();
        assert_eq!(link.value, "proj.foo");
        assert_eq!(link.anchor_header.as_deref(), Some("intro"));
    }

    #[test]
    fn test_reject_non_links() {
        assert!(parse_link("").is_none());
        assert!(parse_link("just some words").is_none());
        assert!(parse_link("[[]]").is_none());
        assert!(parse_link("[[#anchor-only]]").is_none());
        assert!(parse_link("[[dendron://]]").is_none());
        assert!(parse_link("[[dendron:///foo]]").is_none());
        assert!(parse_link("see [[foo]] here").is_none());
    }

    #[test]
    fn test_cursor_selects_enclosing_link() {
        let line = "see [[alpha]] and [[beta#b1]] too";
        let on_beta = line.find("beta").unwrap();
        let link = Selection::at_cursor(line, on_beta).link().unwrap();
        assert_eq!(link.value, "beta");
        assert_eq!(link.anchor_header.as_deref(), Some("b1"));

        let on_alpha = line.find("[[alpha").unwrap();
        assert_eq!(
            Selection::at_cursor(line, on_alpha).link().unwrap().value,
            "alpha"
        );
    }

    #[test]
    fn test_cursor_outside_any_link() {
        let line = "see [[alpha]] and more";
        assert!(Selection::at_cursor(line, 0).link().is_none());
        assert!(Selection::at_cursor(line, line.len()).link().is_none());
    }

    #[test]
    fn test_selection_without_cursor_falls_back_to_first_link() {
        let link = Selection::new("see [[alpha]] and [[beta]]").link().unwrap();
        assert_eq!(link.value, "alpha");
    }
}
