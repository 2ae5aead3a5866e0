// Archive loading and target chat selection.
//
// A full-account export wraps every conversation as `{"chats": {"list": [...]}}`,
// while a single-chat export is just the chat object itself. Both shapes are
// accepted and normalized to a list of chats.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use super::models::Chat;

/// Read and parse an export file.
pub fn load_chats(path: &Path) -> Result<Vec<Chat>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let chats =
        parse_chats(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;

    info!(
        path = %path.display(),
        chats = chats.len(),
        "Loaded chat export"
    );
    Ok(chats)
}

/// Parse export JSON already in memory.
pub fn parse_chats(json: &str) -> Result<Vec<Chat>> {
    let document: Value = serde_json::from_str(json).context("Export is not valid JSON")?;

    if let Some(chats) = document.get("chats") {
        let list = chats
            .get("list")
            .context("Export has a \"chats\" section but no \"chats.list\"")?;
        return serde_json::from_value(list.clone())
            .context("\"chats.list\" is not a list of chats");
    }

    let chat: Chat = serde_json::from_value(document)
        .context("Export is neither a chat list nor a single chat")?;
    Ok(vec![chat])
}

/// Find the first chat with exactly this name (case-sensitive).
pub fn find_chat_by_name<'a>(name: &str, chats: &'a [Chat]) -> Option<&'a Chat> {
    chats.iter().find(|c| c.name == name)
}

/// Pick the chat to analyze and return it with every other chat.
///
/// With no name, the archive must contain exactly one chat. Duplicate names
/// resolve to the first match. Chats identical to the target are left out
/// of the comparison corpus; same-named chats with different content stay.
pub fn select_chat<'a>(
    chats: &'a [Chat],
    name: Option<&str>,
) -> Result<(&'a Chat, Vec<&'a Chat>)> {
    let target = match (name, chats) {
        (_, []) => anyhow::bail!("No chats found in file"),
        (Some(name), _) => find_chat_by_name(name, chats)
            .with_context(|| format!("Chat '{name}' not found"))?,
        (None, [only]) => only,
        (None, _) => anyhow::bail!("Multiple chats found - please specify chat name"),
    };

    let others = chats.iter().filter(|c| *c != target).collect();
    Ok((target, others))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_export() {
        let json = r#"{"chats": {"list": [
            {"name": "Alice", "messages": []},
            {"name": "Bob", "messages": [{"type": "message", "text": "hi"}]}
        ]}}"#;
        let chats = parse_chats(json).unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[1].messages.len(), 1);
    }

    #[test]
    fn test_parse_single_chat_export() {
        let json = r#"{"name": "Alice", "type": "personal_chat", "messages": []}"#;
        let chats = parse_chats(json).unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].name, "Alice");
    }

    #[test]
    fn test_parse_rejects_bad_structure() {
        assert!(parse_chats("not json").is_err());
        assert!(parse_chats(r#"{"chats": {}}"#).is_err());
        assert!(parse_chats(r#"{"name": "no messages"}"#).is_err());
    }

    #[test]
    fn test_select_drops_identical_copies_of_target() {
        let json = r#"{"chats": {"list": [
            {"name": "X", "messages": [{"type": "message", "text": "a b"}]},
            {"name": "X", "messages": [{"type": "message", "text": "a b"}]},
            {"name": "Y", "messages": []}
        ]}}"#;
        let chats = parse_chats(json).unwrap();
        let (target, others) = select_chat(&chats, Some("X")).unwrap();
        assert!(std::ptr::eq(target, &chats[0]));
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name, "Y");
    }
}
