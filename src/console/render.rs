use super::command::HELP_ALIAS;
use crate::constants::{HELP_HINT, PROMPT_SUFFIX, SHORT_ID_LEN};
use crate::node::NodeIdentity;

pub const HELP_HEADING: &str = "Node Command Help";
pub const DECODE_ERROR: &str = "Invalid input: line is not valid UTF-8.";

/// `"<first 9 chars of address> >>> "`.
pub fn prompt_for(identity: &NodeIdentity) -> String {
    let short: String = identity
        .checksum_address
        .chars()
        .take(SHORT_ID_LEN)
        .collect();
    format!("{}{}", short, PROMPT_SUFFIX)
}

pub fn banner_lines(identity: &NodeIdentity, show_hint: bool) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Attached {}@{}",
            identity.checksum_address, identity.rest_url
        ),
        identity.nickname.clone(),
    ];
    if show_hint {
        lines.push(String::new());
        lines.push(HELP_HINT.to_string());
    }
    lines
}

pub fn invalid_input<'a>(names: impl Iterator<Item = &'a str>) -> String {
    format!(
        "Invalid input. Options are: {}",
        names.collect::<Vec<_>>().join(", ")
    )
}

/// Help listing; the `?` alias is skipped so `help` appears once.
pub fn help_lines<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        HELP_HEADING.to_string(),
        "=".repeat(HELP_HEADING.len()),
    ];
    for (name, description) in entries.filter(|(name, _)| *name != HELP_ALIAS) {
        lines.push(String::new());
        lines.push(name.to_string());
        lines.push("-".repeat(name.len()));
        lines.push(description.trim_start().to_string());
    }
    lines
}
