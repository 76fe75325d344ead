//! Mapping from platform machine records to tracker row properties.

use serde_json::{Map, Value, json};

use crate::htb::{LifecycleStatus, Machine, Tag};

/// How much of the property schema to emit.
///
/// `Full` is used on row creation and emits every property with documented
/// defaults for absent source fields. `Partial` is used on reconciliation
/// and emits only the fields that are stable across both fetch modes of the
/// platform API; the profile endpoint omits `isTodo`, and creation-only
/// properties (title, OS, write-up state) must not be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyMode {
    Full,
    Partial,
}

/// IP substituted for machines without an assigned address.
const DEFAULT_IP: &str = "0.0.0.0";

/// Owned-flag label for machines the user has not pwned.
const NOT_OWNED: &str = "Nope";
/// Owned-flag label for machines the user has pwned.
const OWNED: &str = "pwned";

fn text_property(content: &str) -> Value {
    json!({ "rich_text": [{ "type": "text", "text": { "content": content } }] })
}

fn owns_property(owned: Option<bool>) -> Value {
    let label = if owned.unwrap_or(false) { OWNED } else { NOT_OWNED };
    json!({ "status": { "name": label } })
}

/// Build the property map for a machine.
///
/// Pure over its inputs and total over any [`Machine`] lacking optional
/// fields: missing counts, points and rating map to 0, a missing IP maps to
/// "0.0.0.0", unset owned-flags map to "Nope", an absent free flag means
/// "Free", and a missing todo flag maps to false.
///
/// `retiring_box` is the name of the machine this one will replace, or the
/// empty string; the reconciliation pass derives it from the unreleased
/// snapshot rather than from `machine.retiring`, which is why it is an
/// explicit argument.
#[must_use]
pub fn map_to_properties(
    machine: &Machine,
    tags: &[Tag],
    status: LifecycleStatus,
    retiring_box: &str,
    mode: PropertyMode,
) -> Map<String, Value> {
    let mut properties = Map::new();

    let tag_values: Vec<Value> = tags
        .iter()
        .map(|tag| json!({ "name": tag.name }))
        .collect();

    properties.insert(
        "Points".to_string(),
        json!({ "number": machine.points.unwrap_or(0) }),
    );
    properties.insert(
        "Release Date".to_string(),
        json!({ "date": { "start": machine.release.to_rfc3339() } }),
    );
    properties.insert(
        "Difficulty".to_string(),
        json!({ "select": { "name": machine.difficulty_text } }),
    );
    properties.insert(
        "Difficulty Rate".to_string(),
        json!({ "number": machine.difficulty }),
    );
    properties.insert(
        "User Owns".to_string(),
        json!({ "number": machine.user_owns_count.unwrap_or(0) }),
    );
    properties.insert(
        "Root Owns".to_string(),
        json!({ "number": machine.root_owns_count.unwrap_or(0) }),
    );
    properties.insert(
        "Rating".to_string(),
        json!({ "number": machine.stars.unwrap_or(0.0) }),
    );
    properties.insert(
        "User".to_string(),
        owns_property(machine.auth_user_in_user_owns),
    );
    properties.insert(
        "Root".to_string(),
        owns_property(machine.auth_user_in_root_owns),
    );
    properties.insert(
        "Status".to_string(),
        json!({ "select": { "name": status.as_str() } }),
    );
    properties.insert(
        "VIP".to_string(),
        json!({ "select": { "name": if machine.free.unwrap_or(true) { "Free" } else { "VIP" } } }),
    );
    properties.insert("Tags".to_string(), json!({ "multi_select": tag_values }));
    properties.insert("Retiring Box".to_string(), text_property(retiring_box));

    if mode == PropertyMode::Full {
        properties.insert("ID".to_string(), json!({ "number": machine.id }));
        properties.insert(
            "Box".to_string(),
            json!({ "title": [{ "text": { "content": machine.name } }] }),
        );
        properties.insert(
            "OS".to_string(),
            json!({ "select": { "name": machine.os } }),
        );
        properties.insert(
            "IP".to_string(),
            text_property(machine.ip.as_deref().unwrap_or(DEFAULT_IP)),
        );
        properties.insert(
            "Write-up".to_string(),
            json!({ "status": { "name": "Not started" } }),
        );
        properties.insert(
            "Blog".to_string(),
            json!({ "status": { "name": "Not started" } }),
        );
        properties.insert(
            "Todo?".to_string(),
            json!({ "checkbox": machine.is_todo.unwrap_or(false) }),
        );
    }

    properties
}

/// Build the single-property patch for a retiring target's `Retiring Date`.
#[must_use]
pub fn retiring_date_patch(release: &chrono::DateTime<chrono::Utc>) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "Retiring Date".to_string(),
        json!({ "date": { "start": release.to_rfc3339() } }),
    );
    properties
}

/// Absolute cover image URL for a machine, if it has an avatar.
#[must_use]
pub fn cover_url(host: &str, machine: &Machine) -> Option<String> {
    machine
        .avatar
        .as_deref()
        .map(|avatar| format!("{host}{avatar}"))
}
