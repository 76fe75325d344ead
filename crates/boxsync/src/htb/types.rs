//! Challenge-platform API data types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifecycle category of a machine on the platform.
///
/// Each category maps to a distinct list endpoint. This is the *requested*
/// category; the derived per-record status is [`LifecycleStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineCategory {
    Active,
    Unreleased,
    Retired,
}

impl MachineCategory {
    /// API path of the list endpoint for this category.
    #[must_use]
    pub fn list_path(self) -> &'static str {
        match self {
            MachineCategory::Active => "/api/v4/machine/list",
            MachineCategory::Unreleased => "/api/v4/machine/unreleased",
            MachineCategory::Retired => "/api/v4/machine/list/retired",
        }
    }

    /// Human-readable label for progress output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MachineCategory::Active => "active",
            MachineCategory::Unreleased => "unreleased",
            MachineCategory::Retired => "retired",
        }
    }
}

/// Derived lifecycle status of a machine.
///
/// Not stored authoritatively by the platform: a machine is `Unreleased` if
/// it appears in the current unreleased snapshot, otherwise `Retired` when
/// its retired flag is set, else `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStatus {
    Unreleased,
    Active,
    Retired,
}

impl LifecycleStatus {
    /// The value written to the tracker's `Status` select property.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleStatus::Unreleased => "Unreleased",
            LifecycleStatus::Active => "Active",
            LifecycleStatus::Retired => "Retired",
        }
    }
}

impl From<MachineCategory> for LifecycleStatus {
    fn from(category: MachineCategory) -> Self {
        match category {
            MachineCategory::Active => LifecycleStatus::Active,
            MachineCategory::Unreleased => LifecycleStatus::Unreleased,
            MachineCategory::Retired => LifecycleStatus::Retired,
        }
    }
}

/// Reference to the active machine an unreleased machine will replace.
#[derive(Debug, Clone, Deserialize)]
pub struct RetiringRef {
    /// Machine ID of the box being retired.
    pub id: u64,
    /// Machine name of the box being retired.
    pub name: String,
}

/// A machine record as returned by the platform.
///
/// The list endpoints and the single-machine profile endpoint return
/// different subsets of these fields, hence the number of `Option`s:
/// `is_todo` only appears in list views, `retired` only on the profile
/// fetch, and the difficulty label is spelled `difficultyText` in lists but
/// `difficulty_text` on the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Machine {
    /// Platform-assigned machine ID, unique across all categories.
    pub id: u64,
    /// Machine name.
    pub name: String,
    /// Operating system tag (e.g. "Linux", "Windows").
    pub os: String,
    /// Point value. Absent on some list views.
    #[serde(default)]
    pub points: Option<i64>,
    /// Release timestamp.
    pub release: DateTime<Utc>,
    /// Difficulty label: Easy, Medium, Hard, Insane.
    #[serde(alias = "difficultyText")]
    pub difficulty_text: String,
    /// Numeric difficulty rating.
    pub difficulty: i64,
    /// Number of user owns across the platform.
    #[serde(default)]
    pub user_owns_count: Option<i64>,
    /// Number of root owns across the platform.
    #[serde(default)]
    pub root_owns_count: Option<i64>,
    /// Community rating.
    #[serde(default)]
    pub stars: Option<f64>,
    /// Assigned IP, if the machine is live.
    #[serde(default)]
    pub ip: Option<String>,
    /// Whether the authenticated user owned user on this machine.
    #[serde(default, rename = "authUserInUserOwns")]
    pub auth_user_in_user_owns: Option<bool>,
    /// Whether the authenticated user owned root on this machine.
    #[serde(default, rename = "authUserInRootOwns")]
    pub auth_user_in_root_owns: Option<bool>,
    /// Free-tier flag. Absent means free.
    #[serde(default)]
    pub free: Option<bool>,
    /// Todo-list flag. Only present in list views, never on profile fetches.
    #[serde(default, rename = "isTodo")]
    pub is_todo: Option<bool>,
    /// For unreleased machines, the active machine this one will replace.
    #[serde(default)]
    pub retiring: Option<RetiringRef>,
    /// Retired flag. Present on profile fetches, absent from the unreleased
    /// list.
    #[serde(default)]
    pub retired: Option<bool>,
    /// Avatar image path, relative to the platform host.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A machine tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
}

impl Tag {
    /// The sentinel tag substituted when the platform denies access to the
    /// tag endpoint. It must propagate visibly rather than being dropped.
    pub const UNAUTHORIZED: &'static str = "Unauthorized";

    /// Build the single-element sentinel tag set.
    #[must_use]
    pub fn unauthorized_set() -> Vec<Tag> {
        vec![Tag {
            name: Self::UNAUTHORIZED.to_string(),
        }]
    }
}

/// Envelope for the active/retired list endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct MachineListEnvelope {
    pub info: Vec<Machine>,
}

/// Envelope for the unreleased list endpoint, which uses a different key.
#[derive(Debug, Deserialize)]
pub(crate) struct UnreleasedListEnvelope {
    pub data: Vec<Machine>,
}

/// Envelope for the single-machine profile endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MachineProfileEnvelope {
    pub info: Machine,
}

/// Envelope for the tag endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TagListEnvelope {
    pub info: Vec<Tag>,
}
