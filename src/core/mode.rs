use crate::core::error::LedgerError;
use crate::core::participant::{GroupId, ParticipantId};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which algorithm produces a group's settlement report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// Minimise transfer count from aggregate balances.
    Simplify,
    /// Keep per-pair provenance from the raw transaction history.
    Itemized,
}

impl SettlementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementMode::Simplify => "simplify",
            SettlementMode::Itemized => "itemized",
        }
    }
}

impl fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplify" | "simplified" | "true" => Ok(SettlementMode::Simplify),
            "itemized" | "itemised" | "false" => Ok(SettlementMode::Itemized),
            _ => Err(LedgerError::UnknownMode(s.to_string())),
        }
    }
}

/// Persisted per-group settlement settings.
///
/// `version` increases on every accepted mode change so that the
/// persistence layer can reject racing toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettings {
    pub group_id: GroupId,
    pub name: String,
    pub mode: SettlementMode,
    #[serde(default)]
    pub version: u64,
}

/// Explicit command to change a group's settlement mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSettlementMode {
    pub group_id: GroupId,
    pub actor: ParticipantId,
    pub mode: SettlementMode,
    /// Version the caller last read; `None` skips the check.
    pub expected_version: Option<u64>,
    pub requested_at: DateTime<Utc>,
}

/// Activity payload describing a mode transition, for an external activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChanged {
    pub group_id: GroupId,
    pub actor: ParticipantId,
    pub previous: SettlementMode,
    pub current: SettlementMode,
    pub name: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl GroupSettings {
    pub fn new(group_id: GroupId, name: impl Into<String>, mode: SettlementMode) -> Self {
        Self {
            group_id,
            name: name.into(),
            mode,
            version: 0,
        }
    }

    /// Apply a mode command.
    ///
    /// Returns `Ok(None)` when the group is already in the requested mode:
    /// nothing changes and nothing is logged.
    pub fn apply(&mut self, command: &SetSettlementMode) -> Result<Option<ModeChanged>, LedgerError> {
        if command.group_id != self.group_id {
            return Err(LedgerError::GroupMismatch {
                settings: self.group_id.clone(),
                command: command.group_id.clone(),
            });
        }
        if let Some(expected) = command.expected_version {
            if expected != self.version {
                return Err(LedgerError::VersionConflict {
                    group: self.group_id.clone(),
                    expected,
                    actual: self.version,
                });
            }
        }
        if command.mode == self.mode {
            return Ok(None);
        }

        let previous = self.mode;
        self.mode = command.mode;
        self.version += 1;

        let verb = match command.mode {
            SettlementMode::Simplify => "simplified",
            SettlementMode::Itemized => "unsimplified",
        };
        let event = ModeChanged {
            group_id: self.group_id.clone(),
            actor: command.actor.clone(),
            previous,
            current: command.mode,
            name: "Group Simplified".to_string(),
            description: format!("Group '{}' debts {}.", self.name, verb),
            occurred_at: command.requested_at,
        };
        info!(
            "group {} settlement mode {} -> {} by {}",
            self.group_id, previous, command.mode, command.actor
        );
        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GroupSettings {
        GroupSettings::new(GroupId::new("G"), "Goa Trip", SettlementMode::Itemized)
    }

    fn command(mode: SettlementMode, expected_version: Option<u64>) -> SetSettlementMode {
        SetSettlementMode {
            group_id: GroupId::new("G"),
            actor: ParticipantId::new("alice"),
            mode,
            expected_version,
            requested_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Simplify".parse::<SettlementMode>().unwrap(), SettlementMode::Simplify);
        assert_eq!("itemized".parse::<SettlementMode>().unwrap(), SettlementMode::Itemized);
        assert!("sometimes".parse::<SettlementMode>().is_err());
    }

    #[test]
    fn test_toggle_emits_event() {
        let mut settings = settings();
        let event = settings
            .apply(&command(SettlementMode::Simplify, Some(0)))
            .unwrap()
            .expect("mode changed");

        assert_eq!(settings.mode, SettlementMode::Simplify);
        assert_eq!(settings.version, 1);
        assert_eq!(event.previous, SettlementMode::Itemized);
        assert_eq!(event.current, SettlementMode::Simplify);
        assert_eq!(event.description, "Group 'Goa Trip' debts simplified.");
    }

    #[test]
    fn test_unsimplify_description() {
        let mut settings = GroupSettings::new(GroupId::new("G"), "Flat", SettlementMode::Simplify);
        let event = settings
            .apply(&command(SettlementMode::Itemized, None))
            .unwrap()
            .unwrap();
        assert_eq!(event.description, "Group 'Flat' debts unsimplified.");
    }

    #[test]
    fn test_same_mode_is_noop() {
        let mut settings = settings();
        let event = settings
            .apply(&command(SettlementMode::Itemized, None))
            .unwrap();
        assert!(event.is_none());
        assert_eq!(settings.version, 0);
    }

    #[test]
    fn test_stale_version_rejected() {
        let mut settings = settings();
        settings
            .apply(&command(SettlementMode::Simplify, Some(0)))
            .unwrap();
        let err = settings
            .apply(&command(SettlementMode::Itemized, Some(0)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::VersionConflict { actual: 1, .. }));
        assert_eq!(settings.mode, SettlementMode::Simplify);
    }

    #[test]
    fn test_wrong_group_rejected() {
        let mut settings = settings();
        let mut cmd = command(SettlementMode::Simplify, None);
        cmd.group_id = GroupId::new("H");
        assert!(matches!(
            settings.apply(&cmd),
            Err(LedgerError::GroupMismatch { .. })
        ));
    }
}
