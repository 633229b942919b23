//! Optimistic theme changes.
//!
//! Signed-in users get their pick shown immediately while the profile store
//! persists it; a failure reverts the header to the last committed theme.
//! Signed-out users only ever change the local display context.
//!
//! Every remote write carries a sequence number. Only the most recent write
//! may move the visible state; older ones that succeed still advance the
//! committed base so a later rollback lands on what the server holds.

use serde::{Deserialize, Serialize};

use crate::capabilities::StoreError;
use crate::model::{Profile, Session, UserId};

/// Which way a theme change is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThemePolicy {
    Authenticated { user_id: UserId },
    Anonymous,
}

impl ThemePolicy {
    #[must_use]
    pub fn choose(session: &Session) -> Self {
        match session.user_id() {
            Some(user_id) => Self::Authenticated {
                user_id: user_id.clone(),
            },
            None => Self::Anonymous,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingMutation {
    pub seq: u64,
    pub user_id: UserId,
    pub target: String,
    pub optimistic_snapshot: Profile,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ThemeSync {
    #[default]
    Idle,
    Pending(PendingMutation),
    Committed,
    RolledBack { reason: StoreError },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSyncStatus {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

impl ThemeSync {
    #[must_use]
    pub const fn status(&self) -> ThemeSyncStatus {
        match self {
            Self::Idle => ThemeSyncStatus::Idle,
            Self::Pending(_) => ThemeSyncStatus::Pending,
            Self::Committed => ThemeSyncStatus::Committed,
            Self::RolledBack { .. } => ThemeSyncStatus::RolledBack,
        }
    }
}

/// What a settled remote write did to the model.
#[derive(Clone, Debug, PartialEq)]
pub enum Settlement {
    Committed,
    RolledBack(StoreError),
    /// An older write succeeded after a newer one was issued.
    AdvancedBase,
    Ignored,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeController {
    pub sync: ThemeSync,
    next_seq: u64,
    committed_seq: u64,
}

impl ThemeController {
    /// Start an optimistic change, superseding any pending one.
    pub fn begin(
        &mut self,
        user_id: UserId,
        committed: Option<&Profile>,
        target: impl Into<String>,
    ) -> PendingMutation {
        let target = target.into();
        self.next_seq += 1;

        let optimistic_snapshot = match committed {
            Some(profile) if profile.user_id == user_id => profile.with_theme(target.clone()),
            _ => Profile::new(user_id.clone(), target.clone()),
        };

        if let ThemeSync::Pending(previous) = &self.sync {
            tracing::debug!(
                superseded_seq = previous.seq,
                seq = self.next_seq,
                "theme change superseded"
            );
        }

        let pending = PendingMutation {
            seq: self.next_seq,
            user_id,
            target,
            optimistic_snapshot,
        };
        self.sync = ThemeSync::Pending(pending.clone());
        pending
    }

    /// Apply the outcome of the write numbered `seq`.
    pub fn settle(
        &mut self,
        committed: &mut Option<Profile>,
        user_id: &UserId,
        seq: u64,
        theme: &str,
        result: Result<(), StoreError>,
    ) -> Settlement {
        match std::mem::take(&mut self.sync) {
            ThemeSync::Pending(pending) if pending.seq == seq && &pending.user_id == user_id => {
                return match result {
                    Ok(()) => {
                        commit_theme(committed, user_id, &pending.target);
                        self.committed_seq = seq;
                        self.sync = ThemeSync::Committed;
                        Settlement::Committed
                    }
                    Err(reason) => {
                        self.sync = ThemeSync::RolledBack {
                            reason: reason.clone(),
                        };
                        Settlement::RolledBack(reason)
                    }
                };
            }
            other => self.sync = other,
        }

        if result.is_err() || seq <= self.committed_seq {
            return Settlement::Ignored;
        }

        commit_theme(committed, user_id, theme);
        self.committed_seq = seq;
        Settlement::AdvancedBase
    }

    /// Sequence number of the most recent write issued. Profile reads are
    /// stamped with it so their answers can be ordered against writes.
    #[must_use]
    pub const fn last_issued(&self) -> u64 {
        self.next_seq
    }

    /// Take a profile row read when `as_of` was the last issued write as the
    /// committed base. Columns come from the row; the theme of a write
    /// committed after the read was issued is kept.
    pub fn load(&self, committed: &mut Option<Profile>, loaded: Option<Profile>, as_of: u64) {
        if self.committed_seq <= as_of {
            *committed = loaded;
            return;
        }

        match (loaded, committed.as_mut()) {
            (Some(mut row), Some(current)) => {
                tracing::debug!(
                    as_of,
                    committed_seq = self.committed_seq,
                    "profile read predates committed theme"
                );
                row.theme = std::mem::take(&mut current.theme);
                *current = row;
            }
            (Some(row), None) => *committed = Some(row),
            (None, _) => {}
        }
    }

    /// Pending target if any, otherwise the committed theme.
    #[must_use]
    pub fn visible_theme<'a>(&'a self, committed: Option<&'a Profile>) -> Option<&'a str> {
        match &self.sync {
            ThemeSync::Pending(pending) => Some(pending.target.as_str()),
            _ => committed.map(|p| p.theme.as_str()),
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingMutation> {
        match &self.sync {
            ThemeSync::Pending(pending) => Some(pending),
            _ => None,
        }
    }

    /// Drop all state for the current user. Writes issued before the reset
    /// can no longer move the committed base.
    pub fn reset(&mut self) {
        self.sync = ThemeSync::Idle;
        self.committed_seq = self.next_seq;
    }
}

/// Set the committed theme, keeping every other loaded column.
fn commit_theme(committed: &mut Option<Profile>, user_id: &UserId, theme: &str) {
    if let Some(profile) = committed.as_mut().filter(|p| &p.user_id == user_id) {
        theme.clone_into(&mut profile.theme);
    } else {
        *committed = Some(Profile::new(user_id.clone(), theme));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionUser;

    fn u1() -> UserId {
        UserId::new("u1")
    }

    fn store_down() -> StoreError {
        StoreError::Transport {
            message: "connection reset".into(),
        }
    }

    #[test]
    fn policy_follows_session_presence() {
        assert_eq!(ThemePolicy::choose(&Session::absent()), ThemePolicy::Anonymous);
        assert_eq!(
            ThemePolicy::choose(&Session::signed_in(SessionUser::new("u1"))),
            ThemePolicy::Authenticated { user_id: u1() }
        );
    }

    #[test]
    fn pending_target_is_visible_before_settlement() {
        let committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();

        let pending = controller.begin(u1(), committed.as_ref(), "dark");
        assert_eq!(pending.seq, 1);
        assert_eq!(pending.optimistic_snapshot.theme, "dark");

        assert_eq!(controller.visible_theme(committed.as_ref()), Some("dark"));
        assert_eq!(controller.sync.status(), ThemeSyncStatus::Pending);
    }

    #[test]
    fn success_commits_target() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");

        let outcome = controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));

        assert_eq!(outcome, Settlement::Committed);
        assert_eq!(controller.sync, ThemeSync::Committed);
        assert_eq!(committed.as_ref().map(|p| p.theme.as_str()), Some("dark"));
        assert_eq!(controller.visible_theme(committed.as_ref()), Some("dark"));
    }

    #[test]
    fn failure_reverts_to_committed_theme() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");

        let outcome = controller.settle(&mut committed, &u1(), 1, "dark", Err(store_down()));

        assert_eq!(outcome, Settlement::RolledBack(store_down()));
        assert_eq!(controller.sync.status(), ThemeSyncStatus::RolledBack);
        assert_eq!(controller.visible_theme(committed.as_ref()), Some("light"));
    }

    #[test]
    fn stale_failure_does_not_touch_newer_pick() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");
        controller.begin(u1(), committed.as_ref(), "cupcake");

        let outcome = controller.settle(&mut committed, &u1(), 1, "dark", Err(store_down()));

        assert_eq!(outcome, Settlement::Ignored);
        assert_eq!(controller.visible_theme(committed.as_ref()), Some("cupcake"));
    }

    #[test]
    fn stale_success_moves_rollback_target() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");
        controller.begin(u1(), committed.as_ref(), "cupcake");

        let stale = controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));
        assert_eq!(stale, Settlement::AdvancedBase);
        assert_eq!(controller.visible_theme(committed.as_ref()), Some("cupcake"));

        controller.settle(&mut committed, &u1(), 2, "cupcake", Err(store_down()));
        assert_eq!(controller.visible_theme(committed.as_ref()), Some("dark"));
    }

    #[test]
    fn late_older_success_cannot_override_newer_commit() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");
        controller.begin(u1(), committed.as_ref(), "cupcake");

        controller.settle(&mut committed, &u1(), 2, "cupcake", Ok(()));
        let late = controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));

        assert_eq!(late, Settlement::Ignored);
        assert_eq!(committed.as_ref().map(|p| p.theme.as_str()), Some("cupcake"));
    }

    #[test]
    fn reset_discards_in_flight_writes() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");
        controller.reset();

        assert!(controller.pending().is_none());
        let outcome = controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));
        assert_eq!(outcome, Settlement::Ignored);
        assert_eq!(committed.as_ref().map(|p| p.theme.as_str()), Some("light"));
    }

    #[test]
    fn snapshot_without_loaded_profile_starts_fresh() {
        let mut controller = ThemeController::default();
        let pending = controller.begin(u1(), None, "dark");
        assert_eq!(pending.optimistic_snapshot, Profile::new(u1(), "dark"));
    }

    fn loaded_row(theme: &str) -> Profile {
        let mut row = Profile::new(u1(), theme);
        row.extra
            .insert("username".into(), serde_json::json!("pin_fan"));
        row
    }

    #[test]
    fn commit_keeps_columns_loaded_while_pending() {
        let mut committed = None;
        let mut controller = ThemeController::default();
        let as_of = controller.last_issued();
        controller.begin(u1(), committed.as_ref(), "dark");

        controller.load(&mut committed, Some(loaded_row("light")), as_of);
        assert_eq!(controller.visible_theme(committed.as_ref()), Some("dark"));

        let outcome = controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));

        assert_eq!(outcome, Settlement::Committed);
        let profile = committed.expect("profile committed");
        assert_eq!(profile.theme, "dark");
        assert_eq!(profile.extra.get("username"), Some(&serde_json::json!("pin_fan")));
    }

    #[test]
    fn read_issued_before_commit_keeps_committed_theme() {
        let mut committed = None;
        let mut controller = ThemeController::default();
        let as_of = controller.last_issued();
        controller.begin(u1(), committed.as_ref(), "dark");
        controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));

        controller.load(&mut committed, Some(loaded_row("light")), as_of);

        let profile = committed.expect("profile committed");
        assert_eq!(profile.theme, "dark");
        assert_eq!(profile.extra.get("username"), Some(&serde_json::json!("pin_fan")));
    }

    #[test]
    fn read_issued_after_commit_replaces_profile() {
        let mut committed = Some(Profile::new(u1(), "light"));
        let mut controller = ThemeController::default();
        controller.begin(u1(), committed.as_ref(), "dark");
        controller.settle(&mut committed, &u1(), 1, "dark", Ok(()));

        let as_of = controller.last_issued();
        controller.load(&mut committed, Some(loaded_row("forest")), as_of);

        assert_eq!(committed.map(|p| p.theme), Some("forest".to_string()));
    }
}
