//! Parser and writer for `trix/progress.trix` — per-user completion facts.
//!
//! ```text
//! [user: frederik]
//! roundoff
//! bhs
//! ```
//!
//! One id per line under a `[user: ...]` header. The file is rewritten
//! wholesale on every persisted toggle; user order and id order within a
//! user are preserved so diffs stay readable.

use anyhow::{Result, bail};

use crate::engine::model::TrickId;

/// Completion facts for every user, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub users: Vec<UserProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProgress {
    pub user_id: String,
    pub completed: Vec<TrickId>,
}

impl Progress {
    pub fn completed_for(&self, user_id: &str) -> Vec<TrickId> {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.completed.clone())
            .unwrap_or_default()
    }

    /// Record `trick_id` as completed (`value = true`) or not for `user_id`,
    /// creating the user entry on first write. Idempotent.
    pub fn set_completed(&mut self, user_id: &str, trick_id: &str, value: bool) {
        let user = match self.users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => user,
            None => {
                self.users.push(UserProgress {
                    user_id: user_id.to_string(),
                    completed: Vec::new(),
                });
                self.users.last_mut().unwrap()
            }
        };
        if value {
            if !user.completed.iter().any(|id| id == trick_id) {
                user.completed.push(trick_id.to_string());
            }
        } else {
            user.completed.retain(|id| id != trick_id);
        }
    }
}

pub fn parse(input: &str) -> Result<Progress> {
    let mut progress = Progress::default();

    for (line_num, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(inner) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let Some(user_id) = inner.trim().strip_prefix("user:") else {
                bail!("expected `[user: <id>]` at line {}", line_num + 1);
            };
            let user_id = user_id.trim();
            if user_id.is_empty() {
                bail!("empty user id at line {}", line_num + 1);
            }
            if progress.users.iter().any(|u| u.user_id == user_id) {
                bail!("duplicate user \"{}\" at line {}", user_id, line_num + 1);
            }
            progress.users.push(UserProgress {
                user_id: user_id.to_string(),
                completed: Vec::new(),
            });
            continue;
        }

        let Some(user) = progress.users.last_mut() else {
            bail!("trick id before any [user: ...] header at line {}", line_num + 1);
        };
        if !user.completed.iter().any(|id| id == line) {
            user.completed.push(line.to_string());
        }
    }

    Ok(progress)
}

pub fn serialize(progress: &Progress) -> String {
    let mut out = String::new();
    for (i, user) in progress.users.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[user: {}]\n", user.user_id));
        for id in &user.completed {
            out.push_str(id);
            out.push('\n');
        }
    }
    out
}
