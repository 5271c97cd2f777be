// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity resolver (§4.4): two-step resolution (literal, then
//! rig-contextual) for agents and triggers, generalized over pool
//! instance suffixes for agents.

use gc_core::{split_scoped_name, Agent, Rig, Trigger};
use std::path::Path;

/// An agent resolved by [`resolve_agent`], possibly as one instance of a
/// pool (§3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAgent<'a> {
    pub agent: &'a Agent,
    /// `Some(k)` when `input` matched the pool-instance suffix `name-k`.
    pub instance: Option<u32>,
}

impl<'a> ResolvedAgent<'a> {
    /// The single-instance qualified name this resolution represents:
    /// `dir/name-k` (or `name-k`) for a pool instance, else the agent's
    /// own `qualified_name()`.
    pub fn instance_qualified_name(&self) -> String {
        match self.instance {
            Some(k) => {
                let instance_name = format!("{}-{}", self.agent.name, k);
                gc_core::scoped_name(&self.agent.dir, &instance_name)
            }
            None => self.agent.qualified_name(),
        }
    }
}

/// Split a pool-instance name `"name-k"` into `(base, k)`, if `name` ends
/// in a `-<integer>` suffix.
fn split_pool_suffix(name: &str) -> Option<(&str, u32)> {
    let (base, suffix) = name.rsplit_once('-')?;
    if base.is_empty() {
        return None;
    }
    let k: u32 = suffix.parse().ok()?;
    Some((base, k))
}

fn find_agent<'a>(agents: &'a [Agent], dir: &str, name: &str) -> Option<ResolvedAgent<'a>> {
    if let Some(agent) = agents.iter().find(|a| a.dir == dir && a.name == name) {
        return Some(ResolvedAgent {
            agent,
            instance: None,
        });
    }
    let (base, k) = split_pool_suffix(name)?;
    let agent = agents.iter().find(|a| a.dir == dir && a.name == base)?;
    let pool = agent.pool?;
    if !pool.contains_instance(k) {
        return None;
    }
    Some(ResolvedAgent {
        agent,
        instance: Some(k),
    })
}

/// Resolve a user-supplied agent name `input` (bare or `dir/name`
/// qualified) against the registered agent set (§4.4).
///
/// 1. Split `input` into `(dir, name)` on the last `/`.
/// 2. Try a literal match against `(dir, name)` (bare names land here with
///    `dir == ""`, i.e. city-level, which is why city-level always wins
///    over rig context for bare names — §4.4).
/// 3. If `input` had no `/` and `rig_ctx` is `Some`, retry with
///    `(rig_ctx, name)`.
///
/// A pool agent of size `M` additionally matches `name-k` for
/// `k in [1, M]`, returning the synthetic single-instance resolution.
pub fn resolve_agent<'a>(
    agents: &'a [Agent],
    input: &str,
    rig_ctx: Option<&str>,
) -> Option<ResolvedAgent<'a>> {
    let (dir, name) = split_scoped_name(input);
    if let Some(resolved) = find_agent(agents, dir, name) {
        return Some(resolved);
    }
    if dir.is_empty() {
        if let Some(rig) = rig_ctx {
            return find_agent(agents, rig, name);
        }
    }
    None
}

/// Resolve a user-supplied trigger name against the scanned trigger set,
/// using the same two-step algorithm, scoped by `rig` instead of `dir`
/// (§4.4).
pub fn resolve_trigger<'a>(
    triggers: &'a [Trigger],
    input: &str,
    rig_ctx: Option<&str>,
) -> Option<&'a Trigger> {
    let (dir, name) = split_scoped_name(input);
    if let Some(t) = triggers.iter().find(|t| t.rig == dir && t.name == name) {
        return Some(t);
    }
    if dir.is_empty() {
        if let Some(rig) = rig_ctx {
            return triggers.iter().find(|t| t.rig == rig && t.name == name);
        }
    }
    None
}

/// Determine the active rig context (§4.4): `GC_DIR`'s value mapped to a
/// rig by exact cleaned-path comparison, else the nearest rig whose path
/// encloses `cwd`.
pub fn resolve_rig_context<'a>(
    rigs: &'a [Rig],
    gc_dir: Option<&str>,
    cwd: &Path,
) -> Option<&'a Rig> {
    if let Some(dir) = gc_dir {
        let candidate = Path::new(dir);
        if let Some(rig) = rigs.iter().find(|r| r.matches_path(candidate)) {
            return Some(rig);
        }
    }
    let absolute_cwd = std::path::absolute(cwd).unwrap_or_else(|_| cwd.to_path_buf());
    for ancestor in absolute_cwd.ancestors() {
        if let Some(rig) = rigs.iter().find(|r| r.matches_path(ancestor)) {
            return Some(rig);
        }
    }
    None
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
