// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoping helpers for `(dir, name)` identities, trigger scoped names, and
//! pool qualification.

/// Build a `dir`-scoped key from `dir` and `name`.
///
/// When `dir` is empty, returns the bare `name`. Otherwise returns
/// `"{dir}/{name}"`. This is the `QualifiedName` of an agent (§3).
pub fn scoped_name(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Parse a `dir`-scoped key into `(dir, name)`, splitting on the last `/`.
///
/// Returns `("", key)` when no slash is present.
pub fn split_scoped_name(scoped: &str) -> (&str, &str) {
    match scoped.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", scoped),
    }
}

/// Build a trigger's `ScopedName()` (§3): `name` if `rig` is empty, else
/// `"{name}:rig:{rig}"`.
///
/// Uses a separator distinct from [`scoped_name`] so the two notions never
/// collide in a bead label, and so the mapping stays injective over
/// `(name, rig)` pairs (§8).
pub fn scoped_trigger_name(name: &str, rig: &str) -> String {
    if rig.is_empty() {
        name.to_string()
    } else {
        format!("{}:rig:{}", name, rig)
    }
}

/// Qualify a pool name for rig scope (§4.7/§8).
///
/// Returns `pool` unchanged if it already contains `/` or `rig` is empty;
/// otherwise returns `"{rig}/{pool}"`. Idempotent.
pub fn qualify_pool(pool: &str, rig: &str) -> String {
    if rig.is_empty() || pool.contains('/') {
        pool.to_string()
    } else {
        format!("{}/{}", rig, pool)
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
