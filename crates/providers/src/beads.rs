// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bead store contract (§4.2): query beads by label, cook molecules from
//! formulas, and add labels. The underlying bead/issue-tracker daemon is
//! an external collaborator (spec.md §1) — `Native` shells to a
//! configurable bead-CLI binary via the exec wire contract.

use async_trait::async_trait;
use gc_core::{Bead, BeadId, GcError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default container bead kinds (§9 Open Question: `IsContainerType` is a
/// predicate supplied by the store, not hard-coded into the sling router).
pub const DEFAULT_CONTAINER_KINDS: &[&str] = &["convoy", "epic"];

#[async_trait]
pub trait BeadStore: Send + Sync {
    async fn get(&self, id: &BeadId) -> Result<Bead>;
    async fn children(&self, parent_id: &BeadId) -> Result<Vec<Bead>>;

    /// Ordered by `created_at` descending; `limit == 0` means unbounded
    /// (§4.2).
    async fn list_by_label(&self, label: &str, limit: usize) -> Result<Vec<Bead>>;

    /// Creates a molecule and returns its root bead id (§4.2). An empty
    /// returned id string is mapped to `ProviderFailure` by implementors so
    /// callers never have to special-case it (spec.md's "empty string =
    /// failure" becomes a typed error at this layer).
    async fn mol_cook(
        &self,
        formula: &str,
        title: Option<&str>,
        vars: &[(String, String)],
    ) -> Result<BeadId>;

    /// Idempotent label additions (§4.2).
    async fn update(&self, id: &BeadId, label_adds: &[String]) -> Result<()>;

    /// Whether `kind` is a container bead type whose children sling
    /// batches over (§4.9, §9).
    fn is_container_type(&self, kind: &str) -> bool {
        DEFAULT_CONTAINER_KINDS.contains(&kind)
    }
}

/// Native bead store: shells a configurable bead-CLI binary.
#[derive(Clone)]
pub struct NativeBeadStore {
    bin: PathBuf,
    cwd: PathBuf,
    timeout: Duration,
}

impl NativeBeadStore {
    pub fn new(bin: impl Into<PathBuf>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            cwd: cwd.into(),
            timeout,
        }
    }

    async fn call(&self, subcommand: &str, args: &[String]) -> Result<String> {
        crate::exec::run_exec_op(
            "beads",
            &self.bin,
            subcommand,
            args,
            &self.cwd,
            &[],
            self.timeout,
        )
        .await
    }
}

#[async_trait]
impl BeadStore for NativeBeadStore {
    async fn get(&self, id: &BeadId) -> Result<Bead> {
        let out = self.call("get", &[id.as_str().to_string()]).await?;
        serde_json::from_str(&out)
            .map_err(|e| GcError::ProviderFailure(format!("parsing bead {}: {}", id, e)))
    }

    async fn children(&self, parent_id: &BeadId) -> Result<Vec<Bead>> {
        let out = self
            .call("children", &[parent_id.as_str().to_string()])
            .await?;
        serde_json::from_str(&out).map_err(|e| {
            GcError::ProviderFailure(format!("parsing children of {}: {}", parent_id, e))
        })
    }

    async fn list_by_label(&self, label: &str, limit: usize) -> Result<Vec<Bead>> {
        let out = self
            .call("list-by-label", &[label.to_string(), limit.to_string()])
            .await?;
        serde_json::from_str(&out)
            .map_err(|e| GcError::ProviderFailure(format!("parsing bead list: {}", e)))
    }

    async fn mol_cook(
        &self,
        formula: &str,
        title: Option<&str>,
        vars: &[(String, String)],
    ) -> Result<BeadId> {
        let mut args = vec![formula.to_string()];
        if let Some(t) = title {
            args.push(format!("--title={}", t));
        }
        for (k, v) in vars {
            args.push(format!("--var={}={}", k, v));
        }
        let out = self.call("mol-cook", &args).await?;
        if out.is_empty() {
            return Err(GcError::ProviderFailure(format!(
                "mol-cook {}: empty root id",
                formula
            )));
        }
        Ok(BeadId::new(out))
    }

    async fn update(&self, id: &BeadId, label_adds: &[String]) -> Result<()> {
        let mut args = vec![id.as_str().to_string()];
        args.extend(label_adds.iter().cloned());
        self.call("update", &args).await.map(|_| ())
    }
}

#[derive(Default)]
struct FakeBeadState {
    beads: HashMap<BeadId, Bead>,
    children: HashMap<BeadId, Vec<BeadId>>,
    next_id: u64,
    cook_calls: Vec<(String, Option<String>, Vec<(String, String)>)>,
}

/// In-memory bead store (§4.1): used pervasively in dispatcher/sling
/// tests.
#[derive(Clone, Default)]
pub struct FakeBeadStore {
    inner: Arc<Mutex<FakeBeadState>>,
}

impl FakeBeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a bead directly (bypassing `mol_cook`), for test fixtures.
    pub fn insert(&self, bead: Bead) {
        self.inner.lock().beads.insert(bead.id.clone(), bead);
    }

    /// Register `child` as a child of `parent` for `children()`.
    pub fn add_child(&self, parent: &BeadId, child: Bead) {
        let mut inner = self.inner.lock();
        inner.children.entry(parent.clone()).or_default().push(child.id.clone());
        inner.beads.insert(child.id.clone(), child);
    }

    pub fn cook_calls(&self) -> Vec<(String, Option<String>, Vec<(String, String)>)> {
        self.inner.lock().cook_calls.clone()
    }

    pub fn labels_of(&self, id: &BeadId) -> Vec<String> {
        self.inner
            .lock()
            .beads
            .get(id)
            .map(|b| b.labels.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BeadStore for FakeBeadStore {
    async fn get(&self, id: &BeadId) -> Result<Bead> {
        self.inner
            .lock()
            .beads
            .get(id)
            .cloned()
            .ok_or_else(|| GcError::NotFound(format!("bead {}", id)))
    }

    async fn children(&self, parent_id: &BeadId) -> Result<Vec<Bead>> {
        let inner = self.inner.lock();
        Ok(inner
            .children
            .get(parent_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.beads.get(id).cloned())
            .collect())
    }

    async fn list_by_label(&self, label: &str, limit: usize) -> Result<Vec<Bead>> {
        let inner = self.inner.lock();
        let mut matches: Vec<Bead> = inner
            .beads
            .values()
            .filter(|b| b.has_label(label))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if limit > 0 {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    async fn mol_cook(
        &self,
        formula: &str,
        title: Option<&str>,
        vars: &[(String, String)],
    ) -> Result<BeadId> {
        let mut inner = self.inner.lock();
        inner
            .cook_calls
            .push((formula.to_string(), title.map(String::from), vars.to_vec()));
        inner.next_id += 1;
        let id = BeadId::new(format!("wisp-{}", inner.next_id));
        let bead = Bead {
            id: id.clone(),
            title: title.map(String::from).unwrap_or_else(|| formula.to_string()),
            status: "open".to_string(),
            kind: "task".to_string(),
            assignee: None,
            labels: Vec::new(),
            created_at: chrono::Utc::now(),
        };
        inner.beads.insert(id.clone(), bead);
        Ok(id)
    }

    async fn update(&self, id: &BeadId, label_adds: &[String]) -> Result<()> {
        let mut inner = self.inner.lock();
        let bead = inner
            .beads
            .get_mut(id)
            .ok_or_else(|| GcError::NotFound(format!("bead {}", id)))?;
        for label in label_adds {
            bead.add_label(label.clone());
        }
        Ok(())
    }
}

/// In-memory test double: every operation fails (§4.1).
#[derive(Clone, Copy, Default)]
pub struct FailBeadStore;

#[async_trait]
impl BeadStore for FailBeadStore {
    async fn get(&self, _id: &BeadId) -> Result<Bead> {
        Err(fail())
    }
    async fn children(&self, _parent_id: &BeadId) -> Result<Vec<Bead>> {
        Err(fail())
    }
    async fn list_by_label(&self, _label: &str, _limit: usize) -> Result<Vec<Bead>> {
        Err(fail())
    }
    async fn mol_cook(
        &self,
        _formula: &str,
        _title: Option<&str>,
        _vars: &[(String, String)],
    ) -> Result<BeadId> {
        Err(fail())
    }
    async fn update(&self, _id: &BeadId, _label_adds: &[String]) -> Result<()> {
        Err(fail())
    }
}

fn fail() -> GcError {
    GcError::ProviderFailure("fail provider: bead store operation always fails".to_string())
}

/// Exec-backed bead store (§4.1/§6).
#[derive(Clone)]
pub struct ExecBeadStore {
    script: PathBuf,
    cwd: PathBuf,
    timeout: Duration,
}

impl ExecBeadStore {
    pub fn new(script: impl Into<PathBuf>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            script: script.into(),
            cwd: cwd.into(),
            timeout,
        }
    }

    async fn call(&self, subcommand: &str, args: &[String]) -> Result<String> {
        crate::exec::run_exec_op(
            "beads",
            &self.script,
            subcommand,
            args,
            &self.cwd,
            &[],
            self.timeout,
        )
        .await
    }
}

#[async_trait]
impl BeadStore for ExecBeadStore {
    async fn get(&self, id: &BeadId) -> Result<Bead> {
        let out = self.call("get", &[id.as_str().to_string()]).await?;
        serde_json::from_str(&out)
            .map_err(|e| GcError::ProviderFailure(format!("parsing bead {}: {}", id, e)))
    }

    async fn children(&self, parent_id: &BeadId) -> Result<Vec<Bead>> {
        let out = self
            .call("children", &[parent_id.as_str().to_string()])
            .await?;
        serde_json::from_str(&out).map_err(|e| {
            GcError::ProviderFailure(format!("parsing children of {}: {}", parent_id, e))
        })
    }

    async fn list_by_label(&self, label: &str, limit: usize) -> Result<Vec<Bead>> {
        let out = self
            .call("list-by-label", &[label.to_string(), limit.to_string()])
            .await?;
        serde_json::from_str(&out)
            .map_err(|e| GcError::ProviderFailure(format!("parsing bead list: {}", e)))
    }

    async fn mol_cook(
        &self,
        formula: &str,
        title: Option<&str>,
        vars: &[(String, String)],
    ) -> Result<BeadId> {
        let mut args = vec![formula.to_string()];
        if let Some(t) = title {
            args.push(format!("--title={}", t));
        }
        for (k, v) in vars {
            args.push(format!("--var={}={}", k, v));
        }
        let out = self.call("mol-cook", &args).await?;
        if out.is_empty() {
            return Err(GcError::ProviderFailure(format!(
                "mol-cook {}: empty root id",
                formula
            )));
        }
        Ok(BeadId::new(out))
    }

    async fn update(&self, id: &BeadId, label_adds: &[String]) -> Result<()> {
        let mut args = vec![id.as_str().to_string()];
        args.extend(label_adds.iter().cloned());
        self.call("update", &args).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "beads_tests.rs"]
mod tests;
