// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template substitution for sling-query templates (§4.9) and molecule
//! variable interpolation.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex pattern for `${name}` placeholders.
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Substitute every literal `{}` token in a sling-query template with
/// `bead_id` (§4.9 step 4). A template with no `{}` token is returned
/// unchanged — the query is run as-is.
pub fn substitute_bead_id(query_template: &str, bead_id: &str) -> String {
    query_template.replace("{}", bead_id)
}

/// Interpolate `${name}` placeholders with values from `vars`. Unknown
/// variables are left as-is, the way `MolCook`'s template variables are
/// substituted.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(val) => val.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
