// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name and asset lookups against configured tables.

use std::collections::BTreeMap;

/// Trim, lowercase, and collapse inner whitespace runs to one space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

/// Responder display name → CMMS user id.
#[derive(Debug, Clone, Default)]
pub(crate) struct UserDirectory {
    by_name: BTreeMap<String, u64>,
}

impl UserDirectory {
    pub(crate) fn new(users: &BTreeMap<String, u64>) -> Self {
        Self { by_name: users.iter().map(|(name, id)| (normalize_name(name), *id)).collect() }
    }

    pub(crate) fn find(&self, responder: &str) -> Option<u64> {
        self.by_name.get(&normalize_name(responder)).copied()
    }
}

/// How an operator's asset selection should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AssetSelection {
    None,
    Id(u64),
    Code(String),
}

impl AssetSelection {
    pub(crate) fn parse(selection: &str) -> Self {
        let selection = selection.trim();
        if selection.is_empty() {
            return AssetSelection::None;
        }
        match selection.parse::<u64>() {
            Ok(id) => AssetSelection::Id(id),
            Err(_) => AssetSelection::Code(selection.to_string()),
        }
    }
}

/// Look up an asset code in the configured table, ignoring case.
pub(crate) fn configured_asset(assets: &BTreeMap<String, u64>, code: &str) -> Option<u64> {
    assets.get(code).copied().or_else(|| {
        assets.iter().find(|(k, _)| k.eq_ignore_ascii_case(code)).map(|(_, id)| *id)
    })
}
