// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fiix CMMS client.
//!
//! All calls POST a JSON command (`_maCn` = Add/Change/FindRequest) to one
//! signed endpoint. A response carrying an `error` member is a failure
//! whatever its HTTP status.

use super::lookup::{configured_asset, AssetSelection, UserDirectory};
use super::sign::sign_url;
use super::{CmmsAdapter, CmmsError, WorkOrderRequest};
use andon_core::{Priority, WorkOrderLink};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_MS: u64 = 8_000;
const CLIENT_VERSION: (u32, u32, u32) = (2, 8, 1);

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// External priority ids, keyed the way operators see them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PriorityCodes {
    #[serde(rename = "Low", default)]
    pub low: Option<u64>,
    #[serde(rename = "Medium", default)]
    pub medium: Option<u64>,
    #[serde(rename = "High", default)]
    pub high: Option<u64>,
}

impl PriorityCodes {
    pub fn code(&self, priority: Priority) -> Option<u64> {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }
}

/// The `[cmms]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FiixConfig {
    /// Tenant subdomain; the API lives at `https://<tenant>.macmms.com`
    /// unless `base_url` says otherwise.
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub app_key: String,
    pub access_key: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub site_id: Option<u64>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub priorities: PriorityCodes,
    #[serde(default)]
    pub completed_status_id: Option<u64>,
    #[serde(default)]
    pub cancelled_status_id: Option<u64>,
    #[serde(default)]
    pub maintenance_type_id: Option<u64>,
    /// Asset code → asset id, checked before asking the CMMS
    #[serde(default)]
    pub assets: BTreeMap<String, u64>,
    /// Responder name → user id
    #[serde(default)]
    pub users: BTreeMap<String, u64>,
}

impl FiixConfig {
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.macmms.com", self.tenant),
        }
    }

    pub fn validate(&self) -> Result<(), CmmsError> {
        if self.base_url.is_none() && self.tenant.trim().is_empty() {
            return Err(CmmsError::Config("either tenant or base_url is required".into()));
        }
        if self.app_key.is_empty() || self.access_key.is_empty() || self.secret.is_empty() {
            return Err(CmmsError::Config("app_key, access_key and secret are required".into()));
        }
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            if self.priorities.code(priority).is_none() {
                return Err(CmmsError::Config(format!("no CMMS code for priority {priority}")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct FiixClient {
    http: reqwest::Client,
    config: Arc<FiixConfig>,
    users: Arc<UserDirectory>,
}

impl FiixClient {
    pub fn new(config: FiixConfig) -> Result<Self, CmmsError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| CmmsError::Config(format!("failed to build HTTP client: {e}")))?;
        let users = UserDirectory::new(&config.users);
        Ok(Self { http, config: Arc::new(config), users: Arc::new(users) })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/?service=cmms&appKey={}&accessKey={}&signatureMethod=HmacSHA256&signatureVersion=1",
            self.config.base_url(),
            self.config.app_key,
            self.config.access_key,
        )
    }

    fn work_order_url(&self, id: u64) -> String {
        format!("{}/#/WorkOrder/{id}", self.config.base_url())
    }

    async fn send(&self, command: Value) -> Result<Value, CmmsError> {
        let url = self.endpoint();
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, sign_url(&self.config.secret, &url))
            .header(CONTENT_TYPE, "application/json")
            .json(&command)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let value: Value = serde_json::from_str(&body).map_err(|_| {
            CmmsError::Decode(format!("HTTP {status} with non-JSON body"))
        })?;
        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(CmmsError::Api(message));
        }
        if !status.is_success() {
            return Err(CmmsError::Http(status.as_u16()));
        }
        Ok(value)
    }

    fn command(verb: &str, class_name: &str) -> Map<String, Value> {
        let (major, minor, patch) = CLIENT_VERSION;
        let mut cmd = Map::new();
        cmd.insert("_maCn".into(), verb.into());
        cmd.insert("clientVersion".into(), json!({"major": major, "minor": minor, "patch": patch}));
        cmd.insert("className".into(), class_name.into());
        cmd
    }

    /// Resolve an operator's asset selection to a CMMS asset id.
    async fn resolve_asset(&self, selection: &str) -> Result<Option<u64>, CmmsError> {
        let code = match AssetSelection::parse(selection) {
            AssetSelection::None => return Ok(None),
            AssetSelection::Id(id) => return Ok(Some(id)),
            AssetSelection::Code(code) => code,
        };
        if let Some(id) = configured_asset(&self.config.assets, &code) {
            return Ok(Some(id));
        }

        let mut cmd = Self::command("FindRequest", "Asset");
        cmd.insert("fields".into(), "id, strCode".into());
        cmd.insert("filters".into(), json!([{"ql": "strCode = ?", "parameters": [code]}]));
        cmd.insert("maxObjects".into(), 1.into());
        let response = self.send(Value::Object(cmd)).await?;

        response
            .get("objects")
            .and_then(Value::as_array)
            .and_then(|objects| objects.first())
            .and_then(|asset| asset.get("id"))
            .and_then(Value::as_u64)
            .map(Some)
            .ok_or(CmmsError::UnknownAsset(code))
    }

    async fn attach_asset(&self, work_order_id: u64, asset_id: u64) -> Result<(), CmmsError> {
        let mut cmd = Self::command("AddRequest", "WorkOrderAsset");
        cmd.insert("fields".into(), "id".into());
        cmd.insert("object".into(), json!({"intWorkOrderID": work_order_id, "intAssetID": asset_id}));
        self.send(Value::Object(cmd)).await.map(|_| ())
    }

    async fn change_work_order(&self, external_id: &str, fields: Map<String, Value>) -> Result<(), CmmsError> {
        let id: u64 = external_id
            .parse()
            .map_err(|_| CmmsError::Config(format!("work order id '{external_id}' is not numeric")))?;
        let mut object = fields;
        let change_fields = object.keys().cloned().collect::<Vec<_>>().join(", ");
        object.insert("id".into(), id.into());

        let mut cmd = Self::command("ChangeRequest", "WorkOrder");
        cmd.insert("changeFields".into(), change_fields.into());
        cmd.insert("object".into(), Value::Object(object));
        self.send(Value::Object(cmd)).await.map(|_| ())
    }
}

fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[async_trait]
impl CmmsAdapter for FiixClient {
    async fn create_work_order(
        &self,
        request: &WorkOrderRequest,
    ) -> Result<WorkOrderLink, CmmsError> {
        let asset_id = match self.resolve_asset(&request.asset).await {
            Ok(id) => id,
            Err(e) => {
                warn!(cell = %request.cell_id, asset = %request.asset, error = %e, "asset not resolved, raising work order without it");
                None
            }
        };

        let mut description = format!("[{}] {}", request.cell_name, request.issue);
        if asset_id.is_none() && !request.asset.trim().is_empty() {
            description.push_str(&format!(" (asset: {})", request.asset.trim()));
        }
        let mut object = Map::new();
        object.insert("strDescription".into(), description.into());
        if let Some(code) = self.config.priorities.code(request.priority) {
            object.insert("intPriorityID".into(), code.into());
        }
        if let Some(site) = self.config.site_id {
            object.insert("intSiteID".into(), site.into());
        }
        if let Some(kind) = self.config.maintenance_type_id {
            object.insert("intMaintenanceTypeID".into(), kind.into());
        }

        let mut cmd = Self::command("AddRequest", "WorkOrder");
        cmd.insert("fields".into(), "id, strCode".into());
        cmd.insert("object".into(), Value::Object(object));
        let response = self.send(Value::Object(cmd)).await?;

        let created = response
            .get("object")
            .ok_or_else(|| CmmsError::Decode("AddResponse without object".into()))?;
        let id = created
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| CmmsError::Decode("work order id missing".into()))?;
        let number = created
            .get("strCode")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string());

        if let Some(asset_id) = asset_id {
            if let Err(e) = self.attach_asset(id, asset_id).await {
                warn!(work_order = id, asset_id, error = %e, "failed to attach asset to work order");
            }
        }
        debug!(cell = %request.cell_id, work_order = id, %number, "work order created");
        Ok(WorkOrderLink::linked(id.to_string(), number, self.work_order_url(id)))
    }

    async fn close_work_order(
        &self,
        external_id: &str,
        responder: &str,
        notes: &str,
    ) -> Result<(), CmmsError> {
        let mut fields = Map::new();
        fields.insert("strCompletionNotes".into(), notes.into());
        fields.insert("dtmDateCompleted".into(), now_stamp().into());
        if let Some(status) = self.config.completed_status_id {
            fields.insert("intWorkOrderStatusID".into(), status.into());
        }
        match self.users.find(responder) {
            Some(user) => {
                fields.insert("intCompletedByUserID".into(), user.into());
            }
            None => debug!(%responder, "responder has no CMMS user, closing unassigned"),
        }
        self.change_work_order(external_id, fields).await
    }

    async fn cancel_work_order(
        &self,
        external_id: &str,
        actor: &str,
        reason: &str,
    ) -> Result<(), CmmsError> {
        let mut note = format!("Cancelled by {actor}");
        if !reason.trim().is_empty() {
            note.push_str(&format!(": {}", reason.trim()));
        }
        let mut fields = Map::new();
        fields.insert("strCompletionNotes".into(), note.into());
        if let Some(status) = self.config.cancelled_status_id {
            fields.insert("intWorkOrderStatusID".into(), status.into());
        }
        self.change_work_order(external_id, fields).await
    }
}

#[cfg(test)]
#[path = "fiix_tests.rs"]
mod tests;
