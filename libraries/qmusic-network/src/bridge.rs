//! The host bridge contract.
//!
//! The only channel to the Content Network is a single asynchronous
//! call-and-response function injected into the page by the host. This
//! module types that contract: a structured request object with an
//! `action` discriminant and action-specific parameters, answered by a
//! JSON payload, an array of records, or the literal `true` for accepted
//! writes.
//!
//! The bridge is supplied by the host; [`NoBridge`] stands in when the app
//! runs standalone, making bridge absence a detectable state instead of a
//! crash.

use crate::error::{NetworkError, Result};
use async_trait::async_trait;
use qmusic_core::ServiceKind;
use serde::Serialize;
use serde_json::Value;

/// Request discriminant, wire-named as the host expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeAction {
    SearchResources,
    FetchResource,
    PublishResource,
    PublishMultipleResources,
    ListResources,
    GetAccountData,
    GetAccountNames,
}

/// One resource inside a `PUBLISH_MULTIPLE_RESOURCES` request.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSpec {
    pub name: String,
    pub service: ServiceKind,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data64: Option<String>,
}

/// Structured request object passed to the bridge.
///
/// Only the fields relevant to the chosen action are populated; the rest
/// are skipped during serialization so the wire object stays minimal.
#[derive(Debug, Clone, Serialize)]
pub struct BridgeRequest {
    pub action: BridgeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceKind>,
    /// Owner/account name (wire name: `name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(rename = "includeMetadata", skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
    #[serde(rename = "excludeBlocked", skip_serializing_if = "Option::is_none")]
    pub exclude_blocked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<ResourceSpec>>,
}

impl BridgeRequest {
    fn bare(action: BridgeAction) -> Self {
        Self {
            action,
            service: None,
            name: None,
            identifier: None,
            query: None,
            limit: None,
            offset: None,
            reverse: None,
            include_metadata: None,
            exclude_blocked: None,
            data: None,
            data64: None,
            filename: None,
            title: None,
            description: None,
            address: None,
            resources: None,
        }
    }

    /// Search a bucket for identifiers matching `query`, newest first.
    pub fn search(service: ServiceKind, query: &str, limit: u64, offset: u64) -> Self {
        Self {
            service: Some(service),
            query: Some(query.to_owned()),
            limit: Some(limit),
            offset: Some(offset),
            reverse: Some(true),
            include_metadata: Some(true),
            exclude_blocked: Some(true),
            ..Self::bare(BridgeAction::SearchResources)
        }
    }

    /// Fetch one resource's content by `(owner, service, identifier)`.
    pub fn fetch(service: ServiceKind, owner: &str, identifier: &str) -> Self {
        Self {
            service: Some(service),
            name: Some(owner.to_owned()),
            identifier: Some(identifier.to_owned()),
            ..Self::bare(BridgeAction::FetchResource)
        }
    }

    /// Publish a single resource with a structured JSON payload.
    pub fn publish(
        service: ServiceKind,
        owner: &str,
        identifier: &str,
        data: Value,
        filename: &str,
    ) -> Self {
        Self {
            service: Some(service),
            name: Some(owner.to_owned()),
            identifier: Some(identifier.to_owned()),
            data: Some(data),
            filename: Some(filename.to_owned()),
            ..Self::bare(BridgeAction::PublishResource)
        }
    }

    /// Publish a single resource with a base64 payload (binary content).
    pub fn publish_base64(
        service: ServiceKind,
        owner: &str,
        identifier: &str,
        data64: String,
        filename: &str,
    ) -> Self {
        Self {
            service: Some(service),
            name: Some(owner.to_owned()),
            identifier: Some(identifier.to_owned()),
            data64: Some(data64),
            filename: Some(filename.to_owned()),
            ..Self::bare(BridgeAction::PublishResource)
        }
    }

    /// Publish several resources in one request.
    pub fn publish_multiple(resources: Vec<ResourceSpec>) -> Self {
        Self {
            resources: Some(resources),
            ..Self::bare(BridgeAction::PublishMultipleResources)
        }
    }

    /// List every resource published by `owner`.
    pub fn list(owner: &str) -> Self {
        Self {
            name: Some(owner.to_owned()),
            ..Self::bare(BridgeAction::ListResources)
        }
    }

    /// Account data of the logged-in host user.
    pub fn account_data() -> Self {
        Self::bare(BridgeAction::GetAccountData)
    }

    /// Registered names for an address.
    pub fn account_names(address: &str) -> Self {
        Self {
            address: Some(address.to_owned()),
            ..Self::bare(BridgeAction::GetAccountNames)
        }
    }

    /// Attach a title/description pair (used on publish requests).
    pub fn with_listing(mut self, title: &str, description: &str) -> Self {
        self.title = Some(title.to_owned());
        self.description = Some(description.to_owned());
        self
    }
}

/// The host-supplied request function.
///
/// Implementations forward the serialized request to whatever channel the
/// host provides and resolve with the raw JSON answer. Transport failures
/// (channel gone, unserializable response) map to
/// [`NetworkError::Transport`].
#[async_trait]
pub trait Bridge: Send + Sync {
    async fn request(&self, request: BridgeRequest) -> Result<Value>;
}

/// Stand-in used when the host injected no bridge. Every request fails
/// with [`NetworkError::BridgeUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBridge;

#[async_trait]
impl Bridge for NoBridge {
    async fn request(&self, _request: BridgeRequest) -> Result<Value> {
        Err(NetworkError::BridgeUnavailable)
    }
}
