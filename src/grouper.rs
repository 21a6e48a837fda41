// src/grouper.rs

//! Client for the Grouper web-service groups endpoint.
//!
//! Grouper speaks JSON over HTTPS POST with basic authentication and the
//! legacy `text/x-json` content type. Only group lookup under a stem is
//! needed here; membership changes go through the directory pipeline.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GrouperConfig;
use crate::error::{Error, Result};
use crate::overrides::GroupKind;
use crate::stem::{figshare_stem, StemScope};

/// Timeout for Grouper web-service requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Grouper's pre-standard JSON content type
const CONTENT_TYPE: &str = "text/x-json";

#[derive(Serialize)]
struct FindGroupsRequest {
    #[serde(rename = "WsRestFindGroupsRequest")]
    request: WsRestFindGroupsRequest,
}

#[derive(Serialize)]
struct WsRestFindGroupsRequest {
    #[serde(rename = "wsQueryFilter")]
    query_filter: QueryFilter,
}

#[derive(Serialize)]
struct QueryFilter {
    #[serde(rename = "queryFilterType")]
    filter_type: &'static str,
    #[serde(rename = "stemName")]
    stem_name: String,
}

#[derive(Deserialize)]
struct FindGroupsResponse {
    #[serde(rename = "WsFindGroupsResults")]
    results: WsFindGroupsResults,
}

#[derive(Deserialize)]
struct WsFindGroupsResults {
    #[serde(rename = "groupResults", default)]
    group_results: Vec<GrouperGroup>,
}

/// One group as reported by the Grouper web service.
#[derive(Debug, Clone, Deserialize)]
pub struct GrouperGroup {
    /// Bare group name within its stem
    #[serde(rename = "displayExtension", default)]
    pub display_extension: String,
    /// Fully qualified group path
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Blocking client for Grouper group queries.
pub struct GrouperClient {
    client: Client,
    endpoint: String,
    user: String,
    password: String,
    stem_base: String,
}

impl GrouperClient {
    /// Create a client for the configured Grouper endpoint.
    pub fn new(config: &GrouperConfig, stem_base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(GrouperClient {
            client,
            endpoint: format!("https://{}/{}", config.host, config.base_path),
            user: config.user.clone(),
            password: config.password.clone(),
            stem_base: stem_base.to_string(),
        })
    }

    /// Build the find-groups request for a stem.
    ///
    /// The Content-Type header must be set before the JSON body is attached:
    /// `json()` only inserts `application/json` when the header is absent,
    /// while a later `header()` call would append a second value to an
    /// already-set singleton header.
    fn find_groups_request(&self, stem: &str) -> Result<reqwest::blocking::Request> {
        let body = FindGroupsRequest {
            request: WsRestFindGroupsRequest {
                query_filter: QueryFilter {
                    filter_type: "FIND_BY_STEM_NAME",
                    stem_name: stem.to_string(),
                },
            },
        };

        self.client
            .post(&self.endpoint)
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .json(&body)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build Grouper request: {e}")))
    }

    /// Retrieve the groups under the stem addressed by `scope`.
    pub fn find_groups(&self, scope: StemScope) -> Result<Vec<GrouperGroup>> {
        let stem = figshare_stem(&self.stem_base, scope);
        debug!("Querying Grouper for groups under {stem}");

        let request = self.find_groups_request(&stem)?;
        let response = self
            .client
            .execute(request)
            .map_err(|e| Error::Http(format!("Failed to reach Grouper: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "HTTP {} from {}",
                response.status(),
                self.endpoint
            )));
        }

        let parsed: FindGroupsResponse = response
            .json()
            .map_err(|e| Error::Http(format!("Failed to parse Grouper response: {e}")))?;

        debug!(
            "Grouper returned {} groups under {stem}",
            parsed.results.group_results.len()
        );
        Ok(parsed.results.group_results)
    }

    /// Check whether `group` exists under the stem for `kind`.
    pub fn group_exists(&self, group: &str, kind: GroupKind) -> Result<bool> {
        let groups = self.find_groups(kind.into())?;
        Ok(groups.iter().any(|g| g.display_extension == group))
    }
}
