use std::sync::Arc;

use reqwest::multipart;

use crate::error::{Error, ErrorSet};
use crate::models::{Claim, GroupedClaims};
use crate::token::TokenStorage;

/// A claim submission before it exists server-side. The document rides
/// along as a binary attachment, which forces the multipart encoding in
/// [`ClaimStore::create_claim`].
#[derive(Debug, Clone)]
pub struct ClaimDraft {
    pub name: String,
    pub department: String,
    pub relation: String,
    pub description: String,
    pub amount: f64,
    pub document: Attachment,
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Claim-side state and API operations. Lists returned by the fetch
/// calls are point-in-time snapshots: approve/reject never patch them,
/// callers re-fetch to observe the transition.
pub struct ClaimStore {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStorage>,
    pub errors: ErrorSet,
    pub grouped_claims: GroupedClaims,
    pub grouped_claims_loading: bool,
    pub grouped_claims_error: Option<String>,
}

impl ClaimStore {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStorage>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens,
            errors: ErrorSet::default(),
            grouped_claims: GroupedClaims::default(),
            grouped_claims_loading: false,
            grouped_claims_error: None,
        }
    }

    fn bearer(&self) -> String {
        self.tokens.get().unwrap_or_default()
    }

    /// Submits a new claim as multipart form data. The description is
    /// serialized to a JSON string sub-field, matching what the server
    /// expects to decode.
    pub async fn create_claim(&mut self, draft: ClaimDraft) -> Result<(), Error> {
        let document = multipart::Part::bytes(draft.document.bytes)
            .file_name(draft.document.file_name);
        let form = multipart::Form::new()
            .text("name", draft.name)
            .text("department", draft.department)
            .text("relation", draft.relation)
            .text("description", serde_json::to_string(&draft.description)?)
            .text("amount", draft.amount.to_string())
            .part("document", document);

        let res = self
            .client
            .post(format!("{}/api/post", self.base_url))
            .bearer_auth(self.bearer())
            .multipart(form)
            .send()
            .await?;

        if res.status().is_success() {
            self.errors.clear();
            debug!("claim created");
        } else {
            let body: serde_json::Value = res.json().await.unwrap_or_default();
            self.errors = ErrorSet::from_body(&body, "Something went wrong");
        }
        Ok(())
    }

    pub async fn fetch_my_claims(&mut self) -> Result<Vec<Claim>, Error> {
        self.fetch_list("/api/my-posts").await
    }

    pub async fn fetch_supervisor_claims(&mut self) -> Result<Vec<Claim>, Error> {
        self.fetch_list("/api/supervisor/all-claims").await
    }

    pub async fn fetch_manager_claims(&mut self) -> Result<Vec<Claim>, Error> {
        self.fetch_list("/api/manager/all-claims").await
    }

    pub async fn fetch_hr_claims(&mut self) -> Result<Vec<Claim>, Error> {
        self.fetch_list("/api/hr/all-claims").await
    }

    pub async fn fetch_account_claims(&mut self) -> Result<Vec<Claim>, Error> {
        self.fetch_list("/api/account/all-claims").await
    }

    /// Claims the current approver has already acted on.
    pub async fn fetch_my_handled_claims(&mut self) -> Result<Vec<Claim>, Error> {
        self.fetch_list("/api/my-handled-claims").await
    }

    /// Shared contract of the list fetches: a non-2xx response is data,
    /// not an error — it yields an empty list and a populated error
    /// set. Transport failures propagate to the caller.
    async fn fetch_list(&mut self, path: &str) -> Result<Vec<Claim>, Error> {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let status = res.status();
        let body: serde_json::Value = res.json().await?;

        if !status.is_success() {
            self.errors = ErrorSet::from_body(&body, "Failed to fetch claims");
            return Ok(Vec::new());
        }

        self.errors.clear();
        match body.get("data") {
            Some(data) => Ok(serde_json::from_value(data.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// The employee's status-partitioned view. Unlike the list fetches
    /// this also absorbs transport failures: any failure resets the
    /// cached partitions to empty and records a message, and the
    /// loading flag is cleared on every exit path. The result is
    /// returned as well so callers need not re-read store state.
    pub async fn fetch_my_claims_grouped(&mut self) -> GroupedClaims {
        self.grouped_claims_loading = true;
        self.grouped_claims_error = None;

        match self.request_grouped().await {
            Ok(grouped) => {
                self.grouped_claims = grouped;
            }
            Err(message) => {
                self.grouped_claims = GroupedClaims::default();
                self.grouped_claims_error = Some(message);
            }
        }

        self.grouped_claims_loading = false;
        self.grouped_claims.clone()
    }

    async fn request_grouped(&self) -> Result<GroupedClaims, String> {
        let res = self
            .client
            .get(format!("{}/api/my-claims-grouped", self.base_url))
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| {
                warn!("grouped claims fetch failed: {e}");
                "Failed to fetch claims".to_string()
            })?;

        let status = res.status();
        let body: serde_json::Value = res
            .json()
            .await
            .map_err(|_| "Failed to fetch claims".to_string())?;

        if status.is_success() {
            match body.get("data") {
                Some(data) => serde_json::from_value(data.clone())
                    .map_err(|_| "Failed to fetch claims".to_string()),
                None => Ok(GroupedClaims::default()),
            }
        } else {
            Err(body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| "Failed to fetch claims".to_string()))
        }
    }

    /// Moves a claim one step along the approval chain. Returns the raw
    /// response body; cached lists are left stale on purpose.
    pub async fn approve_claim(&mut self, claim_id: i64) -> Result<serde_json::Value, Error> {
        self.errors.clear();
        let res = self
            .client
            .post(format!("{}/api/claims/{}/approve", self.base_url, claim_id))
            .bearer_auth(self.bearer())
            .send()
            .await?;

        let status = res.status();
        let body: serde_json::Value = res.json().await.unwrap_or_default();
        if !status.is_success() {
            self.errors = ErrorSet::from_body(&body, "Failed to approve claim.");
        }
        Ok(body)
    }

    /// Rejects a claim with a reason. Same error contract as
    /// [`Self::approve_claim`]; cached lists are left stale on purpose.
    pub async fn reject_claim(&mut self, claim_id: i64, reason: &str) -> Result<(), Error> {
        self.errors.clear();
        let res = self
            .client
            .post(format!("{}/api/claims/{}/reject", self.base_url, claim_id))
            .bearer_auth(self.bearer())
            .json(&reason)
            .send()
            .await?;

        if !res.status().is_success() {
            let body: serde_json::Value = res.json().await.unwrap_or_default();
            self.errors = ErrorSet::from_body(&body, "Failed to reject claim.");
        }
        Ok(())
    }
}
