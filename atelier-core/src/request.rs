// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::User;
use crate::role::Role;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl RequestStatus {
    /// Return true once a request has been reviewed. Terminal requests never transition again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Deny,
}

/// A request to elevate an account to a higher role.
///
/// Requests transition `Pending -> Approved | Denied` exactly once, performed by a reviewer whose
/// role can manage users. Since roles never decrease, a request for a role at or below the
/// current one is rejected at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequest {
    pub id: String,
    pub user_id: String,
    pub current_role: Role,
    pub requested_role: Role,
    pub reason: String,
    pub status: RequestStatus,
    pub reviewed_by: Option<String>,
    pub created_at: u64,
    pub reviewed_at: Option<u64>,
}

impl RoleRequest {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        current_role: Role,
        requested_role: Role,
        reason: impl Into<String>,
        now: u64,
    ) -> Result<Self, RequestError> {
        if requested_role <= current_role {
            return Err(RequestError::NotAnElevation {
                current: current_role,
                requested: requested_role,
            });
        }

        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            current_role,
            requested_role,
            reason: reason.into(),
            status: RequestStatus::Pending,
            reviewed_by: None,
            created_at: now,
            reviewed_at: None,
        })
    }

    /// Review a pending request.
    pub fn review(
        &mut self,
        decision: ReviewDecision,
        reviewer: &User,
        now: u64,
    ) -> Result<(), RequestError> {
        if self.status.is_terminal() {
            return Err(RequestError::AlreadyReviewed(self.status));
        }

        if !reviewer.role.capabilities().can_manage_users {
            return Err(RequestError::ReviewerNotPermitted(reviewer.role));
        }

        self.status = match decision {
            ReviewDecision::Approve => RequestStatus::Approved,
            ReviewDecision::Deny => RequestStatus::Denied,
        };
        self.reviewed_by = Some(reviewer.id.clone());
        self.reviewed_at = Some(now);

        Ok(())
    }

    /// Return the role the account holds after this request, the elevated role only once the
    /// request was approved.
    pub fn effective_role(&self) -> Role {
        match self.status {
            RequestStatus::Approved => self.requested_role,
            _ => self.current_role,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("requested role {requested} is not above the current role {current}")]
    NotAnElevation { current: Role, requested: Role },

    #[error("request was already reviewed ({0:?})")]
    AlreadyReviewed(RequestStatus),

    #[error("role {0} is not permitted to review role requests")]
    ReviewerNotPermitted(Role),
}
