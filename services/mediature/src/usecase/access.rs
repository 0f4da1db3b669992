//! Capability checks evaluated at the top of every sensitive procedure.
//!
//! Guards run before any write: a failing check aborts the calling use case
//! with no mutation. Authorization failures report the exact authority ids
//! the caller lacked rights on.

use uuid::Uuid;

use crate::domain::access::unauthorized_ids;
use crate::domain::repository::AccessRepository;
use crate::error::MediatureServiceError;

pub struct AccessControl<R: AccessRepository> {
    pub repo: R,
}

impl<R: AccessRepository> AccessControl<R> {
    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool, MediatureServiceError> {
        self.repo.is_admin(user_id).await
    }

    /// Admin, or main agent of every distinct requested authority.
    pub async fn require_admin_or_main_agent(
        &self,
        user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<(), MediatureServiceError> {
        if self.repo.is_admin(user_id).await? {
            return Ok(());
        }
        let granted = self
            .repo
            .main_agent_authority_ids(user_id, authority_ids)
            .await?;
        let missing = unauthorized_ids(authority_ids, &granted);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MediatureServiceError::NotMainAgent {
                authority_ids: missing,
            })
        }
    }

    /// Admin, or agent of every distinct requested authority.
    pub async fn require_admin_or_member(
        &self,
        user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<(), MediatureServiceError> {
        if self.repo.is_admin(user_id).await? {
            return Ok(());
        }
        let granted = self
            .repo
            .member_authority_ids(user_id, authority_ids)
            .await?;
        let missing = unauthorized_ids(authority_ids, &granted);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MediatureServiceError::NotAuthorityAgent {
                authority_ids: missing,
            })
        }
    }

    pub async fn require_admin(&self, user_id: Uuid) -> Result<(), MediatureServiceError> {
        if self.repo.is_admin(user_id).await? {
            Ok(())
        } else {
            Err(MediatureServiceError::AdminRequired)
        }
    }
}
