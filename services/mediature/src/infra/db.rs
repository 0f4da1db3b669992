use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use mediature_domain::invitation::InvitationStatus;
use mediature_schema::{
    admin_invitations, admins, agent_invitations, agents, authorities, cases, invitations,
    live_chat_settings, outbox_events, users,
};

use crate::domain::repository::{
    AccessRepository, AgentRepository, AuthorityRepository, InvitationRepository,
    LiveChatRepository, UserRepository,
};
use crate::domain::types::{
    Agent, AgentDetail, AgentListing, Authority, Invitation, InvitationDetail, InvitationListing,
    InvitationScope, LiveChatSettings, OutboxEvent, User, UserSummary,
};
use crate::error::MediatureServiceError;

// ── Access repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccessRepository {
    pub db: DatabaseConnection,
}

impl AccessRepository for DbAccessRepository {
    async fn is_admin(&self, user_id: Uuid) -> Result<bool, MediatureServiceError> {
        let count = admins::Entity::find()
            .filter(admins::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count admin grants")?;
        Ok(count > 0)
    }

    async fn main_agent_authority_ids(
        &self,
        user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, MediatureServiceError> {
        if authority_ids.is_empty() {
            return Ok(Vec::new());
        }
        let agent_ids: Vec<Uuid> = agents::Entity::find()
            .filter(agents::Column::UserId.eq(user_id))
            .filter(agents::Column::AuthorityId.is_in(authority_ids.to_vec()))
            .all(&self.db)
            .await
            .context("find memberships for main-agent check")?
            .into_iter()
            .map(|m| m.id)
            .collect();
        if agent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let granted = authorities::Entity::find()
            .filter(authorities::Column::Id.is_in(authority_ids.to_vec()))
            .filter(authorities::Column::MainAgentId.is_in(agent_ids))
            .all(&self.db)
            .await
            .context("find authorities led by user")?;
        Ok(granted.into_iter().map(|m| m.id).collect())
    }

    async fn member_authority_ids(
        &self,
        user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, MediatureServiceError> {
        if authority_ids.is_empty() {
            return Ok(Vec::new());
        }
        let memberships = agents::Entity::find()
            .filter(agents::Column::UserId.eq(user_id))
            .filter(agents::Column::AuthorityId.is_in(authority_ids.to_vec()))
            .all(&self.db)
            .await
            .context("find memberships for member check")?;
        Ok(memberships.into_iter().map(|m| m.authority_id).collect())
    }
}

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MediatureServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MediatureServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        firstname: &str,
        lastname: &str,
        profile_picture: Option<&str>,
    ) -> Result<Option<User>, MediatureServiceError> {
        if users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user before profile update")?
            .is_none()
        {
            return Ok(None);
        }
        let updated = users::ActiveModel {
            id: Set(id),
            firstname: Set(firstname.to_owned()),
            lastname: Set(lastname.to_owned()),
            profile_picture: Set(profile_picture.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user profile")?;
        Ok(Some(user_from_model(updated)))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        firstname: model.firstname,
        lastname: model.lastname,
        profile_picture: model.profile_picture,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn summary_from_model(model: users::Model) -> UserSummary {
    UserSummary {
        id: model.id,
        email: model.email,
        firstname: model.firstname,
        lastname: model.lastname,
    }
}

// ── Authority repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuthorityRepository {
    pub db: DatabaseConnection,
}

impl AuthorityRepository for DbAuthorityRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Authority>, MediatureServiceError> {
        let model = authorities::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find authority by id")?;
        Ok(model.map(authority_from_model))
    }
}

fn authority_from_model(model: authorities::Model) -> Authority {
    Authority {
        id: model.id,
        name: model.name,
        slug: model.slug,
        kind: model.kind,
        logo_attachment_id: model.logo_attachment_id,
        main_agent_id: model.main_agent_id,
    }
}

// ── Agent repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAgentRepository {
    pub db: DatabaseConnection,
}

impl AgentRepository for DbAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgentDetail>, MediatureServiceError> {
        let found = agents::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find agent by id")?;
        let Some((agent, user)) = found else {
            return Ok(None);
        };
        let user = user.context("agent row without user row")?;
        Ok(Some(AgentDetail {
            agent: agent_from_model(agent),
            user: summary_from_model(user),
        }))
    }

    async fn exists(
        &self,
        user_id: Uuid,
        authority_id: Uuid,
    ) -> Result<bool, MediatureServiceError> {
        let count = agents::Entity::find()
            .filter(agents::Column::UserId.eq(user_id))
            .filter(agents::Column::AuthorityId.eq(authority_id))
            .count(&self.db)
            .await
            .context("count existing membership")?;
        Ok(count > 0)
    }

    async fn create_with_outbox(
        &self,
        agent: &Agent,
        grant_main_agent: bool,
        event: &OutboxEvent,
    ) -> Result<(), MediatureServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let agent = agent.clone();
                let event = event.clone();
                Box::pin(async move {
                    agents::ActiveModel {
                        id: Set(agent.id),
                        user_id: Set(agent.user_id),
                        authority_id: Set(agent.authority_id),
                        created_at: Set(agent.created_at),
                    }
                    .insert(txn)
                    .await?;
                    if grant_main_agent {
                        authorities::ActiveModel {
                            id: Set(agent.authority_id),
                            main_agent_id: Set(Some(agent.id)),
                            updated_at: Set(Utc::now()),
                            ..Default::default()
                        }
                        .update(txn)
                        .await?;
                    }
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("create agent with outbox")?;
        Ok(())
    }

    async fn remove_with_outbox(
        &self,
        agent_id: Uuid,
        event: &OutboxEvent,
    ) -> Result<(), MediatureServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let event = event.clone();
                Box::pin(async move {
                    cases::Entity::update_many()
                        .col_expr(cases::Column::AgentId, Expr::value(Option::<Uuid>::None))
                        .col_expr(cases::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(cases::Column::AgentId.eq(agent_id))
                        .exec(txn)
                        .await?;
                    authorities::Entity::update_many()
                        .col_expr(
                            authorities::Column::MainAgentId,
                            Expr::value(Option::<Uuid>::None),
                        )
                        .col_expr(authorities::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(authorities::Column::MainAgentId.eq(agent_id))
                        .exec(txn)
                        .await?;
                    agents::Entity::delete_by_id(agent_id).exec(txn).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("remove agent with outbox")?;
        Ok(())
    }

    async fn set_main_agent(
        &self,
        authority_id: Uuid,
        agent_id: Uuid,
    ) -> Result<bool, MediatureServiceError> {
        let updated = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let member = agents::Entity::find_by_id(agent_id)
                        .filter(agents::Column::AuthorityId.eq(authority_id))
                        .one(txn)
                        .await?;
                    if member.is_none() {
                        return Ok(false);
                    }
                    authorities::ActiveModel {
                        id: Set(authority_id),
                        main_agent_id: Set(Some(agent_id)),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(true)
                })
            })
            .await
            .context("set authority main agent")?;
        Ok(updated)
    }

    async fn list_with_cases(
        &self,
        authority_ids: &[Uuid],
    ) -> Result<Vec<AgentListing>, MediatureServiceError> {
        if authority_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = agents::Entity::find()
            .filter(agents::Column::AuthorityId.is_in(authority_ids.to_vec()))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list agents with users")?;

        let main_agent_ids: HashMap<Uuid, Uuid> = authorities::Entity::find()
            .filter(authorities::Column::Id.is_in(authority_ids.to_vec()))
            .all(&self.db)
            .await
            .context("load authorities for agent list")?
            .into_iter()
            .filter_map(|a| a.main_agent_id.map(|main| (a.id, main)))
            .collect();

        let agent_ids: Vec<Uuid> = rows.iter().map(|(a, _)| a.id).collect();
        let mut cases_by_agent: HashMap<Uuid, Vec<Option<chrono::DateTime<Utc>>>> =
            HashMap::new();
        if !agent_ids.is_empty() {
            let assigned = cases::Entity::find()
                .filter(cases::Column::AgentId.is_in(agent_ids))
                .all(&self.db)
                .await
                .context("load assigned cases for agent list")?;
            for case in assigned {
                if let Some(agent_id) = case.agent_id {
                    cases_by_agent.entry(agent_id).or_default().push(case.closed_at);
                }
            }
        }

        rows.into_iter()
            .map(|(agent, user)| {
                let user = user.context("agent row without user row")?;
                let is_main_agent = main_agent_ids.get(&agent.authority_id) == Some(&agent.id);
                let case_closed_dates =
                    cases_by_agent.remove(&agent.id).unwrap_or_default();
                Ok(AgentListing {
                    agent: agent_from_model(agent),
                    user: summary_from_model(user),
                    is_main_agent,
                    case_closed_dates,
                })
            })
            .collect()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Agent, Authority)>, MediatureServiceError> {
        let rows = agents::Entity::find()
            .filter(agents::Column::UserId.eq(user_id))
            .find_also_related(authorities::Entity)
            .all(&self.db)
            .await
            .context("list memberships for user")?;
        rows.into_iter()
            .map(|(agent, authority)| {
                let authority = authority.context("agent row without authority row")?;
                Ok((agent_from_model(agent), authority_from_model(authority)))
            })
            .collect()
    }
}

fn agent_from_model(model: agents::Model) -> Agent {
    Agent {
        id: model.id,
        user_id: model.user_id,
        authority_id: model.authority_id,
        created_at: model.created_at,
    }
}

// ── Invitation repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInvitationRepository {
    pub db: DatabaseConnection,
}

impl InvitationRepository for DbInvitationRepository {
    async fn find_detail_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InvitationDetail>, MediatureServiceError> {
        let Some(model) = invitations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find invitation by id")?
        else {
            return Ok(None);
        };

        let scope = if let Some(sub) = agent_invitations::Entity::find()
            .filter(agent_invitations::Column::InvitationId.eq(id))
            .one(&self.db)
            .await
            .context("find agent sub-record")?
        {
            InvitationScope::Agent {
                authority_id: sub.authority_id,
                grant_main_agent: sub.grant_main_agent,
            }
        } else if admin_invitations::Entity::find()
            .filter(admin_invitations::Column::InvitationId.eq(id))
            .one(&self.db)
            .await
            .context("find admin sub-record")?
            .is_some()
        {
            InvitationScope::Admin
        } else {
            return Err(anyhow::anyhow!("invitation {id} has no kind sub-record").into());
        };

        Ok(Some(InvitationDetail {
            invitation: invitation_from_model(model)?,
            scope,
        }))
    }

    async fn find_by_token(
        &self,
        token: Uuid,
    ) -> Result<Option<InvitationListing>, MediatureServiceError> {
        let found = invitations::Entity::find()
            .filter(invitations::Column::Token.eq(token))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find invitation by token")?;
        let Some((model, issuer)) = found else {
            return Ok(None);
        };
        let issuer = issuer.context("invitation row without issuer row")?;
        Ok(Some(InvitationListing {
            invitation: invitation_from_model(model)?,
            issuer: summary_from_model(issuer),
        }))
    }

    async fn create_agent_invitation_if_absent(
        &self,
        invitation: &Invitation,
        authority_id: Uuid,
        grant_main_agent: bool,
        event: &OutboxEvent,
    ) -> Result<bool, MediatureServiceError> {
        let created = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let invitation = invitation.clone();
                let event = event.clone();
                Box::pin(async move {
                    let pending = agent_invitations::Entity::find()
                        .filter(agent_invitations::Column::AuthorityId.eq(authority_id))
                        .inner_join(invitations::Entity)
                        .filter(
                            invitations::Column::InviteeEmail
                                .eq(invitation.invitee_email.clone()),
                        )
                        .filter(
                            invitations::Column::Status.eq(InvitationStatus::Pending.as_str()),
                        )
                        .count(txn)
                        .await?;
                    if pending > 0 {
                        return Ok(false);
                    }
                    invitations::ActiveModel {
                        id: Set(invitation.id),
                        issuer_id: Set(invitation.issuer_id),
                        invitee_email: Set(invitation.invitee_email.clone()),
                        invitee_firstname: Set(invitation.invitee_firstname.clone()),
                        invitee_lastname: Set(invitation.invitee_lastname.clone()),
                        token: Set(invitation.token),
                        status: Set(invitation.status.as_str().to_owned()),
                        created_at: Set(invitation.created_at),
                        updated_at: Set(invitation.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    agent_invitations::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        invitation_id: Set(invitation.id),
                        authority_id: Set(authority_id),
                        grant_main_agent: Set(grant_main_agent),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(true)
                })
            })
            .await
            .context("create agent invitation with outbox")?;
        Ok(created)
    }

    async fn cancel_if_pending(&self, id: Uuid) -> Result<bool, MediatureServiceError> {
        let result = invitations::Entity::update_many()
            .col_expr(
                invitations::Column::Status,
                Expr::value(InvitationStatus::Canceled.as_str()),
            )
            .col_expr(invitations::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(invitations::Column::Id.eq(id))
            .filter(invitations::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("cancel pending invitation")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_agent_invitations(
        &self,
        authority_ids: &[Uuid],
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationListing>, MediatureServiceError> {
        if authority_ids.is_empty() {
            return Ok(Vec::new());
        }
        let invitation_ids: Vec<Uuid> = agent_invitations::Entity::find()
            .filter(agent_invitations::Column::AuthorityId.is_in(authority_ids.to_vec()))
            .all(&self.db)
            .await
            .context("list agent sub-records")?
            .into_iter()
            .map(|m| m.invitation_id)
            .collect();
        if invitation_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = invitations::Entity::find()
            .filter(invitations::Column::Id.is_in(invitation_ids));
        if let Some(status) = status {
            query = query.filter(invitations::Column::Status.eq(status.as_str()));
        }
        let rows = query
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list agent invitations")?;
        rows.into_iter()
            .map(|(model, issuer)| {
                let issuer = issuer.context("invitation row without issuer row")?;
                Ok(InvitationListing {
                    invitation: invitation_from_model(model)?,
                    issuer: summary_from_model(issuer),
                })
            })
            .collect()
    }
}

fn invitation_from_model(model: invitations::Model) -> Result<Invitation, MediatureServiceError> {
    let status = InvitationStatus::from_str_value(&model.status)
        .with_context(|| format!("invalid invitation status {:?}", model.status))?;
    Ok(Invitation {
        id: model.id,
        issuer_id: model.issuer_id,
        invitee_email: model.invitee_email,
        invitee_firstname: model.invitee_firstname,
        invitee_lastname: model.invitee_lastname,
        token: model.token,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Live-chat repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLiveChatRepository {
    pub db: DatabaseConnection,
}

impl LiveChatRepository for DbLiveChatRepository {
    async fn get_or_init(
        &self,
        user_id: Uuid,
    ) -> Result<LiveChatSettings, MediatureServiceError> {
        // Insert-if-absent then re-read: concurrent first reads converge on
        // whichever token landed first.
        live_chat_settings::Entity::insert(live_chat_settings::ActiveModel {
            user_id: Set(user_id),
            session_token: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(live_chat_settings::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("init live-chat settings")?;

        let model = live_chat_settings::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("read live-chat settings")?
            .context("live-chat settings missing after init")?;
        Ok(LiveChatSettings {
            user_id: model.user_id,
            session_token: model.session_token,
            created_at: model.created_at,
        })
    }
}

// ── Outbox ────────────────────────────────────────────────────────────────────

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}
