use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use mediature::domain::repository::{
    AccessRepository, AgentRepository, AuthorityRepository, InvitationRepository,
    LiveChatRepository, UserRepository,
};
use mediature::domain::types::{
    Agent, AgentDetail, AgentListing, Authority, Invitation, InvitationDetail, InvitationListing,
    InvitationScope, LiveChatSettings, OutboxEvent, User,
};
use mediature::error::MediatureServiceError;
use mediature::usecase::access::AccessControl;
use mediature_domain::invitation::InvitationStatus;

// ── MockAccessRepo ───────────────────────────────────────────────────────────

pub struct MockAccessRepo {
    pub admin: bool,
    pub main_agent_of: Vec<Uuid>,
    pub member_of: Vec<Uuid>,
}

impl AccessRepository for MockAccessRepo {
    async fn is_admin(&self, _user_id: Uuid) -> Result<bool, MediatureServiceError> {
        Ok(self.admin)
    }

    async fn main_agent_authority_ids(
        &self,
        _user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, MediatureServiceError> {
        Ok(authority_ids
            .iter()
            .copied()
            .filter(|id| self.main_agent_of.contains(id))
            .collect())
    }

    async fn member_authority_ids(
        &self,
        _user_id: Uuid,
        authority_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, MediatureServiceError> {
        Ok(authority_ids
            .iter()
            .copied()
            .filter(|id| self.member_of.contains(id))
            .collect())
    }
}

pub fn admin_access() -> AccessControl<MockAccessRepo> {
    AccessControl {
        repo: MockAccessRepo {
            admin: true,
            main_agent_of: vec![],
            member_of: vec![],
        },
    }
}

pub fn main_agent_access(authority_ids: Vec<Uuid>) -> AccessControl<MockAccessRepo> {
    AccessControl {
        repo: MockAccessRepo {
            admin: false,
            main_agent_of: authority_ids.clone(),
            member_of: authority_ids,
        },
    }
}

pub fn member_access(authority_ids: Vec<Uuid>) -> AccessControl<MockAccessRepo> {
    AccessControl {
        repo: MockAccessRepo {
            admin: false,
            main_agent_of: vec![],
            member_of: authority_ids,
        },
    }
}

pub fn no_access() -> AccessControl<MockAccessRepo> {
    AccessControl {
        repo: MockAccessRepo {
            admin: false,
            main_agent_of: vec![],
            member_of: vec![],
        },
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MediatureServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MediatureServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        firstname: &str,
        lastname: &str,
        profile_picture: Option<&str>,
    ) -> Result<Option<User>, MediatureServiceError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.firstname = firstname.to_owned();
        user.lastname = lastname.to_owned();
        user.profile_picture = profile_picture.map(str::to_owned);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

// ── MockAuthorityRepo ────────────────────────────────────────────────────────

pub struct MockAuthorityRepo {
    pub authorities: Vec<Authority>,
}

impl AuthorityRepository for MockAuthorityRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Authority>, MediatureServiceError> {
        Ok(self.authorities.iter().find(|a| a.id == id).cloned())
    }
}

// ── MockAgentRepo ────────────────────────────────────────────────────────────

/// Case fixture: assignment plus closed marker.
#[derive(Clone)]
pub struct MockCase {
    pub agent_id: Option<Uuid>,
    pub closed_at: Option<chrono::DateTime<Utc>>,
}

pub struct MockAgentRepo {
    pub agents: Arc<Mutex<Vec<Agent>>>,
    pub users: Vec<User>,
    pub authorities: Vec<Authority>,
    pub main_agents: Arc<Mutex<HashMap<Uuid, Uuid>>>,
    pub cases: Arc<Mutex<Vec<MockCase>>>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockAgentRepo {
    pub fn new(agents: Vec<Agent>, users: Vec<User>, authorities: Vec<Authority>) -> Self {
        let main_agents = authorities
            .iter()
            .filter_map(|a| a.main_agent_id.map(|main| (a.id, main)))
            .collect();
        Self {
            agents: Arc::new(Mutex::new(agents)),
            users,
            authorities,
            main_agents: Arc::new(Mutex::new(main_agents)),
            cases: Arc::new(Mutex::new(vec![])),
            outbox: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn agents_handle(&self) -> Arc<Mutex<Vec<Agent>>> {
        Arc::clone(&self.agents)
    }

    pub fn cases_handle(&self) -> Arc<Mutex<Vec<MockCase>>> {
        Arc::clone(&self.cases)
    }

    pub fn main_agents_handle(&self) -> Arc<Mutex<HashMap<Uuid, Uuid>>> {
        Arc::clone(&self.main_agents)
    }

    pub fn outbox_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.outbox)
    }

    fn user_of(&self, agent: &Agent) -> User {
        self.users
            .iter()
            .find(|u| u.id == agent.user_id)
            .cloned()
            .expect("fixture user missing for agent")
    }
}

impl AgentRepository for MockAgentRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgentDetail>, MediatureServiceError> {
        let agents = self.agents.lock().unwrap();
        Ok(agents.iter().find(|a| a.id == id).map(|agent| AgentDetail {
            agent: agent.clone(),
            user: self.user_of(agent).summary(),
        }))
    }

    async fn exists(
        &self,
        user_id: Uuid,
        authority_id: Uuid,
    ) -> Result<bool, MediatureServiceError> {
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.user_id == user_id && a.authority_id == authority_id))
    }

    async fn create_with_outbox(
        &self,
        agent: &Agent,
        grant_main_agent: bool,
        event: &OutboxEvent,
    ) -> Result<(), MediatureServiceError> {
        self.agents.lock().unwrap().push(agent.clone());
        if grant_main_agent {
            self.main_agents
                .lock()
                .unwrap()
                .insert(agent.authority_id, agent.id);
        }
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn remove_with_outbox(
        &self,
        agent_id: Uuid,
        event: &OutboxEvent,
    ) -> Result<(), MediatureServiceError> {
        for case in self.cases.lock().unwrap().iter_mut() {
            if case.agent_id == Some(agent_id) {
                case.agent_id = None;
            }
        }
        self.main_agents
            .lock()
            .unwrap()
            .retain(|_, main| *main != agent_id);
        self.agents.lock().unwrap().retain(|a| a.id != agent_id);
        self.outbox.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn set_main_agent(
        &self,
        authority_id: Uuid,
        agent_id: Uuid,
    ) -> Result<bool, MediatureServiceError> {
        let member = self
            .agents
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.id == agent_id && a.authority_id == authority_id);
        if !member {
            return Ok(false);
        }
        self.main_agents
            .lock()
            .unwrap()
            .insert(authority_id, agent_id);
        Ok(true)
    }

    async fn list_with_cases(
        &self,
        authority_ids: &[Uuid],
    ) -> Result<Vec<AgentListing>, MediatureServiceError> {
        let main_agents = self.main_agents.lock().unwrap().clone();
        let cases = self.cases.lock().unwrap().clone();
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| authority_ids.contains(&a.authority_id))
            .map(|agent| AgentListing {
                agent: agent.clone(),
                user: self.user_of(agent).summary(),
                is_main_agent: main_agents.get(&agent.authority_id) == Some(&agent.id),
                case_closed_dates: cases
                    .iter()
                    .filter(|c| c.agent_id == Some(agent.id))
                    .map(|c| c.closed_at)
                    .collect(),
            })
            .collect())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Agent, Authority)>, MediatureServiceError> {
        let main_agents = self.main_agents.lock().unwrap().clone();
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|agent| {
                let mut authority = self
                    .authorities
                    .iter()
                    .find(|auth| auth.id == agent.authority_id)
                    .cloned()
                    .expect("fixture authority missing for agent");
                authority.main_agent_id = main_agents.get(&authority.id).copied();
                (agent.clone(), authority)
            })
            .collect())
    }
}

// ── MockInvitationRepo ───────────────────────────────────────────────────────

pub struct MockInvitationRepo {
    pub invitations: Arc<Mutex<Vec<(Invitation, InvitationScope)>>>,
    pub issuers: Vec<User>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockInvitationRepo {
    pub fn new(invitations: Vec<(Invitation, InvitationScope)>, issuers: Vec<User>) -> Self {
        Self {
            invitations: Arc::new(Mutex::new(invitations)),
            issuers,
            outbox: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], vec![])
    }

    pub fn invitations_handle(&self) -> Arc<Mutex<Vec<(Invitation, InvitationScope)>>> {
        Arc::clone(&self.invitations)
    }

    pub fn outbox_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.outbox)
    }

    fn issuer_of(&self, invitation: &Invitation) -> User {
        self.issuers
            .iter()
            .find(|u| u.id == invitation.issuer_id)
            .cloned()
            .expect("fixture issuer missing for invitation")
    }
}

impl InvitationRepository for MockInvitationRepo {
    async fn find_detail_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InvitationDetail>, MediatureServiceError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .find(|(inv, _)| inv.id == id)
            .map(|(invitation, scope)| InvitationDetail {
                invitation: invitation.clone(),
                scope: scope.clone(),
            }))
    }

    async fn find_by_token(
        &self,
        token: Uuid,
    ) -> Result<Option<InvitationListing>, MediatureServiceError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .find(|(inv, _)| inv.token == token)
            .map(|(invitation, _)| InvitationListing {
                invitation: invitation.clone(),
                issuer: self.issuer_of(invitation).summary(),
            }))
    }

    async fn create_agent_invitation_if_absent(
        &self,
        invitation: &Invitation,
        authority_id: Uuid,
        grant_main_agent: bool,
        event: &OutboxEvent,
    ) -> Result<bool, MediatureServiceError> {
        let mut invitations = self.invitations.lock().unwrap();
        let duplicate = invitations.iter().any(|(inv, scope)| {
            matches!(scope, InvitationScope::Agent { authority_id: a, .. } if *a == authority_id)
                && inv.invitee_email == invitation.invitee_email
                && inv.status.is_pending()
        });
        if duplicate {
            return Ok(false);
        }
        invitations.push((
            invitation.clone(),
            InvitationScope::Agent {
                authority_id,
                grant_main_agent,
            },
        ));
        self.outbox.lock().unwrap().push(event.clone());
        Ok(true)
    }

    async fn cancel_if_pending(&self, id: Uuid) -> Result<bool, MediatureServiceError> {
        let mut invitations = self.invitations.lock().unwrap();
        let Some((invitation, _)) = invitations.iter_mut().find(|(inv, _)| inv.id == id) else {
            return Ok(false);
        };
        if !invitation.status.is_pending() {
            return Ok(false);
        }
        invitation.status = InvitationStatus::Canceled;
        invitation.updated_at = Utc::now();
        Ok(true)
    }

    async fn list_agent_invitations(
        &self,
        authority_ids: &[Uuid],
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationListing>, MediatureServiceError> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .filter(|(inv, scope)| {
                matches!(scope, InvitationScope::Agent { authority_id, .. }
                    if authority_ids.contains(authority_id))
                    && status.is_none_or(|s| inv.status == s)
            })
            .map(|(invitation, _)| InvitationListing {
                invitation: invitation.clone(),
                issuer: self.issuer_of(invitation).summary(),
            })
            .collect())
    }
}

// ── MockLiveChatRepo ─────────────────────────────────────────────────────────

pub struct MockLiveChatRepo {
    pub settings: Arc<Mutex<HashMap<Uuid, LiveChatSettings>>>,
}

impl MockLiveChatRepo {
    pub fn empty() -> Self {
        Self {
            settings: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl LiveChatRepository for MockLiveChatRepo {
    async fn get_or_init(
        &self,
        user_id: Uuid,
    ) -> Result<LiveChatSettings, MediatureServiceError> {
        let mut settings = self.settings.lock().unwrap();
        Ok(settings
            .entry(user_id)
            .or_insert_with(|| LiveChatSettings {
                user_id,
                session_token: Uuid::new_v4(),
                created_at: Utc::now(),
            })
            .clone())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        firstname: "Marie".to_owned(),
        lastname: "Dupont".to_owned(),
        profile_picture: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_authority(name: &str) -> Authority {
    Authority {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        slug: name.to_lowercase().replace(' ', "-"),
        kind: "CITY".to_owned(),
        logo_attachment_id: None,
        main_agent_id: None,
    }
}

pub fn test_agent(user: &User, authority: &Authority) -> Agent {
    Agent {
        id: Uuid::new_v4(),
        user_id: user.id,
        authority_id: authority.id,
        created_at: Utc::now(),
    }
}

pub fn test_invitation(issuer: &User, email: &str, status: InvitationStatus) -> Invitation {
    Invitation {
        id: Uuid::new_v4(),
        issuer_id: issuer.id,
        invitee_email: email.to_owned(),
        invitee_firstname: Some("Jean".to_owned()),
        invitee_lastname: Some("Martin".to_owned()),
        token: Uuid::new_v4(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub const TEST_FRONT_BASE_URL: &str = "https://mediature.example.org";
