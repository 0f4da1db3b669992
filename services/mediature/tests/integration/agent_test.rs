use uuid::Uuid;

use mediature::error::MediatureServiceError;
use mediature::usecase::agent::{
    AddAgentInput, AddAgentUseCase, GetAgentUseCase, GrantMainAgentInput, GrantMainAgentUseCase,
    ListAgentsUseCase, RemoveAgentInput, RemoveAgentUseCase,
};

use crate::helpers::{
    MockAgentRepo, MockAuthorityRepo, MockCase, MockUserRepo, admin_access, main_agent_access,
    member_access, no_access, test_agent, test_authority, test_user,
};

#[tokio::test]
async fn should_add_agent_when_actor_is_main_agent() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");

    let agents = MockAgentRepo::new(vec![], vec![user.clone()], vec![authority.clone()]);
    let agents_handle = agents.agents_handle();
    let outbox_handle = agents.outbox_handle();

    let uc = AddAgentUseCase {
        access: main_agent_access(vec![authority.id]),
        users: MockUserRepo::new(vec![user.clone()]),
        authorities: MockAuthorityRepo {
            authorities: vec![authority.clone()],
        },
        agents,
    };

    let agent = uc
        .execute(
            Uuid::new_v4(),
            AddAgentInput {
                authority_id: authority.id,
                user_id: user.id,
                grant_main_agent: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(agent.user_id, user.id);
    assert_eq!(agent.authority_id, authority.id);
    assert_eq!(agents_handle.lock().unwrap().len(), 1);

    let outbox = outbox_handle.lock().unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, "agent_added");
    assert_eq!(outbox[0].idempotency_key, format!("agent_added:{}", agent.id));
    assert_eq!(outbox[0].payload["recipient"], user.email);
}

#[tokio::test]
async fn should_report_missing_authority_when_actor_lacks_grant() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");

    let agents = MockAgentRepo::new(vec![], vec![user.clone()], vec![authority.clone()]);
    let agents_handle = agents.agents_handle();

    let uc = AddAgentUseCase {
        access: no_access(),
        users: MockUserRepo::new(vec![user.clone()]),
        authorities: MockAuthorityRepo {
            authorities: vec![authority.clone()],
        },
        agents,
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            AddAgentInput {
                authority_id: authority.id,
                user_id: user.id,
                grant_main_agent: false,
            },
        )
        .await;

    match result {
        Err(MediatureServiceError::NotMainAgent { authority_ids }) => {
            assert_eq!(authority_ids, vec![authority.id]);
        }
        other => panic!("expected NotMainAgent, got {other:?}"),
    }
    assert!(
        agents_handle.lock().unwrap().is_empty(),
        "failed guard must not write"
    );
}

#[tokio::test]
async fn should_reject_duplicate_membership() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let existing = test_agent(&user, &authority);

    let uc = AddAgentUseCase {
        access: admin_access(),
        users: MockUserRepo::new(vec![user.clone()]),
        authorities: MockAuthorityRepo {
            authorities: vec![authority.clone()],
        },
        agents: MockAgentRepo::new(vec![existing], vec![user.clone()], vec![authority.clone()]),
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            AddAgentInput {
                authority_id: authority.id,
                user_id: user.id,
                grant_main_agent: false,
            },
        )
        .await;

    assert!(
        matches!(result, Err(MediatureServiceError::AgentAlreadyExists)),
        "expected AgentAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_unassign_cases_and_clear_main_agent_on_removal() {
    let mut authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &authority);
    authority.main_agent_id = Some(agent.id);

    let agents = MockAgentRepo::new(
        vec![agent.clone()],
        vec![user.clone()],
        vec![authority.clone()],
    );
    agents.cases_handle().lock().unwrap().extend([
        MockCase {
            agent_id: Some(agent.id),
            closed_at: None,
        },
        MockCase {
            agent_id: Some(agent.id),
            closed_at: None,
        },
    ]);
    let agents_handle = agents.agents_handle();
    let cases_handle = agents.cases_handle();
    let main_agents_handle = agents.main_agents_handle();
    let outbox_handle = agents.outbox_handle();

    let uc = RemoveAgentUseCase {
        access: admin_access(),
        authorities: MockAuthorityRepo {
            authorities: vec![authority.clone()],
        },
        agents,
    };

    uc.execute(
        Uuid::new_v4(),
        RemoveAgentInput {
            authority_id: authority.id,
            agent_id: agent.id,
        },
    )
    .await
    .unwrap();

    assert!(agents_handle.lock().unwrap().is_empty());
    assert!(
        cases_handle
            .lock()
            .unwrap()
            .iter()
            .all(|c| c.agent_id.is_none()),
        "removed agent must not stay assigned to any case"
    );
    assert!(main_agents_handle.lock().unwrap().is_empty());

    let outbox = outbox_handle.lock().unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, "agent_removed");
    assert_eq!(
        outbox[0].idempotency_key,
        format!("agent_removed:{}", agent.id)
    );
}

#[tokio::test]
async fn should_not_delete_anything_when_removal_unauthorized() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &authority);

    let agents = MockAgentRepo::new(
        vec![agent.clone()],
        vec![user.clone()],
        vec![authority.clone()],
    );
    agents.cases_handle().lock().unwrap().push(MockCase {
        agent_id: Some(agent.id),
        closed_at: None,
    });
    let agents_handle = agents.agents_handle();
    let cases_handle = agents.cases_handle();

    let uc = RemoveAgentUseCase {
        access: member_access(vec![authority.id]), // member, not main agent
        authorities: MockAuthorityRepo {
            authorities: vec![authority.clone()],
        },
        agents,
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            RemoveAgentInput {
                authority_id: authority.id,
                agent_id: agent.id,
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(MediatureServiceError::NotMainAgent { .. })
    ));
    assert_eq!(agents_handle.lock().unwrap().len(), 1);
    assert_eq!(
        cases_handle.lock().unwrap()[0].agent_id,
        Some(agent.id),
        "failed removal must leave case assignments intact"
    );
}

#[tokio::test]
async fn should_reject_removal_of_agent_from_another_authority() {
    let authority = test_authority("Ville de Reims");
    let other = test_authority("Ville de Metz");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &other);

    let uc = RemoveAgentUseCase {
        access: admin_access(),
        authorities: MockAuthorityRepo {
            authorities: vec![authority.clone(), other.clone()],
        },
        agents: MockAgentRepo::new(
            vec![agent.clone()],
            vec![user.clone()],
            vec![authority.clone(), other],
        ),
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            RemoveAgentInput {
                authority_id: authority.id,
                agent_id: agent.id,
            },
        )
        .await;

    assert!(
        matches!(result, Err(MediatureServiceError::AgentOutsideAuthority)),
        "expected AgentOutsideAuthority, got {result:?}"
    );
}

#[tokio::test]
async fn should_grant_main_agent_within_authority() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &authority);

    let agents = MockAgentRepo::new(
        vec![agent.clone()],
        vec![user.clone()],
        vec![authority.clone()],
    );
    let main_agents_handle = agents.main_agents_handle();

    let uc = GrantMainAgentUseCase {
        access: main_agent_access(vec![authority.id]),
        agents,
    };

    uc.execute(
        Uuid::new_v4(),
        GrantMainAgentInput {
            authority_id: authority.id,
            agent_id: agent.id,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        main_agents_handle.lock().unwrap().get(&authority.id),
        Some(&agent.id)
    );
}

#[tokio::test]
async fn should_reject_cross_authority_main_agent_grant() {
    let authority = test_authority("Ville de Reims");
    let other = test_authority("Ville de Metz");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &other);

    let agents = MockAgentRepo::new(
        vec![agent.clone()],
        vec![user.clone()],
        vec![authority.clone(), other.clone()],
    );
    let main_agents_handle = agents.main_agents_handle();

    let uc = GrantMainAgentUseCase {
        access: admin_access(),
        agents,
    };

    let result = uc
        .execute(
            Uuid::new_v4(),
            GrantMainAgentInput {
                authority_id: authority.id,
                agent_id: agent.id,
            },
        )
        .await;

    assert!(
        matches!(result, Err(MediatureServiceError::AgentOutsideAuthority)),
        "expected AgentOutsideAuthority, got {result:?}"
    );
    assert!(main_agents_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_get_agent_as_authority_member() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &authority);

    let uc = GetAgentUseCase {
        access: member_access(vec![authority.id]),
        agents: MockAgentRepo::new(
            vec![agent.clone()],
            vec![user.clone()],
            vec![authority.clone()],
        ),
    };

    let detail = uc.execute(Uuid::new_v4(), agent.id).await.unwrap();
    assert_eq!(detail.agent.id, agent.id);
    assert_eq!(detail.user.email, user.email);
}

#[tokio::test]
async fn should_hide_agent_from_outsiders() {
    let authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &authority);

    let uc = GetAgentUseCase {
        access: no_access(),
        agents: MockAgentRepo::new(
            vec![agent.clone()],
            vec![user.clone()],
            vec![authority.clone()],
        ),
    };

    let result = uc.execute(Uuid::new_v4(), agent.id).await;
    assert!(matches!(
        result,
        Err(MediatureServiceError::NotAuthorityAgent { .. })
    ));
}

#[tokio::test]
async fn should_list_agents_with_case_tallies() {
    let mut authority = test_authority("Ville de Reims");
    let user = test_user("marie@example.com");
    let agent = test_agent(&user, &authority);
    authority.main_agent_id = Some(agent.id);

    let agents = MockAgentRepo::new(
        vec![agent.clone()],
        vec![user.clone()],
        vec![authority.clone()],
    );
    agents.cases_handle().lock().unwrap().extend([
        MockCase {
            agent_id: Some(agent.id),
            closed_at: None,
        },
        MockCase {
            agent_id: Some(agent.id),
            closed_at: Some(chrono::Utc::now()),
        },
        MockCase {
            agent_id: None,
            closed_at: None,
        },
    ]);

    let uc = ListAgentsUseCase {
        access: member_access(vec![authority.id]),
        agents,
    };

    let listed = uc.execute(Uuid::new_v4(), &[authority.id]).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_main_agent);
    assert_eq!(listed[0].open_cases, 1);
    assert_eq!(listed[0].close_cases, 1);
}

#[tokio::test]
async fn should_require_membership_of_every_requested_authority() {
    let authority = test_authority("Ville de Reims");
    let other = test_authority("Ville de Metz");
    let user = test_user("marie@example.com");

    let uc = ListAgentsUseCase {
        access: member_access(vec![authority.id]),
        agents: MockAgentRepo::new(
            vec![],
            vec![user],
            vec![authority.clone(), other.clone()],
        ),
    };

    let result = uc
        .execute(Uuid::new_v4(), &[authority.id, other.id])
        .await;
    match result {
        Err(MediatureServiceError::NotAuthorityAgent { authority_ids }) => {
            assert_eq!(authority_ids, vec![other.id]);
        }
        other => panic!("expected NotAuthorityAgent, got {other:?}"),
    }
}
