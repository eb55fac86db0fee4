use std::collections::BTreeSet;
use std::sync::Arc;

use reelhub_application::{RoleProfileRepository, RoleProfileService};
use reelhub_core::AppError;
use reelhub_domain::{
    DetailProfile, ProfileVisibility, RoleCacheEntry, RoleHandle, RoleProfile, RoleProfileError,
    RoleProfileId, RoleType, UserId,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{PostgresRoleProfileRepository, RoleProfileRow};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role profile tests: {error}");
    }

    Some(pool)
}

async fn seed_role(pool: &PgPool, user_id: UserId, role_type: RoleType) -> RoleProfileId {
    let role_profile_id = RoleProfileId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO role_profiles (id, user_id, role_type)
            VALUES ($1, $2, $3)
            "#,
    )
    .bind(role_profile_id.as_uuid())
    .bind(user_id.as_uuid())
    .bind(role_type.as_str())
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    role_profile_id
}

async fn seed_user(pool: &PgPool, role_types: &[RoleType]) -> UserId {
    let user_id = UserId::new();
    for role_type in role_types {
        seed_role(pool, user_id, *role_type).await;
    }
    user_id
}

fn service(pool: &PgPool) -> RoleProfileService {
    RoleProfileService::new(Arc::new(PostgresRoleProfileRepository::new(pool.clone())))
}

#[tokio::test]
async fn activation_persists_role_cache_and_detail() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member, RoleType::Critic]).await;
    let service = service(&pool);
    let handle = RoleHandle::new("night_owl").unwrap_or_else(|_| panic!("test handle"));

    let activation = service
        .activate_role(user_id, RoleType::Critic, Some(handle))
        .await
        .unwrap_or_else(|error| panic!("activation failed: {error}"));
    assert!(activation.detail_created);
    assert!(activation.profile.is_default());

    let repository = PostgresRoleProfileRepository::new(pool.clone());
    let stored = repository
        .find_role(user_id, RoleType::Critic)
        .await
        .unwrap_or_else(|error| panic!("find failed: {error}"));
    assert_eq!(stored.as_ref(), Some(&activation.profile));

    let cache = repository
        .find_role_cache(user_id)
        .await
        .unwrap_or_else(|error| panic!("cache load failed: {error}"));
    assert_eq!(
        cache.map(|entry| entry.roles().clone()),
        Some(BTreeSet::from([RoleType::Critic]))
    );

    let detail = repository
        .find_detail_profile(user_id, RoleType::Critic)
        .await
        .unwrap_or_else(|error| panic!("detail load failed: {error}"));
    assert!(matches!(detail, Some(DetailProfile::Critic(_))));
}

#[tokio::test]
async fn repeated_activation_keeps_single_detail_row() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Talent]).await;
    let service = service(&pool);

    for _ in 0..2 {
        let result = service.activate_role(user_id, RoleType::Talent, None).await;
        assert!(result.is_ok());
    }

    let count = sqlx::query_scalar::<_, i64>(
        r#"
            SELECT COUNT(*)
            FROM talent_profiles
            WHERE user_id = $1
            "#,
    )
    .bind(user_id.as_uuid())
    .fetch_one(&pool)
    .await
    .unwrap_or_else(|error| panic!("count failed: {error}"));
    assert_eq!(count, 1);
}

#[tokio::test]
async fn deactivation_moves_default_and_rejects_last_role() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member, RoleType::Industry]).await;
    let service = service(&pool);

    for role_type in [RoleType::Industry, RoleType::Member] {
        let result = service.activate_role(user_id, role_type, None).await;
        assert!(result.is_ok());
    }

    let deactivated = service
        .deactivate_role(user_id, RoleType::Industry)
        .await
        .unwrap_or_else(|error| panic!("deactivation failed: {error}"));
    assert_eq!(deactivated.visibility(), ProfileVisibility::Private);

    let default_role = service
        .default_role(user_id)
        .await
        .unwrap_or_else(|error| panic!("default query failed: {error}"));
    assert_eq!(
        default_role.as_ref().map(RoleProfile::role_type),
        Some(RoleType::Member)
    );

    let last = service.deactivate_role(user_id, RoleType::Member).await;
    assert!(matches!(last, Err(RoleProfileError::LastActiveRole { .. })));

    let detail = service
        .detail_profile(user_id, RoleType::Industry)
        .await
        .unwrap_or_else(|error| panic!("detail query failed: {error}"));
    assert!(matches!(detail, Some(DetailProfile::Industry(_))));
}

#[tokio::test]
async fn uncommitted_unit_of_work_is_rolled_back() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member]).await;
    let repository = PostgresRoleProfileRepository::new(pool.clone());

    {
        let mut transaction = repository
            .begin()
            .await
            .unwrap_or_else(|error| panic!("begin failed: {error}"));
        let stored = transaction
            .store_role_cache(&RoleCacheEntry::with_roles(
                user_id,
                BTreeSet::from([RoleType::Member]),
            ))
            .await;
        assert!(stored.is_ok());
    }

    let cache = repository
        .find_role_cache(user_id)
        .await
        .unwrap_or_else(|error| panic!("cache load failed: {error}"));
    assert!(cache.is_none());
}

#[tokio::test]
async fn second_default_row_is_rejected_by_store() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member, RoleType::Critic]).await;
    let service = service(&pool);
    for role_type in [RoleType::Member, RoleType::Critic] {
        let result = service.activate_role(user_id, role_type, None).await;
        assert!(result.is_ok());
    }

    let repository = PostgresRoleProfileRepository::new(pool.clone());
    let mut critic = repository
        .find_role(user_id, RoleType::Critic)
        .await
        .unwrap_or_else(|error| panic!("find failed: {error}"))
        .unwrap_or_else(|| panic!("critic role should exist"));
    assert!(critic.mark_default().is_ok());

    let mut transaction = repository
        .begin()
        .await
        .unwrap_or_else(|error| panic!("begin failed: {error}"));
    let result = transaction.save_role(&critic).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn reconcile_all_repairs_missing_caches() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member]).await;
    let activate = sqlx::query(
        r#"
            UPDATE role_profiles
            SET enabled = true, is_default = true
            WHERE user_id = $1
            "#,
    )
    .bind(user_id.as_uuid())
    .execute(&pool)
    .await;
    assert!(activate.is_ok());

    let service = service(&pool);
    let report = service
        .reconcile_all_role_caches()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));
    assert!(report.caches_repaired >= 1);

    let cache = service
        .cached_roles(user_id)
        .await
        .unwrap_or_else(|error| panic!("cache query failed: {error}"));
    assert!(cache.is_some_and(|entry| entry.contains(RoleType::Member)));
}

#[test]
fn stored_handle_with_spaces_is_decoded_verbatim() {
    let row = RoleProfileRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        role_type: "talent".to_owned(),
        enabled: true,
        visibility: "public".to_owned(),
        is_default: true,
        handle: Some("Jane Doe".to_owned()),
    };

    let profile = row
        .into_profile()
        .unwrap_or_else(|error| panic!("decode failed: {error}"));
    assert_eq!(profile.handle().map(RoleHandle::as_str), Some("Jane Doe"));
}

#[test]
fn blank_stored_handle_reads_as_absent() {
    let row = RoleProfileRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        role_type: "member".to_owned(),
        enabled: false,
        visibility: "private".to_owned(),
        is_default: false,
        handle: Some("  ".to_owned()),
    };

    let profile = row
        .into_profile()
        .unwrap_or_else(|error| panic!("decode failed: {error}"));
    assert!(profile.handle().is_none());
}

#[tokio::test]
async fn externally_written_display_handle_does_not_block_transitions() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member, RoleType::Critic]).await;
    let update = sqlx::query(
        r#"
            UPDATE role_profiles
            SET handle = 'Jane Doe'
            WHERE user_id = $1 AND role_type = 'member'
            "#,
    )
    .bind(user_id.as_uuid())
    .execute(&pool)
    .await;
    assert!(update.is_ok());

    let service = service(&pool);
    let roles = service
        .list_roles(user_id)
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));
    assert_eq!(
        roles[0].handle().map(RoleHandle::as_str),
        Some("Jane Doe")
    );

    let handle = RoleHandle::new("Jane D. Critic").unwrap_or_else(|_| panic!("test handle"));
    let activation = service
        .activate_role(user_id, RoleType::Critic, Some(handle))
        .await
        .unwrap_or_else(|error| panic!("activation failed: {error}"));
    assert_eq!(
        activation.profile.handle().map(RoleHandle::as_str),
        Some("Jane D. Critic")
    );
}

#[tokio::test]
async fn concurrent_deactivations_leave_one_active_role() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let user_id = seed_user(&pool, &[RoleType::Member, RoleType::Talent]).await;
    let service = service(&pool);
    for role_type in [RoleType::Member, RoleType::Talent] {
        let result = service.activate_role(user_id, role_type, None).await;
        assert!(result.is_ok());
    }

    let (member, talent) = tokio::join!(
        service.deactivate_role(user_id, RoleType::Member),
        service.deactivate_role(user_id, RoleType::Talent),
    );

    let outcomes = [member, talent];
    let succeeded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let refused = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(RoleProfileError::LastActiveRole { .. })))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(refused, 1);

    let roles = service
        .list_roles(user_id)
        .await
        .unwrap_or_else(|error| panic!("list failed: {error}"));
    let enabled: Vec<&RoleProfile> = roles.iter().filter(|role| role.is_enabled()).collect();
    assert_eq!(enabled.len(), 1);
    assert!(enabled[0].is_default());

    let cache = service
        .cached_roles(user_id)
        .await
        .unwrap_or_else(|error| panic!("cache query failed: {error}"));
    assert_eq!(
        cache.map(|entry| entry.roles().clone()),
        Some(BTreeSet::from([enabled[0].role_type()]))
    );
}
