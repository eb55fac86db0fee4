use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use reelhub_core::{AppError, AppResult};
use reelhub_domain::{
    CriticProfile, DetailProfile, DetailProfileKind, IndustryProfile, RoleProfileId,
    TalentProfile, UserId,
};

/// Key a detail record is looked up by.
#[derive(Debug, Clone, Copy)]
pub(super) enum DetailLookup {
    RoleProfile(RoleProfileId),
    User(UserId),
}

impl DetailLookup {
    fn column(self) -> &'static str {
        match self {
            Self::RoleProfile(_) => "role_profile_id",
            Self::User(_) => "user_id",
        }
    }

    fn value(self) -> Uuid {
        match self {
            Self::RoleProfile(role_profile_id) => role_profile_id.as_uuid(),
            Self::User(user_id) => user_id.as_uuid(),
        }
    }
}

#[derive(Debug, FromRow)]
struct CriticRow {
    role_profile_id: Uuid,
    user_id: Uuid,
    outlet: Option<String>,
    bio: Option<String>,
    verified: bool,
}

#[derive(Debug, FromRow)]
struct TalentRow {
    role_profile_id: Uuid,
    user_id: Uuid,
    skills: Vec<String>,
    bio: Option<String>,
    available_for_casting: bool,
}

#[derive(Debug, FromRow)]
struct IndustryRow {
    role_profile_id: Uuid,
    user_id: Uuid,
    company: Option<String>,
    job_title: Option<String>,
}

fn table_name(kind: DetailProfileKind) -> &'static str {
    match kind {
        DetailProfileKind::Critic => "critic_profiles",
        DetailProfileKind::Talent => "talent_profiles",
        DetailProfileKind::Industry => "industry_profiles",
    }
}

/// Finds the detail record of `kind`, dispatching to the kind's own table.
pub(super) async fn find<'e, E>(
    executor: E,
    kind: DetailProfileKind,
    lookup: DetailLookup,
) -> AppResult<Option<DetailProfile>>
where
    E: PgExecutor<'e>,
{
    let columns = match kind {
        DetailProfileKind::Critic => "role_profile_id, user_id, outlet, bio, verified",
        DetailProfileKind::Talent => {
            "role_profile_id, user_id, skills, bio, available_for_casting"
        }
        DetailProfileKind::Industry => "role_profile_id, user_id, company, job_title",
    };
    let statement = format!(
        "SELECT {columns} FROM {} WHERE {} = $1 LIMIT 1",
        table_name(kind),
        lookup.column()
    );
    let map_error = |error: sqlx::Error| {
        AppError::Internal(format!(
            "failed to find {} detail profile: {error}",
            kind.as_str()
        ))
    };

    let profile = match kind {
        DetailProfileKind::Critic => sqlx::query_as::<_, CriticRow>(statement.as_str())
            .bind(lookup.value())
            .fetch_optional(executor)
            .await
            .map_err(map_error)?
            .map(|row| {
                DetailProfile::Critic(CriticProfile {
                    role_profile_id: RoleProfileId::from_uuid(row.role_profile_id),
                    user_id: UserId::from_uuid(row.user_id),
                    outlet: row.outlet,
                    bio: row.bio,
                    verified: row.verified,
                })
            }),
        DetailProfileKind::Talent => sqlx::query_as::<_, TalentRow>(statement.as_str())
            .bind(lookup.value())
            .fetch_optional(executor)
            .await
            .map_err(map_error)?
            .map(|row| {
                DetailProfile::Talent(TalentProfile {
                    role_profile_id: RoleProfileId::from_uuid(row.role_profile_id),
                    user_id: UserId::from_uuid(row.user_id),
                    skills: row.skills,
                    bio: row.bio,
                    available_for_casting: row.available_for_casting,
                })
            }),
        DetailProfileKind::Industry => sqlx::query_as::<_, IndustryRow>(statement.as_str())
            .bind(lookup.value())
            .fetch_optional(executor)
            .await
            .map_err(map_error)?
            .map(|row| {
                DetailProfile::Industry(IndustryProfile {
                    role_profile_id: RoleProfileId::from_uuid(row.role_profile_id),
                    user_id: UserId::from_uuid(row.user_id),
                    company: row.company,
                    job_title: row.job_title,
                })
            }),
    };

    Ok(profile)
}

/// Inserts a detail record into the table of its kind.
pub(super) async fn insert<'e, E>(executor: E, profile: &DetailProfile) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let result = match profile {
        DetailProfile::Critic(critic) => {
            sqlx::query(
                r#"
                INSERT INTO critic_profiles (role_profile_id, user_id, outlet, bio, verified)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(critic.role_profile_id.as_uuid())
            .bind(critic.user_id.as_uuid())
            .bind(critic.outlet.as_deref())
            .bind(critic.bio.as_deref())
            .bind(critic.verified)
            .execute(executor)
            .await
        }
        DetailProfile::Talent(talent) => {
            sqlx::query(
                r#"
                INSERT INTO talent_profiles (
                    role_profile_id,
                    user_id,
                    skills,
                    bio,
                    available_for_casting
                )
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(talent.role_profile_id.as_uuid())
            .bind(talent.user_id.as_uuid())
            .bind(talent.skills.clone())
            .bind(talent.bio.as_deref())
            .bind(talent.available_for_casting)
            .execute(executor)
            .await
        }
        DetailProfile::Industry(industry) => {
            sqlx::query(
                r#"
                INSERT INTO industry_profiles (role_profile_id, user_id, company, job_title)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(industry.role_profile_id.as_uuid())
            .bind(industry.user_id.as_uuid())
            .bind(industry.company.as_deref())
            .bind(industry.job_title.as_deref())
            .execute(executor)
            .await
        }
    };

    match result {
        Ok(_) => Ok(()),
        Err(error) => {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23505")
            {
                return Err(AppError::Conflict(format!(
                    "{} detail profile already exists for role profile '{}'",
                    profile.kind().as_str(),
                    profile.role_profile_id()
                )));
            }

            Err(AppError::Internal(format!(
                "failed to insert {} detail profile: {error}",
                profile.kind().as_str()
            )))
        }
    }
}
