#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use pushkind_visits::db::{DbPool, establish_connection_pool};
use pushkind_visits::domain::actor::Actor;
use pushkind_visits::domain::team_member::{NewTeamMember, TeamMember};
use pushkind_visits::domain::types::{MemberName, Role, UserEmail, UserId};
use pushkind_visits::models::config::DatabaseConfig;
use pushkind_visits::repository::{DieselRepository, TeamMemberWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Throw-away SQLite database living in its own temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, &DatabaseConfig::default())
    }

    pub fn with_config(name: &str, config: &DatabaseConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"), config)
            .expect("create connection pool");

        pool.get()
            .expect("get connection")
            .run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub fn add_member(repo: &DieselRepository, name: &str, role: Role) -> TeamMember {
    let new_member = NewTeamMember::new(
        MemberName::new(name).expect("valid name"),
        UserEmail::new(format!("{}@example.com", name.to_lowercase())).expect("valid email"),
        role,
    );
    repo.create_team_member(&new_member)
        .expect("create team member")
}

pub fn actor(member: &TeamMember) -> Actor {
    Actor::new(member.id, member.role)
}

pub fn user(id: i32) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Roster used by most tests: one admin and two field agents.
pub struct Roster {
    pub admin: TeamMember,
    pub agent1: TeamMember,
    pub agent2: TeamMember,
}

impl Roster {
    pub fn seed(repo: &DieselRepository) -> Self {
        Self {
            admin: add_member(repo, "Ada", Role::Admin),
            agent1: add_member(repo, "Tom", Role::Team),
            agent2: add_member(repo, "Tia", Role::Team),
        }
    }
}
