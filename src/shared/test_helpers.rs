//! In-memory stand-ins for the repositories and collaborators, plus request
//! helpers for router tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::contributors::models::{
    Contributor, InvitationState, MembershipState, NewContributor, PendingInvitation, Permission,
};
use crate::features::contributors::repositories::ContributorRepository;
use crate::features::daily_reports::models::{
    DailyReport, DailyReportDetail, NewDailyReport, ReportContents, ReportOrder, ReviewStatus,
    Weather,
};
use crate::features::daily_reports::repositories::DailyReportRepository;
use crate::features::notifications::{InvitationEmail, Notifier};
use crate::features::projects::models::{NewProject, Project};
use crate::features::projects::repositories::ProjectRepository;
use crate::features::users::{DirectoryUser, UserDirectory};
use crate::features::weekly_goals::models::{NewWeeklyGoal, WeeklyGoal};
use crate::features::weekly_goals::repositories::WeeklyGoalRepository;
use crate::shared::period::Period;

// =============================================================================
// FIXTURES
// =============================================================================

pub fn test_user() -> AuthenticatedUser {
    let email: String = SafeEmail().fake();
    AuthenticatedUser {
        user_id: Uuid::now_v7(),
        email: email.to_lowercase(),
        name: Some(Name().fake()),
    }
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Stores a project owned by `owner` without going through the service
pub fn seed_project(
    projects: &InMemoryProjectRepository,
    owner: &AuthenticatedUser,
    name: &str,
) -> Project {
    projects.store(NewProject {
        name: name.to_string(),
        description: None,
        created_by: owner.user_id,
    })
}

async fn inject_user(user: AuthenticatedUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Makes every request in `router` arrive as `user`
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(move |request: Request, next: Next| {
        inject_user(user.clone(), request, next)
    }))
}

// =============================================================================
// PROJECTS
// =============================================================================

/// Names of every project created in this test process, for joins done by
/// other in-memory repositories
fn project_names() -> &'static Mutex<HashMap<Uuid, String>> {
    static NAMES: OnceLock<Mutex<HashMap<Uuid, String>>> = OnceLock::new();
    NAMES.get_or_init(Default::default)
}

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<Vec<Project>>,
}

impl InMemoryProjectRepository {
    fn store(&self, project: NewProject) -> Project {
        let now = Utc::now();
        let project = Project {
            id: Uuid::now_v7(),
            name: project.name,
            description: project.description,
            created_by: project.created_by,
            created_at: now,
            updated_at: now,
        };
        project_names()
            .lock()
            .unwrap()
            .insert(project.id, project.name.clone());
        self.projects.lock().unwrap().push(project.clone());
        project
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project> {
        Ok(self.store(NewProject {
            name: project.name.clone(),
            description: project.description.clone(),
            created_by: project.created_by,
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.created_by == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() < before)
    }
}

// =============================================================================
// CONTRIBUTORS
// =============================================================================

/// Keeps `(project_id, email)` unique like the database index does
#[derive(Default)]
pub struct InMemoryContributorRepository {
    rows: Mutex<Vec<Contributor>>,
    stale_reads: bool,
}

impl InMemoryContributorRepository {
    /// The existence check never sees any row, so only the uniqueness check on
    /// insert can catch a repeated email
    pub fn with_stale_reads() -> Self {
        Self {
            rows: Mutex::default(),
            stale_reads: true,
        }
    }

    pub fn rows_for(&self, project_id: Uuid) -> Vec<Contributor> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect()
    }

    pub fn all_rows(&self) -> Vec<Contributor> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContributorRepository for InMemoryContributorRepository {
    async fn find_existing_emails(
        &self,
        project_id: Uuid,
        emails: &[String],
    ) -> Result<Vec<String>> {
        if self.stale_reads {
            return Ok(Vec::new());
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.project_id == project_id && emails.contains(&c.email))
            .map(|c| c.email.clone())
            .collect())
    }

    async fn insert_batch(
        &self,
        project_id: Uuid,
        entries: &[NewContributor],
    ) -> Result<Vec<Contributor>> {
        let mut rows = self.rows.lock().unwrap();
        let mut taken: HashSet<String> = rows
            .iter()
            .filter(|c| c.project_id == project_id)
            .map(|c| c.email.clone())
            .collect();

        let now = Utc::now();
        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            if !taken.insert(entry.email.clone()) {
                return Err(AppError::AlreadyInvited(vec![entry.email.clone()]));
            }
            created.push(Contributor {
                id: Uuid::now_v7(),
                project_id,
                email: entry.email.clone(),
                permission: entry.permission,
                linked_user_id: entry.linked_user_id,
                is_referral: entry.is_referral(),
                membership_state: entry.membership_state(),
                invitation_state: InvitationState::Pending,
                created_at: now,
                updated_at: now,
            });
        }

        rows.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Contributor>> {
        Ok(self.rows_for(project_id))
    }

    async fn link_user(&self, email: &str, user_id: Uuid) -> Result<Vec<Contributor>> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let mut changed = Vec::new();
        for row in rows.iter_mut().filter(|c| c.email == email) {
            if row.linked_user_id == Some(user_id)
                && row.membership_state == MembershipState::SignedUp
            {
                continue;
            }
            row.linked_user_id = Some(user_id);
            row.membership_state = MembershipState::SignedUp;
            row.updated_at = now;
            changed.push(row.clone());
        }
        Ok(changed)
    }

    async fn respond(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        state: InvitationState,
    ) -> Result<Option<Contributor>> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|c| {
            c.linked_user_id == Some(user_id)
                && c.project_id == project_id
                && c.invitation_state == InvitationState::Pending
                && c.membership_state == MembershipState::SignedUp
                && c.is_referral
        });

        Ok(row.map(|row| {
            row.invitation_state = state;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn update_permission(
        &self,
        project_id: Uuid,
        email: &str,
        permission: Permission,
    ) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|c| c.project_id == project_id && c.email == email)
        {
            Some(row) => {
                row.permission = permission;
                row.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_pending_invitations(&self, user_id: Uuid) -> Result<Vec<PendingInvitation>> {
        let names = project_names().lock().unwrap();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| {
                c.linked_user_id == Some(user_id)
                    && c.invitation_state == InvitationState::Pending
                    && c.membership_state == MembershipState::SignedUp
                    && c.is_referral
            })
            .filter_map(|c| {
                names.get(&c.project_id).map(|name| PendingInvitation {
                    contributor_id: c.id,
                    project_id: c.project_id,
                    project_name: name.clone(),
                    permission: c.permission,
                    invited_at: c.created_at,
                })
            })
            .collect())
    }
}

// =============================================================================
// WEEKLY GOALS
// =============================================================================

/// Keeps `(project_id, period_start, period_end)` unique
#[derive(Default)]
pub struct InMemoryWeeklyGoalRepository {
    goals: Mutex<Vec<WeeklyGoal>>,
    unavailable: bool,
}

impl InMemoryWeeklyGoalRepository {
    /// Every write fails as if the database were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn count_for(&self, project_id: Uuid) -> usize {
        self.goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.project_id == project_id)
            .count()
    }
}

fn period_taken() -> AppError {
    AppError::Conflict("A goal already exists for this period".to_string())
}

fn same_key(goal: &WeeklyGoal, project_id: Uuid, period: &Period) -> bool {
    goal.project_id == project_id
        && goal.period_start == period.start
        && goal.period_end == period.end
}

#[async_trait]
impl WeeklyGoalRepository for InMemoryWeeklyGoalRepository {
    async fn insert_many(
        &self,
        project_id: Uuid,
        goals: &[NewWeeklyGoal],
    ) -> Result<Vec<WeeklyGoal>> {
        if self.unavailable {
            return Err(AppError::Internal("goal store unavailable".to_string()));
        }
        let mut stored = self.goals.lock().unwrap();
        let now = Utc::now();
        let mut created: Vec<WeeklyGoal> = Vec::with_capacity(goals.len());

        for goal in goals {
            let taken = stored
                .iter()
                .chain(created.iter())
                .any(|g| same_key(g, project_id, &goal.period));
            if taken {
                return Err(period_taken());
            }
            created.push(WeeklyGoal {
                id: Uuid::now_v7(),
                project_id,
                title: goal.title.clone(),
                description: goal.description.clone(),
                period_start: goal.period.start,
                period_end: goal.period.end,
                created_at: now,
                updated_at: now,
            });
        }

        stored.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WeeklyGoal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == id)
            .cloned())
    }

    async fn find_by_period(&self, project_id: Uuid, period: &Period) -> Result<Option<WeeklyGoal>> {
        Ok(self
            .goals
            .lock()
            .unwrap()
            .iter()
            .find(|g| same_key(g, project_id, period))
            .cloned())
    }

    async fn upsert_for_period(&self, project_id: Uuid, goal: &NewWeeklyGoal) -> Result<WeeklyGoal> {
        let mut stored = self.goals.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = stored
            .iter_mut()
            .find(|g| same_key(g, project_id, &goal.period))
        {
            existing.title = goal.title.clone();
            existing.description = goal.description.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = WeeklyGoal {
            id: Uuid::now_v7(),
            project_id,
            title: goal.title.clone(),
            description: goal.description.clone(),
            period_start: goal.period.start,
            period_end: goal.period.end,
            created_at: now,
            updated_at: now,
        };
        stored.push(created.clone());
        Ok(created)
    }

    async fn update(&self, goal: &WeeklyGoal) -> Result<Option<WeeklyGoal>> {
        let mut stored = self.goals.lock().unwrap();
        let period = goal.period();
        if stored
            .iter()
            .any(|g| g.id != goal.id && same_key(g, goal.project_id, &period))
        {
            return Err(period_taken());
        }

        Ok(stored.iter_mut().find(|g| g.id == goal.id).map(|existing| {
            existing.title = goal.title.clone();
            existing.description = goal.description.clone();
            existing.period_start = goal.period_start;
            existing.period_end = goal.period_end;
            existing.updated_at = Utc::now();
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut stored = self.goals.lock().unwrap();
        let before = stored.len();
        stored.retain(|g| g.id != id);
        Ok(stored.len() < before)
    }

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<WeeklyGoal>> {
        let mut goals: Vec<WeeklyGoal> = self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.project_id == project_id)
            .cloned()
            .collect();
        goals.sort_by_key(|g| (g.period_start, g.period_end));
        Ok(goals)
    }

    async fn list_started_before(
        &self,
        project_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<WeeklyGoal>> {
        let mut goals: Vec<WeeklyGoal> = self
            .goals
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.project_id == project_id && g.period_start < date)
            .cloned()
            .collect();
        goals.sort_by_key(|g| std::cmp::Reverse((g.period_start, g.period_end)));
        Ok(goals)
    }
}

// =============================================================================
// DAILY REPORTS
// =============================================================================

#[derive(Default)]
struct ReportStore {
    reports: Vec<DailyReportDetail>,
    weather: HashMap<Uuid, Weather>,
}

#[derive(Default)]
pub struct InMemoryDailyReportRepository {
    store: Mutex<ReportStore>,
}

impl InMemoryDailyReportRepository {
    /// Weather rows still stored, owned or not
    pub fn weather_count(&self) -> usize {
        self.store.lock().unwrap().weather.len()
    }
}

impl ReportStore {
    fn write_contents(&mut self, index: usize, contents: &ReportContents) -> DailyReportDetail {
        if let Some(old) = self.reports[index].report.weather_id.take() {
            self.weather.remove(&old);
        }

        let weather_id = contents.weather.as_ref().map(|weather| {
            let id = Uuid::now_v7();
            self.weather.insert(id, weather.clone());
            id
        });

        let detail = &mut self.reports[index];
        detail.report.progress_notes = contents.progress_notes.clone();
        detail.report.delay_hours = contents.delay_hours;
        detail.report.photo_urls = contents.photo_urls.clone();
        detail.report.weather_id = weather_id;
        detail.labour = contents.labour.clone();
        detail.materials = contents.materials.clone();
        detail.plant = contents.plant.clone();
        detail.weather = contents.weather.clone();
        detail.clone()
    }
}

#[async_trait]
impl DailyReportRepository for InMemoryDailyReportRepository {
    async fn insert(&self, report: &NewDailyReport) -> Result<DailyReportDetail> {
        let mut store = self.store.lock().unwrap();
        store.reports.push(DailyReportDetail {
            report: DailyReport {
                id: Uuid::now_v7(),
                project_id: report.project_id,
                progress_notes: String::new(),
                delay_hours: None,
                weather_id: None,
                photo_urls: Vec::new(),
                status: ReviewStatus::Unreviewed,
                created_by: report.created_by,
                author_name: report.author_name.clone(),
                created_at: report.created_at,
                updated_at: report.created_at,
            },
            labour: Vec::new(),
            materials: Vec::new(),
            plant: Vec::new(),
            weather: None,
        });
        let index = store.reports.len() - 1;
        Ok(store.write_contents(index, &report.contents))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DailyReportDetail>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .reports
            .iter()
            .find(|d| d.report.id == id)
            .cloned())
    }

    async fn replace_contents(
        &self,
        id: Uuid,
        contents: &ReportContents,
    ) -> Result<Option<DailyReportDetail>> {
        let mut store = self.store.lock().unwrap();
        let Some(index) = store.reports.iter().position(|d| d.report.id == id) else {
            return Ok(None);
        };
        let mut detail = store.write_contents(index, contents);
        detail.report.updated_at = Utc::now();
        store.reports[index].report.updated_at = detail.report.updated_at;
        Ok(Some(detail))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut store = self.store.lock().unwrap();
        let Some(index) = store.reports.iter().position(|d| d.report.id == id) else {
            return Ok(false);
        };
        let removed = store.reports.remove(index);
        if let Some(weather_id) = removed.report.weather_id {
            store.weather.remove(&weather_id);
        }
        Ok(true)
    }

    async fn set_status(&self, id: Uuid, status: ReviewStatus) -> Result<Option<DailyReport>> {
        let mut store = self.store.lock().unwrap();
        Ok(store
            .reports
            .iter_mut()
            .find(|d| d.report.id == id)
            .map(|detail| {
                detail.report.status = status;
                detail.report.updated_at = Utc::now();
                detail.report.clone()
            }))
    }

    async fn list_by_project(
        &self,
        project_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        order: ReportOrder,
    ) -> Result<Vec<DailyReportDetail>> {
        let mut reports: Vec<DailyReportDetail> = self
            .store
            .lock()
            .unwrap()
            .reports
            .iter()
            .filter(|d| d.report.project_id == project_id)
            .filter(|d| match window {
                Some((from, to)) => d.report.created_at >= from && d.report.created_at <= to,
                None => true,
            })
            .cloned()
            .collect();

        reports.sort_by_key(|d| d.report.created_at);
        if order == ReportOrder::NewestFirst {
            reports.reverse();
        }
        Ok(reports)
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<String, Uuid>>,
    failing: Mutex<HashSet<String>>,
    signing_up: Mutex<HashMap<String, Uuid>>,
}

impl InMemoryUserDirectory {
    /// Registers an account and returns its id
    pub fn add(&self, email: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.users.lock().unwrap().insert(email.to_lowercase(), id);
        id
    }

    /// Lookups for `email` fail from now on
    pub fn fail_for(&self, email: &str) {
        self.failing.lock().unwrap().insert(email.to_lowercase());
    }

    /// The next lookup for `email` misses, and the account exists right after
    /// it, as if the user signed up while the lookup was in flight
    pub fn sign_up_after_next_lookup(&self, email: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.signing_up
            .lock()
            .unwrap()
            .insert(email.to_lowercase(), id);
        id
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<DirectoryUser>> {
        let email = email.to_lowercase();
        if self.failing.lock().unwrap().contains(&email) {
            return Err(AppError::ExternalServiceError(format!(
                "directory unavailable for {}",
                email
            )));
        }
        if let Some(id) = self.signing_up.lock().unwrap().remove(&email) {
            self.users.lock().unwrap().insert(email, id);
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&email)
            .map(|id| DirectoryUser { id: *id }))
    }
}

/// Records delivered invitations; sends to `failing` return an error
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    failing: Option<String>,
}

impl RecordingNotifier {
    pub fn failing_for(email: &str) -> Self {
        Self {
            sent: Mutex::default(),
            failing: Some(email.to_string()),
        }
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()> {
        if self.failing.as_deref() == Some(invitation.email.as_str()) {
            return Err(AppError::ExternalServiceError(
                "SMTP relay rejected the message".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(invitation.email.clone());
        Ok(())
    }
}
