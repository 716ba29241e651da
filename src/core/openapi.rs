use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::contributors::{
    dtos as contributors_dtos, handlers as contributors_handlers, models as contributors_models,
};
use crate::features::daily_reports::{
    dtos as daily_reports_dtos, handlers as daily_reports_handlers, models as daily_reports_models,
};
use crate::features::exports::{handlers as exports_handlers, renderers as exports_renderers};
use crate::features::projects::{dtos as projects_dtos, handlers as projects_handlers};
use crate::features::weekly_goals::{dtos as weekly_goals_dtos, handlers as weekly_goals_handlers};
use crate::shared::period::Period;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Projects
        projects_handlers::create_project,
        projects_handlers::list_projects,
        projects_handlers::get_project,
        // Contributors
        contributors_handlers::invite_contributors,
        contributors_handlers::list_contributors,
        contributors_handlers::edit_permissions,
        // Invitations
        contributors_handlers::respond_to_invitation,
        contributors_handlers::list_pending_invitations,
        contributors_handlers::reconcile_signup,
        // Periods
        weekly_goals_handlers::get_current_period,
        // Weekly goals
        weekly_goals_handlers::list_goals,
        weekly_goals_handlers::create_goals,
        weekly_goals_handlers::get_current_goal,
        weekly_goals_handlers::upsert_current_goal,
        weekly_goals_handlers::get_goal_for_period,
        weekly_goals_handlers::upsert_goal_for_period,
        weekly_goals_handlers::list_past_goals,
        weekly_goals_handlers::list_reports_in_range,
        weekly_goals_handlers::get_goal,
        weekly_goals_handlers::update_goal,
        weekly_goals_handlers::delete_goal,
        weekly_goals_handlers::get_goal_reports,
        // Daily reports
        daily_reports_handlers::create_report,
        daily_reports_handlers::list_project_reports,
        daily_reports_handlers::get_report,
        daily_reports_handlers::replace_report_contents,
        daily_reports_handlers::update_report_status,
        daily_reports_handlers::delete_report,
        // Exports
        exports_handlers::export_goal_reports,
        exports_handlers::export_project_reports,
    ),
    components(
        schemas(
            Meta,
            Period,
            auth::AuthenticatedUser,
            // Projects
            projects_dtos::CreateProjectDto,
            projects_dtos::ProjectResponseDto,
            projects_dtos::ProjectCreatedDto,
            ApiResponse<projects_dtos::ProjectCreatedDto>,
            ApiResponse<projects_dtos::ProjectResponseDto>,
            ApiResponse<Vec<projects_dtos::ProjectResponseDto>>,
            // Contributors
            contributors_models::Permission,
            contributors_models::MembershipState,
            contributors_models::InvitationState,
            contributors_models::InvitationDecision,
            contributors_dtos::InviteContributorDto,
            contributors_dtos::InviteContributorsDto,
            contributors_dtos::PermissionEditDto,
            contributors_dtos::EditPermissionsDto,
            contributors_dtos::PermissionEditResultDto,
            contributors_dtos::RespondInvitationDto,
            contributors_dtos::ContributorResponseDto,
            contributors_dtos::PendingInvitationDto,
            ApiResponse<contributors_dtos::ContributorResponseDto>,
            ApiResponse<Vec<contributors_dtos::ContributorResponseDto>>,
            ApiResponse<contributors_dtos::PermissionEditResultDto>,
            ApiResponse<Vec<contributors_dtos::PendingInvitationDto>>,
            // Weekly goals
            weekly_goals_dtos::CreateWeeklyGoalDto,
            weekly_goals_dtos::CreateWeeklyGoalsDto,
            weekly_goals_dtos::UpsertWeeklyGoalDto,
            weekly_goals_dtos::UpdateWeeklyGoalDto,
            weekly_goals_dtos::WeeklyGoalResponseDto,
            weekly_goals_dtos::GoalReportsDto,
            weekly_goals_dtos::CurrentPeriodDto,
            ApiResponse<weekly_goals_dtos::CurrentPeriodDto>,
            ApiResponse<weekly_goals_dtos::WeeklyGoalResponseDto>,
            ApiResponse<Vec<weekly_goals_dtos::WeeklyGoalResponseDto>>,
            ApiResponse<weekly_goals_dtos::GoalReportsDto>,
            // Daily reports
            daily_reports_models::ReviewStatus,
            daily_reports_models::LabourEntry,
            daily_reports_models::MaterialEntry,
            daily_reports_models::PlantEntry,
            daily_reports_models::Weather,
            daily_reports_dtos::ReportContentsDto,
            daily_reports_dtos::UpdateReportStatusDto,
            daily_reports_dtos::DailyReportResponseDto,
            ApiResponse<daily_reports_dtos::DailyReportResponseDto>,
            ApiResponse<Vec<daily_reports_dtos::DailyReportResponseDto>>,
            // Exports
            exports_renderers::ExportFormat,
        )
    ),
    tags(
        (name = "projects", description = "Construction projects"),
        (name = "contributors", description = "Project contributors and permissions"),
        (name = "invitations", description = "Invitations addressed to the signed-in user"),
        (name = "periods", description = "Reporting period calculator"),
        (name = "weekly-goals", description = "Weekly goals and the reports they cover"),
        (name = "daily-reports", description = "Daily site reports"),
        (name = "exports", description = "Printable report exports (CSV, HTML)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Site Coordinator API",
        version = "0.1.0",
        description = "API documentation for the site collaboration coordinator",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
