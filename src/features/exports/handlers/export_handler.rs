use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::exports::renderers::ExportFormat;
use crate::features::exports::services::{ExportFile, ExportService};
use crate::shared::types::DateRangeQuery;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `csv` (default) or `html`
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportRangeQuery {
    /// First day (YYYY-MM-DD), inclusive
    pub start: NaiveDate,
    /// Last day (YYYY-MM-DD), inclusive
    pub end: NaiveDate,
    /// `csv` (default) or `html`
    #[serde(default)]
    pub format: ExportFormat,
}

fn download(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

/// Export the reports filed during a goal's period
#[utoipa::path(
    get,
    path = "/api/goals/{id}/export",
    params(
        ("id" = Uuid, Path, description = "Goal ID"),
        ExportQuery
    ),
    responses(
        (status = 200, description = "Export document", body = String),
        (status = 404, description = "Goal not found or no reports in its period")
    ),
    security(("bearer_auth" = [])),
    tag = "exports"
)]
pub async fn export_goal_reports(
    State(service): State<Arc<ExportService>>,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<ExportQuery>,
) -> Result<Response> {
    Ok(download(service.export_goal(id, query.format).await?))
}

/// Export the reports filed within a day range
#[utoipa::path(
    get,
    path = "/api/projects/{id}/reports/export",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        ExportRangeQuery
    ),
    responses(
        (status = 200, description = "Export document", body = String),
        (status = 400, description = "Invalid range"),
        (status = 404, description = "Project not found or no reports in range")
    ),
    security(("bearer_auth" = [])),
    tag = "exports"
)]
pub async fn export_project_reports(
    State(service): State<Arc<ExportService>>,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<ExportRangeQuery>,
) -> Result<Response> {
    let period = DateRangeQuery {
        start: query.start,
        end: query.end,
    }
    .period()?;

    Ok(download(service.export_range(id, period, query.format).await?))
}

#[cfg(test)]
mod tests {
    use crate::features::daily_reports::models::{NewDailyReport, ReportContents};
    use crate::features::daily_reports::repositories::DailyReportRepository;
    use crate::features::exports::routes::routes;
    use crate::features::exports::services::ExportService;
    use crate::features::weekly_goals::WeeklyGoalService;
    use crate::shared::period::WeekPolicy;
    use crate::shared::test_helpers::{
        at, seed_project, test_user, with_user, InMemoryDailyReportRepository,
        InMemoryProjectRepository, InMemoryWeeklyGoalRepository,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn server() -> (TestServer, Uuid) {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let reports = Arc::new(InMemoryDailyReportRepository::default());
        let user = test_user();
        let project = seed_project(&projects, &user, "Harbour Depot");

        reports
            .insert(&NewDailyReport {
                project_id: project.id,
                created_by: user.user_id,
                author_name: "Dewi".to_string(),
                created_at: at(2025, 1, 14, 9, 0, 0),
                contents: ReportContents {
                    progress_notes: "Piling complete".to_string(),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        let goals = Arc::new(WeeklyGoalService::new(
            Arc::new(InMemoryWeeklyGoalRepository::default()),
            reports,
            projects.clone(),
            WeekPolicy::default(),
        ));
        let service = Arc::new(ExportService::new(goals, projects));

        (
            TestServer::new(with_user(routes(service), user)).unwrap(),
            project.id,
        )
    }

    #[tokio::test]
    async fn test_range_export_is_an_attachment() {
        let (server, project_id) = server().await;

        let response = server
            .get(&format!("/api/projects/{}/reports/export", project_id))
            .add_query_param("start", "2025-01-13")
            .add_query_param("end", "2025-01-18")
            .add_query_param("format", "html")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"harbour-depot-2025-01-13-2025-01-18.html\""
        );
        assert!(response.text().contains("Piling complete"));
    }

    #[tokio::test]
    async fn test_reversed_range_is_rejected() {
        let (server, project_id) = server().await;

        let response = server
            .get(&format!("/api/projects/{}/reports/export", project_id))
            .add_query_param("start", "2025-01-18")
            .add_query_param("end", "2025-01-13")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
