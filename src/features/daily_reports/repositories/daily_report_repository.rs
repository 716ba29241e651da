use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::daily_reports::models::{
    DailyReport, DailyReportDetail, LabourEntry, MaterialEntry, NewDailyReport, PlantEntry,
    ReportContents, ReportOrder, ReviewStatus, Weather,
};

/// Storage for daily reports and the records they own.
///
/// Every write that touches sub-records runs in one transaction.
#[async_trait]
pub trait DailyReportRepository: Send + Sync {
    async fn insert(&self, report: &NewDailyReport) -> Result<DailyReportDetail>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DailyReportDetail>>;

    /// Drops the previous sub-records (weather included) and writes `contents`
    async fn replace_contents(
        &self,
        id: Uuid,
        contents: &ReportContents,
    ) -> Result<Option<DailyReportDetail>>;

    /// Returns false when the report did not exist
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn set_status(&self, id: Uuid, status: ReviewStatus) -> Result<Option<DailyReport>>;

    /// Reports of a project, optionally restricted to `created_at` within the
    /// inclusive `window`
    async fn list_by_project(
        &self,
        project_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        order: ReportOrder,
    ) -> Result<Vec<DailyReportDetail>>;
}

pub struct PgDailyReportRepository {
    pool: PgPool,
}

impl PgDailyReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REPORT_COLUMNS: &str = "id, project_id, progress_notes, delay_hours, weather_id, \
    photo_urls, status, created_by, author_name, created_at, updated_at";

#[derive(FromRow)]
struct LabourRow {
    report_id: Uuid,
    name: String,
    role: Option<String>,
    quantity: Option<Decimal>,
}

#[derive(FromRow)]
struct MaterialRow {
    report_id: Uuid,
    material_type: String,
    description: Option<String>,
    quantity: Option<Decimal>,
    unit: Option<String>,
}

#[derive(FromRow)]
struct PlantRow {
    report_id: Uuid,
    description: String,
    quantity: Option<Decimal>,
}

#[derive(FromRow)]
struct WeatherRow {
    id: Uuid,
    condition: Option<String>,
    temperature: Option<Decimal>,
    humidity: Option<Decimal>,
    wind_speed: Option<Decimal>,
    remarks: Option<String>,
}

impl PgDailyReportRepository {
    async fn insert_weather(
        tx: &mut Transaction<'_, Postgres>,
        weather: &Weather,
    ) -> Result<Uuid> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO weather_records (id, condition, temperature, humidity, wind_speed, remarks)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&weather.condition)
        .bind(weather.temperature)
        .bind(weather.humidity)
        .bind(weather.wind_speed)
        .bind(&weather.remarks)
        .execute(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Writes the owned sub-records of a report, in input order
    async fn insert_entries(
        tx: &mut Transaction<'_, Postgres>,
        report_id: Uuid,
        contents: &ReportContents,
    ) -> Result<()> {
        for (position, entry) in contents.labour.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO labour_entries (id, report_id, position, name, role, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(report_id)
            .bind(position as i32)
            .bind(&entry.name)
            .bind(&entry.role)
            .bind(entry.quantity)
            .execute(&mut **tx)
            .await?;
        }

        for (position, entry) in contents.materials.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO material_entries
                    (id, report_id, position, material_type, description, quantity, unit)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(report_id)
            .bind(position as i32)
            .bind(&entry.material_type)
            .bind(&entry.description)
            .bind(entry.quantity)
            .bind(&entry.unit)
            .execute(&mut **tx)
            .await?;
        }

        for (position, entry) in contents.plant.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO plant_entries (id, report_id, position, description, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(report_id)
            .bind(position as i32)
            .bind(&entry.description)
            .bind(entry.quantity)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    async fn delete_entries(tx: &mut Transaction<'_, Postgres>, report_id: Uuid) -> Result<()> {
        for table in ["labour_entries", "material_entries", "plant_entries"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE report_id = $1"))
                .bind(report_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn delete_weather(tx: &mut Transaction<'_, Postgres>, weather_id: Option<Uuid>) -> Result<()> {
        if let Some(weather_id) = weather_id {
            sqlx::query("DELETE FROM weather_records WHERE id = $1")
                .bind(weather_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Resolves sub-records for a set of report rows with one query per table
    async fn hydrate(&self, reports: Vec<DailyReport>) -> Result<Vec<DailyReportDetail>> {
        if reports.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = reports.iter().map(|r| r.id).collect();
        let weather_ids: Vec<Uuid> = reports.iter().filter_map(|r| r.weather_id).collect();

        let labour = sqlx::query_as::<_, LabourRow>(
            r#"
            SELECT report_id, name, role, quantity
            FROM labour_entries
            WHERE report_id = ANY($1)
            ORDER BY report_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let materials = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT report_id, material_type, description, quantity, unit
            FROM material_entries
            WHERE report_id = ANY($1)
            ORDER BY report_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let plant = sqlx::query_as::<_, PlantRow>(
            r#"
            SELECT report_id, description, quantity
            FROM plant_entries
            WHERE report_id = ANY($1)
            ORDER BY report_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let weather = sqlx::query_as::<_, WeatherRow>(
            r#"
            SELECT id, condition, temperature, humidity, wind_speed, remarks
            FROM weather_records
            WHERE id = ANY($1)
            "#,
        )
        .bind(&weather_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut labour_by_report: HashMap<Uuid, Vec<LabourEntry>> = HashMap::new();
        for row in labour {
            labour_by_report.entry(row.report_id).or_default().push(LabourEntry {
                name: row.name,
                role: row.role,
                quantity: row.quantity,
            });
        }

        let mut materials_by_report: HashMap<Uuid, Vec<MaterialEntry>> = HashMap::new();
        for row in materials {
            materials_by_report
                .entry(row.report_id)
                .or_default()
                .push(MaterialEntry {
                    material_type: row.material_type,
                    description: row.description,
                    quantity: row.quantity,
                    unit: row.unit,
                });
        }

        let mut plant_by_report: HashMap<Uuid, Vec<PlantEntry>> = HashMap::new();
        for row in plant {
            plant_by_report.entry(row.report_id).or_default().push(PlantEntry {
                description: row.description,
                quantity: row.quantity,
            });
        }

        let mut weather_by_id: HashMap<Uuid, Weather> = weather
            .into_iter()
            .map(|row| {
                (
                    row.id,
                    Weather {
                        condition: row.condition,
                        temperature: row.temperature,
                        humidity: row.humidity,
                        wind_speed: row.wind_speed,
                        remarks: row.remarks,
                    },
                )
            })
            .collect();

        Ok(reports
            .into_iter()
            .map(|report| DailyReportDetail {
                labour: labour_by_report.remove(&report.id).unwrap_or_default(),
                materials: materials_by_report.remove(&report.id).unwrap_or_default(),
                plant: plant_by_report.remove(&report.id).unwrap_or_default(),
                weather: report.weather_id.and_then(|id| weather_by_id.remove(&id)),
                report,
            })
            .collect())
    }

    async fn hydrate_one(&self, report: Option<DailyReport>) -> Result<Option<DailyReportDetail>> {
        match report {
            Some(report) => Ok(self.hydrate(vec![report]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DailyReportRepository for PgDailyReportRepository {
    async fn insert(&self, report: &NewDailyReport) -> Result<DailyReportDetail> {
        let mut tx = self.pool.begin().await?;
        let contents = &report.contents;

        let weather_id = match &contents.weather {
            Some(weather) => Some(Self::insert_weather(&mut tx, weather).await?),
            None => None,
        };

        let row = sqlx::query_as::<_, DailyReport>(&format!(
            r#"
            INSERT INTO daily_reports
                (id, project_id, progress_notes, delay_hours, weather_id, photo_urls,
                 created_by, author_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(report.project_id)
        .bind(&contents.progress_notes)
        .bind(contents.delay_hours)
        .bind(weather_id)
        .bind(&contents.photo_urls)
        .bind(report.created_by)
        .bind(&report.author_name)
        .bind(report.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert daily report: {:?}", e);
            AppError::Database(e)
        })?;

        Self::insert_entries(&mut tx, row.id, contents).await?;
        tx.commit().await?;

        Ok(DailyReportDetail {
            report: row,
            labour: contents.labour.clone(),
            materials: contents.materials.clone(),
            plant: contents.plant.clone(),
            weather: contents.weather.clone(),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DailyReportDetail>> {
        let report = sqlx::query_as::<_, DailyReport>(&format!(
            "SELECT {REPORT_COLUMNS} FROM daily_reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate_one(report).await
    }

    async fn replace_contents(
        &self,
        id: Uuid,
        contents: &ReportContents,
    ) -> Result<Option<DailyReportDetail>> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT weather_id FROM daily_reports WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((previous_weather,)) = previous else {
            return Ok(None);
        };

        Self::delete_entries(&mut tx, id).await?;
        let weather_id = match &contents.weather {
            Some(weather) => Some(Self::insert_weather(&mut tx, weather).await?),
            None => None,
        };

        let row = sqlx::query_as::<_, DailyReport>(&format!(
            r#"
            UPDATE daily_reports
            SET progress_notes = $2, delay_hours = $3, weather_id = $4, photo_urls = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&contents.progress_notes)
        .bind(contents.delay_hours)
        .bind(weather_id)
        .bind(&contents.photo_urls)
        .fetch_one(&mut *tx)
        .await?;

        // Old weather row is unreferenced only after the report points elsewhere
        Self::delete_weather(&mut tx, previous_weather).await?;
        Self::insert_entries(&mut tx, id, contents).await?;
        tx.commit().await?;

        Ok(Some(DailyReportDetail {
            report: row,
            labour: contents.labour.clone(),
            materials: contents.materials.clone(),
            plant: contents.plant.clone(),
            weather: contents.weather.clone(),
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted: Option<(Option<Uuid>,)> =
            sqlx::query_as("DELETE FROM daily_reports WHERE id = $1 RETURNING weather_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((weather_id,)) = deleted else {
            return Ok(false);
        };

        // labour/material/plant rows cascade with the report
        Self::delete_weather(&mut tx, weather_id).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn set_status(&self, id: Uuid, status: ReviewStatus) -> Result<Option<DailyReport>> {
        let row = sqlx::query_as::<_, DailyReport>(&format!(
            r#"
            UPDATE daily_reports
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_project(
        &self,
        project_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        order: ReportOrder,
    ) -> Result<Vec<DailyReportDetail>> {
        let direction = match order {
            ReportOrder::OldestFirst => "ASC",
            ReportOrder::NewestFirst => "DESC",
        };
        let (from, to) = match window {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        let reports = sqlx::query_as::<_, DailyReport>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM daily_reports
            WHERE project_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at {direction}, id {direction}
            "#
        ))
        .bind(project_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(reports).await
    }
}
