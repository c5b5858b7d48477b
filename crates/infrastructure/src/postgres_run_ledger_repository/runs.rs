use super::*;

impl PostgresRunLedgerRepository {
    pub(super) async fn find_run_by_event_id_impl(&self, event_id: &str) -> AppResult<Option<Run>> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT
                run_id,
                event_id,
                status,
                started_at,
                finished_at,
                input,
                summary,
                anomalies
            FROM runs
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find run for event '{event_id}': {error}"
            ))
        })?;

        row.map(run_from_row).transpose()
    }

    pub(super) async fn insert_run_if_absent_impl(&self, run: Run) -> AppResult<RunInsertOutcome> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            INSERT INTO runs (run_id, event_id, status, started_at, input)
            VALUES ($1, $2, 'RUNNING', $3, $4)
            ON CONFLICT (event_id) DO NOTHING
            RETURNING
                run_id,
                event_id,
                status,
                started_at,
                finished_at,
                input,
                summary,
                anomalies
            "#,
        )
        .bind(run.run_id().as_uuid())
        .bind(run.event_id().as_str())
        .bind(run.started_at())
        .bind(run.input())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to insert run for event '{}': {error}",
                run.event_id()
            ))
        })?;

        if let Some(row) = row {
            return run_from_row(row).map(RunInsertOutcome::Created);
        }

        // Conflict on event_id: the winning row is committed and never deleted.
        self.find_run_by_event_id_impl(run.event_id().as_str())
            .await?
            .map(RunInsertOutcome::AlreadyExists)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "run for event '{}' conflicted but could not be read back",
                    run.event_id()
                ))
            })
    }

    pub(super) async fn complete_run_impl(
        &self,
        run_id: RunId,
        outcome: &TerminalOutcome,
        finished_at: DateTime<Utc>,
    ) -> AppResult<RunCompletion> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            UPDATE runs
            SET
                status = $2,
                summary = $3,
                anomalies = $4,
                finished_at = $5
            WHERE run_id = $1 AND status = 'RUNNING'
            RETURNING
                run_id,
                event_id,
                status,
                started_at,
                finished_at,
                input,
                summary,
                anomalies
            "#,
        )
        .bind(run_id.as_uuid())
        .bind(outcome.status().as_str())
        .bind(outcome.summary())
        .bind(outcome.anomalies())
        .bind(finished_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to finish run '{run_id}': {error}"))
        })?;

        if let Some(row) = row {
            return run_from_row(row).map(RunCompletion::Applied);
        }

        Ok(match self.find_run_impl(run_id).await? {
            Some(run) => RunCompletion::AlreadyTerminal(run),
            None => RunCompletion::NotFound,
        })
    }

    pub(super) async fn find_run_impl(&self, run_id: RunId) -> AppResult<Option<Run>> {
        let row = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT
                run_id,
                event_id,
                status,
                started_at,
                finished_at,
                input,
                summary,
                anomalies
            FROM runs
            WHERE run_id = $1
            "#,
        )
        .bind(run_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find run '{run_id}': {error}")))?;

        row.map(run_from_row).transpose()
    }

    pub(super) async fn list_runs_impl(&self, query: RunListQuery) -> AppResult<Vec<Run>> {
        let limit = i64::try_from(query.limit)
            .map_err(|error| AppError::Validation(format!("invalid run list limit: {error}")))?;
        let offset = i64::try_from(query.offset)
            .map_err(|error| AppError::Validation(format!("invalid run list offset: {error}")))?;

        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT
                run_id,
                event_id,
                status,
                started_at,
                finished_at,
                input,
                summary,
                anomalies
            FROM runs
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY started_at DESC, run_id
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(query.status.map(|status| status.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list runs: {error}")))?;

        rows.into_iter().map(run_from_row).collect()
    }
}
