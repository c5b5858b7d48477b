use super::*;

impl PostgresRunLedgerRepository {
    pub(super) async fn append_step_impl(&self, step: NewRunStep) -> AppResult<RunStep> {
        let (input, input_raw) = payload_columns(&step.input);
        let (output, output_raw) = payload_columns(&step.output);

        let result = sqlx::query_as::<_, RunStepRow>(
            r#"
            INSERT INTO run_steps (
                run_id,
                step,
                status,
                reason,
                input,
                input_raw,
                output,
                output_raw
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id,
                run_id,
                step,
                status,
                reason,
                input,
                input_raw,
                output,
                output_raw,
                created_at
            "#,
        )
        .bind(step.run_id.as_uuid())
        .bind(step.step.as_str())
        .bind(step.status.as_str())
        .bind(step.reason.as_deref())
        .bind(input)
        .bind(input_raw)
        .bind(output)
        .bind(output_raw)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => run_step_from_row(row),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23503")
                {
                    return Err(AppError::Validation(format!(
                        "run '{}' does not exist",
                        step.run_id
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to append step '{}' to run '{}': {error}",
                    step.step, step.run_id
                )))
            }
        }
    }

    pub(super) async fn list_steps_impl(&self, run_id: RunId) -> AppResult<Vec<RunStep>> {
        let rows = sqlx::query_as::<_, RunStepRow>(
            r#"
            SELECT
                id,
                run_id,
                step,
                status,
                reason,
                input,
                input_raw,
                output,
                output_raw,
                created_at
            FROM run_steps
            WHERE run_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(run_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list steps of run '{run_id}': {error}"))
        })?;

        rows.into_iter().map(run_step_from_row).collect()
    }
}
