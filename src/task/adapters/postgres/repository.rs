//! `PostgreSQL` repository implementation for renewal task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        CompanyId, DependencyRef, PersistedTaskData, Task, TaskId, TaskKind, TaskStatus,
        TemplateId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

diesel::define_sql_function! {
    /// Folds a stored status spelling the way [`crate::task::domain::fold_token`] does.
    fn status_token(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store_all(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        let Some(first_id) = batch.first().map(Task::id) else {
            return Ok(());
        };
        let rows = batch.iter().map(to_new_row).collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();

        self.run_blocking(move |connection| {
            // Reports which id collided; the primary key still guards the
            // window between this check and the insert.
            let existing = tasks::table
                .filter(tasks::id.eq_any(ids))
                .select(tasks::id)
                .first::<uuid::Uuid>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            if let Some(existing_id) = existing {
                return Err(TaskRepositoryError::DuplicateTask(TaskId::from_uuid(
                    existing_id,
                )));
            }

            diesel::insert_into(tasks::table)
                .values(&rows)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(first_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let NewTaskRow {
            id,
            template_id,
            title,
            kind,
            status,
            dependencies,
            updated_at,
            ..
        } = to_new_row(task)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(id)))
                .set((
                    tasks::template_id.eq(template_id),
                    tasks::title.eq(title),
                    tasks::kind.eq(kind),
                    tasks::status.eq(status),
                    tasks::dependencies.eq(dependencies),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_company(&self, company_id: CompanyId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::company_id.eq(company_id.into_inner()))
                .order(tasks::sequence.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn compare_and_set_status(
        &self,
        id: TaskId,
        expected: TaskStatus,
        to: TaskStatus,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(
                        status_token(tasks::status).eq_any(expected.accepted_tokens().to_vec()),
                    ),
            )
            .set((
                tasks::status.eq(to.as_str()),
                tasks::updated_at.eq(updated_at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(TaskRepositoryError::persistence)?;

            match row {
                Some(updated) => row_to_task(updated).map(Some),
                None => {
                    let exists = tasks::table
                        .filter(tasks::id.eq(id.into_inner()))
                        .select(tasks::id)
                        .first::<uuid::Uuid>(connection)
                        .optional()
                        .map_err(TaskRepositoryError::persistence)?
                        .is_some();
                    if exists {
                        Ok(None)
                    } else {
                        Err(TaskRepositoryError::NotFound(id))
                    }
                }
            }
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let dependencies =
        serde_json::to_value(task.dependencies()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        company_id: task.company_id().into_inner(),
        template_id: task.template_id().map(|id| id.as_str().to_owned()),
        title: task.title().to_owned(),
        kind: task.kind().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        dependencies,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        company_id,
        template_id,
        title,
        kind: persisted_kind,
        status: persisted_status,
        dependencies: persisted_dependencies,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let kind = TaskKind::try_from(persisted_kind.as_str()).map_err(TaskRepositoryError::persistence)?;
    let dependencies = serde_json::from_value::<Vec<DependencyRef>>(persisted_dependencies)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        company_id: CompanyId::from_uuid(company_id),
        template_id: template_id.map(TemplateId::new),
        title,
        kind,
        status,
        dependencies,
        created_at,
        updated_at,
    }))
}
