//! PostgreSQL content store
//!
//! Each ordering transaction runs at SERIALIZABLE isolation by default, so two
//! concurrent mutations of the same scope cannot both commit a stale view.
//! The loser surfaces as [`OrderError::Conflict`] and the caller may retry.

use async_trait::async_trait;
use shared::models::{
    Course, CourseCreate, CourseModuleDetail, Module, ModuleCreate, StudentProject, TeamMember,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, Transaction};

use super::{ContentStore, ItemWriter, NewItem};
use crate::ordering::{
    Collection, OrderError, OrderResult, OrderStore, OrderTx, OrderedItem, Scope, ShiftRange,
};

/// Table backing a collection
fn table(collection: Collection) -> &'static str {
    match collection {
        Collection::TeamMembers => "team_members",
        Collection::StudentProjects => "student_projects",
        Collection::CourseModules => "course_modules",
    }
}

/// Scope predicate on `$1`.
///
/// Global collections bind NULL so every query keeps the same parameter layout.
fn scope_clause(collection: Collection) -> &'static str {
    match collection {
        Collection::CourseModules => "course_id = $1",
        Collection::TeamMembers | Collection::StudentProjects => "$1::BIGINT IS NULL",
    }
}

fn storage(err: sqlx::Error) -> OrderError {
    OrderError::Storage(err.to_string())
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    serializable: bool,
}

impl PgStore {
    pub fn new(pool: PgPool, serializable: bool) -> Self {
        Self { pool, serializable }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Ordering transaction over one `(collection, scope)`
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
    collection: Collection,
    scope: Scope,
}

impl PgTx {
    fn table(&self) -> &'static str {
        table(self.collection)
    }

    fn scope_clause(&self) -> &'static str {
        scope_clause(self.collection)
    }

    fn parent(&self) -> Option<i64> {
        self.scope.parent_id()
    }

    fn not_found(&self, item_id: i64) -> OrderError {
        OrderError::ItemNotFound {
            collection: self.collection,
            scope: self.scope,
            item_id,
        }
    }
}

#[async_trait]
impl OrderTx for PgTx {
    fn collection(&self) -> Collection {
        self.collection
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    async fn count(&mut self) -> OrderResult<i32> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.table(),
            self.scope_clause()
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(self.parent())
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count as i32)
    }

    async fn order_of(&mut self, item_id: i64) -> OrderResult<Option<i32>> {
        let sql = format!(
            "SELECT sort_order FROM {} WHERE {} AND id = $2",
            self.table(),
            self.scope_clause()
        );
        let order: Option<i32> = sqlx::query_scalar(&sql)
            .bind(self.parent())
            .bind(item_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(order)
    }

    async fn shift_range(&mut self, range: ShiftRange) -> OrderResult<u64> {
        let sql = format!(
            r#"
            UPDATE {} SET sort_order = sort_order + $2
            WHERE {}
              AND sort_order >= $3
              AND ($4::INT IS NULL OR sort_order <= $4)
              AND ($5::BIGINT IS NULL OR id <> $5)
            "#,
            self.table(),
            self.scope_clause()
        );
        let result = sqlx::query(&sql)
            .bind(self.parent())
            .bind(range.delta)
            .bind(range.low)
            .bind(range.high)
            .bind(range.exclude)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn write_order(&mut self, item_id: i64, sort_order: i32) -> OrderResult<()> {
        let sql = format!(
            "UPDATE {} SET sort_order = $3 WHERE {} AND id = $2",
            self.table(),
            self.scope_clause()
        );
        let result = sqlx::query(&sql)
            .bind(self.parent())
            .bind(item_id)
            .bind(sort_order)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(self.not_found(item_id));
        }
        Ok(())
    }

    async fn delete_and_shift(&mut self, item_id: i64, deleted_order: i32) -> OrderResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE {} AND id = $2",
            self.table(),
            self.scope_clause()
        );
        let result = sqlx::query(&sql)
            .bind(self.parent())
            .bind(item_id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(self.not_found(item_id));
        }
        self.shift_range(ShiftRange::starting_at(deleted_order + 1, -1))
            .await?;
        Ok(())
    }

    async fn read_all_ascending(&mut self) -> OrderResult<Vec<OrderedItem>> {
        let sql = format!(
            "SELECT id, sort_order FROM {} WHERE {} ORDER BY sort_order ASC, id ASC",
            self.table(),
            self.scope_clause()
        );
        let rows: Vec<(i64, i32)> = sqlx::query_as(&sql)
            .bind(self.parent())
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, sort_order)| OrderedItem { id, sort_order })
            .collect())
    }

    async fn commit(self) -> OrderResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ItemWriter for PgTx {
    async fn insert_item(&mut self, item: NewItem, sort_order: i32) -> OrderResult<i64> {
        let id = snowflake_id();
        match (self.scope, item) {
            (Scope::Global, NewItem::TeamMember(data))
                if self.collection == Collection::TeamMembers =>
            {
                sqlx::query(
                    r#"
                    INSERT INTO team_members (id, name, role, bio, photo_url, sort_order, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(id)
                .bind(&data.name)
                .bind(&data.role)
                .bind(&data.bio)
                .bind(&data.photo_url)
                .bind(sort_order)
                .bind(now_millis())
                .execute(&mut *self.tx)
                .await?;
            }
            (Scope::Global, NewItem::StudentProject(data))
                if self.collection == Collection::StudentProjects =>
            {
                sqlx::query(
                    r#"
                    INSERT INTO student_projects
                        (id, title, student_name, description, link, sort_order, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(id)
                .bind(&data.title)
                .bind(&data.student_name)
                .bind(&data.description)
                .bind(&data.link)
                .bind(sort_order)
                .bind(now_millis())
                .execute(&mut *self.tx)
                .await?;
            }
            (Scope::Parent(course_id), NewItem::CourseModule { module_id })
                if self.collection == Collection::CourseModules =>
            {
                sqlx::query(
                    r#"
                    INSERT INTO course_modules (id, course_id, module_id, sort_order)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(id)
                .bind(course_id)
                .bind(module_id)
                .bind(sort_order)
                .execute(&mut *self.tx)
                .await?;
            }
            (scope, item) => {
                return Err(OrderError::Transaction(format!(
                    "{item:?} cannot be inserted into {} ({scope})",
                    self.collection
                )));
            }
        }
        Ok(id)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    type Tx = PgTx;

    async fn begin(&self, collection: Collection, scope: Scope) -> OrderResult<PgTx> {
        let mut tx = self.pool.begin().await?;
        if self.serializable {
            sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
                .execute(&mut *tx)
                .await?;
        }
        Ok(PgTx {
            tx,
            collection,
            scope,
        })
    }
}

const COURSE_MODULE_DETAIL: &str = r#"
    SELECT cm.id, cm.course_id, c.title AS course_title,
           cm.module_id, m.title AS module_title, cm.sort_order
    FROM course_modules cm
    JOIN courses c ON c.id = cm.course_id
    JOIN modules m ON m.id = cm.module_id
"#;

#[async_trait]
impl ContentStore for PgStore {
    async fn list_team_members(&self) -> OrderResult<Vec<TeamMember>> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT id, name, role, bio, photo_url, sort_order, created_at \
             FROM team_members ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)
    }

    async fn find_team_member(&self, id: i64) -> OrderResult<Option<TeamMember>> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT id, name, role, bio, photo_url, sort_order, created_at \
             FROM team_members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)
    }

    async fn list_student_projects(&self) -> OrderResult<Vec<StudentProject>> {
        sqlx::query_as::<_, StudentProject>(
            "SELECT id, title, student_name, description, link, sort_order, created_at \
             FROM student_projects ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)
    }

    async fn find_student_project(&self, id: i64) -> OrderResult<Option<StudentProject>> {
        sqlx::query_as::<_, StudentProject>(
            "SELECT id, title, student_name, description, link, sort_order, created_at \
             FROM student_projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)
    }

    async fn find_course(&self, id: i64) -> OrderResult<Option<Course>> {
        sqlx::query_as::<_, Course>("SELECT id, title, slug FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn create_course(&self, data: &CourseCreate) -> OrderResult<Course> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (id, title, slug) VALUES ($1, $2, $3) RETURNING id, title, slug",
        )
        .bind(snowflake_id())
        .bind(&data.title)
        .bind(&data.slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    async fn find_module(&self, id: i64) -> OrderResult<Option<Module>> {
        sqlx::query_as::<_, Module>("SELECT id, title FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn create_module(&self, data: &ModuleCreate) -> OrderResult<Module> {
        let module = sqlx::query_as::<_, Module>(
            "INSERT INTO modules (id, title) VALUES ($1, $2) RETURNING id, title",
        )
        .bind(snowflake_id())
        .bind(&data.title)
        .fetch_one(&self.pool)
        .await?;
        Ok(module)
    }

    async fn list_course_modules(&self, course_id: i64) -> OrderResult<Vec<CourseModuleDetail>> {
        let sql = format!(
            "{COURSE_MODULE_DETAIL} WHERE cm.course_id = $1 ORDER BY cm.sort_order ASC, cm.id ASC"
        );
        sqlx::query_as::<_, CourseModuleDetail>(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)
    }

    async fn find_course_module(
        &self,
        course_id: i64,
        module_id: i64,
    ) -> OrderResult<Option<CourseModuleDetail>> {
        let sql = format!("{COURSE_MODULE_DETAIL} WHERE cm.course_id = $1 AND cm.module_id = $2");
        sqlx::query_as::<_, CourseModuleDetail>(&sql)
            .bind(course_id)
            .bind(module_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }
}
