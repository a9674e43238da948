//! Module assignments, one ordering scope per course

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AssignModuleRequest, Course, CourseCreate, CourseModuleDetail, Module, ModuleCreate,
    MoveDirection, MoveToRequest, NormalizeResult, ReorderResult,
};

use super::{domain_error, entity_not_found, move_result, remove_result};
use crate::ordering::{Collection, OrderEngine, OrderError, Scope, engine};
use crate::store::{ContentStore, ItemWriter, NewItem};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text, validate_slug};

const COLLECTION: Collection = Collection::CourseModules;

pub struct CourseModules<S> {
    engine: OrderEngine<S>,
}

impl<S: ContentStore> CourseModules<S> {
    pub fn new(engine: OrderEngine<S>) -> Self {
        Self { engine }
    }

    // ── Catalog ─────────────────────────────────────────────────────

    pub async fn create_course(&self, data: CourseCreate) -> AppResult<Course> {
        validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
        validate_slug(&data.slug, "slug")?;
        let course = self
            .engine
            .store()
            .create_course(&data)
            .await
            .map_err(|err| match err {
                OrderError::ConflictingAssignment(_) => {
                    AppError::conflict(format!("Course slug '{}' already exists", data.slug))
                        .with_detail("slug", data.slug.clone())
                }
                other => other.into(),
            })?;
        tracing::info!(id = course.id, slug = %course.slug, "Course created");
        Ok(course)
    }

    pub async fn create_module(&self, data: ModuleCreate) -> AppResult<Module> {
        validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
        let module = self.engine.store().create_module(&data).await?;
        tracing::info!(id = module.id, "Module created");
        Ok(module)
    }

    // ── Assignments ─────────────────────────────────────────────────

    /// Modules of a course in display order
    pub async fn list(&self, course_id: i64) -> AppResult<Vec<CourseModuleDetail>> {
        self.ensure_course(course_id).await?;
        Ok(self.engine.store().list_course_modules(course_id).await?)
    }

    /// `AssignModuleAtOrder`: link a module at `order`, or at the end when absent
    pub async fn assign_at(
        &self,
        course_id: i64,
        req: AssignModuleRequest,
    ) -> AppResult<CourseModuleDetail> {
        self.ensure_course(course_id).await?;
        let module_id = req.module_id;
        if self.engine.store().find_module(module_id).await?.is_none() {
            return Err(entity_not_found(ErrorCode::ModuleNotFound, module_id));
        }
        if self
            .engine
            .store()
            .find_course_module(course_id, module_id)
            .await?
            .is_some()
        {
            return Err(already_assigned(course_id, module_id));
        }

        let position = self
            .engine
            .run_atomically(COLLECTION, Scope::Parent(course_id), move |tx| {
                Box::pin(async move {
                    let desired = match req.order {
                        Some(order) => order,
                        None => i64::from(engine::append(tx).await?),
                    };
                    let position = engine::insert_at(tx, desired, req.expected_count).await?;
                    tx.insert_item(NewItem::CourseModule { module_id }, position)
                        .await?;
                    Ok::<_, OrderError>(position)
                })
            })
            .await
            .map_err(|err| match err {
                OrderError::ConflictingAssignment(_) => already_assigned(course_id, module_id),
                other => other.into(),
            })?;
        tracing::info!(course_id, module_id, position, "Module assigned to course");

        self.engine
            .store()
            .find_course_module(course_id, module_id)
            .await?
            .ok_or_else(|| not_assigned(course_id, module_id))
    }

    /// `ReorderModule`: move an assigned module to an explicit position
    pub async fn reorder(
        &self,
        course_id: i64,
        module_id: i64,
        req: MoveToRequest,
    ) -> AppResult<ReorderResult> {
        let link_id = self.assignment_id(course_id, module_id).await?;
        let report = self
            .engine
            .move_to(
                COLLECTION,
                Scope::Parent(course_id),
                link_id,
                req.order,
                req.expected_count,
            )
            .await
            .map_err(domain_error(ErrorCode::ModuleNotAssigned))?;
        Ok(move_result(report))
    }

    /// Dashboard up/down arrow within the course
    pub async fn move_step(
        &self,
        course_id: i64,
        module_id: i64,
        direction: MoveDirection,
    ) -> AppResult<ReorderResult> {
        let link_id = self.assignment_id(course_id, module_id).await?;
        let report = self
            .engine
            .move_step(COLLECTION, Scope::Parent(course_id), link_id, direction)
            .await
            .map_err(domain_error(ErrorCode::ModuleNotAssigned))?;
        Ok(move_result(report))
    }

    /// `UnassignModule`: drop the link and compact the course
    pub async fn unassign(&self, course_id: i64, module_id: i64) -> AppResult<ReorderResult> {
        let link_id = self.assignment_id(course_id, module_id).await?;
        let report = self
            .engine
            .remove(COLLECTION, Scope::Parent(course_id), link_id)
            .await
            .map_err(domain_error(ErrorCode::ModuleNotAssigned))?;
        Ok(remove_result(report))
    }

    pub async fn normalize(&self, course_id: i64) -> AppResult<NormalizeResult> {
        self.ensure_course(course_id).await?;
        let repaired = self
            .engine
            .normalize(COLLECTION, Scope::Parent(course_id))
            .await?;
        Ok(NormalizeResult { repaired })
    }

    async fn ensure_course(&self, course_id: i64) -> AppResult<()> {
        match self.engine.store().find_course(course_id).await? {
            Some(_) => Ok(()),
            None => Err(entity_not_found(ErrorCode::CourseNotFound, course_id)),
        }
    }

    /// Id of the `(course, module)` link row
    async fn assignment_id(&self, course_id: i64, module_id: i64) -> AppResult<i64> {
        self.ensure_course(course_id).await?;
        self.engine
            .store()
            .find_course_module(course_id, module_id)
            .await?
            .map(|link| link.id)
            .ok_or_else(|| not_assigned(course_id, module_id))
    }
}

fn already_assigned(course_id: i64, module_id: i64) -> AppError {
    AppError::new(ErrorCode::ModuleAlreadyAssigned)
        .with_detail("course_id", course_id)
        .with_detail("module_id", module_id)
}

fn not_assigned(course_id: i64, module_id: i64) -> AppError {
    AppError::new(ErrorCode::ModuleNotAssigned)
        .with_detail("course_id", course_id)
        .with_detail("module_id", module_id)
}
