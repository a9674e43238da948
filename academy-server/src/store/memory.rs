//! In-memory content store
//!
//! A transaction holds the store-wide lock for its whole lifetime and works on
//! a private copy of the state, swapped in on commit. Transactions are
//! therefore fully serialized, and dropping one discards its writes.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use shared::models::{
    Course, CourseCreate, CourseModule, CourseModuleDetail, Module, ModuleCreate, StudentProject,
    TeamMember,
};
use shared::util::{now_millis, snowflake_id};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{ContentStore, ItemWriter, NewItem};
use crate::ordering::{
    Collection, OrderError, OrderResult, OrderStore, OrderTx, OrderedItem, Scope, ShiftRange,
};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    team_members: BTreeMap<i64, TeamMember>,
    student_projects: BTreeMap<i64, StudentProject>,
    courses: BTreeMap<i64, Course>,
    modules: BTreeMap<i64, Module>,
    course_modules: BTreeMap<i64, CourseModule>,
}

impl MemoryState {
    fn next_id(&self) -> i64 {
        loop {
            let id = snowflake_id();
            if !self.team_members.contains_key(&id)
                && !self.student_projects.contains_key(&id)
                && !self.courses.contains_key(&id)
                && !self.modules.contains_key(&id)
                && !self.course_modules.contains_key(&id)
            {
                return id;
            }
        }
    }

    /// Mutable positions of every row in `(collection, scope)`
    fn slots(&mut self, collection: Collection, scope: Scope) -> Vec<(i64, &mut i32)> {
        match (collection, scope) {
            (Collection::TeamMembers, Scope::Global) => self
                .team_members
                .iter_mut()
                .map(|(id, m)| (*id, &mut m.sort_order))
                .collect(),
            (Collection::StudentProjects, Scope::Global) => self
                .student_projects
                .iter_mut()
                .map(|(id, p)| (*id, &mut p.sort_order))
                .collect(),
            (Collection::CourseModules, Scope::Parent(course_id)) => self
                .course_modules
                .iter_mut()
                .filter(|(_, link)| link.course_id == course_id)
                .map(|(id, link)| (*id, &mut link.sort_order))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn course_module_detail(&self, link: &CourseModule) -> Option<CourseModuleDetail> {
        let course = self.courses.get(&link.course_id)?;
        let module = self.modules.get(&link.module_id)?;
        Some(CourseModuleDetail {
            id: link.id,
            course_id: link.course_id,
            course_title: course.title.clone(),
            module_id: link.module_id,
            module_title: module.title.clone(),
            sort_order: link.sort_order,
        })
    }
}

#[derive(Debug, Default)]
struct Hooks {
    fail_next_commit: AtomicBool,
    /// Transactions left to open before one fails to begin; 0 disarms
    fail_begin_in: AtomicU64,
    committed_writes: AtomicU64,
}

/// Process-local [`ContentStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    hooks: Arc<Hooks>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit fail, discarding that transaction's writes
    pub fn fail_next_commit(&self) {
        self.hooks.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Let `n` more transactions open normally, then fail the next one to begin
    pub fn fail_begin_after(&self, n: u64) {
        self.hooks.fail_begin_in.store(n + 1, Ordering::SeqCst);
    }

    /// Number of row writes made visible by committed transactions
    pub fn committed_writes(&self) -> u64 {
        self.hooks.committed_writes.load(Ordering::SeqCst)
    }

    /// Overwrite a position directly, bypassing the engine.
    ///
    /// Simulates drift left behind by racing writers.
    pub async fn force_order(&self, collection: Collection, item_id: i64, sort_order: i32) -> bool {
        let mut state = self.state.lock().await;
        let slot = match collection {
            Collection::TeamMembers => state
                .team_members
                .get_mut(&item_id)
                .map(|m| &mut m.sort_order),
            Collection::StudentProjects => state
                .student_projects
                .get_mut(&item_id)
                .map(|p| &mut p.sort_order),
            Collection::CourseModules => state
                .course_modules
                .get_mut(&item_id)
                .map(|link| &mut link.sort_order),
        };
        match slot {
            Some(order) => {
                *order = sort_order;
                true
            }
            None => false,
        }
    }
}

/// Transaction over a private copy of the store state
pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    collection: Collection,
    scope: Scope,
    hooks: Arc<Hooks>,
    writes: u64,
}

impl MemoryTx {
    fn not_found(&self, item_id: i64) -> OrderError {
        OrderError::ItemNotFound {
            collection: self.collection,
            scope: self.scope,
            item_id,
        }
    }
}

#[async_trait]
impl OrderTx for MemoryTx {
    fn collection(&self) -> Collection {
        self.collection
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    async fn count(&mut self) -> OrderResult<i32> {
        Ok(self.working.slots(self.collection, self.scope).len() as i32)
    }

    async fn order_of(&mut self, item_id: i64) -> OrderResult<Option<i32>> {
        Ok(self
            .working
            .slots(self.collection, self.scope)
            .into_iter()
            .find(|(id, _)| *id == item_id)
            .map(|(_, order)| *order))
    }

    async fn shift_range(&mut self, range: ShiftRange) -> OrderResult<u64> {
        let mut touched = 0;
        for (id, order) in self.working.slots(self.collection, self.scope) {
            if range.contains(id, *order) {
                *order += range.delta;
                touched += 1;
            }
        }
        self.writes += touched;
        Ok(touched)
    }

    async fn write_order(&mut self, item_id: i64, sort_order: i32) -> OrderResult<()> {
        let slot = self
            .working
            .slots(self.collection, self.scope)
            .into_iter()
            .find(|(id, _)| *id == item_id);
        match slot {
            Some((_, order)) => {
                *order = sort_order;
                self.writes += 1;
                Ok(())
            }
            None => Err(self.not_found(item_id)),
        }
    }

    async fn delete_and_shift(&mut self, item_id: i64, deleted_order: i32) -> OrderResult<()> {
        if self.order_of(item_id).await?.is_none() {
            return Err(self.not_found(item_id));
        }
        match self.collection {
            Collection::TeamMembers => {
                self.working.team_members.remove(&item_id);
            }
            Collection::StudentProjects => {
                self.working.student_projects.remove(&item_id);
            }
            Collection::CourseModules => {
                self.working.course_modules.remove(&item_id);
            }
        }
        self.writes += 1;
        self.shift_range(ShiftRange::starting_at(deleted_order + 1, -1))
            .await?;
        Ok(())
    }

    async fn read_all_ascending(&mut self) -> OrderResult<Vec<OrderedItem>> {
        let mut items: Vec<OrderedItem> = self
            .working
            .slots(self.collection, self.scope)
            .into_iter()
            .map(|(id, order)| OrderedItem {
                id,
                sort_order: *order,
            })
            .collect();
        items.sort_by_key(|item| (item.sort_order, item.id));
        Ok(items)
    }

    async fn commit(self) -> OrderResult<()> {
        let MemoryTx {
            mut guard,
            working,
            hooks,
            writes,
            ..
        } = self;
        if hooks.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(OrderError::Transaction("injected commit failure".into()));
        }
        *guard = working;
        hooks.committed_writes.fetch_add(writes, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ItemWriter for MemoryTx {
    async fn insert_item(&mut self, item: NewItem, sort_order: i32) -> OrderResult<i64> {
        let id = self.working.next_id();
        match (self.collection, self.scope, item) {
            (Collection::TeamMembers, Scope::Global, NewItem::TeamMember(data)) => {
                self.working.team_members.insert(
                    id,
                    TeamMember {
                        id,
                        name: data.name,
                        role: data.role,
                        bio: data.bio,
                        photo_url: data.photo_url,
                        sort_order,
                        created_at: now_millis(),
                    },
                );
            }
            (Collection::StudentProjects, Scope::Global, NewItem::StudentProject(data)) => {
                self.working.student_projects.insert(
                    id,
                    StudentProject {
                        id,
                        title: data.title,
                        student_name: data.student_name,
                        description: data.description,
                        link: data.link,
                        sort_order,
                        created_at: now_millis(),
                    },
                );
            }
            (
                Collection::CourseModules,
                Scope::Parent(course_id),
                NewItem::CourseModule { module_id },
            ) => {
                let duplicate = self
                    .working
                    .course_modules
                    .values()
                    .any(|link| link.course_id == course_id && link.module_id == module_id);
                if duplicate {
                    return Err(OrderError::ConflictingAssignment(format!(
                        "module {module_id} is already assigned to course {course_id}"
                    )));
                }
                self.working.course_modules.insert(
                    id,
                    CourseModule {
                        id,
                        course_id,
                        module_id,
                        sort_order,
                    },
                );
            }
            (collection, scope, item) => {
                return Err(OrderError::Transaction(format!(
                    "{item:?} cannot be inserted into {collection} ({scope})"
                )));
            }
        }
        self.writes += 1;
        Ok(id)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self, collection: Collection, scope: Scope) -> OrderResult<MemoryTx> {
        let armed = self
            .hooks
            .fail_begin_in
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if armed == Ok(1) {
            return Err(OrderError::Transaction("injected begin failure".into()));
        }
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            collection,
            scope,
            hooks: self.hooks.clone(),
            writes: 0,
        })
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_team_members(&self) -> OrderResult<Vec<TeamMember>> {
        let state = self.state.lock().await;
        let mut members: Vec<TeamMember> = state.team_members.values().cloned().collect();
        members.sort_by_key(|m| (m.sort_order, m.id));
        Ok(members)
    }

    async fn find_team_member(&self, id: i64) -> OrderResult<Option<TeamMember>> {
        Ok(self.state.lock().await.team_members.get(&id).cloned())
    }

    async fn list_student_projects(&self) -> OrderResult<Vec<StudentProject>> {
        let state = self.state.lock().await;
        let mut projects: Vec<StudentProject> =
            state.student_projects.values().cloned().collect();
        projects.sort_by_key(|p| (p.sort_order, p.id));
        Ok(projects)
    }

    async fn find_student_project(&self, id: i64) -> OrderResult<Option<StudentProject>> {
        Ok(self.state.lock().await.student_projects.get(&id).cloned())
    }

    async fn find_course(&self, id: i64) -> OrderResult<Option<Course>> {
        Ok(self.state.lock().await.courses.get(&id).cloned())
    }

    async fn create_course(&self, data: &CourseCreate) -> OrderResult<Course> {
        let mut state = self.state.lock().await;
        if state.courses.values().any(|c| c.slug == data.slug) {
            return Err(OrderError::ConflictingAssignment(format!(
                "course slug '{}' already exists",
                data.slug
            )));
        }
        let course = Course {
            id: state.next_id(),
            title: data.title.clone(),
            slug: data.slug.clone(),
        };
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn find_module(&self, id: i64) -> OrderResult<Option<Module>> {
        Ok(self.state.lock().await.modules.get(&id).cloned())
    }

    async fn create_module(&self, data: &ModuleCreate) -> OrderResult<Module> {
        let mut state = self.state.lock().await;
        let module = Module {
            id: state.next_id(),
            title: data.title.clone(),
        };
        state.modules.insert(module.id, module.clone());
        Ok(module)
    }

    async fn list_course_modules(&self, course_id: i64) -> OrderResult<Vec<CourseModuleDetail>> {
        let state = self.state.lock().await;
        let mut details: Vec<CourseModuleDetail> = state
            .course_modules
            .values()
            .filter(|link| link.course_id == course_id)
            .filter_map(|link| state.course_module_detail(link))
            .collect();
        details.sort_by_key(|d| (d.sort_order, d.id));
        Ok(details)
    }

    async fn find_course_module(
        &self,
        course_id: i64,
        module_id: i64,
    ) -> OrderResult<Option<CourseModuleDetail>> {
        let state = self.state.lock().await;
        Ok(state
            .course_modules
            .values()
            .find(|link| link.course_id == course_id && link.module_id == module_id)
            .and_then(|link| state.course_module_detail(link)))
    }
}
