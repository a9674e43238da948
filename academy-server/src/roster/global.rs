//! Rosters over a single global scope
//!
//! Team members and student projects share every ordering verb. An entry type
//! supplies what differs: the collection, its not-found code, input checks
//! and the row lookups.

use std::marker::PhantomData;

use futures::future::BoxFuture;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MoveDirection, MoveToRequest, NormalizeResult, ReorderResult};

use super::{domain_error, entity_not_found, move_result, remove_result};
use crate::ordering::{Collection, OrderEngine, OrderError, OrderResult, Scope, engine};
use crate::store::{ContentStore, ItemWriter, NewItem};

const SCOPE: Scope = Scope::Global;

/// Collection-specific half of a [`GlobalRoster`]
pub trait GlobalEntry: Send + Sync + 'static {
    type Item: Send;
    type Create: Send + 'static;

    const COLLECTION: Collection;
    const NOT_FOUND: ErrorCode;

    fn validate(data: &Self::Create) -> AppResult<()>;

    fn new_item(data: Self::Create) -> NewItem;

    fn list<S: ContentStore>(store: &S) -> BoxFuture<'_, OrderResult<Vec<Self::Item>>>;

    fn find<S: ContentStore>(store: &S, id: i64) -> BoxFuture<'_, OrderResult<Option<Self::Item>>>;
}

pub struct GlobalRoster<S, E> {
    engine: OrderEngine<S>,
    entry: PhantomData<fn() -> E>,
}

impl<S: ContentStore, E: GlobalEntry> GlobalRoster<S, E> {
    pub fn new(engine: OrderEngine<S>) -> Self {
        Self {
            engine,
            entry: PhantomData,
        }
    }

    /// All items in display order
    pub async fn list(&self) -> AppResult<Vec<E::Item>> {
        Ok(E::list(self.engine.store()).await?)
    }

    /// Validate and append a new item at the end of the scope
    pub async fn create(&self, data: E::Create) -> AppResult<E::Item> {
        E::validate(&data)?;
        let item = E::new_item(data);

        let (id, position) = self
            .engine
            .run_atomically(E::COLLECTION, SCOPE, move |tx| {
                Box::pin(async move {
                    let position = engine::append(tx).await?;
                    let id = tx.insert_item(item, position).await?;
                    Ok::<_, OrderError>((id, position))
                })
            })
            .await?;
        tracing::info!(collection = %E::COLLECTION, id, position, "Ordered item created");

        E::find(self.engine.store(), id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Place an item at an explicit position
    pub async fn move_to(&self, id: i64, req: MoveToRequest) -> AppResult<ReorderResult> {
        self.ensure_exists(id).await?;
        let report = self
            .engine
            .move_to(E::COLLECTION, SCOPE, id, req.order, req.expected_count)
            .await
            .map_err(domain_error(E::NOT_FOUND))?;
        Ok(move_result(report))
    }

    /// Dashboard up/down arrow
    pub async fn move_step(&self, id: i64, direction: MoveDirection) -> AppResult<ReorderResult> {
        self.ensure_exists(id).await?;
        let report = self
            .engine
            .move_step(E::COLLECTION, SCOPE, id, direction)
            .await
            .map_err(domain_error(E::NOT_FOUND))?;
        Ok(move_result(report))
    }

    /// Delete an item and close the gap
    pub async fn delete(&self, id: i64) -> AppResult<ReorderResult> {
        self.ensure_exists(id).await?;
        let report = self
            .engine
            .remove(E::COLLECTION, SCOPE, id)
            .await
            .map_err(domain_error(E::NOT_FOUND))?;
        Ok(remove_result(report))
    }

    pub async fn normalize(&self) -> AppResult<NormalizeResult> {
        let repaired = self.engine.normalize(E::COLLECTION, SCOPE).await?;
        Ok(NormalizeResult { repaired })
    }

    fn not_found(&self, id: i64) -> AppError {
        entity_not_found(E::NOT_FOUND, id)
    }

    async fn ensure_exists(&self, id: i64) -> AppResult<()> {
        match E::find(self.engine.store(), id).await? {
            Some(_) => Ok(()),
            None => Err(self.not_found(id)),
        }
    }
}
