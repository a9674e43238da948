//! Shift algorithms and the transaction-owning engine facade
//!
//! The free functions (`append`, `insert_at`, `move_to`, `move_step`,
//! `remove`, `normalize`) run inside a transaction the caller already holds,
//! so that creating or deleting the entity row and shifting its neighbours
//! commit together. [`OrderEngine`] wraps them for callers that only reorder.

use std::str::FromStr;
use std::sync::Arc;

use futures::future::BoxFuture;
use shared::models::{HealState, MoveDirection};

use super::{Collection, OrderError, OrderResult, OrderStore, OrderTx, OrderedItem, Scope, ShiftRange};

/// What a move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target equals the current position (or an edge step); nothing written
    Unchanged,
    Moved { from: i32, to: i32 },
}

impl MoveOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// When to run the consistency pass after a committed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealPolicy {
    Never,
    /// Check the scope after every move/removal that wrote something
    #[default]
    OnDrift,
    /// Check the scope after every move/removal, including no-op moves
    Always,
}

impl FromStr for HealPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "off" => Ok(Self::Never),
            "on_drift" | "on-drift" => Ok(Self::OnDrift),
            "always" => Ok(Self::Always),
            other => Err(format!("unknown heal policy: {other}")),
        }
    }
}

/// Result of the post-mutation consistency pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealStatus {
    /// Policy disabled, or the mutation wrote nothing
    Skipped,
    Clean,
    Repaired,
    /// The pass itself failed; the mutation is still committed
    Failed(String),
}

impl HealStatus {
    pub fn repaired(&self) -> bool {
        matches!(self, Self::Repaired)
    }

    /// Wire form: the state plus the failure message, if any
    pub fn into_parts(self) -> (HealState, Option<String>) {
        match self {
            Self::Skipped => (HealState::Skipped, None),
            Self::Clean => (HealState::Clean, None),
            Self::Repaired => (HealState::Repaired, None),
            Self::Failed(msg) => (HealState::Failed, Some(msg)),
        }
    }
}

/// A committed mutation plus the outcome of its consistency pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport<T> {
    pub value: T,
    pub heal: HealStatus,
}

// =============================================================================
// In-transaction operations
// =============================================================================

/// Position for a new item appended at the end of the scope
pub async fn append<T: OrderTx>(tx: &mut T) -> OrderResult<i32> {
    tx.count().await
}

/// Open a slot at `desired` (`0..=count`) by shifting everything at or after it.
///
/// The caller writes the new item with the returned position in the same
/// transaction.
pub async fn insert_at<T: OrderTx>(
    tx: &mut T,
    desired: i64,
    expected_count: Option<i32>,
) -> OrderResult<i32> {
    let count = tx.count().await?;
    check_expected_count(expected_count, count)?;
    let position = checked_position(desired, count)?;

    if position < count {
        tx.shift_range(ShiftRange::starting_at(position, 1)).await?;
    }
    Ok(position)
}

/// Move an existing item to `new_order` (`0..count`).
pub async fn move_to<T: OrderTx>(
    tx: &mut T,
    item_id: i64,
    new_order: i64,
    expected_count: Option<i32>,
) -> OrderResult<MoveOutcome> {
    let count = tx.count().await?;
    let old = current_order(tx, item_id).await?;
    check_expected_count(expected_count, count)?;
    let new = checked_position(new_order, count - 1)?;

    match new.cmp(&old) {
        std::cmp::Ordering::Equal => return Ok(MoveOutcome::Unchanged),
        std::cmp::Ordering::Greater => {
            tx.shift_range(ShiftRange::between(old + 1, new, -1).excluding(item_id))
                .await?;
        }
        std::cmp::Ordering::Less => {
            tx.shift_range(ShiftRange::between(new, old - 1, 1).excluding(item_id))
                .await?;
        }
    }
    tx.write_order(item_id, new).await?;

    Ok(MoveOutcome::Moved { from: old, to: new })
}

/// Move an item one position up or down; a step past either end is a no-op.
pub async fn move_step<T: OrderTx>(
    tx: &mut T,
    item_id: i64,
    direction: MoveDirection,
) -> OrderResult<MoveOutcome> {
    let count = tx.count().await?;
    let old = current_order(tx, item_id).await?;
    let target = match direction {
        MoveDirection::Up if old > 0 => old - 1,
        MoveDirection::Down if old + 1 < count => old + 1,
        _ => return Ok(MoveOutcome::Unchanged),
    };
    move_to(tx, item_id, i64::from(target), None).await
}

/// Delete an item and compact everything after it. Returns the freed position.
pub async fn remove<T: OrderTx>(tx: &mut T, item_id: i64) -> OrderResult<i32> {
    let order = current_order(tx, item_id).await?;
    tx.delete_and_shift(item_id, order).await?;
    Ok(order)
}

/// Rewrite every position to its rank in an ascending read.
///
/// Returns `false` without writing when the scope is already dense.
pub async fn normalize<T: OrderTx>(tx: &mut T) -> OrderResult<bool> {
    let items = tx.read_all_ascending().await?;
    if is_dense(&items) {
        return Ok(false);
    }

    for (rank, item) in items.iter().enumerate() {
        let rank = rank as i32;
        if item.sort_order != rank {
            tx.write_order(item.id, rank).await?;
        }
    }
    Ok(true)
}

/// Whether an ascending read forms exactly `0..N-1`
pub fn is_dense(items: &[OrderedItem]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(rank, item)| item.sort_order == rank as i32)
}

fn checked_position(requested: i64, max: i32) -> OrderResult<i32> {
    if requested < 0 || requested > i64::from(max) {
        return Err(OrderError::OutOfRange {
            requested,
            max: i64::from(max),
        });
    }
    Ok(requested as i32)
}

fn check_expected_count(expected: Option<i32>, actual: i32) -> OrderResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(OrderError::stale_count(expected, actual)),
        _ => Ok(()),
    }
}

async fn current_order<T: OrderTx>(tx: &mut T, item_id: i64) -> OrderResult<i32> {
    tx.order_of(item_id)
        .await?
        .ok_or_else(|| OrderError::ItemNotFound {
            collection: tx.collection(),
            scope: tx.scope(),
            item_id,
        })
}

// =============================================================================
// Engine facade
// =============================================================================

/// Transaction-owning entry point to the ordering algorithms
pub struct OrderEngine<S> {
    store: Arc<S>,
    heal: HealPolicy,
}

impl<S> Clone for OrderEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            heal: self.heal,
        }
    }
}

impl<S: OrderStore> OrderEngine<S> {
    pub fn new(store: Arc<S>, heal: HealPolicy) -> Self {
        Self { store, heal }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn heal_policy(&self) -> HealPolicy {
        self.heal
    }

    /// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
    pub async fn run_atomically<F, R>(
        &self,
        collection: Collection,
        scope: Scope,
        f: F,
    ) -> OrderResult<R>
    where
        F: for<'t> FnOnce(&'t mut S::Tx) -> BoxFuture<'t, OrderResult<R>> + Send,
        R: Send,
    {
        let mut tx = self.store.begin(collection, scope).await?;
        let value = f(&mut tx).await?;
        tx.commit().await?;
        Ok(value)
    }

    /// `MoveTo` as its own transaction, followed by the consistency pass
    pub async fn move_to(
        &self,
        collection: Collection,
        scope: Scope,
        item_id: i64,
        new_order: i64,
        expected_count: Option<i32>,
    ) -> OrderResult<MutationReport<MoveOutcome>> {
        let outcome = self
            .run_atomically(collection, scope, move |tx| {
                Box::pin(move_to(tx, item_id, new_order, expected_count))
            })
            .await?;
        self.report_move(collection, scope, item_id, outcome).await
    }

    /// One-step move as its own transaction
    pub async fn move_step(
        &self,
        collection: Collection,
        scope: Scope,
        item_id: i64,
        direction: MoveDirection,
    ) -> OrderResult<MutationReport<MoveOutcome>> {
        let outcome = self
            .run_atomically(collection, scope, move |tx| {
                Box::pin(move_step(tx, item_id, direction))
            })
            .await?;
        self.report_move(collection, scope, item_id, outcome).await
    }

    /// `Remove` as its own transaction, followed by the consistency pass
    pub async fn remove(
        &self,
        collection: Collection,
        scope: Scope,
        item_id: i64,
    ) -> OrderResult<MutationReport<i32>> {
        let freed = self
            .run_atomically(collection, scope, move |tx| Box::pin(remove(tx, item_id)))
            .await?;
        tracing::info!(%collection, %scope, item_id, position = freed, "Removed ordered item");

        let heal = self.heal(collection, scope, true).await;
        Ok(MutationReport { value: freed, heal })
    }

    /// Explicit `Normalize` pass; errors are returned to the caller
    pub async fn normalize(&self, collection: Collection, scope: Scope) -> OrderResult<bool> {
        let repaired = self
            .run_atomically(collection, scope, |tx| Box::pin(normalize(tx)))
            .await?;
        if repaired {
            tracing::warn!(%collection, %scope, "Repaired drifted sort order");
        }
        Ok(repaired)
    }

    /// Best-effort consistency pass after a committed mutation.
    ///
    /// Failures are logged and reported, never propagated.
    pub async fn heal(&self, collection: Collection, scope: Scope, changed: bool) -> HealStatus {
        let run = match self.heal {
            HealPolicy::Never => false,
            HealPolicy::OnDrift => changed,
            HealPolicy::Always => true,
        };
        if !run {
            return HealStatus::Skipped;
        }
        match self.normalize(collection, scope).await {
            Ok(true) => HealStatus::Repaired,
            Ok(false) => HealStatus::Clean,
            Err(e) => {
                tracing::warn!(%collection, %scope, error = %e, "Consistency pass failed");
                HealStatus::Failed(e.to_string())
            }
        }
    }

    async fn report_move(
        &self,
        collection: Collection,
        scope: Scope,
        item_id: i64,
        outcome: MoveOutcome,
    ) -> OrderResult<MutationReport<MoveOutcome>> {
        if let MoveOutcome::Moved { from, to } = outcome {
            tracing::info!(%collection, %scope, item_id, from, to, "Moved ordered item");
        }
        let heal = self.heal(collection, scope, outcome.changed()).await;
        Ok(MutationReport {
            value: outcome,
            heal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(orders: &[i32]) -> Vec<OrderedItem> {
        orders
            .iter()
            .enumerate()
            .map(|(i, &sort_order)| OrderedItem {
                id: i as i64 + 1,
                sort_order,
            })
            .collect()
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense(&[]));
        assert!(is_dense(&items(&[0, 1, 2])));
        assert!(!is_dense(&items(&[0, 2, 3])));
        assert!(!is_dense(&items(&[0, 1, 1])));
        assert!(!is_dense(&items(&[1, 2, 3])));
    }

    #[test]
    fn test_checked_position_bounds() {
        assert_eq!(checked_position(0, 4).unwrap(), 0);
        assert_eq!(checked_position(4, 4).unwrap(), 4);
        assert!(matches!(
            checked_position(5, 4),
            Err(OrderError::OutOfRange {
                requested: 5,
                max: 4
            })
        ));
        assert!(matches!(
            checked_position(-1, 4),
            Err(OrderError::OutOfRange { requested: -1, .. })
        ));
        // Empty scope: no valid move target at all
        assert!(checked_position(0, -1).is_err());
    }

    #[test]
    fn test_expected_count() {
        assert!(check_expected_count(None, 3).is_ok());
        assert!(check_expected_count(Some(3), 3).is_ok());
        assert!(matches!(
            check_expected_count(Some(2), 3),
            Err(OrderError::Conflict(_))
        ));
    }

    #[test]
    fn test_heal_policy_from_str() {
        assert_eq!("never".parse::<HealPolicy>().unwrap(), HealPolicy::Never);
        assert_eq!("ON_DRIFT".parse::<HealPolicy>().unwrap(), HealPolicy::OnDrift);
        assert_eq!("always".parse::<HealPolicy>().unwrap(), HealPolicy::Always);
        assert!("sometimes".parse::<HealPolicy>().is_err());
    }

    #[test]
    fn test_heal_status_into_parts() {
        assert_eq!(HealStatus::Clean.into_parts(), (HealState::Clean, None));
        assert_eq!(
            HealStatus::Failed("db down".into()).into_parts(),
            (HealState::Failed, Some("db down".to_string()))
        );
    }
}
