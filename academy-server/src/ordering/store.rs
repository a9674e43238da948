//! Persistence contract consumed by the engine

use async_trait::async_trait;

use super::{Collection, OrderResult, OrderedItem, Scope, ShiftRange};

/// One open transaction bound to a single `(collection, scope)`.
///
/// Every method only sees rows of that scope. Dropping the transaction
/// without calling [`OrderTx::commit`] rolls back everything it wrote.
#[async_trait]
pub trait OrderTx: Send {
    fn collection(&self) -> Collection;

    fn scope(&self) -> Scope;

    /// Number of items in the scope
    async fn count(&mut self) -> OrderResult<i32>;

    /// Current position of an item, `None` if it is not in the scope
    async fn order_of(&mut self, item_id: i64) -> OrderResult<Option<i32>>;

    /// Apply a range-shift update, returning the number of rows touched
    async fn shift_range(&mut self, range: ShiftRange) -> OrderResult<u64>;

    /// Set the position of a single item
    async fn write_order(&mut self, item_id: i64, sort_order: i32) -> OrderResult<()>;

    /// Delete an item and close the gap it leaves behind
    async fn delete_and_shift(&mut self, item_id: i64, deleted_order: i32) -> OrderResult<()>;

    /// Every item of the scope, ascending by `sort_order` (ties by id)
    async fn read_all_ascending(&mut self) -> OrderResult<Vec<OrderedItem>>;

    /// Make every write of this transaction visible atomically
    async fn commit(self) -> OrderResult<()>
    where
        Self: Sized;
}

/// Transactional storage the engine runs against
#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    type Tx: OrderTx;

    /// Open a transaction scoped to one collection partition
    async fn begin(&self, collection: Collection, scope: Scope) -> OrderResult<Self::Tx>;
}
