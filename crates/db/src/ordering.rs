//! Scoped auto-incrementing order assignment.
//!
//! An [`OrderField`] describes an integer position column together with the
//! columns that define its scope (for example a module's `order` scoped by
//! `course_id`). When a record is inserted without an explicit position the
//! field computes `max(order) + 1` over the records sharing the new record's
//! scope values. The first record in an empty scope gets position `0`.
//!
//! The computation runs before the insert is sent. Two writers racing in the
//! same scope can compute the same position; the unique index over
//! `(scope.., order)` rejects the second insert, which is then recomputed and
//! retried once by [`OrderField::insert`].

use educa_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, Value};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, FromQueryResult, IdenStatic, IntoActiveModel, QueryFilter, QuerySelect,
    SqlErr,
};
use tracing::{debug, warn};

/// Position assigned to the first record of an empty scope.
pub const FIRST_ORDER: i32 = 0;

#[derive(Debug, FromQueryResult)]
struct MaxOrder {
    max_order: Option<i32>,
}

/// An order column and the scope columns it is counted within.
#[derive(Debug, Clone, Copy)]
pub struct OrderField<E: EntityTrait + 'static> {
    order: E::Column,
    scope: &'static [E::Column],
}

impl<E: EntityTrait> OrderField<E> {
    /// Describe an order column counted within `scope`.
    #[must_use]
    pub const fn new(order: E::Column, scope: &'static [E::Column]) -> Self {
        Self { order, scope }
    }

    /// Whether the record carries no caller-provided position.
    pub fn is_unset<A>(&self, active: &A) -> bool
    where
        A: ActiveModelTrait<Entity = E>,
    {
        present(active.get(self.order)).is_none()
    }

    /// Build the sibling filter from the record's scope values.
    ///
    /// Every scope column must be set; a missing scope value is rejected
    /// because the sibling group would be undefined.
    pub fn scope_condition<A>(&self, active: &A) -> AppResult<Condition>
    where
        A: ActiveModelTrait<Entity = E>,
    {
        self.scope.iter().try_fold(Condition::all(), |cond, col| {
            let value = present(active.get(*col)).ok_or_else(|| {
                AppError::Validation(format!(
                    "Cannot assign {} without a value for {}",
                    self.order.as_str(),
                    col.as_str()
                ))
            })?;
            Ok(cond.add(col.eq(value)))
        })
    }

    /// Next free position among the records matching `scope`.
    pub async fn next_value<C>(&self, db: &C, scope: Condition) -> AppResult<i32>
    where
        C: ConnectionTrait,
    {
        let row = E::find()
            .select_only()
            .column_as(Expr::col(self.order.as_column_ref()).max(), "max_order")
            .filter(scope)
            .into_model::<MaxOrder>()
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row.and_then(|r| r.max_order) {
            None => Ok(FIRST_ORDER),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                AppError::Validation(format!(
                    "No {} left after {max}; move records to lower positions first",
                    self.order.as_str()
                ))
            }),
        }
    }

    /// Fill in the position if the caller left it unset.
    ///
    /// Returns the assigned value, or `None` when the record already carried
    /// an explicit position (which is never overridden).
    pub async fn assign<A, C>(&self, db: &C, active: &mut A) -> AppResult<Option<i32>>
    where
        A: ActiveModelTrait<Entity = E>,
        C: ConnectionTrait,
    {
        let scope = self.scope_condition(active)?;
        if !self.is_unset(active) {
            return Ok(None);
        }

        let next = self.next_value(db, scope).await?;
        active.set(self.order, next.into());

        debug!(column = self.order.as_str(), order = next, "Assigned next order");
        Ok(Some(next))
    }

    /// Insert a record, assigning its position first when unset.
    ///
    /// An auto-assigned position that collides with a concurrent insert is
    /// recomputed and retried once; a second collision surfaces as
    /// [`AppError::OrderCollision`]. Collisions on an explicit position are
    /// reported as [`AppError::Conflict`].
    pub async fn insert<A, C>(&self, db: &C, mut active: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
        C: ConnectionTrait,
    {
        let auto = self.assign(db, &mut active).await?.is_some();

        match active.clone().insert(db).await {
            Ok(model) => Ok(model),
            Err(err) if auto && is_unique_violation(&err) => {
                warn!(
                    column = self.order.as_str(),
                    "Order collided with a concurrent insert, recomputing"
                );
                active.not_set(self.order);
                self.assign(db, &mut active).await?;
                active.insert(db).await.map_err(|err| {
                    if is_unique_violation(&err) {
                        AppError::OrderCollision(err.to_string())
                    } else {
                        crate::db_error(err)
                    }
                })
            }
            Err(err) => Err(crate::db_error(err)),
        }
    }
}

fn present(value: ActiveValue<Value>) -> Option<Value> {
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) if !is_null(&v) => Some(v),
        _ => None,
    }
}

const fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Int(None) | Value::BigInt(None) | Value::Unsigned(None) | Value::String(None)
    )
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
