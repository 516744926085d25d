//! PostgreSQL-backed `RuleRepository` implementation using Diesel ORM.
//!
//! Writes that set `is_default` clear the owner's other defaults inside the
//! same transaction before the row is written, so the partial unique index
//! on `(user_id) WHERE is_default` never trips.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RuleRepository, RuleRepositoryError};
use crate::domain::{Rule, RuleId, UserId};

use super::diesel_error_mapping::{classify_diesel_error, pool_error_message};
use super::models::{NewRuleRow, RuleChanges, RuleRow, row_to_rule};
use super::pool::{DbPool, PoolError};
use super::schema::rules;

/// Diesel-backed implementation of the [`RuleRepository`] port.
#[derive(Clone)]
pub struct DieselRuleRepository {
    pool: DbPool,
}

impl DieselRuleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RuleRepositoryError {
    RuleRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RuleRepositoryError {
    classify_diesel_error(error)
        .into_basic(RuleRepositoryError::query, RuleRepositoryError::connection)
}

fn convert(row: RuleRow) -> Result<Rule, RuleRepositoryError> {
    row_to_rule(row).map_err(RuleRepositoryError::query)
}

/// Clear `is_default` on the owner's rules other than `keep`.
async fn clear_other_defaults(
    conn: &mut AsyncPgConnection,
    owner: &UserId,
    keep: &RuleId,
) -> Result<usize, diesel::result::Error> {
    diesel::update(
        rules::table
            .filter(rules::user_id.eq(owner.as_uuid()))
            .filter(rules::id.ne(keep.as_uuid()))
            .filter(rules::is_default.eq(true)),
    )
    .set(rules::is_default.eq(false))
    .execute(conn)
    .await
}

#[async_trait]
impl RuleRepository for DieselRuleRepository {
    async fn find_by_id(&self, id: &RuleId) -> Result<Option<Rule>, RuleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RuleRow> = rules::table
            .filter(rules::id.eq(id.as_uuid()))
            .select(RuleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(convert).transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Rule>, RuleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RuleRow> = rules::table
            .filter(rules::user_id.eq(owner.as_uuid()))
            .order_by((rules::is_default.desc(), rules::created_at.desc()))
            .select(RuleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(convert).collect()
    }

    async fn create(&self, rule: &Rule) -> Result<(), RuleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRuleRow::from(rule);
        let owner = rule.owner;
        let rule_id = rule.id;
        let is_default = rule.is_default;

        conn.transaction(|conn| {
            async move {
                if is_default {
                    clear_other_defaults(conn, &owner, &rule_id).await?;
                }
                diesel::insert_into(rules::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, rule: &Rule) -> Result<(), RuleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = RuleChanges::from(rule);
        let owner = rule.owner;
        let rule_id = rule.id;
        let is_default = rule.is_default;

        let updated = conn
            .transaction(|conn| {
                async move {
                    if is_default {
                        clear_other_defaults(conn, &owner, &rule_id).await?;
                    }
                    diesel::update(rules::table.filter(rules::id.eq(rule_id.as_uuid())))
                        .set(&changes)
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(RuleRepositoryError::query("rule not found for update"));
        }
        Ok(())
    }

    async fn delete(&self, id: &RuleId) -> Result<bool, RuleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(rules::table.filter(rules::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
