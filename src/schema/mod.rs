//! Schema Registry
//!
//! Declares the record kinds persisted in the local store, the tables that
//! back them, and how they relate to each other. The store is stamped with
//! [`SCHEMA_VERSION`]; opening a store stamped with any other version goes
//! through the configured [`SchemaMismatchPolicy`].

use sqlx::{Sqlite, SqlitePool, Transaction, query_scalar, raw_sql};
use tracing::{info, warn};

use crate::database::StoreError;

/// Version of the persisted shape. Bump on any table change.
pub const SCHEMA_VERSION: i64 = 1;

const CLIENTS_SQL: &str = include_str!("sql/clients.sql");
const PRODUCTS_SQL: &str = include_str!("sql/products.sql");
const ORDERS_SQL: &str = include_str!("sql/orders.sql");
const ORDER_ITEMS_SQL: &str = include_str!("sql/order_items.sql");

/// How a record refers to another record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Points at a record it does not own.
    References,

    /// Owns the related records; they live and die with the owner.
    Owns,
}

/// A relationship from one record kind to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Field holding the relationship.
    pub field: &'static str,

    /// Related record kind name.
    pub target: &'static str,

    /// Ownership semantics.
    pub kind: RelationKind,
}

/// Declaration of a single record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    /// Record kind name.
    pub name: &'static str,

    /// Backing table.
    pub table: &'static str,

    /// DDL creating the table and its indexes.
    pub create_sql: &'static str,

    /// Outgoing relationships.
    pub relations: &'static [Relation],
}

/// What to do when the store on disk carries a different schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SchemaMismatchPolicy {
    /// Drop every table and start over. Existing records are lost.
    #[default]
    Recreate,

    /// Refuse to open the store.
    Fail,
}

/// Every record kind, in dependency order: a kind only relates to kinds
/// listed before it.
pub const RECORD_KINDS: [RecordSchema; 4] = [
    RecordSchema {
        name: "Client",
        table: "clients",
        create_sql: CLIENTS_SQL,
        relations: &[],
    },
    RecordSchema {
        name: "Product",
        table: "products",
        create_sql: PRODUCTS_SQL,
        relations: &[],
    },
    RecordSchema {
        name: "Order",
        table: "orders",
        create_sql: ORDERS_SQL,
        relations: &[
            Relation {
                field: "client",
                target: "Client",
                kind: RelationKind::References,
            },
            Relation {
                field: "items",
                target: "OrderItem",
                kind: RelationKind::Owns,
            },
        ],
    },
    RecordSchema {
        name: "OrderItem",
        table: "order_items",
        create_sql: ORDER_ITEMS_SQL,
        relations: &[Relation {
            field: "product",
            target: "Product",
            kind: RelationKind::References,
        }],
    },
];

/// Look up a record kind by name.
pub fn record_kind(name: &str) -> Option<&'static RecordSchema> {
    RECORD_KINDS.iter().find(|kind| kind.name == name)
}

/// Bring the store's schema to [`SCHEMA_VERSION`].
///
/// A blank store (version `0`) gets every table created. A store already at
/// the declared version is left alone. Anything else is handled by `policy`.
pub(crate) async fn ensure(
    pool: &SqlitePool,
    policy: SchemaMismatchPolicy,
) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let found: i64 = query_scalar("PRAGMA user_version")
        .fetch_one(&mut *tx)
        .await?;

    match found {
        0 => {
            create_all(&mut tx).await?;

            info!(version = SCHEMA_VERSION, "created store schema");
        }
        SCHEMA_VERSION => {}
        found => match policy {
            SchemaMismatchPolicy::Fail => {
                return Err(StoreError::SchemaMismatch {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
            SchemaMismatchPolicy::Recreate => {
                warn!(
                    found,
                    expected = SCHEMA_VERSION,
                    "schema version mismatch, recreating store and discarding existing records"
                );

                drop_all(&mut tx).await?;
                create_all(&mut tx).await?;
            }
        },
    }

    tx.commit().await?;

    Ok(())
}

async fn create_all(tx: &mut Transaction<'_, Sqlite>) -> Result<(), sqlx::Error> {
    for kind in &RECORD_KINDS {
        raw_sql(kind.create_sql).execute(&mut **tx).await?;
    }

    let stamp = format!("PRAGMA user_version = {SCHEMA_VERSION}");

    raw_sql(&stamp).execute(&mut **tx).await?;

    Ok(())
}

async fn drop_all(tx: &mut Transaction<'_, Sqlite>) -> Result<(), sqlx::Error> {
    for kind in RECORD_KINDS.iter().rev() {
        let statement = format!("DROP TABLE IF EXISTS {}", kind.table);

        raw_sql(&statement).execute(&mut **tx).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kinds_only_relate_to_earlier_kinds() {
        for (index, kind) in RECORD_KINDS.iter().enumerate() {
            for relation in kind.relations {
                let target = RECORD_KINDS.iter().position(|k| k.name == relation.target);

                assert!(
                    target.is_some(),
                    "{} relates to unknown kind {}",
                    kind.name,
                    relation.target
                );

                if relation.kind == RelationKind::References {
                    assert!(
                        target.is_some_and(|target| target < index),
                        "{} references {} which is declared later",
                        kind.name,
                        relation.target
                    );
                }
            }
        }
    }

    #[test]
    fn order_owns_its_items() {
        let order = record_kind("Order");

        assert!(
            order.is_some_and(|order| order.relations.iter().any(|relation| {
                relation.target == "OrderItem" && relation.kind == RelationKind::Owns
            })),
            "Order should own OrderItem"
        );
    }

    #[test]
    fn order_item_references_product() {
        let item = record_kind("OrderItem");

        assert!(
            item.is_some_and(|item| item.relations.iter().any(|relation| {
                relation.target == "Product" && relation.kind == RelationKind::References
            })),
            "OrderItem should reference Product"
        );
    }

    #[test]
    fn unknown_record_kind_is_none() {
        assert!(record_kind("Invoice").is_none());
    }
}
