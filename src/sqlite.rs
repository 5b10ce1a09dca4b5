//! # SQLite Store
//!
//! Persistent implementation of every collaborator trait on one `SqlitePool`.
//! The unit of work is a real database transaction: the conditional stock
//! updates and the order insert commit together, and dropping an uncommitted
//! [`SqliteTransaction`] rolls it back.
//!
//! Prices are stored as decimal strings so they round-trip exactly.

use crate::config::DatabaseConfig;
use crate::model::{
    Customer, CustomerCreate, CustomerId, NewOrder, Order, OrderId, OrderLine, ProductCreate,
    ProductId, QuantityUpdate, StockItem,
};
use crate::store::{
    CustomerDirectory, OrderLedger, OrderTransaction, StockCatalog, StoreError, UnitOfWork,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        name  TEXT NOT NULL,
        email TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name     TEXT NOT NULL,
        price    TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER NOT NULL REFERENCES customers (id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_lines (
        order_id   INTEGER NOT NULL REFERENCES orders (id),
        position   INTEGER NOT NULL,
        product_id INTEGER NOT NULL REFERENCES products (id),
        price      TEXT NOT NULL,
        quantity   INTEGER NOT NULL CHECK (quantity > 0),
        PRIMARY KEY (order_id, position)
    )
    "#,
];

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// SQLite-backed customer directory, stock catalog, order ledger and unit of
/// work.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database at `config.url` and creates the schema if needed.
    ///
    /// Connections are kept open for the pool's lifetime so that an in-memory
    /// database (`sqlite::memory:`) survives between queries.
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout());
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        info!("SQLite store ready");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert_customer(&self, params: CustomerCreate) -> Result<CustomerId, StoreError> {
        let result = sqlx::query("INSERT INTO customers (name, email) VALUES (?1, ?2)")
            .bind(&params.name)
            .bind(&params.email)
            .execute(&self.pool)
            .await?;
        Ok(CustomerId(to_u32(result.last_insert_rowid())?))
    }

    pub async fn insert_product(&self, params: ProductCreate) -> Result<ProductId, StoreError> {
        let result =
            sqlx::query("INSERT INTO products (name, price, quantity) VALUES (?1, ?2, ?3)")
                .bind(&params.name)
                .bind(params.price.to_string())
                .bind(i64::from(params.quantity))
                .execute(&self.pool)
                .await?;
        Ok(ProductId(to_u32(result.last_insert_rowid())?))
    }

    /// Changes the catalog price. Stored order lines keep theirs.
    pub async fn set_price(&self, id: ProductId, price: Decimal) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE products SET price = ?1 WHERE id = ?2")
            .bind(price.to_string())
            .bind(i64::from(id.0))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownProduct(id));
        }
        Ok(())
    }

    pub async fn quantity_of(&self, id: ProductId) -> Result<Option<u32>, StoreError> {
        let quantity: Option<i64> = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
            .bind(i64::from(id.0))
            .fetch_optional(&self.pool)
            .await?;
        quantity.map(to_u32).transpose()
    }

    pub async fn order_count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(count).map_err(|e| StoreError::Backend(e.to_string()))
    }
}

fn to_u32(value: i64) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Backend(format!("value out of range: {value}")))
}

fn decimal(text: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(text).map_err(|e| StoreError::Backend(format!("bad price {text:?}: {e}")))
}

fn stock_item(row: &SqliteRow) -> Result<StockItem, StoreError> {
    Ok(StockItem {
        id: ProductId(to_u32(row.try_get("id")?)?),
        name: row.try_get("name")?,
        price: decimal(row.try_get("price")?)?,
        quantity: to_u32(row.try_get("quantity")?)?,
    })
}

#[async_trait]
impl CustomerDirectory for SqliteStore {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query("SELECT id, name, email FROM customers WHERE id = ?1")
            .bind(i64::from(id.0))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| -> Result<Customer, StoreError> {
            Ok(Customer {
                id: CustomerId(to_u32(row.try_get("id")?)?),
                name: row.try_get("name")?,
                email: row.try_get("email")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl StockCatalog for SqliteStore {
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<StockItem>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT id, name, price, quantity FROM products WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(i64::from(id.0));
        }
        separated.push_unseparated(")");

        let rows = query.build().fetch_all(&self.pool).await?;
        debug!(requested = ids.len(), found = rows.len(), "Fetched stock");
        rows.iter().map(stock_item).collect()
    }
}

#[async_trait]
impl OrderLedger for SqliteStore {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let Some(row) = sqlx::query(
            r#"
            SELECT c.id, c.name, c.email
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = ?1
            "#,
        )
        .bind(i64::from(id.0))
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let customer = Customer {
            id: CustomerId(to_u32(row.try_get("id")?)?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
        };

        let rows = sqlx::query(
            "SELECT product_id, price, quantity FROM order_lines WHERE order_id = ?1 ORDER BY position",
        )
        .bind(i64::from(id.0))
        .fetch_all(&self.pool)
        .await?;
        let lines = rows
            .iter()
            .map(|row| -> Result<OrderLine, StoreError> {
                Ok(OrderLine {
                    product_id: ProductId(to_u32(row.try_get("product_id")?)?),
                    price: decimal(row.try_get("price")?)?,
                    quantity: to_u32(row.try_get("quantity")?)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Order {
            id,
            customer,
            lines,
        }))
    }
}

#[async_trait]
impl UnitOfWork for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteTransaction { tx }))
    }
}

/// An open database transaction. Rolled back by sqlx when dropped uncommitted.
pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl OrderTransaction for SqliteTransaction {
    async fn update_quantities(&mut self, updates: &[QuantityUpdate]) -> Result<(), StoreError> {
        for update in updates {
            let units = update.decrement();
            if units == 0 {
                continue;
            }
            let product = i64::from(update.product_id.0);
            let result = sqlx::query(
                "UPDATE products SET quantity = quantity - ?1 WHERE id = ?2 AND quantity >= ?1",
            )
            .bind(i64::from(units))
            .bind(product)
            .execute(&mut *self.tx)
            .await?;
            if result.rows_affected() == 1 {
                continue;
            }

            let available: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                    .bind(product)
                    .fetch_optional(&mut *self.tx)
                    .await?;
            warn!(product_id = %update.product_id, units, ?available, "Decrement refused");
            return Err(match available {
                Some(available) => StoreError::InsufficientStock {
                    product_id: update.product_id,
                    requested: units,
                    available: to_u32(available)?,
                },
                None => StoreError::UnknownProduct(update.product_id),
            });
        }
        Ok(())
    }

    async fn create_order(&mut self, order: NewOrder) -> Result<Order, StoreError> {
        let result = sqlx::query("INSERT INTO orders (customer_id) VALUES (?1)")
            .bind(i64::from(order.customer.id.0))
            .execute(&mut *self.tx)
            .await?;
        let id = OrderId(to_u32(result.last_insert_rowid())?);

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                "INSERT INTO order_lines (order_id, position, product_id, price, quantity) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(i64::from(id.0))
            .bind(position as i64)
            .bind(i64::from(line.product_id.0))
            .bind(line.price.to_string())
            .bind(i64::from(line.quantity))
            .execute(&mut *self.tx)
            .await?;
        }
        debug!(order_id = %id, lines = order.lines.len(), "Order inserted");
        Ok(Order::new(id, order))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
