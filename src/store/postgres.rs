//! PostgreSQL ledger store.
//!
//! Listing queries stream rows straight off the wire inside a
//! `try_stream!` block that owns a pool handle: the sqlx row stream (and
//! with it the checked-out connection) lives inside the generator and is
//! released when the consumer drops the stream, on every exit path.

use async_stream::try_stream;
use futures::TryStreamExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::domain::{
    Clearance, Currency, Service, ServiceKind, ServiceState, Transaction, TransactionState, User,
};

use super::{EntityStream, LedgerStore, PAGE_SIZE, StoreError, UserProfileUpdate};

/// Ledger store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the connection or a migration
    /// fails.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|error| StoreError::Decode(error.to_string()))?;

        Ok(Self::new(pool))
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    clearance: i16,
    username: String,
    passhash: String,
    fullname: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let clearance = Clearance::from_i16(row.clearance)
            .ok_or_else(|| StoreError::Decode(format!("unknown clearance {}", row.clearance)))?;
        Ok(Self {
            id: row.id,
            clearance,
            username: row.username,
            passhash: row.passhash,
            fullname: row.fullname,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    kind: i16,
    state: i16,
    permissions: i16,
    currency: String,
    init_balance: Decimal,
    balance: Decimal,
}

impl TryFrom<ServiceRow> for Service {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let kind = ServiceKind::from_i16(row.kind)
            .ok_or_else(|| StoreError::Decode(format!("unknown service kind {}", row.kind)))?;
        let state = ServiceState::from_i16(row.state)
            .ok_or_else(|| StoreError::Decode(format!("unknown service state {}", row.state)))?;
        let currency: Currency = row
            .currency
            .trim()
            .parse()
            .map_err(|error| StoreError::Decode(format!("{error}")))?;
        Ok(Self {
            id: row.id,
            kind,
            state,
            permissions: row.permissions,
            currency,
            init_balance: row.init_balance,
            balance: row.balance,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    state: i16,
    time: chrono::DateTime<chrono::Utc>,
    currency: String,
    amount: Decimal,
    source: Uuid,
    destination: Uuid,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let state = TransactionState::from_i16(row.state)
            .ok_or_else(|| StoreError::Decode(format!("unknown transaction state {}", row.state)))?;
        let currency: Currency = row
            .currency
            .trim()
            .parse()
            .map_err(|error| StoreError::Decode(format!("{error}")))?;
        Ok(Self {
            id: row.id,
            state,
            time: row.time,
            currency,
            amount: row.amount,
            source: row.source,
            destination: row.destination,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The nil uuid sorts before every real key, so an absent cursor starts the
/// scan at the beginning of the collection.
fn cursor_key(cursor: Option<Uuid>) -> Uuid {
    cursor.unwrap_or_else(Uuid::nil)
}

fn expect_one_row(rows: u64) -> Result<(), StoreError> {
    if rows == 1 {
        Ok(())
    } else {
        Err(StoreError::Conflict { rows })
    }
}

const SELECT_USER: &str = "select id, clearance, username, passhash, fullname from users";
const SELECT_SERVICE: &str =
    "select id, kind, state, permissions, currency, init_balance, balance from services";
const SELECT_TRANSACTION: &str =
    "select id, state, time, currency, amount, source, destination from transactions";

#[async_trait::async_trait]
impl LedgerStore for PgLedgerStore {
    // --- users -----------------------------------------------------------

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "insert into users(id, clearance, username, passhash, fullname) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(user.clearance.as_i16())
        .bind(&user.username)
        .bind(&user.passhash)
        .bind(&user.fullname)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} where id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        User::try_from(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} where username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        User::try_from(row)
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        patch: &UserProfileUpdate,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "update users set \
             username = coalesce($1, username), \
             fullname = coalesce($2, fullname), \
             passhash = coalesce($3, passhash) \
             where id = $4",
        )
        .bind(patch.username.as_deref())
        .bind(patch.fullname.as_deref())
        .bind(patch.passhash.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        // Links first; the row delete would trip the foreign key otherwise.
        sqlx::query("delete from user_service where user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("delete from users where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_users(&self, cursor: Option<Uuid>) -> Result<EntityStream<User>, StoreError> {
        let pool = self.pool.clone();
        let after = cursor_key(cursor);
        Ok(Box::pin(try_stream! {
            let mut rows =
                sqlx::query_as::<_, UserRow>(
                    "select id, clearance, username, passhash, fullname from users \
                     where id > $1 order by id limit $2",
                )
                .bind(after)
                .bind(PAGE_SIZE)
                .fetch(&pool);
            while let Some(row) = rows.try_next().await.map_err(StoreError::Backend)? {
                yield User::try_from(row)?;
            }
        }))
    }

    // --- services --------------------------------------------------------

    async fn create_service(&self, service: &Service) -> Result<(), StoreError> {
        sqlx::query(
            "insert into services(id, kind, state, permissions, currency, init_balance, balance) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(service.id)
        .bind(service.kind.as_i16())
        .bind(service.state.as_i16())
        .bind(service.permissions)
        .bind(service.currency.as_str())
        .bind(service.init_balance)
        .bind(service.balance)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_service(&self, id: Uuid) -> Result<Service, StoreError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!("{SELECT_SERVICE} where id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Service::try_from(row)
    }

    async fn list_services(
        &self,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Service>, StoreError> {
        let pool = self.pool.clone();
        let after = cursor_key(cursor);
        Ok(Box::pin(try_stream! {
            let mut rows =
                sqlx::query_as::<_, ServiceRow>(
                    "select id, kind, state, permissions, currency, init_balance, balance \
                     from services where id > $1 order by id limit $2",
                )
                .bind(after)
                .bind(PAGE_SIZE)
                .fetch(&pool);
            while let Some(row) = rows.try_next().await.map_err(StoreError::Backend)? {
                yield Service::try_from(row)?;
            }
        }))
    }

    async fn list_services_for_user(
        &self,
        user_id: Uuid,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Service>, StoreError> {
        let pool = self.pool.clone();
        let after = cursor_key(cursor);
        Ok(Box::pin(try_stream! {
            let mut rows =
                sqlx::query_as::<_, ServiceRow>(
                    "select s.id, s.kind, s.state, s.permissions, s.currency, \
                            s.init_balance, s.balance \
                     from services s \
                     join user_service us on us.service_id = s.id \
                     where us.user_id = $1 and s.id > $2 \
                     order by s.id limit $3",
                )
                .bind(user_id)
                .bind(after)
                .bind(PAGE_SIZE)
                .fetch(&pool);
            while let Some(row) = rows.try_next().await.map_err(StoreError::Backend)? {
                yield Service::try_from(row)?;
            }
        }))
    }

    async fn update_service_state(
        &self,
        id: Uuid,
        new_state: ServiceState,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("update services set state = $1 where id = $2")
            .bind(new_state.as_i16())
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_row(result.rows_affected())
    }

    async fn link_service_to_user(
        &self,
        service_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        sqlx::query("insert into user_service(user_id, service_id) values ($1, $2)")
            .bind(user_id)
            .bind(service_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_owns_service(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "select exists(select 1 from user_service where user_id = $1 and service_id = $2)",
        )
        .bind(user_id)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // --- transactions ----------------------------------------------------

    async fn create_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        sqlx::query(
            "insert into transactions(id, state, time, currency, amount, source, destination) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(transaction.id)
        .bind(transaction.state.as_i16())
        .bind(transaction.time)
        .bind(transaction.currency.as_str())
        .bind(transaction.amount)
        .bind(transaction.source)
        .bind(transaction.destination)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_transaction(&self, id: Uuid) -> Result<Transaction, StoreError> {
        let row =
            sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_TRANSACTION} where id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StoreError::NotFound)?;
        Transaction::try_from(row)
    }

    async fn list_transactions(
        &self,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Transaction>, StoreError> {
        let pool = self.pool.clone();
        let after = cursor_key(cursor);
        Ok(Box::pin(try_stream! {
            let mut rows =
                sqlx::query_as::<_, TransactionRow>(
                    "select id, state, time, currency, amount, source, destination \
                     from transactions where id > $1 order by id limit $2",
                )
                .bind(after)
                .bind(PAGE_SIZE)
                .fetch(&pool);
            while let Some(row) = rows.try_next().await.map_err(StoreError::Backend)? {
                yield Transaction::try_from(row)?;
            }
        }))
    }

    async fn list_transactions_for_service(
        &self,
        service_id: Uuid,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Transaction>, StoreError> {
        let pool = self.pool.clone();
        let after = cursor_key(cursor);
        Ok(Box::pin(try_stream! {
            let mut rows =
                sqlx::query_as::<_, TransactionRow>(
                    "select id, state, time, currency, amount, source, destination \
                     from transactions \
                     where (source = $1 or destination = $1) and id > $2 \
                     order by id limit $3",
                )
                .bind(service_id)
                .bind(after)
                .bind(PAGE_SIZE)
                .fetch(&pool);
            while let Some(row) = rows.try_next().await.map_err(StoreError::Backend)? {
                yield Transaction::try_from(row)?;
            }
        }))
    }

    async fn update_transaction_state(
        &self,
        id: Uuid,
        new_state: TransactionState,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("update transactions set state = $1 where id = $2")
            .bind(new_state.as_i16())
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_row(result.rows_affected())
    }
}
