//! Query repository
//!
//! A fixed set of parameterized statements against `clients`,
//! `transactions` and `bills`. Each operation is a single statement run on a
//! pooled connection; bulk inserts are the only multi-statement operation
//! and run inside one database transaction.
//!
//! Filtered lookups report [`CoreError::NotFound`] when nothing matches.
//! Unfiltered listings return an empty vector instead.

use crate::db::Database;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    BillRow, ClientRow, ClientSummary, ClientTotalPaid, ClientTransactionRow, PendingBillRow,
    PlatformTransactionRow, Transaction, TransactionInput, TransactionListRow, TransactionRow,
    STATUS_COMPLETED,
};
use crate::normalize::validate_transaction_input;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;

/// Repository reference type
pub type RepositoryRef = Arc<dyn Repository>;

/// Upper bound of bound parameters in one SQLite statement
const SQLITE_MAX_VARIABLES: usize = 32_766;

/// Operations the HTTP layer and the batch loader need from storage
#[async_trait]
pub trait Repository: Send + Sync {
    /// Id and name of every client
    async fn list_clients(&self) -> CoreResult<Vec<ClientSummary>>;

    /// Every transaction with its client's name, by ascending id
    async fn list_transactions(&self) -> CoreResult<Vec<TransactionListRow>>;

    /// One transaction by primary key
    async fn get_transaction(&self, id: i64) -> CoreResult<Transaction>;

    /// Validate and insert; returns the generated id
    async fn create_transaction(&self, input: &TransactionInput) -> CoreResult<i64>;

    /// Replace every column of an existing transaction
    async fn update_transaction(&self, id: i64, input: &TransactionInput) -> CoreResult<()>;

    async fn delete_transaction(&self, id: i64) -> CoreResult<()>;

    /// Case-insensitive substring match on the client name
    async fn find_transactions_by_client_name(&self, pattern: &str) -> CoreResult<Vec<ClientTransactionRow>>;

    /// Sum of completed transactions per client, largest first
    async fn total_paid_by_client(&self) -> CoreResult<Vec<ClientTotalPaid>>;

    /// Transactions on one platform with their bills, newest first
    async fn transactions_by_platform(&self, platform: &str) -> CoreResult<Vec<PlatformTransactionRow>>;

    /// Bills where more was invoiced than paid
    async fn pending_bills(&self) -> CoreResult<Vec<PendingBillRow>>;

    /// Bulk inserts used by the batch loader; each returns rows inserted
    async fn insert_clients(&self, rows: &[ClientRow]) -> CoreResult<u64>;

    async fn insert_transactions(&self, rows: &[TransactionRow]) -> CoreResult<u64>;

    async fn insert_bills(&self, rows: &[BillRow]) -> CoreResult<u64>;
}

/// SQL-backed repository
#[derive(Clone, Debug)]
pub struct SqlRepository {
    db: Database,
}

impl SqlRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn into_ref(self) -> RepositoryRef {
        Arc::new(self)
    }

    /// Run one multi-row INSERT per chunk, all chunks in one transaction
    async fn bulk_insert<T, F>(&self, head: &str, columns: usize, rows: &[T], mut bind: F) -> CoreResult<u64>
    where
        T: Sync,
        F: FnMut(sqlx::query_builder::Separated<'_, '_, Sqlite, &'static str>, &T) + Send,
    {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.pool().begin().await?;
        let mut inserted = 0;
        for chunk in rows.chunks(SQLITE_MAX_VARIABLES / columns) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(head);
            builder.push_values(chunk, |b, row| bind(b, row));
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

#[async_trait]
impl Repository for SqlRepository {
    async fn list_clients(&self) -> CoreResult<Vec<ClientSummary>> {
        let rows = sqlx::query_as::<_, ClientSummary>(
            "SELECT client_id, name_client FROM clients ORDER BY client_id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    async fn list_transactions(&self) -> CoreResult<Vec<TransactionListRow>> {
        let rows = sqlx::query_as::<_, TransactionListRow>(
            r#"
            SELECT
                t.transaction_id,
                c.name_client,
                t.transaction_code,
                t.transaction_datetime,
                t.transaction_amount,
                t.transaction_status
            FROM transactions t
            LEFT JOIN clients c ON t.client_id_fk = c.client_id
            ORDER BY t.transaction_id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    async fn get_transaction(&self, id: i64) -> CoreResult<Transaction> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                transaction_id,
                transaction_code,
                transaction_datetime,
                transaction_amount,
                transaction_status,
                transaction_type,
                platform_used,
                client_id_fk
            FROM transactions
            WHERE transaction_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| CoreError::not_found(format!("Transaction {}", id)))
    }

    async fn create_transaction(&self, input: &TransactionInput) -> CoreResult<i64> {
        let row = validate_transaction_input(input)?;

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_code,
                transaction_datetime,
                transaction_amount,
                transaction_status,
                transaction_type,
                platform_used,
                client_id_fk
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.transaction_code)
        .bind(&row.transaction_datetime)
        .bind(row.transaction_amount)
        .bind(&row.transaction_status)
        .bind(&row.transaction_type)
        .bind(&row.platform_used)
        .bind(row.client_id_fk)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_transaction(&self, id: i64, input: &TransactionInput) -> CoreResult<()> {
        let row = validate_transaction_input(input)?;

        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                transaction_code = ?,
                transaction_datetime = ?,
                transaction_amount = ?,
                transaction_status = ?,
                transaction_type = ?,
                platform_used = ?,
                client_id_fk = ?
            WHERE transaction_id = ?
            "#,
        )
        .bind(&row.transaction_code)
        .bind(&row.transaction_datetime)
        .bind(row.transaction_amount)
        .bind(&row.transaction_status)
        .bind(&row.transaction_type)
        .bind(&row.platform_used)
        .bind(row.client_id_fk)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(format!("Transaction {}", id)));
        }
        Ok(())
    }

    async fn delete_transaction(&self, id: i64) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE transaction_id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(format!("Transaction {}", id)));
        }
        Ok(())
    }

    async fn find_transactions_by_client_name(&self, pattern: &str) -> CoreResult<Vec<ClientTransactionRow>> {
        let rows = sqlx::query_as::<_, ClientTransactionRow>(
            r#"
            SELECT
                t.transaction_id,
                t.transaction_code,
                t.transaction_datetime,
                t.transaction_amount,
                t.transaction_status,
                t.transaction_type,
                t.platform_used,
                c.client_id,
                c.name_client,
                c.identification,
                c.email,
                c.phone,
                c.address
            FROM transactions t
            JOIN clients c ON c.client_id = t.client_id_fk
            WHERE instr(lower(c.name_client), lower(?)) > 0
            ORDER BY t.transaction_id
            "#,
        )
        .bind(pattern)
        .fetch_all(self.db.pool())
        .await?;

        if rows.is_empty() {
            return Err(CoreError::not_found(format!(
                "Transactions for client matching '{}'",
                pattern
            )));
        }
        Ok(rows)
    }

    async fn total_paid_by_client(&self) -> CoreResult<Vec<ClientTotalPaid>> {
        let rows = sqlx::query_as::<_, ClientTotalPaid>(
            r#"
            SELECT
                c.client_id,
                c.name_client,
                c.identification,
                c.email,
                CAST(SUM(t.transaction_amount) AS REAL) AS total_paid
            FROM clients c
            JOIN transactions t ON c.client_id = t.client_id_fk
            WHERE t.transaction_status = ?
            GROUP BY c.client_id, c.name_client, c.identification, c.email
            ORDER BY total_paid DESC
            "#,
        )
        .bind(STATUS_COMPLETED)
        .fetch_all(self.db.pool())
        .await?;

        if rows.is_empty() {
            return Err(CoreError::not_found("Completed transactions"));
        }
        Ok(rows)
    }

    async fn transactions_by_platform(&self, platform: &str) -> CoreResult<Vec<PlatformTransactionRow>> {
        let rows = sqlx::query_as::<_, PlatformTransactionRow>(
            r#"
            SELECT
                t.transaction_id,
                t.transaction_code,
                t.transaction_datetime,
                t.transaction_amount,
                t.transaction_status,
                t.transaction_type,
                t.platform_used,
                c.name_client,
                c.identification,
                c.email,
                b.bill_code,
                b.invoiced_amount,
                b.paid_amount
            FROM transactions t
            JOIN clients c ON c.client_id = t.client_id_fk
            LEFT JOIN bills b ON b.transaction_id_fk = t.transaction_id
            WHERE t.platform_used = ?
            ORDER BY t.transaction_datetime DESC
            "#,
        )
        .bind(platform)
        .fetch_all(self.db.pool())
        .await?;

        if rows.is_empty() {
            return Err(CoreError::not_found(format!("Transactions for platform {}", platform)));
        }
        Ok(rows)
    }

    async fn pending_bills(&self) -> CoreResult<Vec<PendingBillRow>> {
        let rows = sqlx::query_as::<_, PendingBillRow>(
            r#"
            SELECT
                b.bill_id,
                b.bill_code,
                b.billing_period,
                b.invoiced_amount,
                b.paid_amount,
                CAST(b.invoiced_amount - b.paid_amount AS REAL) AS pending_amount,
                c.name_client,
                c.identification,
                c.email,
                t.transaction_code,
                t.transaction_datetime,
                t.transaction_amount
            FROM bills b
            JOIN clients c ON c.client_id = b.client_id_fk
            LEFT JOIN transactions t ON t.transaction_id = b.transaction_id_fk
            WHERE b.invoiced_amount > b.paid_amount
            ORDER BY b.billing_period DESC, c.name_client ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        if rows.is_empty() {
            return Err(CoreError::not_found("Pending bills"));
        }
        Ok(rows)
    }

    async fn insert_clients(&self, rows: &[ClientRow]) -> CoreResult<u64> {
        self.bulk_insert(
            "INSERT INTO clients (client_id, name_client, identification, address, phone, email) ",
            6,
            rows,
            |mut b, row| {
                b.push_bind(row.client_id)
                    .push_bind(row.name_client.clone())
                    .push_bind(row.identification.clone())
                    .push_bind(row.address.clone())
                    .push_bind(row.phone.clone())
                    .push_bind(row.email.clone());
            },
        )
        .await
    }

    async fn insert_transactions(&self, rows: &[TransactionRow]) -> CoreResult<u64> {
        self.bulk_insert(
            "INSERT INTO transactions (transaction_code, transaction_datetime, transaction_amount, \
             transaction_status, transaction_type, platform_used, client_id_fk) ",
            7,
            rows,
            |mut b, row| {
                b.push_bind(row.transaction_code.clone())
                    .push_bind(row.transaction_datetime.clone())
                    .push_bind(row.transaction_amount)
                    .push_bind(row.transaction_status.clone())
                    .push_bind(row.transaction_type.clone())
                    .push_bind(row.platform_used.clone())
                    .push_bind(row.client_id_fk);
            },
        )
        .await
    }

    async fn insert_bills(&self, rows: &[BillRow]) -> CoreResult<u64> {
        self.bulk_insert(
            "INSERT INTO bills (bill_code, billing_period, invoiced_amount, paid_amount, \
             transaction_id_fk, client_id_fk) ",
            6,
            rows,
            |mut b, row| {
                b.push_bind(row.bill_code.clone())
                    .push_bind(row.billing_period.clone())
                    .push_bind(row.invoiced_amount)
                    .push_bind(row.paid_amount)
                    .push_bind(row.transaction_id_fk)
                    .push_bind(row.client_id_fk);
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repository() -> SqlRepository {
        SqlRepository::new(Database::in_memory().await.unwrap())
    }

    fn client(id: i64, name: &str) -> ClientRow {
        ClientRow {
            client_id: id,
            name_client: name.to_string(),
            identification: Some(format!("ID-{}", id)),
            address: None,
            phone: None,
            email: Some(format!("client{}@example.com", id)),
        }
    }

    fn tx_row(code: &str, amount: f64, status: &str, platform: &str, client: i64, datetime: &str) -> TransactionRow {
        TransactionRow {
            transaction_code: Some(code.to_string()),
            transaction_datetime: Some(datetime.to_string()),
            transaction_amount: amount,
            transaction_status: Some(status.to_string()),
            transaction_type: Some("sale".to_string()),
            platform_used: Some(platform.to_string()),
            client_id_fk: Some(client),
        }
    }

    fn bill(code: &str, period: &str, invoiced: f64, paid: f64, tx: Option<i64>, client: i64) -> BillRow {
        BillRow {
            bill_code: code.to_string(),
            billing_period: Some(period.to_string()),
            invoiced_amount: invoiced,
            paid_amount: paid,
            transaction_id_fk: tx,
            client_id_fk: Some(client),
        }
    }

    fn input(code: &str, amount: f64, client: i64) -> TransactionInput {
        TransactionInput {
            transaction_code: Some(code.to_string()),
            transaction_datetime: Some("2024-05-01 09:30:00".to_string()),
            transaction_amount: Some(amount.into()),
            transaction_status: Some("Completed".to_string()),
            transaction_type: Some("sale".to_string()),
            platform_used: Some("web".to_string()),
            client_id_fk: Some(client.into()),
        }
    }

    async fn transaction_count(repo: &SqlRepository) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(repo.db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_empty_tables() {
        let repo = repository().await;
        assert!(repo.list_clients().await.unwrap().is_empty());
        assert!(repo.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();

        let id = repo.create_transaction(&input("T1", 100.0, 1)).await.unwrap();
        let tx = repo.get_transaction(id).await.unwrap();
        assert_eq!(tx.transaction_code.as_deref(), Some("T1"));
        assert_eq!(tx.transaction_amount, 100.0);
        assert_eq!(tx.client_id_fk, Some(1));

        let listed = repo.list_transactions().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name_client.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_list_transactions_keeps_orphans_in_id_order() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();
        let mut orphan = tx_row("T0", 5.0, "Pending", "app", 1, "2024-01-01 00:00:00");
        orphan.client_id_fk = None;
        repo.insert_transactions(&[tx_row("T1", 1.0, "Completed", "web", 1, "2024-01-02 00:00:00"), orphan])
            .await
            .unwrap();

        let listed = repo.list_transactions().await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.transaction_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(listed[1].name_client, None);
    }

    #[tokio::test]
    async fn test_get_missing_transaction() {
        let repo = repository().await;
        assert!(matches!(repo.get_transaction(42).await, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_missing_field_never_reaches_database() {
        let repo = repository().await;
        let mut body = input("T1", 10.0, 1);
        body.platform_used = None;

        assert!(matches!(repo.create_transaction(&body).await, Err(CoreError::BadRequest { .. })));
        assert_eq!(transaction_count(&repo).await, 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_client_is_constraint_violation() {
        let repo = repository().await;
        let result = repo.create_transaction(&input("T1", 10.0, 77)).await;
        assert!(matches!(result, Err(CoreError::ConstraintViolation { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_row() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana"), client(2, "Bruno")]).await.unwrap();
        let id = repo.create_transaction(&input("T1", 10.0, 1)).await.unwrap();

        let mut body = input("T1-EDIT", 25.5, 2);
        body.transaction_status = Some("Pending".to_string());
        repo.update_transaction(id, &body).await.unwrap();

        let tx = repo.get_transaction(id).await.unwrap();
        assert_eq!(tx.transaction_code.as_deref(), Some("T1-EDIT"));
        assert_eq!(tx.transaction_amount, 25.5);
        assert_eq!(tx.transaction_status.as_deref(), Some("Pending"));
        assert_eq!(tx.client_id_fk, Some(2));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();
        repo.create_transaction(&input("T1", 10.0, 1)).await.unwrap();

        assert!(matches!(
            repo.update_transaction(999, &input("X", 1.0, 1)).await,
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(repo.delete_transaction(999).await, Err(CoreError::NotFound { .. })));
        assert_eq!(transaction_count(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();
        let id = repo.create_transaction(&input("T1", 10.0, 1)).await.unwrap();

        repo.delete_transaction(id).await.unwrap();
        assert_eq!(transaction_count(&repo).await, 0);
        assert!(matches!(repo.delete_transaction(id).await, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_by_client_name_is_case_insensitive_substring() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana Gomez"), client(2, "Bruno Diaz")]).await.unwrap();
        repo.insert_transactions(&[
            tx_row("T1", 10.0, "Completed", "web", 1, "2024-01-01 10:00:00"),
            tx_row("T2", 20.0, "Completed", "web", 2, "2024-01-02 10:00:00"),
        ])
        .await
        .unwrap();

        let rows = repo.find_transactions_by_client_name("GOM").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name_client, "Ana Gomez");
        assert_eq!(rows[0].transaction_code.as_deref(), Some("T1"));

        assert!(matches!(
            repo.find_transactions_by_client_name("zzz").await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_total_paid_counts_only_exact_completed() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana"), client(2, "Bruno"), client(3, "Carla")]).await.unwrap();
        repo.insert_transactions(&[
            tx_row("T1", 100.0, "Completed", "web", 1, "2024-01-01 10:00:00"),
            tx_row("T2", 50.0, "completed", "web", 1, "2024-01-02 10:00:00"),
            tx_row("T3", 70.0, "Pending", "web", 1, "2024-01-03 10:00:00"),
            tx_row("T4", 300.0, "Completed", "app", 2, "2024-01-04 10:00:00"),
            tx_row("T5", 5.0, "Failed", "app", 3, "2024-01-05 10:00:00"),
        ])
        .await
        .unwrap();

        let totals = repo.total_paid_by_client().await.unwrap();
        let summary: Vec<(&str, f64)> = totals.iter().map(|t| (t.name_client.as_str(), t.total_paid)).collect();
        assert_eq!(summary, vec![("Bruno", 300.0), ("Ana", 100.0)]);
    }

    #[tokio::test]
    async fn test_total_paid_without_completed_is_not_found() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();
        repo.insert_transactions(&[tx_row("T1", 100.0, "Pending", "web", 1, "2024-01-01 10:00:00")])
            .await
            .unwrap();
        assert!(matches!(repo.total_paid_by_client().await, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_transactions_by_platform() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();
        repo.insert_transactions(&[
            tx_row("T1", 10.0, "Completed", "Nequi", 1, "2024-01-01 10:00:00"),
            tx_row("T2", 20.0, "Completed", "Nequi", 1, "2024-03-01 10:00:00"),
            tx_row("T3", 30.0, "Completed", "Daviplata", 1, "2024-02-01 10:00:00"),
        ])
        .await
        .unwrap();
        repo.insert_bills(&[bill("B1", "2024-01", 10.0, 10.0, Some(1), 1)]).await.unwrap();

        let rows = repo.transactions_by_platform("Nequi").await.unwrap();
        let codes: Vec<&str> = rows.iter().filter_map(|r| r.transaction_code.as_deref()).collect();
        assert_eq!(codes, vec!["T2", "T1"]);
        assert_eq!(rows[0].bill_code, None);
        assert_eq!(rows[1].bill_code.as_deref(), Some("B1"));

        assert!(matches!(
            repo.transactions_by_platform("nequi").await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_pending_bills_strictly_greater() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Bruno"), client(2, "Ana")]).await.unwrap();
        repo.insert_transactions(&[tx_row("T1", 10.0, "Completed", "web", 1, "2024-01-01 10:00:00")])
            .await
            .unwrap();
        repo.insert_bills(&[
            bill("EQUAL", "2024-07", 100.0, 100.0, None, 1),
            bill("OVERPAID", "2024-07", 50.0, 80.0, None, 1),
            bill("OLD", "2024-06", 100.0, 0.0, Some(1), 1),
            bill("NEW-B", "2024-07", 200.0, 150.0, None, 1),
            bill("NEW-A", "2024-07", 90.0, 10.0, None, 2),
        ])
        .await
        .unwrap();

        let rows = repo.pending_bills().await.unwrap();
        let codes: Vec<&str> = rows.iter().map(|r| r.bill_code.as_str()).collect();
        assert_eq!(codes, vec!["NEW-A", "NEW-B", "OLD"]);
        assert_eq!(rows[1].pending_amount, 50.0);
        assert_eq!(rows[2].transaction_code.as_deref(), Some("T1"));
        assert_eq!(rows[0].transaction_code, None);
    }

    #[tokio::test]
    async fn test_pending_bills_none() {
        let repo = repository().await;
        repo.insert_clients(&[client(1, "Ana")]).await.unwrap();
        repo.insert_bills(&[bill("B1", "2024-07", 10.0, 10.0, None, 1)]).await.unwrap();
        assert!(matches!(repo.pending_bills().await, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_bulk_insert_is_all_or_nothing() {
        let repo = repository().await;
        let rows = vec![client(1, "Ana"), client(2, "Bruno"), client(1, "Duplicate")];

        assert!(matches!(
            repo.insert_clients(&rows).await,
            Err(CoreError::ConstraintViolation { .. })
        ));
        assert!(repo.list_clients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_insert_empty_is_noop() {
        let repo = repository().await;
        assert_eq!(repo.insert_bills(&[]).await.unwrap(), 0);
    }
}
