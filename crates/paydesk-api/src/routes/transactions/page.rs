//! Transactions page rendering
//!
//! `GET /` renders the client select, the create/edit form, the search box
//! and the transactions table in one response. Query parameters:
//! - `edit=<id>`: load that transaction into the form
//! - `q=<text>`: numeric input looks up one transaction by id, anything
//!   else searches client names

use crate::view::{
    render_form, render_notice, render_script, render_search, render_transactions_table, FormState, SearchQuery,
    EMPTY_SEARCH_NOTICE,
};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Html;
use paydesk_core::{ClientSummary, CoreResult, RepositoryRef, Transaction, TransactionListRow};
use paydesk_utils::escape_html;
use std::collections::HashMap;

/// Transactions page - form, search and table
pub async fn page_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let repo = &state.repo;
    let mut notices = Vec::new();

    let clients = repo.list_clients().await.unwrap_or_else(|e| {
        log::warn!("Page could not load clients: {}", e);
        notices.push(format!("Error loading clients: {}", e));
        Vec::new()
    });

    let mut form = FormState::default();
    let mut current = None;
    if let Some(edit) = params.get("edit") {
        match edit.trim().parse::<i64>() {
            Ok(id) => match repo.get_transaction(id).await {
                Ok(transaction) => {
                    form.load(id);
                    current = Some(transaction);
                }
                Err(e) => notices.push(format!("Error fetching transaction for editing: {}", e)),
            },
            Err(_) => notices.push(format!("Invalid transaction id: {}", edit)),
        }
    }

    let query = params.get("q").map(String::as_str);
    let listing = match query.map(SearchQuery::parse) {
        None => repo.list_transactions().await,
        Some(SearchQuery::Empty) => {
            notices.push(EMPTY_SEARCH_NOTICE.to_string());
            repo.list_transactions().await
        }
        Some(SearchQuery::ById(id)) => search_by_id(repo, id, &clients).await,
        Some(SearchQuery::ByName(name)) => repo
            .find_transactions_by_client_name(&name)
            .await
            .map(|rows| rows.into_iter().map(TransactionListRow::from).collect()),
    };
    let table = match listing {
        Ok(rows) => render_transactions_table(&rows),
        Err(e) => render_notice(&e.to_string()),
    };

    let content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            {}
        </div>
        {}
        <div class='mb-6'>{}</div>
        <div id='transactions-content' class='bg-white rounded-xl shadow-sm overflow-x-auto'>{}</div>
        {}"#,
        render_search(query),
        render_banners(&notices),
        render_form(&form, &state.config.server.api_prefix, &clients, current.as_ref()),
        table,
        render_script(&state.config.server.api_prefix),
    );

    Html(crate::base_html("Transactions", &content))
}

async fn search_by_id(repo: &RepositoryRef, id: i64, clients: &[ClientSummary]) -> CoreResult<Vec<TransactionListRow>> {
    let transaction = repo.get_transaction(id).await?;
    Ok(vec![list_row(transaction, clients)])
}

/// Table row for a single transaction, naming its client from the loaded list
fn list_row(transaction: Transaction, clients: &[ClientSummary]) -> TransactionListRow {
    let name_client = transaction.client_id_fk.and_then(|id| {
        clients
            .iter()
            .find(|c| c.client_id == id)
            .map(|c| c.name_client.clone())
    });
    TransactionListRow {
        transaction_id: transaction.transaction_id,
        name_client,
        transaction_code: transaction.transaction_code,
        transaction_datetime: transaction.transaction_datetime,
        transaction_amount: transaction.transaction_amount,
        transaction_status: transaction.transaction_status,
    }
}

fn render_banners(notices: &[String]) -> String {
    notices
        .iter()
        .map(|n| {
            format!(
                "<div class='notice mb-4 p-3 bg-yellow-50 border border-yellow-200 rounded-lg text-sm'>{}</div>",
                escape_html(n)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_row_names_known_client() {
        let clients = vec![ClientSummary { client_id: 1, name_client: "Ana".to_string() }];
        let transaction = Transaction {
            transaction_id: 4,
            transaction_code: Some("T4".to_string()),
            transaction_datetime: None,
            transaction_amount: 5.0,
            transaction_status: Some("Completed".to_string()),
            transaction_type: None,
            platform_used: None,
            client_id_fk: Some(1),
        };

        let row = list_row(transaction.clone(), &clients);
        assert_eq!(row.name_client.as_deref(), Some("Ana"));
        assert_eq!(row.transaction_id, 4);

        let orphan = Transaction { client_id_fk: Some(9), ..transaction };
        assert_eq!(list_row(orphan, &clients).name_client, None);
    }

    #[test]
    fn test_banners_escape() {
        let html = render_banners(&["<b>x</b>".to_string()]);
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert_eq!(render_banners(&[]), "");
    }
}
