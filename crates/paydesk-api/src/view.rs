//! Transaction management page building blocks
//!
//! The page keeps one piece of state, [`FormState`], which decides whether
//! the form creates a new transaction or replaces an existing one. The
//! search box input is classified by [`SearchQuery`]. Everything else here
//! renders repository rows into HTML fragments.

use paydesk_core::{ClientSummary, Transaction, TransactionListRow};
use paydesk_utils::{escape_html, format_money};
use std::convert::Infallible;

/// Notice shown when the search box is submitted empty
pub const EMPTY_SEARCH_NOTICE: &str = "Please enter a client name or ID";

// ==================== Form state ====================

/// What the form does when submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// POST a new transaction
    Create,
    /// PUT over an existing transaction
    Update(i64),
}

impl SubmitAction {
    pub fn method(&self) -> &'static str {
        match self {
            SubmitAction::Create => "POST",
            SubmitAction::Update(_) => "PUT",
        }
    }

    /// Endpoint under `api_prefix` that receives the form body
    pub fn url(&self, api_prefix: &str) -> String {
        match self {
            SubmitAction::Create => format!("{}/transactions", api_prefix),
            SubmitAction::Update(id) => format!("{}/transactions/{}", api_prefix, id),
        }
    }
}

/// Create/edit state of the transaction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Editing(i64),
}

impl FormState {
    /// Start editing a loaded transaction
    pub fn load(&mut self, id: i64) {
        *self = FormState::Editing(id);
    }

    /// Send the form through `send` and go back to idle when it succeeds.
    /// A failed send keeps the current state so the user can retry by hand.
    pub fn submit<E>(&mut self, send: impl FnOnce(SubmitAction) -> Result<(), E>) -> Result<(), E> {
        send(self.action())?;
        *self = FormState::Idle;
        Ok(())
    }

    pub fn cancel(&mut self) {
        *self = FormState::Idle;
    }

    pub fn action(&self) -> SubmitAction {
        match self {
            FormState::Idle => SubmitAction::Create,
            FormState::Editing(id) => SubmitAction::Update(*id),
        }
    }

    pub fn editing_id(&self) -> Option<i64> {
        match self {
            FormState::Idle => None,
            FormState::Editing(id) => Some(*id),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormState::Idle => "New",
            FormState::Editing(_) => "Save Changes",
        }
    }

    /// Page address that reproduces this state
    pub fn page_url(&self) -> String {
        match self {
            FormState::Idle => "/".to_string(),
            FormState::Editing(id) => format!("/?edit={}", id),
        }
    }

    /// Page address to open once a submit has gone through
    pub fn after_submit_url(&self) -> String {
        let mut next = *self;
        let sent: Result<(), Infallible> = next.submit(|_| Ok(()));
        match sent {
            Ok(()) => next.page_url(),
            Err(never) => match never {},
        }
    }

    /// Page address of the Cancel link, or `None` when cancelling changes nothing
    pub fn cancel_url(&self) -> Option<String> {
        let mut next = *self;
        next.cancel();
        (next != *self).then(|| next.page_url())
    }
}

// ==================== Search ====================

/// Classified search box input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Empty,
    ById(i64),
    ByName(String),
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return SearchQuery::Empty;
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            // Too many digits for an id still searches by name
            if let Ok(id) = input.parse() {
                return SearchQuery::ById(id);
            }
        }
        SearchQuery::ByName(input.to_string())
    }
}

// ==================== Rendering ====================

/// `<option>` list for the client select, with a placeholder first
pub fn render_client_options(clients: &[ClientSummary], selected: Option<i64>) -> String {
    let mut html = String::from("<option value=''>Select a client</option>");
    for client in clients {
        let is_selected = if selected == Some(client.client_id) { " selected" } else { "" };
        html.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            client.client_id,
            is_selected,
            escape_html(&client.name_client)
        ));
    }
    html
}

/// Table body rows with edit and delete actions
pub fn render_transaction_rows(rows: &[TransactionListRow]) -> String {
    let mut html = String::new();
    for row in rows {
        html.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='py-2 px-4'>{id}</td>
                <td class='py-2 px-4'>{client}</td>
                <td class='py-2 px-4 font-mono text-sm'>{code}</td>
                <td class='py-2 px-4 text-sm'>{datetime}</td>
                <td class='py-2 px-4 text-right'>{amount}</td>
                <td class='py-2 px-4'>{status}</td>
                <td class='py-2 px-4 whitespace-nowrap'>
                    <a href='/?edit={id}' class='bg-yellow-500 text-white px-2 py-1 rounded hover:bg-yellow-600 text-sm'>Edit</a>
                    <button type='button' onclick='deleteTransaction({id})' class='bg-red-500 text-white px-2 py-1 rounded hover:bg-red-600 text-sm'>Delete</button>
                </td>
            </tr>"#,
            id = row.transaction_id,
            client = text(row.name_client.as_deref()),
            code = text(row.transaction_code.as_deref()),
            datetime = text(row.transaction_datetime.as_deref()),
            amount = format_money(row.transaction_amount),
            status = text(row.transaction_status.as_deref()),
        ));
    }
    html
}

/// Full transactions table, or a notice when there is nothing to show
pub fn render_transactions_table(rows: &[TransactionListRow]) -> String {
    if rows.is_empty() {
        return render_notice("No transactions yet");
    }
    format!(
        r#"<table class='min-w-full bg-white'>
            <thead class='bg-gray-100 text-left text-sm text-gray-600'>
                <tr>
                    <th class='py-2 px-4'>ID</th>
                    <th class='py-2 px-4'>Client</th>
                    <th class='py-2 px-4'>Code</th>
                    <th class='py-2 px-4'>Date</th>
                    <th class='py-2 px-4 text-right'>Amount</th>
                    <th class='py-2 px-4'>Status</th>
                    <th class='py-2 px-4'>Actions</th>
                </tr>
            </thead>
            <tbody id='transactionsTable'>{}</tbody>
        </table>"#,
        render_transaction_rows(rows)
    )
}

pub fn render_notice(message: &str) -> String {
    format!(
        "<p class='notice text-gray-500 text-center py-6'>{}</p>",
        escape_html(message)
    )
}

/// Create/edit form. `current` fills the fields while editing; the request
/// method, target and follow-up pages come from `state`.
pub fn render_form(
    state: &FormState,
    api_prefix: &str,
    clients: &[ClientSummary],
    current: Option<&Transaction>,
) -> String {
    let value = |field: Option<&Option<String>>| text(field.and_then(|v| v.as_deref()));
    let action = state.action();
    let editing = state.editing_id().map(|id| id.to_string()).unwrap_or_default();
    let amount = current.map(|t| t.transaction_amount.to_string()).unwrap_or_default();
    let datetime = current
        .and_then(|t| t.transaction_datetime.as_deref())
        .map(datetime_local_value)
        .unwrap_or_default();
    let cancel = state
        .cancel_url()
        .map(|href| {
            format!(
                "<a href='{}' id='clearButton' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</a>",
                escape_html(&href)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<form id='transactionForm' data-editing='{editing}' data-method='{method}' data-url='{url}' data-next='{next}' class='bg-white rounded-xl shadow-sm p-6 grid grid-cols-1 md:grid-cols-2 gap-4'>
            <label class='flex flex-col text-sm'>Client
                <select name='client_id_fk' class='mt-1 px-3 py-2 border rounded-lg'>{options}</select>
            </label>
            <label class='flex flex-col text-sm'>Code
                <input type='text' name='transaction_code' value='{code}' class='mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='flex flex-col text-sm'>Amount
                <input type='text' name='transaction_amount' value='{amount}' inputmode='decimal' class='mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='flex flex-col text-sm'>Date
                <input type='datetime-local' name='transaction_datetime' value='{datetime}' class='mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='flex flex-col text-sm'>Status
                <input type='text' name='transaction_status' value='{status}' class='mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='flex flex-col text-sm'>Type
                <input type='text' name='transaction_type' value='{kind}' class='mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <label class='flex flex-col text-sm'>Platform
                <input type='text' name='platform_used' value='{platform}' class='mt-1 px-3 py-2 border rounded-lg'>
            </label>
            <div class='flex items-end gap-2'>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>{label}</button>
                {cancel}
            </div>
        </form>"#,
        editing = editing,
        method = action.method(),
        url = escape_html(&action.url(api_prefix)),
        next = escape_html(&state.after_submit_url()),
        options = render_client_options(clients, current.and_then(|t| t.client_id_fk)),
        code = value(current.map(|t| &t.transaction_code)),
        amount = amount,
        datetime = escape_html(&datetime),
        status = value(current.map(|t| &t.transaction_status)),
        kind = value(current.map(|t| &t.transaction_type)),
        platform = value(current.map(|t| &t.platform_used)),
        label = state.submit_label(),
        cancel = cancel,
    )
}

/// Search box that reloads the page with `?q=`
pub fn render_search(query: Option<&str>) -> String {
    format!(
        r#"<form method='get' action='/' class='flex gap-2'>
            <input type='text' id='search_name' name='q' value='{}' placeholder='Client name or ID' class='px-4 py-2 border rounded-lg w-64'>
            <button type='submit' class='px-4 py-2 bg-gray-800 text-white rounded-lg hover:bg-gray-900'>Search</button>
            <a href='/' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>All</a>
        </form>"#,
        escape_html(query.unwrap_or_default())
    )
}

/// Script that sends the form and delete buttons to the JSON API
pub fn render_script(api_prefix: &str) -> String {
    format!(
        r#"<script>
        const API_URL = '{}/transactions';

        document.getElementById('transactionForm').addEventListener('submit', async (e) => {{
            e.preventDefault();
            const form = e.target;
            const value = (name) => form.elements[name].value.trim();
            const amount = value('transaction_amount').replace(/[$,]/g, '');
            const client = value('client_id_fk');

            const body = {{
                client_id_fk: client ? Number(client) : null,
                transaction_code: value('transaction_code'),
                transaction_amount: amount ? Number(amount) : null,
                transaction_datetime: value('transaction_datetime') || null,
                transaction_status: value('transaction_status'),
                transaction_type: value('transaction_type'),
                platform_used: value('platform_used'),
            }};

            try {{
                const res = await fetch(form.dataset.url, {{
                    method: form.dataset.method,
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify(body),
                }});
                if (!res.ok) {{
                    const data = await res.json().catch(() => ({{}}));
                    alert('Error saving transaction: ' + (data.message || res.status));
                    return;
                }}
                alert('Transaction saved successfully!');
                window.location.href = form.dataset.next;
            }} catch (error) {{
                alert('Error saving transaction: ' + error);
            }}
        }});

        async function deleteTransaction(id) {{
            if (!confirm('Are you sure you want to delete this transaction?')) return;
            try {{
                const res = await fetch(API_URL + '/' + id, {{ method: 'DELETE' }});
                if (!res.ok) {{
                    const data = await res.json().catch(() => ({{}}));
                    alert('Error deleting transaction: ' + (data.message || res.status));
                    return;
                }}
                window.location.href = '/';
            }} catch (error) {{
                alert('Error deleting transaction: ' + error);
            }}
        }}
        </script>"#,
        escape_html(api_prefix)
    )
}

/// `YYYY-MM-DD HH:MM:SS` as an HTML datetime-local value
pub fn datetime_local_value(stored: &str) -> String {
    match stored.split_once(' ') {
        Some((date, time)) => format!("{}T{}", date, time.get(..5).unwrap_or(time)),
        None => stored.to_string(),
    }
}

fn text(value: Option<&str>) -> String {
    escape_html(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: Option<&str>, code: &str) -> TransactionListRow {
        TransactionListRow {
            transaction_id: id,
            name_client: name.map(str::to_string),
            transaction_code: Some(code.to_string()),
            transaction_datetime: Some("2023-03-05 14:30:00".to_string()),
            transaction_amount: 1250.5,
            transaction_status: Some("Completed".to_string()),
        }
    }

    #[test]
    fn test_form_state_transitions() {
        let mut state = FormState::default();
        assert_eq!(state.submit_label(), "New");
        assert_eq!(state.action(), SubmitAction::Create);

        state.load(7);
        assert_eq!(state, FormState::Editing(7));
        assert_eq!(state.submit_label(), "Save Changes");

        let mut sent = None;
        state
            .submit(|action| {
                sent = Some(action);
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(sent, Some(SubmitAction::Update(7)));
        assert_eq!(state, FormState::Idle);
    }

    #[test]
    fn test_failed_submit_keeps_editing() {
        let mut state = FormState::Editing(3);
        let result = state.submit(|_| Err("server said no"));
        assert_eq!(result, Err("server said no"));
        assert_eq!(state, FormState::Editing(3));

        state.cancel();
        assert_eq!(state, FormState::Idle);
        assert_eq!(state.editing_id(), None);
    }

    #[test]
    fn test_form_urls_follow_transitions() {
        let editing = FormState::Editing(4);
        assert_eq!(editing.page_url(), "/?edit=4");
        assert_eq!(editing.after_submit_url(), "/");
        assert_eq!(editing.cancel_url().as_deref(), Some("/"));
        assert_eq!(editing.action().method(), "PUT");
        assert_eq!(editing.action().url("/api/v1"), "/api/v1/transactions/4");

        let idle = FormState::Idle;
        assert_eq!(idle.after_submit_url(), "/");
        assert_eq!(idle.cancel_url(), None);
        assert_eq!(idle.action().method(), "POST");
        assert_eq!(idle.action().url("/api"), "/api/transactions");
    }

    #[test]
    fn test_search_query_parse() {
        assert_eq!(SearchQuery::parse(""), SearchQuery::Empty);
        assert_eq!(SearchQuery::parse("   "), SearchQuery::Empty);
        assert_eq!(SearchQuery::parse("42"), SearchQuery::ById(42));
        assert_eq!(SearchQuery::parse(" 42 "), SearchQuery::ById(42));
        assert_eq!(SearchQuery::parse("ana"), SearchQuery::ByName("ana".to_string()));
        assert_eq!(SearchQuery::parse("4a"), SearchQuery::ByName("4a".to_string()));
        assert_eq!(SearchQuery::parse("-1"), SearchQuery::ByName("-1".to_string()));
        assert_eq!(
            SearchQuery::parse("99999999999999999999"),
            SearchQuery::ByName("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_rows_escape_text() {
        let html = render_transaction_rows(&[row(1, Some("<script>Ana</script>"), "T1")]);
        assert!(html.contains("&lt;script&gt;Ana&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("$1,250.50"));
        assert!(html.contains("href='/?edit=1'"));
        assert!(html.contains("deleteTransaction(1)"));
    }

    #[test]
    fn test_orphan_row_renders_blank_client() {
        let html = render_transaction_rows(&[row(2, None, "T2")]);
        assert!(html.contains("<td class='py-2 px-4'></td>"));
    }

    #[test]
    fn test_empty_table_is_notice() {
        assert!(render_transactions_table(&[]).contains("notice"));
        assert!(render_transactions_table(&[row(1, Some("Ana"), "T1")]).contains("<table"));
    }

    #[test]
    fn test_client_options_mark_selected() {
        let clients = vec![
            ClientSummary { client_id: 1, name_client: "Ana".to_string() },
            ClientSummary { client_id: 2, name_client: "Bruno".to_string() },
        ];
        let html = render_client_options(&clients, Some(2));
        assert!(html.starts_with("<option value=''>Select a client</option>"));
        assert!(html.contains("<option value='2' selected>Bruno</option>"));
        assert!(html.contains("<option value='1'>Ana</option>"));
    }

    #[test]
    fn test_form_while_editing() {
        let transaction = Transaction {
            transaction_id: 5,
            transaction_code: Some("T5".to_string()),
            transaction_datetime: Some("2023-03-05 14:30:00".to_string()),
            transaction_amount: 10.0,
            transaction_status: Some("Pending".to_string()),
            transaction_type: Some("sale".to_string()),
            platform_used: Some("Nequi".to_string()),
            client_id_fk: None,
        };
        let html = render_form(&FormState::Editing(5), "/api/v1", &[], Some(&transaction));
        assert!(html.contains("data-editing='5'"));
        assert!(html.contains("data-method='PUT'"));
        assert!(html.contains("data-url='/api/v1/transactions/5'"));
        assert!(html.contains("data-next='/'"));
        assert!(html.contains("<a href='/' id='clearButton'"));
        assert!(html.contains("value='2023-03-05T14:30'"));
        assert!(html.contains("value='Nequi'"));
        assert!(html.contains("Save Changes"));
        assert!(html.contains("clearButton"));

        let html = render_form(&FormState::Idle, "/api/v1", &[], None);
        assert!(html.contains("data-editing=''"));
        assert!(html.contains("data-method='POST'"));
        assert!(html.contains("data-url='/api/v1/transactions'"));
        assert!(html.contains(">New</button>"));
        assert!(!html.contains("clearButton"));
    }

    #[test]
    fn test_datetime_local_value() {
        assert_eq!(datetime_local_value("2023-03-05 14:30:00"), "2023-03-05T14:30");
        assert_eq!(datetime_local_value("2023-03-05"), "2023-03-05");
    }

    #[test]
    fn test_script_targets_prefix() {
        let script = render_script("/api/v1");
        assert!(script.contains("const API_URL = '/api/v1/transactions';"));
        assert!(script.contains("fetch(form.dataset.url"));
        assert!(script.contains("method: form.dataset.method"));
        assert!(script.contains("window.location.href = form.dataset.next"));
    }
}
