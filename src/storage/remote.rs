//! Remote store backed by a managed PostgREST-style database
//!
//! Two tables are used:
//!
//! - `budgets`: `id`, `user_id`, `income`, `allocation_needs`,
//!   `allocation_wants`, `allocation_savings` (one row per user)
//! - `expenses`: `id`, `budget_id`, `category`, `name`, `amount`, `paid`,
//!   `created_at`
//!
//! Requests carry the project's public API key plus the signed-in user's
//! access token. Expense ids are generated locally and sent with the insert,
//! so a record has the same id on both sides.

use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use super::store::{BudgetStore, ExpenseChange};
use crate::config::RemoteSettings;
use crate::error::{TriadError, TriadResult};
use crate::models::{
    Allocation, BudgetId, BudgetState, Category, Expense, ExpenseBook, ExpenseId, Identity, Money,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Row of the `budgets` table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BudgetRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<BudgetId>,
    user_id: String,
    #[serde(deserialize_with = "de_units")]
    income: i64,
    allocation_needs: i32,
    allocation_wants: i32,
    allocation_savings: i32,
}

impl BudgetRow {
    fn from_state(user_id: &str, state: &BudgetState) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            income: state.income.units(),
            allocation_needs: state.allocation.needs,
            allocation_wants: state.allocation.wants,
            allocation_savings: state.allocation.savings,
        }
    }
}

/// Row of the `expenses` table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpenseRow {
    id: ExpenseId,
    budget_id: BudgetId,
    category: Category,
    name: String,
    #[serde(deserialize_with = "de_units")]
    amount: i64,
    #[serde(default)]
    paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl ExpenseRow {
    fn new(budget_id: BudgetId, category: Category, expense: &Expense) -> Self {
        Self {
            id: expense.id,
            budget_id,
            category,
            name: expense.name.clone(),
            amount: expense.amount.units(),
            paid: expense.paid,
            created_at: Some(expense.created_at),
        }
    }

    fn into_expense(self) -> (Category, Expense) {
        let expense = Expense {
            id: self.id,
            name: self.name,
            amount: Money::from_units(self.amount),
            paid: self.paid,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        };
        (self.category, expense)
    }
}

/// Mutable fields sent when an expense changes
#[derive(Debug, Serialize)]
struct ExpensePatch<'a> {
    name: &'a str,
    amount: i64,
    paid: bool,
}

/// Error body returned by the backend
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Numeric columns may come back as integers, decimals or strings
fn de_units<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| D::Error::custom(format!("invalid amount: {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .map_err(|_| D::Error::custom(format!("invalid amount: {}", s))),
        other => Err(D::Error::custom(format!("invalid amount: {}", other))),
    }
}

/// Store talking to the remote backend on behalf of one user
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
    identity: Identity,
    /// Id of the user's budget row once known
    budget_id: RwLock<Option<BudgetId>>,
}

impl RemoteStore {
    pub fn new(settings: &RemoteSettings, identity: Identity) -> TriadResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TriadError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            identity,
            budget_id: RwLock::new(None),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn headers(&self) -> TriadResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| TriadError::Config("Invalid API key format".into()))?;
        headers.insert("apikey", api_key);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.identity.access_token))
            .map_err(|_| TriadError::SessionRequired("Invalid access token format".into()))?;
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    fn send(&self, request: RequestBuilder) -> TriadResult<Response> {
        let response = request.headers(self.headers()?).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        debug!(status = status.as_u16(), %body, "remote request failed");
        let message = match serde_json::from_str::<ApiError>(&body) {
            Ok(err) => match err.code {
                Some(code) => format!("{}: {}", code, err.message),
                None => err.message,
            },
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };
        Err(TriadError::remote(status.as_u16(), message))
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> TriadResult<T> {
        let response = self.send(request)?;
        let status = response.status().as_u16();
        response
            .json()
            .map_err(|e| TriadError::remote(status, format!("Failed to parse response: {}", e)))
    }

    fn cached_budget_id(&self) -> Option<BudgetId> {
        self.budget_id.read().ok().and_then(|guard| *guard)
    }

    fn remember_budget_id(&self, id: BudgetId) {
        if let Ok(mut guard) = self.budget_id.write() {
            *guard = Some(id);
        }
    }

    fn fetch_budget_row(&self) -> TriadResult<Option<BudgetRow>> {
        let request = self.client.get(self.table_url("budgets")).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", self.identity.user_id)),
        ]);
        let rows: Vec<BudgetRow> = self.send_json(request)?;
        Ok(rows.into_iter().next())
    }

    /// Insert or update the user's budget row and return its id
    fn upsert_budget(&self, state: &BudgetState) -> TriadResult<BudgetId> {
        let row = BudgetRow::from_state(&self.identity.user_id, state);
        let request = self
            .client
            .post(self.table_url("budgets"))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[row]);

        let rows: Vec<BudgetRow> = self.send_json(request)?;
        let id = rows
            .into_iter()
            .next()
            .and_then(|r| r.id)
            .ok_or_else(|| TriadError::remote(200, "Budget upsert returned no id"))?;

        self.remember_budget_id(id);
        Ok(id)
    }

    /// Budget id, creating the row first if this user has none yet
    fn ensure_budget(&self, state: &BudgetState) -> TriadResult<BudgetId> {
        match self.cached_budget_id() {
            Some(id) => Ok(id),
            None => self.upsert_budget(state),
        }
    }

    fn list_expenses(&self, budget_id: BudgetId) -> TriadResult<Vec<ExpenseRow>> {
        let request = self.client.get(self.table_url("expenses")).query(&[
            ("select", "*".to_string()),
            ("budget_id", format!("eq.{}", budget_id.as_uuid())),
            ("order", "created_at.asc".to_string()),
        ]);
        self.send_json(request)
    }

    fn insert_expenses(&self, rows: &[ExpenseRow]) -> TriadResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let request = self
            .client
            .post(self.table_url("expenses"))
            .header("Prefer", "return=minimal")
            .json(rows);
        self.send(request)?;
        Ok(())
    }

    fn update_expense(&self, expense: &Expense) -> TriadResult<()> {
        let patch = ExpensePatch {
            name: &expense.name,
            amount: expense.amount.units(),
            paid: expense.paid,
        };
        let request = self
            .client
            .patch(self.table_url("expenses"))
            .query(&[("id", format!("eq.{}", expense.id.as_uuid()))])
            .json(&patch);
        self.send(request)?;
        Ok(())
    }

    fn delete_expenses(&self, filter: (&str, String)) -> TriadResult<()> {
        let request = self
            .client
            .delete(self.table_url("expenses"))
            .query(&[filter]);
        self.send(request)?;
        Ok(())
    }
}

impl BudgetStore for RemoteStore {
    fn describe(&self) -> String {
        format!("remote {} as {}", self.base_url, self.identity.display_name())
    }

    fn load(&self) -> TriadResult<Option<BudgetState>> {
        let Some(row) = self.fetch_budget_row()? else {
            debug!(user = %self.identity.user_id, "no remote budget yet");
            return Ok(None);
        };

        let mut expenses = ExpenseBook::new();
        if let Some(id) = row.id {
            self.remember_budget_id(id);
            for expense_row in self.list_expenses(id)? {
                let (category, expense) = expense_row.into_expense();
                expenses.insert(category, expense);
            }
        }

        Ok(Some(BudgetState {
            income: Money::from_units(row.income),
            allocation: Allocation::from_stored(
                row.allocation_needs,
                row.allocation_wants,
                row.allocation_savings,
            ),
            expenses,
        }))
    }

    fn save_budget(&self, state: &BudgetState) -> TriadResult<()> {
        let id = self.upsert_budget(state)?;
        debug!(budget = %id, "saved remote budget");
        Ok(())
    }

    fn save_expense(&self, state: &BudgetState, change: &ExpenseChange) -> TriadResult<()> {
        match change {
            ExpenseChange::Inserted { category, expense } => {
                let budget_id = self.ensure_budget(state)?;
                self.insert_expenses(&[ExpenseRow::new(budget_id, *category, expense)])
            }
            ExpenseChange::Updated { expense, .. } => self.update_expense(expense),
            ExpenseChange::Removed { id, .. } => {
                self.delete_expenses(("id", format!("eq.{}", id.as_uuid())))
            }
        }
    }

    fn replace_all(&self, state: &BudgetState) -> TriadResult<()> {
        let budget_id = self.upsert_budget(state)?;
        self.delete_expenses(("budget_id", format!("eq.{}", budget_id.as_uuid())))?;

        let rows: Vec<_> = state
            .expenses
            .iter()
            .map(|(category, expense)| ExpenseRow::new(budget_id, category, expense))
            .collect();
        self.insert_expenses(&rows)?;

        info!(budget = %budget_id, expenses = rows.len(), "replaced remote budget");
        Ok(())
    }
}
