use chrono::NaiveDate;
use log::debug;
use serde::de::DeserializeOwned;
use std::cell::RefCell;

use crate::constants::*;
use crate::errors::*;
use crate::models::*;
use crate::utilities::*;

pub struct YnabBudgetClient<'a> {
    client: reqwest::blocking::Client,
    base_url: &'a str,
    access_token: &'a str,
    budget_id: &'a str,
    resolved_budget_id: RefCell<Option<String>>,
}

impl<'a> YnabBudgetClient<'a> {
    pub fn new(
        base_url: &'a str,
        access_token: &'a str,
        budget_id: &'a str,
    ) -> YnabBudgetClient<'a> {
        YnabBudgetClient {
            client: reqwest::blocking::Client::new(),
            base_url,
            access_token,
            budget_id,
            resolved_budget_id: RefCell::new(None),
        }
    }

    pub fn get_budgets(&self) -> Result<Vec<BudgetSummary>> {
        self.get::<BudgetSummaryResponseData>("budgets", &[])
            .chain_err(|| "Failed to load budgets from YNAB")
            .map(|data| data.budgets)
    }

    /// The configured budget ID, or the first budget's ID when configured as "default".
    pub fn get_budget_id(&self) -> Result<String> {
        if self.budget_id != DEFAULT_BUDGET_ID {
            return Ok(self.budget_id.to_string());
        }
        let mut resolved = self.resolved_budget_id.borrow_mut();
        if let Some(budget_id) = resolved.as_ref() {
            return Ok(budget_id.clone());
        }
        let budget = self
            .get_budgets()?
            .into_iter()
            .next()
            .chain_err(|| "No budgets were found in the YNAB account")?;
        println!("Using YNAB budget: {}", budget.name);
        *resolved = Some(budget.id.clone());
        Ok(budget.id)
    }

    pub fn get_budget_settings(&self) -> Result<BudgetSettings> {
        let path = format!("budgets/{}/settings", self.get_budget_id()?);
        self.get::<BudgetSettingsResponseData>(&path, &[])
            .chain_err(|| "Failed to load budget settings from YNAB")
            .map(|data| data.settings)
    }

    pub fn get_transactions(&self, since_date: Option<NaiveDate>) -> Result<Vec<TransactionDetail>> {
        let path = format!("budgets/{}/transactions", self.get_budget_id()?);
        let query: Vec<(&str, String)> = since_date
            .map(|date| ("since_date", format_iso_date(date)))
            .into_iter()
            .collect();
        self.get::<TransactionsResponseData>(&path, &query)
            .chain_err(|| "Failed to load transactions from YNAB")
            .map(|data| data.transactions)
    }

    pub fn get_scheduled_transactions(&self) -> Result<Vec<ScheduledTransactionDetail>> {
        let path = format!("budgets/{}/scheduled_transactions", self.get_budget_id()?);
        self.get::<ScheduledTransactionsResponseData>(&path, &[])
            .chain_err(|| "Failed to load scheduled transactions from YNAB")
            .map(|data| data.scheduled_transactions)
    }

    pub fn get_month(&self, month: NaiveDate) -> Result<MonthDetail> {
        let path = format!(
            "budgets/{}/months/{}",
            self.get_budget_id()?,
            format_iso_date(first_of_month(month))
        );
        self.get::<MonthDetailResponseData>(&path, &[])
            .chain_err(|| "Failed to load month budget from YNAB")
            .map(|data| data.month)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("YNAB API request URL: {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.access_token)
            .query(query)
            .send()
            .chain_err(|| "Failed to get response")?;
        let status = response.status();
        if status.is_client_error() {
            let error = response
                .json::<ErrorResponse>()
                .chain_err(|| format!("Failed to parse {} error response", status))?
                .error;
            bail!(
                "YNAB API error {} ({}): {}",
                error.id,
                error.name,
                error.detail
            )
        }
        let data = response
            .error_for_status()
            .chain_err(|| "Error response")?
            .json::<DataResponse<T>>()
            .chain_err(|| "Failed to parse response")?
            .data;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::types::*;

    const BUDGETS_BODY: &str = r#"{"data": {"budgets": [
        {"id": "b-first", "name": "Household"},
        {"id": "b-second", "name": "Side Business"}
    ]}}"#;

    #[test]
    fn test_client_error_body_detail_is_reported() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/budgets")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"error": {"id": "401", "name": "unauthorized", "detail": "Unauthorized"}}"#,
            )
            .create();
        let url = server.url();
        let client = YnabBudgetClient::new(&url, "bad-token", "b1");
        let error = client.get_budgets().unwrap_err();
        mock.assert();
        assert_eq!(
            format_error_chain(&error),
            "Failed to load budgets from YNAB: YNAB API error 401 (unauthorized): Unauthorized"
        );
    }

    #[test]
    fn test_server_error_is_chained() {
        let mut server = mockito::Server::new();
        let _settings = server
            .mock("GET", "/budgets/b1/settings")
            .with_status(503)
            .with_body("upstream unavailable")
            .create();
        let url = server.url();
        let client = YnabBudgetClient::new(&url, "token", "b1");
        let error = client.get_budget_settings().unwrap_err();
        let chain = format_error_chain(&error);
        assert!(chain.starts_with("Failed to load budget settings from YNAB: Error response: "));
        assert!(chain.contains("503"));
    }

    #[test]
    fn test_default_budget_id_resolved_once() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/budgets")
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BUDGETS_BODY)
            .expect(1)
            .create();
        let url = server.url();
        let client = YnabBudgetClient::new(&url, "token", DEFAULT_BUDGET_ID);
        assert_eq!(client.get_budget_id().unwrap(), "b-first");
        assert_eq!(client.get_budget_id().unwrap(), "b-first");
        mock.assert();
    }

    #[test]
    fn test_explicit_budget_id_skips_budget_list() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/budgets").expect(0).create();
        let url = server.url();
        let client = YnabBudgetClient::new(&url, "token", "b-second");
        assert_eq!(client.get_budget_id().unwrap(), "b-second");
        mock.assert();
    }

    #[test]
    fn test_get_transactions_sends_since_date() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/budgets/b1/transactions")
            .match_query(mockito::Matcher::UrlEncoded(
                "since_date".to_string(),
                "2024-03-04".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {"transactions": [
                    {"id": "t1", "date": "2024-03-05", "amount": -4500,
                     "payee_name": "Cafe", "category_id": "c1", "category_name": "Dining"}
                ], "server_knowledge": 7}}"#,
            )
            .create();
        let url = server.url();
        let client = YnabBudgetClient::new(&url, "token", "b1");
        let transactions = client.get_transactions(Some(date(2024, 3, 4))).unwrap();
        mock.assert();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, Milliunits::from_scaled_i64(-4_500));
    }
}
