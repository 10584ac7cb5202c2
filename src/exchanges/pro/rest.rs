use crate::core::errors::ExchangeError;
use crate::core::kernel::{Param, QueryParams, RestClient};
use crate::exchanges::pro::codec::{HistoricRate, OrderBook, OrderBookEntry};
use crate::exchanges::pro::types::{
    Account, AccountActivity, AccountHold, AccountSummary, AllWithdrawalPower, BuyingPower,
    CoinbaseAccount, Conversion, ConversionRequest, Currency, CurrencyWithdrawalPower, DayStat,
    ExchangeLimit, Fees, Fill, Granularity, MarginProfile, Oracle, Order, OrderParams,
    PaymentMethod, Product, Profile, ReportParams, ReportStatus, ServerTime, Ticker, Trade,
    TransferParams, UserAccount,
};
use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::instrument;

/// Typed endpoints of the trading API
///
/// Every method is one signed round trip through [`RestClient`]. Arguments
/// that the server would reject before doing any work (missing ids, empty
/// amounts) are checked here so those calls never leave the process.
#[derive(Debug, Clone)]
pub struct ProRest {
    rest: RestClient,
    streaming_url: String,
}

/// Reject ids that would name a different route once placed in a path
fn require(name: &str, value: &str) -> Result<(), ExchangeError> {
    if value.is_empty() {
        return Err(ExchangeError::InvalidParameters(format!(
            "please provide a {}",
            name
        )));
    }
    if value.contains(&['/', '?', '#'][..]) {
        return Err(ExchangeError::InvalidParameters(format!(
            "{} must not contain '/', '?' or '#'",
            name
        )));
    }
    Ok(())
}

impl ProRest {
    pub fn new(rest: RestClient, streaming_url: String) -> Self {
        Self {
            rest,
            streaming_url,
        }
    }

    /// The underlying signing client, for endpoints not wrapped here
    pub fn rest_client(&self) -> &RestClient {
        &self.rest
    }

    /// Market data feed address matching this client's environment
    pub fn streaming_url(&self) -> &str {
        &self.streaming_url
    }

    // Accounts

    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, ExchangeError> {
        self.rest.get_json("/accounts", None).await
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Account, ExchangeError> {
        require("account id", account_id)?;
        self.rest
            .get_json(&format!("/accounts/{}", account_id), None)
            .await
    }

    /// Ledger entries for an account, most recent first
    pub async fn get_account_history(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountActivity>, ExchangeError> {
        require("account id", account_id)?;
        self.rest
            .get_json(&format!("/accounts/{}/ledger", account_id), None)
            .await
    }

    pub async fn get_account_holds(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountHold>, ExchangeError> {
        require("account id", account_id)?;
        self.rest
            .get_json(&format!("/accounts/{}/holds", account_id), None)
            .await
    }

    pub async fn list_coinbase_accounts(&self) -> Result<Vec<CoinbaseAccount>, ExchangeError> {
        self.rest.get_json("/coinbase-accounts", None).await
    }

    // Orders

    #[instrument(skip(self, order), fields(product_id = %order.product_id))]
    pub async fn place_order(&self, order: &OrderParams) -> Result<Order, ExchangeError> {
        order.validate()?;
        self.rest.post_json("/orders", order).await
    }

    /// Cancel an open order; returns the id that was cancelled
    pub async fn cancel_order_by_id(
        &self,
        order_id: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ExchangeError> {
        require("order id", order_id)?;
        self.rest
            .request_raw(
                Method::DELETE,
                &format!("/orders/{}", order_id),
                Vec::new(),
                params,
            )
            .await?;
        Ok(order_id.to_string())
    }

    /// Cancel an open order by the client id it was placed with
    ///
    /// Returns the server-assigned order id.
    pub async fn cancel_order_by_client_oid(
        &self,
        client_oid: &str,
        params: Option<&QueryParams>,
    ) -> Result<String, ExchangeError> {
        require("client oid", client_oid)?;
        self.rest
            .delete_json(&format!("/orders/client:{}", client_oid), params)
            .await
    }

    /// Cancel every open order, optionally for one `product_id`
    pub async fn cancel_all_orders(
        &self,
        params: Option<&QueryParams>,
    ) -> Result<Vec<String>, ExchangeError> {
        self.rest.delete_json("/orders", params).await
    }

    pub async fn list_orders(
        &self,
        params: Option<&QueryParams>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.rest.get_json("/orders", params).await
    }

    pub async fn get_order_by_id(&self, order_id: &str) -> Result<Order, ExchangeError> {
        require("order id", order_id)?;
        self.rest
            .get_json(&format!("/orders/{}", order_id), None)
            .await
    }

    pub async fn get_order_by_client_oid(&self, client_oid: &str) -> Result<Order, ExchangeError> {
        require("client oid", client_oid)?;
        self.rest
            .get_json(&format!("/orders/client:{}", client_oid), None)
            .await
    }

    // Fills

    /// Recent fills; the server requires an `order_id` or a `product_id`
    pub async fn list_fills(&self, params: &QueryParams) -> Result<Vec<Fill>, ExchangeError> {
        if !params.is_set(&Param::OrderId) && !params.is_set(&Param::ProductId) {
            return Err(ExchangeError::InvalidParameters(
                "please provide either an order_id or product_id".to_string(),
            ));
        }
        self.rest.get_json("/fills", Some(params)).await
    }

    // Limits, fees and volume

    pub async fn get_current_exchange_limits(&self) -> Result<ExchangeLimit, ExchangeError> {
        self.rest
            .get_json("/users/self/exchange-limits", None)
            .await
    }

    pub async fn get_current_fees(&self) -> Result<Fees, ExchangeError> {
        self.rest.get_json("/fees", None).await
    }

    pub async fn get_trailing_volume(&self) -> Result<Vec<UserAccount>, ExchangeError> {
        self.rest
            .get_json("/users/self/trailing-volume", None)
            .await
    }

    // Conversions and payment methods

    /// Convert between a stablecoin and its fiat counterpart, e.g. USD to USDC
    pub async fn stablecoin_conversion(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<Conversion, ExchangeError> {
        if from.is_empty() || to.is_empty() || amount.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "please provide from, to and amount".to_string(),
            ));
        }
        let request = ConversionRequest { from, to, amount };
        self.rest.post_json("/conversions", &request).await
    }

    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, ExchangeError> {
        self.rest.get_json("/payment-methods", None).await
    }

    // Profiles

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, ExchangeError> {
        self.rest.get_json("/profiles", None).await
    }

    pub async fn get_profile(&self, profile_id: &str) -> Result<Profile, ExchangeError> {
        require("profile id", profile_id)?;
        self.rest
            .get_json(&format!("/profiles/{}", profile_id), None)
            .await
    }

    /// Move funds between two profiles of the same user
    pub async fn profile_transfer(&self, transfer: &TransferParams) -> Result<(), ExchangeError> {
        require("source profile", &transfer.from)?;
        require("target profile", &transfer.to)?;
        let body = crate::core::kernel::rest::encode_body(transfer)?;
        self.rest
            .request_raw(Method::POST, "/profiles/transfer", body, None)
            .await?;
        Ok(())
    }

    // Market data

    pub async fn list_products(&self) -> Result<Vec<Product>, ExchangeError> {
        self.rest.get_json("/products", None).await
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Product, ExchangeError> {
        require("product id", product_id)?;
        self.rest
            .get_json(&format!("/products/{}", product_id), None)
            .await
    }

    /// Aggregated book at `level` 1 (best bid/ask) or 2 (top 50 per side)
    pub async fn get_product_order_book(
        &self,
        product_id: &str,
        params: Option<&QueryParams>,
    ) -> Result<OrderBook, ExchangeError> {
        require("product id", product_id)?;
        self.rest
            .get_json(&format!("/products/{}/book", product_id), params)
            .await
    }

    /// Non-aggregated level 3 book listing every resting order
    pub async fn get_full_order_book(
        &self,
        product_id: &str,
    ) -> Result<OrderBook<OrderBookEntry>, ExchangeError> {
        require("product id", product_id)?;
        let params = QueryParams::new().with(Param::Level, "3");
        self.rest
            .get_json(&format!("/products/{}/book", product_id), Some(&params))
            .await
    }

    pub async fn get_product_ticker(&self, product_id: &str) -> Result<Ticker, ExchangeError> {
        require("product id", product_id)?;
        self.rest
            .get_json(&format!("/products/{}/ticker", product_id), None)
            .await
    }

    pub async fn list_trades_by_product(
        &self,
        product_id: &str,
        params: Option<&QueryParams>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        require("product id", product_id)?;
        self.rest
            .get_json(&format!("/products/{}/trades", product_id), params)
            .await
    }

    /// Candles for a product, filtered by `start`, `end` and `granularity`
    pub async fn get_historic_rates(
        &self,
        product_id: &str,
        params: Option<&QueryParams>,
    ) -> Result<Vec<HistoricRate>, ExchangeError> {
        require("product id", product_id)?;
        self.rest
            .get_json(&format!("/products/{}/candles", product_id), params)
            .await
    }

    /// Candles between two instants at a fixed width
    pub async fn get_candles(
        &self,
        product_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<Vec<HistoricRate>, ExchangeError> {
        let params = QueryParams::new()
            .with_time_range(start, end)
            .with(Param::Granularity, granularity.to_string());
        self.get_historic_rates(product_id, Some(&params)).await
    }

    pub async fn get_24hour_stats(&self, product_id: &str) -> Result<DayStat, ExchangeError> {
        require("product id", product_id)?;
        self.rest
            .get_json(&format!("/products/{}/stats", product_id), None)
            .await
    }

    pub async fn list_currencies(&self) -> Result<Vec<Currency>, ExchangeError> {
        self.rest.get_json("/currencies", None).await
    }

    pub async fn get_server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.rest.get_json("/time", None).await
    }

    pub async fn get_oracle(&self) -> Result<Oracle, ExchangeError> {
        self.rest.get_json("/oracle", None).await
    }

    // Margin

    pub async fn get_margin_profile(
        &self,
        product_id: &str,
    ) -> Result<MarginProfile, ExchangeError> {
        require("product id", product_id)?;
        let params = QueryParams::new().with(Param::ProductId, product_id);
        self.rest
            .get_json("/margin/profile_information", Some(&params))
            .await
    }

    pub async fn get_buying_power(&self, product_id: &str) -> Result<BuyingPower, ExchangeError> {
        require("product id", product_id)?;
        let params = QueryParams::new().with(Param::ProductId, product_id);
        self.rest
            .get_json("/margin/buying_power", Some(&params))
            .await
    }

    pub async fn get_withdrawal_power(
        &self,
        currency: &str,
    ) -> Result<CurrencyWithdrawalPower, ExchangeError> {
        require("currency", currency)?;
        let params = QueryParams::new().with(Param::Currency, currency);
        self.rest
            .get_json("/margin/withdrawal_power", Some(&params))
            .await
    }

    pub async fn get_all_withdrawal_power(&self) -> Result<AllWithdrawalPower, ExchangeError> {
        self.rest
            .get_json("/margin/withdrawal_power_all", None)
            .await
    }

    // Reports

    /// Request a fills or account report; poll [`Self::get_report_status`] for the file
    pub async fn create_report(
        &self,
        report: &ReportParams,
    ) -> Result<ReportStatus, ExchangeError> {
        report.validate()?;
        self.rest.post_json("/reports", report).await
    }

    pub async fn get_report_status(&self, report_id: &str) -> Result<ReportStatus, ExchangeError> {
        require("report id", report_id)?;
        self.rest
            .get_json(&format!("/reports/{}", report_id), None)
            .await
    }
}
