use crate::core::errors::ExchangeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Accounts

/// Trading account as returned by `GET /accounts`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub currency: String,
    pub balance: String,   // Total funds in the account
    pub available: String, // Funds available to withdraw or trade
    pub hold: String,      // Funds on hold
}

/// Single account as returned by `GET /accounts/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    pub id: String,
    pub balance: String,
    pub holds: String,
    pub available: String,
    pub currency: String,
}

/// Ledger entry: one increase or decrease of an account balance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountActivity {
    pub id: String,
    pub created_at: String,
    pub amount: String,
    pub balance: String,
    /// transfer, match, fee, rebate or conversion
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub details: ActivityDetail,
}

/// Trade metadata attached to match and fee ledger entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActivityDetail {
    pub order_id: Option<String>,
    pub trade_id: Option<String>,
    pub product_id: Option<String>,
}

/// Funds held for an open order or a pending withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountHold {
    pub id: String,
    pub account_id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub amount: String,
    /// `order` or `transfer`
    #[serde(rename = "type")]
    pub kind: String,
    /// Id of the order or transfer that created the hold
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Linked (non-trading) wallet account
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CoinbaseAccount {
    pub id: String,
    pub name: String,
    pub balance: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub primary: bool,
    pub active: bool,
    pub wire_deposit_information: Option<WireDepositInfo>,
    pub sepa_deposit_information: Option<SepaDepositInfo>,
    pub uk_deposit_information: Option<UkDepositInfo>,
    pub hold_balance: Option<String>,
    pub hold_currency: Option<String>,
    #[serde(default)]
    pub available_on_consumer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WireDepositInfo {
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub bank_name: String,
    pub bank_address: String,
    pub bank_country: BankCountry,
    pub account_name: String,
    pub account_address: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SepaDepositInfo {
    pub iban: String,
    pub swift: String,
    pub bank_name: String,
    pub bank_address: String,
    pub bank_country_name: String,
    pub account_name: String,
    pub account_address: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UkDepositInfo {
    pub sort_code: String,
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BankCountry {
    pub code: String,
    pub name: String,
}

/// 30-day trailing volume for one product
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserAccount {
    pub product_id: String,
    pub exchange_volume: String,
    pub volume: String,
    pub recorded_at: String,
}

// Orders

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    GoodTillCanceled,
    #[serde(rename = "GTT")]
    GoodTillTime,
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    #[serde(rename = "FOK")]
    FillOrKill,
}

/// Body of `POST /orders`, also echoed back on every [`Order`]
///
/// Limit orders need `price` and `size`. Market orders need one of `size` or
/// `funds`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderParams {
    pub side: Side,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp: Option<String>, // Self-trade prevention flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>, // loss or entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_after: Option<String>, // min, hour or day; GTT only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub post_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<String>,
}

impl OrderParams {
    fn base(side: Side, product_id: impl Into<String>, order_type: OrderType) -> Self {
        Self {
            side,
            product_id: product_id.into(),
            client_oid: None,
            order_type: Some(order_type),
            price: None,
            size: None,
            stp: None,
            stop: None,
            stop_price: None,
            time_in_force: None,
            cancel_after: None,
            post_only: false,
            funds: None,
        }
    }

    pub fn limit(
        side: Side,
        product_id: impl Into<String>,
        price: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        let mut params = Self::base(side, product_id, OrderType::Limit);
        params.price = Some(price.into());
        params.size = Some(size.into());
        params
    }

    /// Market order for an amount of the base currency
    pub fn market_size(side: Side, product_id: impl Into<String>, size: impl Into<String>) -> Self {
        let mut params = Self::base(side, product_id, OrderType::Market);
        params.size = Some(size.into());
        params
    }

    /// Market order spending an amount of the quote currency
    pub fn market_funds(
        side: Side,
        product_id: impl Into<String>,
        funds: impl Into<String>,
    ) -> Self {
        let mut params = Self::base(side, product_id, OrderType::Market);
        params.funds = Some(funds.into());
        params
    }

    pub fn with_client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn with_post_only(mut self) -> Self {
        self.post_only = true;
        self
    }

    /// Check the field combinations the order type requires
    pub fn validate(&self) -> Result<(), ExchangeError> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());

        if self.product_id.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "please provide a product_id".to_string(),
            ));
        }

        match self.order_type.unwrap_or(OrderType::Limit) {
            OrderType::Limit => {
                if !present(&self.price) || !present(&self.size) {
                    return Err(ExchangeError::InvalidParameters(
                        "limit orders need both price and size".to_string(),
                    ));
                }
            }
            OrderType::Market => {
                if !present(&self.size) && !present(&self.funds) {
                    return Err(ExchangeError::InvalidParameters(
                        "market orders need either size or funds".to_string(),
                    ));
                }
            }
        }

        if self.cancel_after.is_some() && self.time_in_force != Some(TimeInForce::GoodTillTime) {
            return Err(ExchangeError::InvalidParameters(
                "cancel_after requires time_in_force GTT".to_string(),
            ));
        }

        Ok(())
    }
}

/// An order as the API reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Order {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub fill_fees: String,
    #[serde(default)]
    pub filled_size: String,
    #[serde(default)]
    pub executed_value: String,
    pub status: String,
    pub settled: bool,
    #[serde(flatten)]
    pub params: OrderParams,
}

/// A (partial) execution of one of your orders
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fill {
    pub trade_id: u64,
    pub product_id: String,
    pub price: String,
    pub size: String,
    pub order_id: String,
    pub created_at: String,
    /// M for maker, T for taker
    pub liquidity: String,
    pub fee: String,
    pub settled: bool,
    pub side: Side,
}

// Limits, fees, conversions, payment methods

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExchangeLimit {
    pub limit_currency: String,
    pub transfer_limits: TransferLimits,
}

/// Limits per payment method, keyed by currency
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferLimits {
    pub ach: HashMap<String, Limit>,
    pub ach_no_balance: HashMap<String, Limit>,
    pub credit_debit_card: HashMap<String, Limit>,
    pub ach_curm: HashMap<String, Limit>,
    pub secure3d_buy: HashMap<String, Limit>,
    pub exchange_withdraw: HashMap<String, Limit>,
    pub exchange_ach: HashMap<String, Limit>,
    pub paypal_withdrawal: HashMap<String, Limit>,
    pub instant_ach_withdrawal: HashMap<String, Limit>,
    pub buy: HashMap<String, Limit>,
    pub sell: HashMap<String, Limit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Limit {
    pub max: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fees {
    pub maker_fee_rate: String,
    pub taker_fee_rate: String,
    pub usd_volume: String,
}

/// Result of a stablecoin conversion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Conversion {
    pub id: String,
    pub amount: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ConversionRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub currency: String,
    pub primary_buy: bool,
    pub primary_sell: bool,
    pub allow_buy: bool,
    pub allow_sell: bool,
    pub allow_deposit: bool,
    pub allow_withdraw: bool,
    #[serde(default)]
    pub limits: PaymentMethodLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentMethodLimits {
    pub buy: Vec<PaymentMethodLimit>,
    pub instant_buy: Vec<PaymentMethodLimit>,
    pub sell: Vec<PaymentMethodLimit>,
    pub deposit: Vec<PaymentMethodLimit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaymentMethodLimit {
    pub period_in_days: u32,
    pub total: Amount,
    pub remaining: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Amount {
    pub amount: String,
    pub currency: String,
}

// Profiles

/// A profile, equivalent to a portfolio
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub active: bool,
    pub is_default: bool,
    pub created_at: String,
}

/// Body of `POST /profiles/transfer`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferParams {
    pub from: String, // Source profile id, must own the API key
    pub to: String,   // Target profile id
    pub currency: String,
    pub amount: String,
}

// Market data

/// A tradable currency pair such as BTC-USD
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Product {
    pub id: String,
    pub display_name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub base_increment: String,
    pub quote_increment: String,
    pub base_min_size: String,
    pub base_max_size: String,
    pub min_market_funds: String,
    pub max_market_funds: String,
    pub status: String,
    #[serde(default)]
    pub status_message: String,
    pub cancel_only: bool,
    pub limit_only: bool,
    pub post_only: bool,
    pub trading_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Trade {
    pub time: String,
    pub trade_id: u64,
    pub price: String,
    pub size: String,
    /// Maker order side
    pub side: Side,
}

/// Last tick, best bid/ask and 24h volume
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ticker {
    pub trade_id: u64,
    pub price: String,
    pub size: String,
    pub bid: String,
    pub ask: String,
    pub volume: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DayStat {
    pub open: String,
    pub high: String,
    pub low: String,
    pub volume: String,
    pub last: String,
    pub volume_30day: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub min_size: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerTime {
    pub iso: String,
    pub epoch: f64,
}

/// Signed prices ready to be posted on-chain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Oracle {
    pub timestamp: String,
    /// abi-encoded `[kind, timestamp, key, value]` tuples
    pub messages: Vec<String>,
    pub signatures: Vec<String>,
    pub prices: HashMap<String, String>,
}

/// Candle width accepted by the historic rates endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    SixHours,
    OneDay,
}

impl Granularity {
    pub const fn as_seconds(self) -> u32 {
        match self {
            Self::OneMinute => 60,
            Self::FiveMinutes => 300,
            Self::FifteenMinutes => 900,
            Self::OneHour => 3600,
            Self::SixHours => 21600,
            Self::OneDay => 86400,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_seconds())
    }
}

// Margin

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarginProfile {
    pub profile_id: String,
    pub margin_initial_equity: String,
    pub margin_warning_equity: String,
    pub margin_call_equity: String,
    pub equity_percentage: f64,
    pub selling_power: f64,
    pub buying_power: f64,
    pub borrow_power: f64,
    pub interest_rate: String,
    pub interest_paid: String,
    pub collateral_currencies: Vec<String>,
    pub collateral_hold_value: String,
    pub last_liquidation_at: Option<String>,
    pub available_borrow_limits: BorrowLimits,
    pub borrow_limit: String,
    pub top_up_amounts: TopUpAmounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BorrowLimits {
    pub marginable_limit: f64,
    #[serde(rename = "nonmarginable_limit")]
    pub non_marginable_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopUpAmounts {
    pub borrowable_usd: String,
    pub non_borrowable_usd: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BuyingPower {
    pub buying_power: f64,
    pub selling_power: f64,
    pub buying_power_explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CurrencyWithdrawalPower {
    pub profile_id: String,
    pub withdrawal_power: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AllWithdrawalPower {
    pub profile_id: String,
    pub marginable_withdrawal_powers: Vec<WithdrawalPower>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WithdrawalPower {
    pub currency: String,
    pub withdrawal_power: String,
}

// Reports

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Fills,
    Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Csv,
}

/// Body of `POST /reports`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportParams {
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub start_date: String, // inclusive
    pub end_date: String,   // inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>, // required for fills reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>, // required for account reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ReportParams {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());

        match self.kind {
            ReportType::Fills if !present(&self.product_id) => Err(
                ExchangeError::InvalidParameters("fills reports need a product_id".to_string()),
            ),
            ReportType::Account if !present(&self.account_id) => Err(
                ExchangeError::InvalidParameters("account reports need an account_id".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// State of a requested report; `file_url` is set once it is ready
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportStatus {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReportType,
    /// pending, creating or ready
    pub status: String,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    pub expires_at: Option<String>,
    pub file_url: Option<String>,
    pub params: Option<ReportParams>,
}
