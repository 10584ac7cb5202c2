pub mod builder;
pub mod codec;
pub mod rest;
pub mod types;

// Re-export main components
pub use builder::{build_client, ProBuilder};
pub use codec::{HistoricRate, OrderBook, OrderBookEntry, OrderBookLevel};
pub use rest::ProRest;
pub use types::{
    Account, AccountActivity, AccountHold, AccountSummary, Conversion, Fees, Fill, Granularity,
    Order, OrderParams, OrderType, Product, Profile, ReportFormat, ReportParams, ReportStatus,
    ReportType, ServerTime, Side, Ticker, TimeInForce, Trade, TransferParams,
};
