//! Positional array shapes used by market data endpoints.
//!
//! The API sends order book levels and candles as bare JSON arrays rather
//! than objects. Each type here reads exactly that many elements in that
//! order, and writes itself back out as the same array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One aggregated price level: `[price, size, num_orders]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookLevel {
    pub price: String,
    pub size: String,
    pub num_orders: u64,
}

impl<'de> Deserialize<'de> for OrderBookLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (price, size, num_orders) = <(String, String, u64)>::deserialize(deserializer)?;
        Ok(Self {
            price,
            size,
            num_orders,
        })
    }
}

impl Serialize for OrderBookLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.price, &self.size, self.num_orders).serialize(serializer)
    }
}

/// One resting order in a level 3 book: `[price, size, order_id]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookEntry {
    pub price: String,
    pub size: String,
    pub order_id: String,
}

impl<'de> Deserialize<'de> for OrderBookEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (price, size, order_id) = <(String, String, String)>::deserialize(deserializer)?;
        Ok(Self {
            price,
            size,
            order_id,
        })
    }
}

impl Serialize for OrderBookEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.price, &self.size, &self.order_id).serialize(serializer)
    }
}

/// Snapshot of a product's order book
///
/// Levels 1 and 2 aggregate orders per price ([`OrderBookLevel`]); level 3
/// lists every order ([`OrderBookEntry`]).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderBook<L = OrderBookLevel> {
    pub sequence: u64,
    pub bids: Vec<L>,
    pub asks: Vec<L>,
}

impl<L> OrderBook<L> {
    pub fn best_bid(&self) -> Option<&L> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&L> {
        self.asks.first()
    }
}

/// One candle: `[time, low, high, open, close, volume]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricRate {
    /// Bucket start, Unix seconds
    pub time: f64,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

impl HistoricRate {
    /// Bucket start as a UTC timestamp
    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time as i64, 0)
    }
}

impl<'de> Deserialize<'de> for HistoricRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (time, low, high, open, close, volume) =
            <(f64, f64, f64, f64, f64, f64)>::deserialize(deserializer)?;
        Ok(Self {
            time,
            low,
            high,
            open,
            close,
            volume,
        })
    }
}

impl Serialize for HistoricRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            self.time,
            self.low,
            self.high,
            self.open,
            self.close,
            self.volume,
        )
            .serialize(serializer)
    }
}
