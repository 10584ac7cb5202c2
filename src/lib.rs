pub mod core;
pub mod exchanges;

pub use crate::core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    kernel::{Param, QueryParams},
};
pub use exchanges::pro::{build_client, ProBuilder, ProRest};
