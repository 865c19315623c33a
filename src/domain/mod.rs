//! Core domain types and the backtest engine.

pub mod price_series;
pub mod schedule;
pub mod resolver;
pub mod accumulation;
pub mod returns;
pub mod strategy;
pub mod backtest;
pub mod config_validation;
pub mod error;
