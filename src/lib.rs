//! Movie Night: a single-screen movie browser with favorites, ratings,
//! redeemable access tiers, a free trial, chat notes and reminders.

pub mod catalog;
pub mod config;
pub mod entitlement;
pub mod notify;
pub mod session;
pub mod store;
pub mod theme;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
