//! Subscriptions module - which tickers receive live updates, and how an
//! incoming update is layered over the consolidated data.

mod live_subscriptions;


pub use live_subscriptions::LiveSubscriptions;
