pub mod auth;
pub mod news;
pub mod quiz;
pub mod stocks;
