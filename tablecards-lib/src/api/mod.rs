//! Backend API: wire types and routes

mod cards;
mod content;
mod data_types;
pub mod dto;
mod request;
mod table_api;

pub use table_api::TableApi;
