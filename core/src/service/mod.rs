pub mod dto;
pub mod metric_store;
pub mod reset_gate;
pub mod wellness_service;
