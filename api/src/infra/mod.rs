/// External integrations

pub mod postgres;
pub mod redis;
