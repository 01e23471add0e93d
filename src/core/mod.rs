pub mod create;
pub mod transfer;
