pub mod add;
pub mod clear;
pub mod config;
pub mod del;
pub mod get;
pub mod init;
pub mod list;
pub mod log;
pub mod transfer;
pub mod update;
