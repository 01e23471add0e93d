pub mod initialize;
pub mod log;
pub mod member_repo;
pub mod pool;
pub mod translate;
