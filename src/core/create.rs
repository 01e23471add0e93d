use crate::db::member_repo::save;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use rand::Rng;
use tracing::{error, info};

pub struct MemberCreator;

impl MemberCreator {
    /// Save a new member.
    ///
    /// With `retry_on_duplicate`, a taken id is recovered once by appending a
    /// random number (0..10000). Any other store failure propagates.
    pub fn create(
        pool: &DbPool,
        member_id: &str,
        money: i64,
        retry_on_duplicate: bool,
    ) -> AppResult<Member> {
        pool.with_conn(|conn| match save(conn, &Member::new(member_id, money)) {
            Ok(m) => Ok(m),
            Err(AppError::DuplicateKey { .. }) if retry_on_duplicate => {
                let retry_id = Self::generate_new_id(member_id);
                info!(member_id, retry_id = %retry_id, "duplicate key, retrying with new id");
                save(conn, &Member::new(retry_id, money))
            }
            Err(e) => {
                error!(member_id, error = %e, "member creation failed");
                Err(e)
            }
        })
    }

    fn generate_new_id(member_id: &str) -> String {
        format!("{}{}", member_id, rand::thread_rng().gen_range(0..10_000))
    }
}
