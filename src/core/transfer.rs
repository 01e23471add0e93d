use crate::db::log::audit;
use crate::db::member_repo::{find_by_id, update_by_id};
use crate::db::pool::ConnectionProvider;
use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use crate::tx::{CancelToken, TxContext, TxManager};
use tracing::info;

/// Moves money between two members inside one unit of work.
pub struct TransferService<P> {
    tx: TxManager<P>,
    blocked: Vec<String>,
}

impl<P: ConnectionProvider> TransferService<P> {
    pub fn new(provider: P, blocked: Vec<String>) -> Self {
        Self {
            tx: TxManager::new(provider),
            blocked,
        }
    }

    pub fn provider(&self) -> &P {
        self.tx.provider()
    }

    pub fn account_transfer(&self, from_id: &str, to_id: &str, amount: i64) -> AppResult<()> {
        self.account_transfer_cancellable(from_id, to_id, amount, &CancelToken::new())
    }

    pub fn account_transfer_cancellable(
        &self,
        from_id: &str,
        to_id: &str,
        amount: i64,
        cancel: &CancelToken,
    ) -> AppResult<()> {
        if amount <= 0 {
            return Err(AppError::BusinessRule(format!(
                "transfer amount must be positive, got {amount}"
            )));
        }
        if from_id == to_id {
            return Err(AppError::BusinessRule(format!(
                "cannot transfer from '{from_id}' to itself"
            )));
        }

        self.tx
            .run_cancellable("account_transfer", cancel, |ctx| {
                self.biz_logic(ctx, from_id, to_id, amount)
            })?;

        info!(from_id, to_id, amount, "transfer committed");
        Ok(())
    }

    fn biz_logic(
        &self,
        ctx: &TxContext<'_>,
        from_id: &str,
        to_id: &str,
        amount: i64,
    ) -> AppResult<()> {
        let conn = ctx.conn();
        let from = find_by_id(conn, from_id)?;
        let to = find_by_id(conn, to_id)?;

        let debited = from.money.checked_sub(amount).ok_or_else(|| {
            AppError::BusinessRule(format!("balance of '{from_id}' would overflow"))
        })?;
        update_by_id(conn, from_id, debited)?;

        ctx.checkpoint()?;
        self.validation(&to)?;

        let credited = to.money.checked_add(amount).ok_or_else(|| {
            AppError::BusinessRule(format!("balance of '{to_id}' would overflow"))
        })?;
        update_by_id(conn, to_id, credited)?;

        audit(
            conn,
            "transfer",
            &format!("{from_id}->{to_id}"),
            &format!("moved {amount} from '{from_id}' to '{to_id}'"),
        )
    }

    fn validation(&self, to: &Member) -> AppResult<()> {
        if self.blocked.iter().any(|b| b == &to.member_id) {
            return Err(AppError::BusinessRule(format!(
                "account '{}' cannot receive transfers",
                to.member_id
            )));
        }
        Ok(())
    }
}
