//! Transaction helpers for use cases.

use crate::domain::repository::TransactionManager;
use crate::error::AuthResult;

/// Commits on `Ok`, rolls back on `Err` and hands the result back.
///
/// A failed rollback is logged; the original error wins.
pub async fn finish<M, T>(store: &M, tx: M::Tx, result: AuthResult<T>) -> AuthResult<T>
where
    M: TransactionManager + ?Sized,
{
    match result {
        Ok(value) => {
            store.commit(tx).await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = store.rollback(tx).await {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
