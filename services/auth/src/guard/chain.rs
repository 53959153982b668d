use std::future::Future;

use super::route::{AuthType, Condition};
use crate::error::AuthServiceError;

/// Evaluate guards in declaration order under `condition`.
///
/// `And` returns every guard's outcome or the first failure. `Or` returns the
/// first success alone; when every guard fails it returns the failure of the
/// last guard tried, so reordering guards changes the error a client sees.
///
/// An empty list fails with `Unauthorized` under either condition; a public
/// route declares `AuthType::None` explicitly.
pub async fn run_guards<T, F, Fut>(
    auth_types: &[AuthType],
    condition: Condition,
    mut check: F,
) -> Result<Vec<T>, AuthServiceError>
where
    F: FnMut(AuthType) -> Fut,
    Fut: Future<Output = Result<T, AuthServiceError>>,
{
    if auth_types.is_empty() {
        return Err(AuthServiceError::Unauthorized);
    }
    match condition {
        Condition::And => {
            let mut outcomes = Vec::with_capacity(auth_types.len());
            for &auth_type in auth_types {
                outcomes.push(check(auth_type).await?);
            }
            Ok(outcomes)
        }
        Condition::Or => {
            let mut last_err = AuthServiceError::Unauthorized;
            for &auth_type in auth_types {
                match check(auth_type).await {
                    Ok(outcome) => return Ok(vec![outcome]),
                    Err(e) => last_err = e,
                }
            }
            Err(last_err)
        }
    }
}
