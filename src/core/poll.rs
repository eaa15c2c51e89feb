//! Shift status polling
//!
//! Fetches a shift on a fixed interval until it reaches a terminal status or
//! its expiry passes while still in progress. Only the read is repeated.
//!
//! | status                                        | action                     |
//! |-----------------------------------------------|----------------------------|
//! | waiting, pending, processing, settling        | sleep, poll again          |
//! | settled, refund, refunding, refunded          | return the shift           |
//! | review, multiple                              | return the shift (caller decides) |
//! | anything else                                 | `ExchangeError::UnknownStatus` |
//! | non-terminal and `expires_at` has passed      | return the last-known shift |

use std::time::Duration;

use crate::adapters::clock::Clock;
use crate::adapters::errors::ExchangeResult;
use crate::adapters::traits::SwapService;
use crate::adapters::types::Shift;

/// Poll `shift_id` until terminal or expired
pub async fn poll_shift<S: SwapService + ?Sized>(
    swap: &S,
    shift_id: &str,
    interval: Duration,
    clock: &dyn Clock,
) -> ExchangeResult<Shift> {
    let mut polls: u32 = 0;

    loop {
        let shift = swap.get_shift(shift_id).await?;
        polls += 1;

        let status = match shift.status() {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(
                    service = swap.service_name(),
                    shift_id = %shift_id,
                    status = %shift.status,
                    polls,
                    "Shift reported an unknown status"
                );
                return Err(e);
            }
        };

        if status.is_terminal() {
            tracing::info!(
                service = swap.service_name(),
                shift_id = %shift_id,
                status = %status,
                polls,
                "Shift reached terminal status"
            );
            return Ok(shift);
        }

        let now = clock.now();
        if shift.is_expired_at(now) {
            tracing::warn!(
                service = swap.service_name(),
                shift_id = %shift_id,
                status = %status,
                expires_at = %shift.expires_at,
                polls,
                "Shift expired before reaching a terminal status"
            );
            return Ok(shift);
        }

        tracing::debug!(
            service = swap.service_name(),
            shift_id = %shift_id,
            status = %status,
            polls,
            next_poll_ms = interval.as_millis() as u64,
            "Shift in progress"
        );
        tokio::time::sleep(interval).await;
    }
}
