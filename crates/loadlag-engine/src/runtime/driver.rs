use std::future::Future;

use log::{debug, info};

use super::{TimerEvents, TokioTimerHost};
use crate::config::Target;
use crate::error::SamplerError;
use crate::host::Navigator;
use crate::report::ReportSink;
use crate::sampler::{LagSampler, SamplerState};

/// Runs one measurement to a terminal state.
///
/// Starts `sampler` against `target`, then delivers every fired timer to it
/// until it reaches `Done` or `Aborted`. If `shutdown` resolves first the
/// sampler is stopped, which disarms its pending timer.
pub async fn run_measurement<N, R, S>(
    sampler: &mut LagSampler<N, TokioTimerHost, R>,
    events: &mut TimerEvents,
    target: &Target,
    shutdown: S,
) -> Result<SamplerState, SamplerError>
where
    N: Navigator,
    R: ReportSink,
    S: Future<Output = ()>,
{
    sampler.start(target)?;
    tokio::pin!(shutdown);

    while !sampler.is_finished() {
        tokio::select! {
            fired = events.recv() => match fired {
                Some(id) => {
                    sampler.on_timer(id)?;
                }
                // The sampler owns the sending half, so this cannot happen
                // while it is alive; treat it as a stop.
                None => {
                    sampler.stop();
                }
            },
            _ = &mut shutdown => {
                info!("shutdown requested; stopping measurement");
                sampler.stop();
            }
        }
    }

    debug!("measurement loop finished in state {}", sampler.state().name());
    Ok(sampler.state())
}
