//! Real-time signal delivery for triggers
//!
//! Trigger `id` is the signal `SIGRTMIN + id`, so `pkill -RTMIN+4 sb` and
//! `sb trigger 4` are equivalent.

use std::sync::Arc;

use eyre::{Context, Result, eyre};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::router::TriggerRouter;
use crate::domain::TriggerId;

/// Signal number carrying trigger `id`, if the platform has one
#[cfg(target_os = "linux")]
pub fn signal_number(id: TriggerId) -> Option<i32> {
    let sig = nix::libc::SIGRTMIN() + i32::from(id.get());
    (sig <= nix::libc::SIGRTMAX()).then_some(sig)
}

#[cfg(not(target_os = "linux"))]
pub fn signal_number(_id: TriggerId) -> Option<i32> {
    None
}

/// Listen for every trigger signal and route deliveries to `router`
///
/// Handlers are installed for all ids, subscribed or not, so a stray
/// trigger never falls back to the default action (terminating the
/// process). Listeners stop on the shutdown broadcast.
#[cfg(unix)]
pub fn spawn_signal_listeners(
    router: Arc<TriggerRouter>,
    shutdown: watch::Receiver<bool>,
) -> Result<Vec<JoinHandle<()>>> {
    use tokio::signal::unix::{SignalKind, signal};

    debug!("spawn_signal_listeners: called");
    let mut handles = Vec::new();

    for id in TriggerId::all() {
        let Some(sig) = signal_number(id) else {
            warn!(trigger = %id, "No real-time signal available for trigger, skipping");
            continue;
        };

        let mut stream =
            signal(SignalKind::from_raw(sig)).with_context(|| format!("Failed to listen for signal {}", sig))?;
        let router = router.clone();
        let mut shutdown = shutdown.clone();

        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = stream.recv() => {
                        if received.is_none() {
                            break;
                        }
                        let woken = router.route(i64::from(id.get()));
                        debug!(trigger = %id, woken, "Trigger signal received");
                    }
                    _ = shutdown.changed() => break,
                }
            }
        }));
    }

    debug!(listeners = handles.len(), "spawn_signal_listeners: done");
    Ok(handles)
}

#[cfg(not(unix))]
pub fn spawn_signal_listeners(
    _router: Arc<TriggerRouter>,
    _shutdown: watch::Receiver<bool>,
) -> Result<Vec<JoinHandle<()>>> {
    warn!("Trigger signals are not supported on this platform");
    Ok(Vec::new())
}

/// Deliver trigger `id` to the process `pid`
#[cfg(target_os = "linux")]
pub fn send_trigger(pid: u32, id: TriggerId) -> Result<()> {
    use nix::errno::Errno;

    debug!(pid, trigger = %id, "send_trigger: called");
    let sig = signal_number(id).ok_or_else(|| eyre!("No real-time signal available for trigger {}", id))?;
    let pid = i32::try_from(pid).context("PID out of range")?;

    // SAFETY: kill(2) takes plain integers and touches no memory of ours
    let ret = unsafe { nix::libc::kill(pid, sig) };
    Errno::result(ret).with_context(|| format!("Failed to send signal {} to PID {}", sig, pid))?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn send_trigger(_pid: u32, id: TriggerId) -> Result<()> {
    Err(eyre!("Trigger {} cannot be delivered: real-time signals are not supported here", id))
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_numbers_are_consecutive() {
        let first = signal_number(TriggerId::new(0).unwrap()).unwrap();
        let fifth = signal_number(TriggerId::new(5).unwrap()).unwrap();
        assert_eq!(fifth - first, 5);
        assert_eq!(first, nix::libc::SIGRTMIN());
    }

    #[tokio::test]
    async fn test_signal_reaches_subscribed_module() {
        let mut router = TriggerRouter::new();
        let wake = router.subscribe(TriggerId::new(3));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let listeners = spawn_signal_listeners(Arc::new(router), shutdown_rx).unwrap();
        assert!(!listeners.is_empty());

        send_trigger(std::process::id(), TriggerId::new(3).unwrap()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), wake.notified())
            .await
            .expect("trigger signal should wake the module");

        shutdown_tx.send(true).unwrap();
        for handle in listeners {
            handle.await.unwrap();
        }
    }
}
