//! Drive a pipeline phase while handling its progress events.

use std::future::Future;

use tokio::sync::mpsc;

/// Run `task` to completion, calling `on_event` for every event it sends.
///
/// Events are handled as they arrive. Once the task finishes, anything still
/// queued is drained without waiting, so the caller may keep its sender
/// alive across several phases.
pub async fn run_with_events<F, E, R>(
    task: F,
    event_rx: &mut mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);

    let result = loop {
        tokio::select! {
            r = &mut task => break r,
            Some(event) = event_rx.recv() => on_event(event),
        }
    };

    while let Ok(event) = event_rx.try_recv() {
        on_event(event);
    }

    result
}
