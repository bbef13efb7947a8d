use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::selection::model::Selection;

/// Single-shot notification fired once an incoming layer's tiles are resident.
///
/// Clones share one underlying sender, so only the first [`ViewportLoadSignal::notify`] across
/// all clones is delivered.
#[derive(Clone)]
pub struct ViewportLoadSignal {
    sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl ViewportLoadSignal {
    /// Create a connected signal/receiver pair.
    pub fn channel() -> (Self, ViewportLoadReceiver) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Arc::new(Mutex::new(Some(tx))),
            },
            ViewportLoadReceiver { rx },
        )
    }

    /// Fire the signal. Returns `false` if it already fired or nobody is listening anymore.
    pub fn notify(&self) -> bool {
        match self.sender.lock().take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Return `true` while the signal has not fired and its receiver is alive.
    pub fn is_pending(&self) -> bool {
        self.sender
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Return `true` when both handles share one channel.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sender, &other.sender)
    }
}

impl PartialEq for ViewportLoadSignal {
    fn eq(&self, other: &Self) -> bool {
        self.same_channel(other)
    }
}

impl fmt::Debug for ViewportLoadSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportLoadSignal")
            .field("channel_ptr", &Arc::as_ptr(&self.sender))
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Receiving half of a [`ViewportLoadSignal`].
///
/// Can be polled without a runtime through [`ViewportLoadReceiver::try_fired`] or awaited; the
/// future resolves to `false` when every signal handle was dropped without firing.
#[derive(Debug)]
pub struct ViewportLoadReceiver {
    rx: oneshot::Receiver<()>,
}

impl ViewportLoadReceiver {
    /// Non-blocking check.
    pub fn try_fired(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

impl Future for ViewportLoadReceiver {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.is_ok())
    }
}

/// Current and incoming plane selections of one viewer.
///
/// A pyramidal source keeps the current layer on screen while the incoming one loads; the
/// incoming selection becomes current once its [`ViewportLoadSignal`] fires.
#[derive(Debug, Default)]
pub struct TransitionState {
    current: Option<Selection>,
    incoming: Option<Selection>,
    fields: Vec<String>,
    pending: Option<(ViewportLoadSignal, ViewportLoadReceiver)>,
}

impl TransitionState {
    /// Start at steady state.
    pub fn new(current: Option<Selection>, fields: Vec<String>) -> Self {
        Self {
            current,
            incoming: None,
            fields,
            pending: None,
        }
    }

    /// Selection currently on screen.
    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Selection being loaded, if a transition is in flight.
    pub fn incoming(&self) -> Option<&Selection> {
        self.incoming.as_ref()
    }

    /// Fields summarized in transition layer ids.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Signal to hand to the incoming layer.
    pub fn signal(&self) -> Option<&ViewportLoadSignal> {
        self.pending.as_ref().map(|(signal, _)| signal)
    }

    /// Return `true` while an incoming selection is loading.
    pub fn is_transitioning(&self) -> bool {
        self.incoming.is_some()
    }

    /// Swap the current selection immediately, abandoning any transition.
    pub fn replace(&mut self, selection: Option<Selection>) {
        self.current = selection;
        self.incoming = None;
        self.pending = None;
    }

    /// Begin loading `selection` next to the current one.
    ///
    /// Returns `false` when no transition is needed: nothing is on screen yet, or the selection
    /// maps to the same layer as the current one. In both cases it becomes current right away.
    /// An in-flight transition is superseded and its signal disconnected.
    pub fn begin(&mut self, selection: Selection) -> bool {
        let same_layer = self
            .current
            .as_ref()
            .map(|current| current.transition_suffix(&self.fields))
            == Some(selection.transition_suffix(&self.fields));
        if self.current.is_none() || same_layer {
            tracing::debug!(same_layer, "selection applied without transition");
            self.replace(Some(selection));
            return false;
        }

        if self.incoming.is_some() {
            tracing::debug!("superseding in-flight selection transition");
        }
        let suffix = selection.transition_suffix(&self.fields);
        tracing::debug!(%suffix, "selection transition started");
        self.incoming = Some(selection);
        self.pending = Some(ViewportLoadSignal::channel());
        true
    }

    /// Collapse incoming into current if its signal fired. Returns `true` on collapse.
    pub fn poll_complete(&mut self) -> bool {
        let fired = self
            .pending
            .as_mut()
            .is_some_and(|(_, receiver)| receiver.try_fired());
        if fired {
            self.complete();
        }
        fired
    }

    /// Collapse incoming into current unconditionally. Returns `false` if nothing was loading.
    pub fn complete(&mut self) -> bool {
        let Some(incoming) = self.incoming.take() else {
            return false;
        };
        tracing::debug!(
            suffix = %incoming.transition_suffix(&self.fields),
            "selection transition completed"
        );
        self.current = Some(incoming);
        self.pending = None;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/transition.rs"]
mod tests;
