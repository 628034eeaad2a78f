use picot_core::{Signal, signal};

use crate::events::{EventPayload, ListenerOptions, Subscription, TargetRef};

/// Tracks a target's size from its `"resize"` events.
///
/// Every resize event updates the signal immediately; there is deliberately
/// no debouncing, matching the behavior this reproduces. Under a resize
/// storm that means one signal notification per event, which is a known
/// cost rather than a correctness problem.
pub struct WindowSize {
    size: Signal<(u32, u32)>,
    subscription: Subscription,
}

impl WindowSize {
    pub fn track(target: impl Into<TargetRef>, initial: (u32, u32)) -> Self {
        let size = signal(initial);
        let subscription = Subscription::observe(
            target,
            "resize",
            {
                let size = size.clone();
                move |event| {
                    if let EventPayload::Size { width, height } = event.payload {
                        size.set((width, height));
                    }
                }
            },
            ListenerOptions::default(),
        );
        Self { size, subscription }
    }

    pub fn size(&self) -> Signal<(u32, u32)> {
        self.size.clone()
    }

    pub fn width(&self) -> u32 {
        self.size.get().0
    }

    pub fn height(&self) -> u32 {
        self.size.get().1
    }

    pub fn cancel(&self) {
        self.subscription.cancel();
    }
}
