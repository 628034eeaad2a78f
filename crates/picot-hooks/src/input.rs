use picot_core::{Signal, signal};

/// Controlled text-input state: a value, a change handler, and a reset back
/// to the initial value.
pub struct InputState {
    initial: String,
    value: Signal<String>,
}

impl InputState {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            value: signal(initial.clone()),
            initial,
        }
    }

    pub fn get(&self) -> String {
        self.value.get()
    }

    pub fn value(&self) -> Signal<String> {
        self.value.clone()
    }

    pub fn on_change(&self, next: impl Into<String>) {
        self.value.set(next.into());
    }

    pub fn reset(&self) {
        self.value.set(self.initial.clone());
    }
}
