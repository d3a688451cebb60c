// Active layer - which gas dataset is shown and whether it is visible
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveLayer {
    pub key: String,
    pub visible: bool,
}

/// What `choose` did, so the caller knows whether dependent state must reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerChange {
    Toggled { visible: bool },
    Switched { from: String, to: String },
}

impl ActiveLayer {
    pub fn new(key: String) -> Self {
        Self { key, visible: true }
    }

    /// Same key flips visibility; a different key switches and shows it.
    pub fn choose(&mut self, key: &str) -> LayerChange {
        if self.key == key {
            self.visible = !self.visible;
            LayerChange::Toggled {
                visible: self.visible,
            }
        } else {
            let from = std::mem::replace(&mut self.key, key.to_string());
            self.visible = true;
            LayerChange::Switched {
                from,
                to: self.key.clone(),
            }
        }
    }

    /// Returns true when the layer went from visible to hidden.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let hidden = self.visible && !visible;
        self.visible = visible;
        hidden
    }
}
