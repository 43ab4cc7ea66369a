use web_time::Duration;

/// What ends a held-delete repeat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// The popup hide timer fires a fixed time after the press and cancels
    /// the repeat even while the key is still held, so a long press deletes
    /// about two characters. Release also stops it.
    #[default]
    CappedByPopup,
    /// The repeat runs until release; the popup stays up while the key is
    /// held and hides a fixed time after release.
    UntilRelease,
}

/// Timing for key interaction. Defaults match the stock keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardConfig {
    /// Period of the held-delete repeat.
    pub repeat_interval: Duration,
    /// How long the key popup stays visible.
    pub popup_duration: Duration,
    /// Hold time before a press on a repeating key turns into a long press.
    pub long_press_timeout: Duration,
    pub repeat_policy: RepeatPolicy,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            repeat_interval: Duration::from_millis(80),
            popup_duration: Duration::from_millis(120),
            long_press_timeout: Duration::from_millis(500),
            repeat_policy: RepeatPolicy::default(),
        }
    }
}

impl KeyboardConfig {
    pub fn with_repeat_policy(mut self, policy: RepeatPolicy) -> Self {
        self.repeat_policy = policy;
        self
    }
}
