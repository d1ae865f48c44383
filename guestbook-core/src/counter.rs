//! Live character counters for the form inputs

/// Visual state of a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterLevel {
    /// Plenty of room left
    #[default]
    Neutral,
    /// 11 to 49 characters left
    Warning,
    /// 10 or fewer characters left (including over the limit)
    Critical,
}

impl CounterLevel {
    /// CSS class used by the HTML page, if any
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            CounterLevel::Neutral => None,
            CounterLevel::Warning => Some("warning"),
            CounterLevel::Critical => Some("error"),
        }
    }
}

/// Counter attached to one text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCounter {
    max: usize,
    len: usize,
}

impl CharacterCounter {
    pub fn new(max: usize) -> Self {
        Self { max, len: 0 }
    }

    /// Recompute from the input's current value
    pub fn update(&mut self, value: &str) {
        self.len = value.chars().count();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Remaining capacity; negative once the input is over the limit
    pub fn remaining(&self) -> i64 {
        self.max as i64 - self.len as i64
    }

    pub fn level(&self) -> CounterLevel {
        let remaining = self.remaining();
        if remaining <= 10 {
            CounterLevel::Critical
        } else if remaining < 50 {
            CounterLevel::Warning
        } else {
            CounterLevel::Neutral
        }
    }

    /// Display text, e.g. `12/500 characters`
    pub fn label(&self) -> String {
        format!("{}/{} characters", self.len, self.max)
    }
}
