//! Monitored targets.

use std::fmt;
use std::sync::Arc;

use crate::probe::Probe;

/// A named target and the probe that checks it.
#[derive(Clone)]
pub struct Target {
    name: String,
    display_name: String,
    probe: Arc<dyn Probe>,
}

impl Target {
    /// Create a target; the display name defaults to the title-cased name.
    pub fn new(name: impl Into<String>, probe: Arc<dyn Probe>) -> Self {
        let name = name.into();
        Self {
            display_name: title_case(&name),
            name,
            probe,
        }
    }

    /// Override the name shown in reports.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn probe(&self) -> &Arc<dyn Probe> {
        &self.probe
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("probe", &self.probe.kind())
            .finish()
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
