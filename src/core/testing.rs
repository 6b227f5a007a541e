//! Test doubles shared by the core unit tests

use crate::error::{FilterError, Result};
use crate::markup::MarkupEngine;
use std::cell::{Cell, RefCell};

/// Engine that wraps text in `<p>` and records every call
pub struct CountingEngine {
    calls: Cell<usize>,
    seen: RefCell<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl CountingEngine {
    pub fn new() -> Self {
        Self {
            calls: Cell::new(0),
            seen: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Reject any text containing `needle` with a markup error
    pub fn failing_on(needle: &'static str) -> Self {
        Self {
            fail_on: Some(needle),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Texts passed to `render`, in call order
    pub fn seen(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

impl MarkupEngine for CountingEngine {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn render(&self, text: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(text.to_string());

        if let Some(needle) = self.fail_on {
            if text.contains(needle) {
                return Err(FilterError::Markup(format!(
                    "<string>:1: (SEVERE/4) cannot render '{}'",
                    needle
                )));
            }
        }
        Ok(format!("<p>{}</p>", text))
    }
}
