//! Explicit application state and the typed UI event contract.
//!
//! The GUI collects [`Event`]s during a frame and drains them through
//! [`AppState::apply`]; nothing else mutates the state. The reducer is
//! independent of the rendering library, so tests can drive the whole
//! interaction model without a window.

use crate::color::Rgb;
use crate::map::FillTransition;
use crate::models::MONTHS;

/// UI events with a fixed handler contract. Indices refer to the projected
/// country list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Scrubber moved to a new 1-based month.
    MonthChanged(u8),
    /// Pointer entered a country shape.
    CountryHovered(usize),
    /// Pointer left the map or moved onto open water.
    HoverCleared,
    /// A country shape was clicked.
    CountrySelected(usize),
}

/// Process-wide UI state, passed into render code each frame.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Currently selected 1-based month.
    pub month: u8,
    /// Country under the pointer, if any; drives the tooltip.
    pub hovered: Option<usize>,
    /// Country chosen for the trend panel; none until the first click.
    pub selected: Option<usize>,
    /// In-flight fill animation, if a month change is still settling.
    pub transition: Option<FillTransition>,
}

impl AppState {
    pub fn new(month: u8) -> Self {
        Self {
            month: month.clamp(1, MONTHS as u8),
            ..Self::default()
        }
    }

    /// Apply one event. `displayed_fills` is whatever is currently on
    /// screen (possibly mid-transition); a month change snapshots it as the
    /// starting point of the new transition, so the latest scrubber value
    /// always wins.
    pub fn apply(&mut self, event: Event, displayed_fills: &[Rgb], now: f64) {
        match event {
            Event::MonthChanged(month) => {
                let month = month.clamp(1, MONTHS as u8);
                if month != self.month {
                    self.month = month;
                    self.transition = Some(FillTransition::new(displayed_fills.to_vec(), now));
                }
            }
            Event::CountryHovered(index) => self.hovered = Some(index),
            Event::HoverCleared => self.hovered = None,
            Event::CountrySelected(index) => self.selected = Some(index),
        }
    }

    /// Drop the transition once it has settled on the target colors.
    pub fn finish_transition(&mut self, now: f64) {
        if self
            .transition
            .as_ref()
            .is_some_and(|t| t.finished(now))
        {
            self.transition = None;
        }
    }
}
