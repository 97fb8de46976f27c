//! Radio playback state machine
//!
//! Drives a single audio element through a station:
//!
//! ```text
//! Idle --load--> Ready --start/select--> Playing --ended--> Playing (next, wraps)
//!                                          |  ^
//!                                    pause |  | start
//!                                          v  |
//!                                         Paused
//! ```
//!
//! The machine never touches audio itself. Each transition returns a
//! [`RadioAction`] telling the caller what to do with its player.
//!
//! No server code drives a `Radio`: the player lives in the browser. This is
//! the reference model for `qradio-server/ui/app.js` (`cue`, `startRadio`,
//! `selectTrack`, `pauseRadio`, `onEnded`), and the tests below pin the
//! transitions that script must follow. Change both together.

use crate::station::{Station, StationTrack};

/// Where the radio is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioState {
    /// No station loaded
    Idle,
    /// Station loaded, nothing cued yet
    Ready,
    Playing { index: usize },
    Paused { index: usize },
}

/// What the caller should do with its audio element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioAction {
    /// Point the player at track `index`; start it if `autoplay`
    Load { index: usize, autoplay: bool },
    /// Continue the current track
    Resume,
    Pause,
    None,
}

/// Station playback controller
#[derive(Debug, Clone)]
pub struct Radio {
    station: Option<Station>,
    state: RadioState,
    current: Option<usize>,
    user_started: bool,
}

impl Default for Radio {
    fn default() -> Self {
        Self::new()
    }
}

impl Radio {
    pub fn new() -> Self {
        Self {
            station: None,
            state: RadioState::Idle,
            current: None,
            user_started: false,
        }
    }

    pub fn state(&self) -> RadioState {
        self.state
    }

    pub fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&StationTrack> {
        let index = self.current?;
        self.station.as_ref()?.track(index)
    }

    /// Radio and pause buttons are usable only with a station loaded
    pub fn controls_enabled(&self) -> bool {
        self.station.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Replace the station; any previous playback is forgotten
    ///
    /// An empty station leaves the radio idle.
    pub fn load(&mut self, station: Station) {
        self.current = None;
        self.user_started = false;
        if station.is_empty() {
            self.station = None;
            self.state = RadioState::Idle;
        } else {
            self.station = Some(station);
            self.state = RadioState::Ready;
        }
    }

    /// Drop the station (selection cleared or rebuilding)
    pub fn clear(&mut self) {
        self.station = None;
        self.current = None;
        self.user_started = false;
        self.state = RadioState::Idle;
    }

    /// "Play radio" button
    pub fn start(&mut self) -> RadioAction {
        if !self.controls_enabled() {
            return RadioAction::None;
        }
        self.user_started = true;

        match self.current {
            None => self.cue(0),
            Some(index) => {
                self.state = RadioState::Playing { index };
                RadioAction::Resume
            }
        }
    }

    /// Listener clicked a surah in the list
    pub fn select(&mut self, index: usize) -> RadioAction {
        if !self.in_range(index) {
            return RadioAction::None;
        }
        self.user_started = true;
        self.cue(index)
    }

    /// "Pause" button; only meaningful while playing
    pub fn pause(&mut self) -> RadioAction {
        match self.state {
            RadioState::Playing { index } => {
                self.state = RadioState::Paused { index };
                RadioAction::Pause
            }
            _ => RadioAction::None,
        }
    }

    /// Current track finished; advance, wrapping after the last track
    pub fn on_ended(&mut self) -> RadioAction {
        let Some(len) = self.station.as_ref().map(Station::len).filter(|n| *n > 0) else {
            return RadioAction::None;
        };

        let next = match self.current {
            Some(index) if index + 1 < len => index + 1,
            _ => 0,
        };
        self.cue(next)
    }

    fn in_range(&self, index: usize) -> bool {
        self.station.as_ref().is_some_and(|s| index < s.len())
    }

    fn cue(&mut self, index: usize) -> RadioAction {
        self.current = Some(index);
        let autoplay = self.user_started;
        self.state = if autoplay {
            RadioState::Playing { index }
        } else {
            RadioState::Paused { index }
        };
        RadioAction::Load { index, autoplay }
    }
}
