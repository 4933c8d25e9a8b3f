//! Scripted keyboard input for headless runs.
//!
//! A script is a comma-separated list of `frames:keys` entries. `frames` is a
//! single frame (`12`) or an inclusive range (`10-40`); `keys` is one or more
//! key names joined with `+`:
//!
//! ```text
//! 0:space,10-40:left,20-30:u+w
//! ```

use crate::keyboard::{Key, KeyboardState};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Errors from parsing an input script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("entry `{0}` is missing a `frames:keys` separator")]
    MissingSeparator(String),
    #[error("invalid frame number `{0}`")]
    BadFrame(String),
    #[error("frame range {start}-{end} is reversed")]
    ReversedRange { start: u64, end: u64 },
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    frames: RangeInclusive<u64>,
    keys: Vec<Key>,
}

/// Parsed input script: which keys are held on which frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    entries: Vec<Entry>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut entries = Vec::new();
        for raw in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (frames, keys) = raw
                .split_once(':')
                .ok_or_else(|| InputError::MissingSeparator(raw.to_string()))?;
            let frames = parse_frames(frames.trim())?;
            let keys = keys
                .split('+')
                .map(|k| Key::from_name(k).ok_or_else(|| InputError::UnknownKey(k.trim().to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(Entry { frames, keys });
        }
        tracing::debug!(entries = entries.len(), "parsed input script");
        Ok(Self { entries })
    }

    /// Keys held on the given frame.
    pub fn held_at(&self, frame: u64) -> BTreeSet<Key> {
        self.entries
            .iter()
            .filter(|e| e.frames.contains(&frame))
            .flat_map(|e| e.keys.iter().copied())
            .collect()
    }

    /// Last frame on which the script holds any key.
    pub fn last_frame(&self) -> Option<u64> {
        self.entries.iter().map(|e| *e.frames.end()).max()
    }

    /// Advance `keyboard` to `frame` of the script.
    pub fn apply(&self, frame: u64, keyboard: &mut KeyboardState) {
        keyboard.begin_frame();
        keyboard.set_held(self.held_at(frame));
    }
}

impl FromStr for InputScript {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_frames(text: &str) -> Result<RangeInclusive<u64>, InputError> {
    let frame = |s: &str| {
        s.trim()
            .parse::<u64>()
            .map_err(|_| InputError::BadFrame(s.trim().to_string()))
    };
    match text.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (frame(start)?, frame(end)?);
            if end < start {
                return Err(InputError::ReversedRange { start, end });
            }
            Ok(start..=end)
        }
        None => {
            let f = frame(text)?;
            Ok(f..=f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::InputSource;

    #[test]
    fn parse_single_and_range() {
        let script = InputScript::parse("0:space, 10-12:left+u").unwrap();
        assert_eq!(script.held_at(0), BTreeSet::from([Key::Space]));
        assert!(script.held_at(5).is_empty());
        assert_eq!(script.held_at(11), BTreeSet::from([Key::Left, Key::U]));
        assert_eq!(script.last_frame(), Some(12));
    }

    #[test]
    fn overlapping_entries_merge() {
        let script: InputScript = "0-4:w,2-3:a".parse().unwrap();
        assert_eq!(script.held_at(2), BTreeSet::from([Key::W, Key::A]));
        assert_eq!(script.held_at(4), BTreeSet::from([Key::W]));
    }

    #[test]
    fn empty_script_holds_nothing() {
        let script = InputScript::parse("").unwrap();
        assert!(script.held_at(0).is_empty());
        assert_eq!(script.last_frame(), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            InputScript::parse("space").unwrap_err(),
            InputError::MissingSeparator("space".into())
        );
        assert_eq!(
            InputScript::parse("x:space").unwrap_err(),
            InputError::BadFrame("x".into())
        );
        assert_eq!(
            InputScript::parse("5-2:space").unwrap_err(),
            InputError::ReversedRange { start: 5, end: 2 }
        );
        assert_eq!(
            InputScript::parse("1:escape").unwrap_err(),
            InputError::UnknownKey("escape".into())
        );
    }

    #[test]
    fn apply_produces_triggers() {
        let script = InputScript::parse("1-3:space").unwrap();
        let mut kb = KeyboardState::new();
        script.apply(0, &mut kb);
        assert!(!kb.push_key(Key::Space));
        script.apply(1, &mut kb);
        assert!(kb.trigger_key(Key::Space));
        script.apply(2, &mut kb);
        assert!(kb.push_key(Key::Space));
        assert!(!kb.trigger_key(Key::Space));
    }
}
