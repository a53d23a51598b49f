use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

/// Semitone number on a 12-tone equal-tempered scale. Range is unconstrained.
pub type Pitch = i32;

/// Pitch reduced to `0..=11`, also for negative pitches.
pub fn pitch_class(pitch: Pitch) -> u8 {
    pitch.rem_euclid(12) as u8
}

/// A note message from one track, at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: u64,
    pub pitch: Pitch,
    /// True for a sounding note-on; false for a note-on used as note-off.
    pub is_onset: bool,
}

impl Event {
    pub fn onset(timestamp: u64, pitch: Pitch) -> Self {
        Self {
            timestamp,
            pitch,
            is_onset: true,
        }
    }

    pub fn release(timestamp: u64, pitch: Pitch) -> Self {
        Self {
            timestamp,
            pitch,
            is_onset: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Static,
}

/// One voice moving from one pitch to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub from: Pitch,
    pub to: Pitch,
    /// 1-based count of onsets seen when the movement happened. Reporting only.
    pub note_index: usize,
}

impl Movement {
    pub fn new(from: Pitch, to: Pitch) -> Self {
        Self::at_note(from, to, 0)
    }

    pub fn at_note(from: Pitch, to: Pitch, note_index: usize) -> Self {
        Self {
            from,
            to,
            note_index,
        }
    }

    /// Direction by actual pitch, not pitch class.
    pub fn direction(&self) -> Direction {
        match self.from.cmp(&self.to) {
            std::cmp::Ordering::Less => Direction::Up,
            std::cmp::Ordering::Greater => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Static,
        }
    }
}

/// Movements of a single track keyed by absolute tick.
pub type MovementMap = BTreeMap<u64, Movement>;

/// Movement maps keyed by track index.
pub type TrackMovements = BTreeMap<usize, MovementMap>;

/// Running state threaded through the extraction fold.
#[derive(Debug, Default)]
struct ExtractState {
    previous_pitch: Option<Pitch>,
    note_index: usize,
    time: u64,
    movements: MovementMap,
}

impl ExtractState {
    fn step(mut self, event: &Event) -> Self {
        self.time = event.timestamp;

        if event.is_onset {
            self.note_index += 1;
        }

        // Releases carry pitch state too, so a release of an overlapped
        // note can register as a movement back to it.
        if let Some(previous) = self.previous_pitch {
            if previous != event.pitch {
                self.movements.insert(
                    self.time,
                    Movement::at_note(previous, event.pitch, self.note_index),
                );
            }
        }

        self.previous_pitch = Some(event.pitch);
        self
    }
}

/// Derive the movements of one track from its note events, in stream order.
///
/// When several pitch changes land on the same tick, the last one wins.
pub fn extract(events: &[Event]) -> MovementMap {
    events
        .iter()
        .fold(ExtractState::default(), ExtractState::step)
        .movements
}

/// Like [`extract`], but rejects streams whose timestamps go backwards.
pub fn extract_checked(events: &[Event]) -> Result<MovementMap> {
    validate(events)?;
    Ok(extract(events))
}

fn validate(events: &[Event]) -> Result<()> {
    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(Error::InvalidEvent {
                track: None,
                index: index + 1,
                reason: format!(
                    "timestamp {} precedes previous timestamp {}",
                    pair[1].timestamp, pair[0].timestamp
                ),
            });
        }
    }
    Ok(())
}

/// Extract every track, keyed by its position in `tracks`.
///
/// Tracks that never change pitch are left out of the result.
pub fn extract_tracks(tracks: &[Vec<Event>]) -> Result<TrackMovements> {
    let mut maps = TrackMovements::new();

    for (track_index, events) in tracks.iter().enumerate() {
        let movements = extract_checked(events).map_err(|e| match e {
            Error::InvalidEvent { index, reason, .. } => Error::InvalidEvent {
                track: Some(track_index),
                index,
                reason,
            },
            other => other,
        })?;

        tracing::debug!(
            track = track_index,
            events = events.len(),
            movements = movements.len(),
            "extracted track movements"
        );

        if !movements.is_empty() {
            maps.insert(track_index, movements);
        }
    }

    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pitch_class_normalizes_negatives() {
        assert_eq!(pitch_class(69), 9);
        assert_eq!(pitch_class(12), 0);
        assert_eq!(pitch_class(-1), 11);
        assert_eq!(pitch_class(-12), 0);
    }

    #[test]
    fn direction_uses_actual_pitch() {
        assert_eq!(Movement::new(60, 72).direction(), Direction::Up);
        assert_eq!(Movement::new(72, 60).direction(), Direction::Down);
        assert_eq!(Movement::new(60, 60).direction(), Direction::Static);
    }

    #[test]
    fn melody_yields_one_movement_per_change() {
        let events = [
            Event::onset(0, 60),
            Event::release(480, 60),
            Event::onset(480, 64),
            Event::release(960, 64),
            Event::onset(960, 67),
            Event::release(1440, 67),
        ];

        let map = extract(&events);

        let expected: MovementMap = [
            (480, Movement::at_note(60, 64, 2)),
            (960, Movement::at_note(64, 67, 3)),
        ]
        .into_iter()
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn repeated_pitch_is_not_a_movement() {
        let events = [
            Event::onset(0, 62),
            Event::release(100, 62),
            Event::onset(200, 62),
            Event::release(300, 62),
        ];
        assert!(extract(&events).is_empty());
    }

    #[test]
    fn no_op_transitions_never_recorded() {
        let events = [
            Event::onset(0, 60),
            Event::onset(10, 62),
            Event::release(20, 60),
            Event::release(20, 62),
            Event::onset(30, 62),
            Event::onset(40, 55),
        ];
        for movement in extract(&events).values() {
            assert_ne!(movement.from, movement.to);
        }
    }

    #[test]
    fn release_of_overlapped_note_counts_as_movement() {
        // Legato: 62 starts before 60 is released.
        let events = [
            Event::onset(0, 60),
            Event::onset(480, 62),
            Event::release(500, 60),
        ];

        let map = extract(&events);

        assert_eq!(map.get(&480), Some(&Movement::at_note(60, 62, 2)));
        // The release does not bump the note index.
        assert_eq!(map.get(&500), Some(&Movement::at_note(62, 60, 2)));
    }

    #[test]
    fn last_movement_at_a_tick_wins() {
        let events = [
            Event::onset(0, 60),
            Event::onset(100, 62),
            Event::onset(100, 65),
        ];

        let map = extract(&events);

        assert_eq!(map.len(), 1);
        assert_eq!(map[&100], Movement::at_note(62, 65, 3));
    }

    #[test]
    fn single_pitch_track_is_empty() {
        assert!(extract(&[]).is_empty());
        assert!(extract(&[Event::onset(0, 60)]).is_empty());
    }

    #[test]
    fn checked_rejects_backwards_time() {
        let events = [
            Event::onset(100, 60),
            Event::onset(50, 62),
        ];

        let err = extract_checked(&events).unwrap_err();
        match err {
            Error::InvalidEvent { track, index, .. } => {
                assert_eq!(track, None);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extract_tracks_tags_failing_track_and_skips_static_ones() {
        let tracks = vec![
            vec![Event::onset(0, 60), Event::onset(10, 62)],
            vec![Event::onset(0, 48)],
            vec![Event::onset(0, 55), Event::onset(10, 57)],
        ];

        let maps = extract_tracks(&tracks).unwrap();
        assert_eq!(maps.keys().copied().collect::<Vec<_>>(), vec![0, 2]);

        let bad = vec![
            vec![Event::onset(0, 60)],
            vec![Event::onset(10, 60), Event::onset(5, 62)],
        ];
        match extract_tracks(&bad).unwrap_err() {
            Error::InvalidEvent { track, index, .. } => {
                assert_eq!(track, Some(1));
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
