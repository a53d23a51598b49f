use crate::movement::Event;
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};

/// A parsed Standard MIDI File reduced to per-track note events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedSmf {
    pub ppq: u16,
    pub format: u8,
    pub tracks: Vec<DecodedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedTrack {
    pub index: usize,
    pub name: Option<String>,
    /// Note-on messages only, in file order, with absolute ticks.
    pub events: Vec<Event>,
}

impl DecodedSmf {
    pub fn note_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| !t.events.is_empty()).count()
    }
}

/// Parse SMF bytes into note events per track.
///
/// Only note-on messages are kept, and only their deltas advance the tick:
/// any other message contributes nothing, not even time. A note-on with
/// velocity 0 becomes a release.
pub fn decode_smf(midi_bytes: &[u8]) -> crate::Result<DecodedSmf> {
    let smf = Smf::parse(midi_bytes).map_err(|e| crate::Error::MidiParse(e.to_string()))?;

    let ppq = match smf.header.timing {
        midly::Timing::Metrical(ticks) => ticks.as_int(),
        midly::Timing::Timecode(_, _) => 480,
    };

    let format = match smf.header.format {
        midly::Format::SingleTrack => 0,
        midly::Format::Parallel => 1,
        midly::Format::Sequential => 2,
    };

    let tracks = smf
        .tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let mut current_tick: u64 = 0;
            let mut name = None;
            let mut events = Vec::new();

            for event in track {
                match event.kind {
                    TrackEventKind::Meta(MetaMessage::TrackName(bytes)) => {
                        name = String::from_utf8(bytes.to_vec()).ok();
                    }
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { key, vel },
                        ..
                    } => {
                        current_tick += event.delta.as_int() as u64;
                        events.push(Event {
                            timestamp: current_tick,
                            pitch: key.as_int() as i32,
                            is_onset: vel.as_int() > 0,
                        });
                    }
                    _ => {}
                }
            }

            tracing::trace!(track = index, events = events.len(), ticks = current_tick, "decoded track");

            DecodedTrack {
                index,
                name,
                events,
            }
        })
        .collect();

    Ok(DecodedSmf {
        ppq,
        format,
        tracks,
    })
}
