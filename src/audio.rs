//! String-keyed sound events.
//!
//! The sim names sounds ("pistol", "coin", "rat_squeak"); what plays
//! them is a [`SoundSink`] supplied by the binary.  The library ships
//! only non-playing sinks, so headless runs and tests need no audio
//! device.

/// Receiver for named one-shot sound events.
pub trait SoundSink {
    fn play(&mut self, name: &str);
}

/// Swallows every event.
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&mut self, _name: &str) {}
}

/// Records event names in order; used by tests and debug overlays.
#[derive(Default)]
pub struct RecordingSound {
    pub played: Vec<String>,
}

impl SoundSink for RecordingSound {
    fn play(&mut self, name: &str) {
        self.played.push(name.to_owned());
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
