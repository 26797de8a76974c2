//! Audio feedback: binaural ambience plus short event cues
//!
//! The game only talks to the [`AudioFeedback`] trait. In the browser the
//! backend is Web Audio; natively (and in tests) it is silent. Every call can
//! fail independently, and [`AudioGuard`] turns the first failure into
//! "sound off for the rest of the session" instead of an error.

use std::fmt;

/// Carrier frequency of the left ambient tone (Hz)
pub const AMBIENT_BASE_HZ: f32 = 200.0;
/// C4, played when a character jumps or scores
pub const HIT_CUE_HZ: f32 = 261.63;
pub const HIT_CUE_SECS: f64 = 0.1;
/// C major triad played at game over
pub const END_CUE_CHORD: [f32; 3] = [261.63, 329.63, 392.0];
pub const END_CUE_SECS: f64 = 0.2;

/// Beat frequency between the two ears for a speed control value
pub fn ambient_offset_hz(speed: i32) -> f32 {
    2.0 + speed as f32 * 0.4
}

/// Audio failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The platform has no usable audio context
    Unavailable(String),
    /// A node could not be created, connected or scheduled
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable(e) => write!(f, "audio unavailable: {e}"),
            AudioError::Backend(e) => write!(f, "audio backend error: {e}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Sound-emitting collaborator
pub trait AudioFeedback {
    fn start_ambient(&mut self) -> Result<(), AudioError>;
    fn stop_ambient(&mut self) -> Result<(), AudioError>;
    fn play_hit_cue(&mut self) -> Result<(), AudioError>;
    fn play_end_cue(&mut self) -> Result<(), AudioError>;
    /// Retune the right-ear tone for a speed control value
    fn set_ambient_separation(&mut self, speed: i32) -> Result<(), AudioError>;
}

/// Backend that never makes a sound
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioFeedback for SilentAudio {
    fn start_ambient(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_ambient(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_hit_cue(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_end_cue(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_ambient_separation(&mut self, _speed: i32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// A sound source that is started and stopped once, like an oscillator
pub trait Voice {
    fn play(&self) -> Result<(), AudioError>;
    fn silence(&self) -> Result<(), AudioError>;
}

/// Start every voice or none: on failure the ones already playing are
/// silenced again.
pub fn start_all<V: Voice>(voices: &[V]) -> Result<(), AudioError> {
    for (index, voice) in voices.iter().enumerate() {
        if let Err(e) = voice.play() {
            for started in &voices[..index] {
                let _ = started.silence();
            }
            return Err(e);
        }
    }
    Ok(())
}

/// Silence every voice, reporting the first failure
pub fn stop_all<V: Voice>(voices: &[V]) -> Result<(), AudioError> {
    let mut first = Ok(());
    for voice in voices {
        if let Err(e) = voice.silence() {
            if first.is_ok() {
                first = Err(e);
            }
        }
    }
    first
}

/// Fire-and-forget wrapper. The first failed call silences the ambience and
/// every later call except `stop_ambient` is skipped, so a broken backend
/// costs one log line and leaves nothing playing.
pub struct AudioGuard<A: AudioFeedback> {
    backend: A,
    enabled: bool,
}

impl<A: AudioFeedback> AudioGuard<A> {
    pub fn new(backend: A) -> Self {
        Self {
            backend,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    fn call(&mut self, what: &str, f: impl FnOnce(&mut A) -> Result<(), AudioError>) {
        if !self.enabled {
            return;
        }
        if let Err(e) = f(&mut self.backend) {
            log::error!("Audio {what} failed, disabling sound: {e}");
            self.enabled = false;
            // Sound is off from here on, ambience included
            if let Err(e) = self.backend.stop_ambient() {
                log::warn!("Audio stop after failure also failed: {e}");
            }
        }
    }

    pub fn start_ambient(&mut self) {
        self.call("start", |a| a.start_ambient());
    }

    /// Reaches the backend even after sound was disabled
    pub fn stop_ambient(&mut self) {
        if let Err(e) = self.backend.stop_ambient() {
            log::warn!("Audio stop failed: {e}");
            self.enabled = false;
        }
    }

    pub fn play_hit_cue(&mut self) {
        self.call("hit cue", |a| a.play_hit_cue());
    }

    pub fn play_end_cue(&mut self) {
        self.call("end cue", |a| a.play_end_cue());
    }

    pub fn set_ambient_separation(&mut self, speed: i32) {
        self.call("retune", |a| a.set_ambient_separation(speed));
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::*;

    /// Ambient tones sit well under the cues
    const AMBIENT_GAIN: f32 = 0.1;
    const CUE_GAIN: f32 = 0.18;

    fn backend_err(e: JsValue) -> AudioError {
        AudioError::Backend(format!("{e:?}"))
    }

    /// Web Audio backend. The context is created lazily on first use, since
    /// browsers only allow it after a user gesture.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        ambient: Option<[OscillatorNode; 2]>,
        separation_hz: f32,
        master_volume: f32,
    }

    impl WebAudio {
        pub fn new(master_volume: f32, speed: i32) -> Self {
            Self {
                ctx: None,
                ambient: None,
                separation_hz: ambient_offset_hz(speed),
                master_volume: master_volume.clamp(0.0, 1.0),
            }
        }

        fn context(&mut self) -> Result<AudioContext, AudioError> {
            if self.ctx.is_none() {
                let ctx = AudioContext::new()
                    .map_err(|e| AudioError::Unavailable(format!("{e:?}")))?;
                log::info!("Audio context started");
                self.ctx = Some(ctx);
            }
            let ctx = self
                .ctx
                .clone()
                .ok_or_else(|| AudioError::Unavailable("no context".into()))?;

            // Browsers start contexts suspended until a gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Ok(ctx)
        }

        /// Sine oscillator through a gain node, hard-panned, into the output
        fn panned_tone(
            ctx: &AudioContext,
            freq: f32,
            pan: f32,
            level: f32,
        ) -> Result<OscillatorNode, AudioError> {
            let osc = ctx.create_oscillator().map_err(backend_err)?;
            let gain = ctx.create_gain().map_err(backend_err)?;
            let panner = ctx.create_stereo_panner().map_err(backend_err)?;

            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            gain.gain().set_value(level);
            panner.pan().set_value(pan);

            osc.connect_with_audio_node(&gain).map_err(backend_err)?;
            gain.connect_with_audio_node(&panner).map_err(backend_err)?;
            panner
                .connect_with_audio_node(&ctx.destination())
                .map_err(backend_err)?;
            Ok(osc)
        }

        /// Short enveloped sine note
        fn note(ctx: &AudioContext, freq: f32, secs: f64, vol: f32) -> Result<(), AudioError> {
            let osc = ctx.create_oscillator().map_err(backend_err)?;
            let gain: GainNode = ctx.create_gain().map_err(backend_err)?;
            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(backend_err)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(backend_err)?;

            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol, t).map_err(backend_err)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + secs + 0.1)
                .map_err(backend_err)?;
            osc.start().map_err(backend_err)?;
            osc.stop_with_when(t + secs + 0.1).map_err(backend_err)?;
            Ok(())
        }
    }

    impl Voice for OscillatorNode {
        fn play(&self) -> Result<(), AudioError> {
            self.start().map_err(backend_err)
        }

        fn silence(&self) -> Result<(), AudioError> {
            self.stop().map_err(backend_err)
        }
    }

    impl AudioFeedback for WebAudio {
        fn start_ambient(&mut self) -> Result<(), AudioError> {
            if self.ambient.is_some() {
                return Ok(());
            }
            let ctx = self.context()?;
            let level = AMBIENT_GAIN * self.master_volume;
            // Oscillators are single-use, so every start builds a fresh pair
            let left = Self::panned_tone(&ctx, AMBIENT_BASE_HZ, -1.0, level)?;
            let right = Self::panned_tone(&ctx, AMBIENT_BASE_HZ + self.separation_hz, 1.0, level)?;
            let pair = [left, right];
            start_all(&pair)?;
            self.ambient = Some(pair);
            log::debug!("Ambient started ({} Hz offset)", self.separation_hz);
            Ok(())
        }

        fn stop_ambient(&mut self) -> Result<(), AudioError> {
            match self.ambient.take() {
                Some(pair) => stop_all(&pair),
                None => Ok(()),
            }
        }

        fn play_hit_cue(&mut self) -> Result<(), AudioError> {
            let ctx = self.context()?;
            Self::note(&ctx, HIT_CUE_HZ, HIT_CUE_SECS, CUE_GAIN * self.master_volume)
        }

        fn play_end_cue(&mut self) -> Result<(), AudioError> {
            let ctx = self.context()?;
            // Split the level so the chord is no louder than a single cue
            let vol = CUE_GAIN * self.master_volume / END_CUE_CHORD.len() as f32;
            for freq in END_CUE_CHORD {
                Self::note(&ctx, freq, END_CUE_SECS, vol)?;
            }
            Ok(())
        }

        fn set_ambient_separation(&mut self, speed: i32) -> Result<(), AudioError> {
            self.separation_hz = ambient_offset_hz(speed);
            if let Some([left, right]) = &self.ambient {
                left.frequency().set_value(AMBIENT_BASE_HZ);
                right
                    .frequency()
                    .set_value(AMBIENT_BASE_HZ + self.separation_hz);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails every call after `fail_after` successes, counting calls
    #[derive(Default)]
    struct Flaky {
        calls: usize,
        fail_after: usize,
    }

    impl Flaky {
        fn hit(&mut self) -> Result<(), AudioError> {
            self.calls += 1;
            if self.calls > self.fail_after {
                Err(AudioError::Backend("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    impl AudioFeedback for Flaky {
        fn start_ambient(&mut self) -> Result<(), AudioError> {
            self.hit()
        }
        fn stop_ambient(&mut self) -> Result<(), AudioError> {
            self.hit()
        }
        fn play_hit_cue(&mut self) -> Result<(), AudioError> {
            self.hit()
        }
        fn play_end_cue(&mut self) -> Result<(), AudioError> {
            self.hit()
        }
        fn set_ambient_separation(&mut self, _speed: i32) -> Result<(), AudioError> {
            self.hit()
        }
    }

    #[test]
    fn test_offset_follows_speed() {
        assert_eq!(ambient_offset_hz(0), 2.0);
        assert_eq!(ambient_offset_hz(5), 4.0);
        assert!((ambient_offset_hz(10) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_guard_disables_after_first_failure() {
        let mut guard = AudioGuard::new(Flaky {
            fail_after: 2,
            ..Default::default()
        });
        guard.start_ambient();
        guard.play_hit_cue();
        assert!(guard.is_enabled());

        guard.play_end_cue();
        assert!(!guard.is_enabled());

        // The failure itself triggered one stop, the explicit stop still
        // reaches the backend, everything else is skipped
        guard.stop_ambient();
        guard.set_ambient_separation(3);
        assert_eq!(guard.backend().calls, 5);
    }

    /// Tracks whether it is sounding
    #[derive(Default)]
    struct FakeVoice {
        playing: Cell<bool>,
        fail_play: bool,
        fail_silence: bool,
    }

    impl Voice for FakeVoice {
        fn play(&self) -> Result<(), AudioError> {
            if self.fail_play {
                return Err(AudioError::Backend("play".into()));
            }
            self.playing.set(true);
            Ok(())
        }

        fn silence(&self) -> Result<(), AudioError> {
            if self.fail_silence {
                return Err(AudioError::Backend("silence".into()));
            }
            self.playing.set(false);
            Ok(())
        }
    }

    #[test]
    fn test_start_all_rolls_back_on_failure() {
        let voices = [
            FakeVoice::default(),
            FakeVoice {
                fail_play: true,
                ..Default::default()
            },
        ];
        assert!(start_all(&voices).is_err());
        assert!(!voices[0].playing.get());
        assert!(!voices[1].playing.get());
    }

    #[test]
    fn test_stop_all_tries_every_voice() {
        let voices = [
            FakeVoice {
                fail_silence: true,
                ..Default::default()
            },
            FakeVoice::default(),
        ];
        start_all(&voices).unwrap();

        assert_eq!(stop_all(&voices), Err(AudioError::Backend("silence".into())));
        assert!(!voices[1].playing.get());
    }

    #[test]
    fn test_silent_backend_never_fails() {
        let mut guard = AudioGuard::new(SilentAudio);
        guard.start_ambient();
        guard.play_end_cue();
        guard.stop_ambient();
        assert!(guard.is_enabled());
    }

    #[test]
    fn test_error_display() {
        let e = AudioError::Unavailable("not allowed".into());
        assert_eq!(e.to_string(), "audio unavailable: not allowed");
    }
}
