use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::warn;

const SAMPLE_RATE: u32 = 44100;

/// Fire-and-forget sound cues for the two surfaces. If no output device is
/// available the notifier stays silent; playback problems are logged and
/// never reach the timer.
pub struct Notifier {
    // The stream must stay alive for the handle to keep working.
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl Notifier {
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Notifier {
                output: Some((stream, handle)),
            },
            Err(e) => {
                warn!("audio output unavailable, sound cues disabled: {e}");
                Notifier { output: None }
            }
        }
    }

    /// A notifier that never plays anything.
    pub fn disabled() -> Self {
        Notifier { output: None }
    }

    /// Short beep for threshold and last-ten warnings.
    pub fn play_notification(&self) {
        self.play(&[(880.0, 160)]);
    }

    /// Two-tone cue when a side or round runs out of time.
    pub fn play_timeover(&self) {
        self.play(&[(660.0, 220), (440.0, 420)]);
    }

    fn play(&self, tones: &[(f32, u64)]) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("failed to open audio sink: {e}");
                return;
            }
        };
        for &(freq, millis) in tones {
            sink.append(sine_buffer(freq, millis));
        }
        sink.detach();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

fn sine_buffer(freq: f32, millis: u64) -> SamplesBuffer<f32> {
    let sample_count = (SAMPLE_RATE as u64 * millis / 1000) as usize;
    let samples: Vec<f32> = (0..sample_count)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            // Linear fade-out keeps the beep from clicking at the end.
            let envelope = 1.0 - (i as f32 / sample_count as f32);
            (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.4 * envelope
        })
        .collect();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}
