/// Sound engine: procedural synthesized sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_attack: Arc<Vec<u8>>,
        sfx_damage: Arc<Vec<u8>>,
        sfx_step: Arc<Vec<u8>>,
        sfx_checkpoint: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            let sfx_jump = Arc::new(make_wav(&gen_jump()));
            let sfx_attack = Arc::new(make_wav(&gen_attack()));
            let sfx_damage = Arc::new(make_wav(&gen_damage()));
            let sfx_step = Arc::new(make_wav(&gen_step()));
            let sfx_checkpoint = Arc::new(make_wav(&gen_checkpoint()));
            let sfx_clear = Arc::new(make_wav(&gen_clear()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump,
                sfx_attack,
                sfx_damage,
                sfx_step,
                sfx_checkpoint,
                sfx_clear,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_attack(&self) { self.play(&self.sfx_attack); }
        pub fn play_damage(&self) { self.play(&self.sfx_damage); }
        pub fn play_step(&self) { self.play(&self.sfx_step); }
        pub fn play_checkpoint(&self) { self.play(&self.sfx_checkpoint); }
        pub fn play_clear(&self) { self.play(&self.sfx_clear); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Tone with an exponential frequency slide, phase-accumulated so the
    /// sweep is click-free. `shape`: 0 = sine, 1 = square, 2 = sawtooth.
    fn gen_slide(f0: f32, f1: f32, duration: f32, shape: u8, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = f0 * (f1 / f0).powf(t);
                phase += freq / SAMPLE_RATE as f32;
                let cycle = phase.fract();
                let wave = match shape {
                    1 => if cycle < 0.5 { 1.0 } else { -1.0 },        // square
                    2 => 2.0 * cycle - 1.0,                            // sawtooth
                    _ => (cycle * 2.0 * std::f32::consts::PI).sin(),   // sine
                };
                let env = 1.0 - t;
                wave * env * volume
            })
            .collect()
    }

    /// Jump: rising square wave, 150Hz → 600Hz
    fn gen_jump() -> Vec<f32> {
        gen_slide(150.0, 600.0, 0.1, 1, 0.2)
    }

    /// Attack: quick sawtooth drop, 400Hz → 100Hz
    fn gen_attack() -> Vec<f32> {
        gen_slide(400.0, 100.0, 0.1, 2, 0.22)
    }

    /// Damage: long low sawtooth slide, 200Hz → 50Hz
    fn gen_damage() -> Vec<f32> {
        gen_slide(200.0, 50.0, 0.3, 2, 0.28)
    }

    /// Footstep: short low-passed noise burst
    fn gen_step() -> Vec<f32> {
        let duration = 0.05;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        let mut filtered = 0.0f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // One-pole lowpass ≈ the original's 1kHz filter
                filtered += 0.25 * (noise - filtered);
                let env = (1.0 - t).powf(0.8);
                filtered * env * 0.35
            })
            .collect()
    }

    /// Checkpoint: clean sine chime at 600Hz
    fn gen_checkpoint() -> Vec<f32> {
        let duration = 0.2;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * 600.0 * 2.0 * std::f32::consts::PI).sin() * env * 0.25
            })
            .collect()
    }

    /// Level complete: victory ascending fanfare
    fn gen_clear() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0]; // C5→E5→G5→C6
        let note_dur = 0.1;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        // Sustain the last note
        let last_freq = 1047.0_f32;
        let n = (SAMPLE_RATE as f32 * 0.25) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            let wave = (t * last_freq * 2.0 * std::f32::consts::PI).sin();
            samples.push(wave * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_attack(&self) {}
    pub fn play_damage(&self) {}
    pub fn play_step(&self) {}
    pub fn play_checkpoint(&self) {}
    pub fn play_clear(&self) {}
}
