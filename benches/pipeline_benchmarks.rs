//! Pipeline Benchmarks
//!
//! Performance benchmarks for speech post-processing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use speech_fx::dsp::{EffectChain, EffectRequest, SignalProcessor};
use speech_fx::{Pipeline, Waveform};

fn full_request() -> EffectRequest {
    EffectRequest {
        pitch_shift_semitones: 3,
        reverb_room_size: 0.35,
        reverb_damping: 0.5,
        delay_seconds: 0.2,
        chorus_rate: 1.5,
        distortion_gain_db: 6.0,
        lowpass_cutoff: 5000.0,
        highpass_cutoff: 80.0,
    }
}

fn benchmark_dry_render(c: &mut Criterion) {
    let pipeline = Pipeline::new();
    let waveform = Waveform::sine_wave(220.0, 0.5, 5.0, 16000).unwrap();

    c.bench_function("render_5s_no_effects", |b| {
        b.iter(|| {
            pipeline
                .render(black_box(waveform.clone()), &EffectRequest::default())
                .unwrap()
        })
    });
}

fn benchmark_full_chain(c: &mut Criterion) {
    let processor = SignalProcessor::new();
    let chain = EffectChain::from_request(&full_request()).unwrap();
    let waveform = Waveform::sine_wave(220.0, 0.5, 5.0, 16000).unwrap();

    c.bench_function("chain_7_effects_5s", |b| {
        b.iter(|| {
            let mut buffer = waveform.clone();
            processor.process(&chain, black_box(&mut buffer)).unwrap();
        })
    });
}

fn benchmark_full_render(c: &mut Criterion) {
    let pipeline = Pipeline::new();
    let waveform = Waveform::sine_wave(220.0, 0.5, 5.0, 16000).unwrap();
    let request = full_request();

    c.bench_function("render_5s_all_effects", |b| {
        b.iter(|| pipeline.render(black_box(waveform.clone()), &request).unwrap())
    });
}

criterion_group!(benches, benchmark_dry_render, benchmark_full_chain, benchmark_full_render);
criterion_main!(benches);
