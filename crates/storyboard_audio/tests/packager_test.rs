// WAV packaging checked against an independent reader.

use std::io::Cursor;
use storyboard_audio::{WAV_HEADER_LEN, is_container, package};
use storyboard_error::{AudioErrorKind, StoryboardErrorKind};

fn sine_pcm(samples: usize) -> Vec<u8> {
    (0..samples)
        .flat_map(|i| {
            let value = ((i as f32 * 0.05).sin() * 8_000.0) as i16;
            value.to_le_bytes()
        })
        .collect()
}

#[test]
fn test_raw_pcm_gains_a_44_byte_header() {
    let pcm = sine_pcm(1_000);
    let packaged = package(&pcm, 24_000).unwrap();

    assert_eq!(packaged.container().len(), pcm.len() + WAV_HEADER_LEN);
    assert_eq!(&packaged.container()[WAV_HEADER_LEN..], pcm.as_slice());
    assert!(is_container(packaged.container()));
}

#[test]
fn test_ten_seconds_at_default_rate() {
    let packaged = package(&vec![0u8; 480_000], 24_000).unwrap();
    assert_eq!(*packaged.duration_seconds(), 10.0);
}

#[test]
fn test_header_is_readable_by_hound() {
    let pcm = sine_pcm(2_400);
    let packaged = package(&pcm, 24_000).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(packaged.container().clone())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 24_000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 2_400);

    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    let original: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(decoded, original);
}

#[test]
fn test_existing_container_passes_through_unchanged() {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..8_000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    let wav = cursor.into_inner();

    let packaged = package(&wav, 24_000).unwrap();

    assert_eq!(packaged.container(), &wav);
    // Duration comes from the container's own header, not the caller's rate
    assert_eq!(*packaged.duration_seconds(), 0.5);
}

#[test]
fn test_packaging_is_deterministic() {
    let pcm = sine_pcm(500);
    assert_eq!(package(&pcm, 24_000).unwrap(), package(&pcm, 24_000).unwrap());
}

#[test]
fn test_empty_input_is_rejected() {
    let err = package(&[], 24_000).unwrap_err();
    match err.kind() {
        StoryboardErrorKind::Audio(e) => assert_eq!(e.kind, AudioErrorKind::EmptyBuffer),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_zero_sample_rate_is_rejected() {
    let err = package(&[0, 0], 0).unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Audio(_)));
}
