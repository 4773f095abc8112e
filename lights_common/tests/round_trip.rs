use lights_common::{
    chunk_leds, decode, decode_with, encode, errors::DecodeError, ColorChunk, Config, DecodeMode,
    Message, Rgb, FRAME_LEN, LEDS_PER_MESSAGE,
};
use rand::Rng;

fn random_config(rng: &mut impl Rng) -> Config {
    Config {
        decay_time_delay_ms: rng.gen(),
        decay_interval_us: rng.gen(),
        decay_amount: rng.gen(),
        gamma_r: rng.gen_range(0.0..4.0),
        gamma_g: rng.gen_range(0.0..4.0),
        gamma_b: rng.gen_range(0.0..4.0),
    }
}

fn random_chunk(rng: &mut impl Rng) -> ColorChunk {
    let mut chunk = ColorChunk {
        offset: rng.gen(),
        settings: rng.gen(),
        ..Default::default()
    };
    for color in chunk.color.iter_mut() {
        *color = Rgb::new(rng.gen(), rng.gen(), rng.gen());
    }
    chunk
}

#[test]
fn random_messages_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let message = match rng.gen_range(0..3) {
            0 => Message::Nop,
            1 => Message::Config(random_config(&mut rng)),
            _ => Message::Color(random_chunk(&mut rng)),
        };

        let frame = encode(&message);
        assert_eq!(frame.len(), FRAME_LEN);
        assert_eq!(&frame[1..4], &[0, 0, 0]);
        assert_eq!(frame[0], message.message_type() as u8);
        assert_eq!(decode_with(&frame, DecodeMode::Strict), Ok(message));
    }
}

#[test]
fn random_reserved_bytes_are_ignored() {
    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let message = Message::Color(random_chunk(&mut rng));
        let mut frame = encode(&message);
        frame[1] = rng.gen_range(1..=255);
        frame[2] = rng.gen();
        frame[3] = rng.gen();

        assert_eq!(decode(&frame), Ok(message));
        assert_eq!(
            decode_with(&frame, DecodeMode::Strict),
            Err(DecodeError::ReservedField([frame[1], frame[2], frame[3]]))
        );
    }
}

#[test]
fn config_frames_never_decode_as_color() {
    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let frame = encode(&Message::Config(random_config(&mut rng)));
        assert!(matches!(decode(&frame), Ok(Message::Config(_))));

        let frame = encode(&Message::Color(random_chunk(&mut rng)));
        assert!(matches!(decode(&frame), Ok(Message::Color(_))));
    }
}

#[test]
fn chunked_buffer_reassembles() {
    let mut rng = rand::thread_rng();
    let leds: Vec<Rgb> = (0..100)
        .map(|_| Rgb::new(rng.gen(), rng.gen(), rng.gen()))
        .collect();

    let mut reassembled = vec![Rgb::BLACK; leds.len()];
    let mut latched = 0;
    for chunk in chunk_leds(&leds) {
        let frame = encode(&chunk.into());
        let chunk = match decode(&frame) {
            Ok(Message::Color(chunk)) => chunk,
            other => panic!("Expected a color chunk, got {:?}", other),
        };

        let start = chunk.offset as usize;
        let end = (start + LEDS_PER_MESSAGE).min(leds.len());
        reassembled[start..end].copy_from_slice(&chunk.color[..end - start]);
        if chunk.show_after() {
            latched += 1;
        }
    }

    assert_eq!(reassembled, leds);
    assert_eq!(latched, 1);
}

fn config_bits(config: &Config) -> [u32; 6] {
    [
        config.decay_time_delay_ms,
        config.decay_interval_us,
        config.decay_amount,
        config.gamma_r.to_bits(),
        config.gamma_g.to_bits(),
        config.gamma_b.to_bits(),
    ]
}

#[test]
fn any_gamma_bits_round_trip() {
    let mut rng = rand::thread_rng();
    let special = [
        f32::NAN,
        -f32::NAN,
        f32::INFINITY,
        f32::NEG_INFINITY,
        -0.0,
        -2.2,
        f32::MIN_POSITIVE,
        f32::from_bits(1),
    ];

    let mut gammas: Vec<f32> = special.to_vec();
    gammas.extend((0..500).map(|_| f32::from_bits(rng.gen())));

    for gamma in gammas {
        let config = Config {
            decay_time_delay_ms: rng.gen(),
            decay_interval_us: rng.gen(),
            decay_amount: rng.gen(),
            gamma_r: gamma,
            gamma_g: f32::from_bits(rng.gen()),
            gamma_b: -gamma,
        };

        let frame = encode(&Message::Config(config));
        match decode_with(&frame, DecodeMode::Strict) {
            Ok(Message::Config(decoded)) => {
                assert_eq!(config_bits(&decoded), config_bits(&config));
                assert_eq!(encode(&Message::Config(decoded))[..], frame[..]);
            }
            other => panic!("Expected a config, got {:?}", other),
        }
    }
}
