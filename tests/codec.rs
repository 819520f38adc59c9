use amll_connector::proto::{
    decode, decode_with, encode, Artist, DecodeError, DecodeOptions, LyricLine, LyricWord, Message,
    MessageKind, MusicInfo,
};

fn music_info() -> MusicInfo {
    MusicInfo {
        music_id: "ncm:1901371647".into(),
        music_name: "アイドル".into(),
        album_id: "153543826".into(),
        album_name: "アイドル".into(),
        artists: vec![Artist::named("YOASOBI")],
        duration: 213_000,
    }
}

fn lyric_lines() -> Vec<LyricLine> {
    vec![
        LyricLine {
            start_time: 0,
            end_time: 1_500,
            words: vec![
                LyricWord {
                    start_time: 0,
                    end_time: 700,
                    word: "無敵の".into(),
                },
                LyricWord {
                    start_time: 700,
                    end_time: 1_500,
                    word: "笑顔で".into(),
                },
            ],
            translated_lyric: "with an invincible smile".into(),
            roman_lyric: "muteki no egao de".into(),
            flag: 0,
        },
        LyricLine {
            start_time: 1_500,
            end_time: 3_000,
            words: vec![],
            translated_lyric: String::new(),
            roman_lyric: String::new(),
            flag: 3,
        },
    ]
}

/// One value of every kind, in opcode order.
fn every_kind() -> Vec<Message> {
    vec![
        Message::Ping,
        Message::Pong,
        Message::SetMusicInfo(music_info()),
        Message::SetMusicAlbumCoverImageUri {
            img_url: "https://p1.music.126.net/cover.jpg".into(),
        },
        Message::SetMusicAlbumCoverImageData {
            data: vec![0x89, b'P', b'N', b'G', 0x00, 0xff],
        },
        Message::OnPlayProgress { progress: 61_234 },
        Message::OnVolumeChanged { volume: 0.75 },
        Message::OnPaused,
        Message::OnResumed,
        Message::OnAudioData {
            data: vec![0, 1, 2, 3, 4, 5, 6, 7],
        },
        Message::SetLyric {
            data: lyric_lines(),
        },
        Message::SetLyricFromTtml {
            data: r#"<tt xmlns="http://www.w3.org/ns/ttml"><body/></tt>"#.into(),
        },
        Message::Pause,
        Message::Resume,
        Message::ForwardSong,
        Message::BackwardSong,
        Message::SetVolume { volume: 0.5 },
        Message::SeekPlayProgress { progress: 12_345 },
    ]
}

#[test]
fn ping_encodes_to_bare_opcode() {
    assert_eq!(&encode(&Message::Ping)[..], [0x00, 0x00]);
    assert_eq!(decode(&[0x00, 0x00]), Ok((Message::Ping, 2)));
}

#[test]
fn set_volume_layout() {
    let bytes = encode(&Message::SetVolume { volume: 0.5 });
    let mut expected = vec![0x10, 0x00];
    expected.extend_from_slice(&0.5f64.to_le_bytes());
    assert_eq!(&bytes[..], &expected[..]);

    assert_eq!(decode(&bytes), Ok((Message::SetVolume { volume: 0.5 }, 10)));
}

#[test]
fn seek_play_progress_layout() {
    let bytes = encode(&Message::SeekPlayProgress { progress: 12345 });
    let mut expected = vec![0x11, 0x00];
    expected.extend_from_slice(&12345u64.to_le_bytes());
    assert_eq!(&bytes[..], &expected[..]);

    let (message, consumed) = decode(&bytes).unwrap();
    assert_eq!(message, Message::SeekPlayProgress { progress: 12345 });
    assert_eq!(consumed, 10);
}

#[test]
fn set_music_info_layout() {
    let message = Message::SetMusicInfo(MusicInfo {
        music_id: "a".into(),
        music_name: "b".into(),
        album_id: "".into(),
        album_name: "".into(),
        artists: vec![Artist {
            id: "x".into(),
            name: "y".into(),
        }],
        duration: 4000,
    });

    let mut expected = vec![0x02, 0x00];
    expected.extend_from_slice(b"a\0b\0\0\0");
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(b"x\0y\0");
    expected.extend_from_slice(&4000u64.to_le_bytes());

    let bytes = encode(&message);
    assert_eq!(&bytes[..], &expected[..]);
    assert_eq!(decode(&bytes), Ok((message, expected.len())));
}

#[test]
fn one_byte_buffer_is_truncated() {
    assert!(matches!(
        decode(&[0x00]),
        Err(DecodeError::TruncatedInput {
            offset: 0,
            needed: 2,
            available: 1
        })
    ));
    assert!(matches!(
        decode(&[]),
        Err(DecodeError::TruncatedInput { .. })
    ));
}

#[test]
fn unknown_opcode_is_reported() {
    assert_eq!(decode(&[0x99, 0x00]), Err(DecodeError::UnknownOpcode(0x99)));
    assert_eq!(
        decode(&[0x12, 0x00, 0x01]),
        Err(DecodeError::UnknownOpcode(18))
    );
}

#[test]
fn every_kind_round_trips() {
    for message in every_kind() {
        let bytes = encode(&message);
        let (decoded, consumed) = decode(&bytes).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(consumed, bytes.len(), "{}", message.kind());
    }
}

#[test]
fn opcode_dispatches_to_matching_kind() {
    let messages = every_kind();
    assert_eq!(messages.len(), MessageKind::ALL.len());

    for (opcode, message) in messages.iter().enumerate() {
        let bytes = encode(message);
        assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]) as usize, opcode);

        let (decoded, _) = decode(&bytes).unwrap();
        assert_eq!(decoded.kind(), MessageKind::ALL[opcode]);
        assert_eq!(decoded.kind(), message.kind());
    }
}

#[test]
fn every_truncation_fails_cleanly() {
    for message in every_kind() {
        let bytes = encode(&message);
        for cut in 0..bytes.len() {
            match decode(&bytes[..cut]) {
                Err(DecodeError::TruncatedInput { .. }) => {}
                other => panic!(
                    "{} cut at {} of {}: expected truncation, got {:?}",
                    message.kind(),
                    cut,
                    bytes.len(),
                    other
                ),
            }
        }
    }
}

#[test]
fn multi_byte_strings_round_trip() {
    let message = Message::SetLyricFromTtml {
        data: "歌词 🎵 Ñandú — ありがとう".into(),
    };
    let bytes = encode(&message);
    assert_eq!(decode(&bytes).unwrap().0, message);
}

#[test]
fn invalid_utf8_is_invalid_encoding() {
    let bytes = [0x03, 0x00, 0xc3, 0x28, 0x00];
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::InvalidEncoding { offset: 2, .. })
    ));
}

#[test]
fn empty_vectors_are_a_zero_count() {
    let message = Message::SetLyric { data: vec![] };
    let bytes = encode(&message);
    assert_eq!(&bytes[..], [0x0a, 0x00, 0, 0, 0, 0]);
    assert_eq!(decode(&bytes), Ok((message, 6)));

    let audio = Message::OnAudioData { data: vec![] };
    assert_eq!(decode(&encode(&audio)), Ok((audio, 6)));
}

#[test]
fn truncated_vector_element_fails_whole_message() {
    // two artists declared, only one present
    let mut bytes = vec![0x02, 0x00];
    bytes.extend_from_slice(b"a\0b\0\0\0");
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(b"x\0y\0");
    bytes.extend_from_slice(&4000u64.to_le_bytes());

    // the duration bytes get read as the second artist; with no NUL among
    // them the string read runs off the end
    let mut duration_without_nul = bytes.clone();
    let tail = duration_without_nul.len() - 8;
    duration_without_nul[tail..].copy_from_slice(&[1; 8]);
    assert!(matches!(
        decode(&duration_without_nul),
        Err(DecodeError::TruncatedInput { .. })
    ));
}

#[test]
fn trailing_bytes_policy() {
    let mut bytes = encode(&Message::OnPlayProgress { progress: 1 }).to_vec();
    bytes.extend_from_slice(&[0xde, 0xad]);

    assert_eq!(
        decode(&bytes),
        Ok((Message::OnPlayProgress { progress: 1 }, 10))
    );
    assert_eq!(
        decode_with(&bytes, DecodeOptions::strict()),
        Err(DecodeError::TrailingBytes(2))
    );
}

#[test]
fn large_u64_is_exact() {
    let progress = u64::MAX - 1;
    let bytes = encode(&Message::OnPlayProgress { progress });
    assert_eq!(
        decode(&bytes).unwrap().0,
        Message::OnPlayProgress { progress }
    );
}

#[test]
fn message_json_uses_host_names() {
    let json = serde_json::to_string(&Message::SetVolume { volume: 0.5 }).unwrap();
    assert_eq!(json, r#"{"type":"setVolume","value":{"volume":0.5}}"#);

    let parsed: Message = serde_json::from_str(
        r#"{"type":"setLyricFromTTML","value":{"data":"<tt/>"}}"#,
    )
    .unwrap();
    assert_eq!(
        parsed,
        Message::SetLyricFromTtml {
            data: "<tt/>".into()
        }
    );
}
