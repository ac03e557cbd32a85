use std::io::Cursor;

use image::AnimationDecoder as _;

use super::*;

fn sink_cfg(width: u32, height: u32, loop_count: Option<u16>) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(15, 1).unwrap(),
        loop_count,
    }
}

fn solid(width: u32, height: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied: true,
    }
}

fn netscape_loop_count(bytes: &[u8]) -> Option<u16> {
    let tag = b"NETSCAPE2.0";
    let pos = bytes.windows(tag.len()).position(|w| w == tag)?;
    let sub = &bytes[pos + tag.len()..];
    if sub.len() < 4 || sub[0] != 3 || sub[1] != 1 {
        return None;
    }
    Some(u16::from_le_bytes([sub[2], sub[3]]))
}

#[test]
fn delay_rounds_to_centiseconds() {
    assert_eq!(gif_delay_ms(Fps::new(15, 1).unwrap()), 70);
    assert_eq!(gif_delay_ms(Fps::new(10, 1).unwrap()), 100);
    assert_eq!(gif_delay_ms(Fps::new(30, 1).unwrap()), 30);
    assert_eq!(gif_delay_ms(Fps::new(1000, 1).unwrap()), 10);
}

#[test]
fn transparency_threshold_drops_faint_pixels() {
    let src = vec![10u8, 10, 10, 20, 64, 0, 32, 128, 0, 0, 0, 0];
    let mut dst = vec![0u8; src.len()];
    to_gif_transparency(&mut dst, &src, true, 32).unwrap();
    assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    assert_eq!(&dst[4..8], &[128, 0, 64, 255]);
    assert_eq!(&dst[8..12], &[0, 0, 0, 0]);
}

#[test]
fn flatten_premul_over_black_produces_expected_rgb() {
    // Premultiplied red @ 50% alpha => rgb is 128,0,0 when premul.
    let src = vec![128u8, 0u8, 0u8, 128u8];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, Rgba8::new(0, 0, 0, 255)).unwrap();
    assert_eq!(dst, vec![128u8, 0u8, 0u8, 255u8]);
}

#[test]
fn flatten_straight_over_black_produces_expected_rgb() {
    // Straight red @ 50% alpha => rgb becomes 128,0,0 over black.
    let src = vec![255u8, 0u8, 0u8, 128u8];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, Rgba8::new(0, 0, 0, 255)).unwrap();
    assert_eq!(dst, vec![128u8, 0u8, 0u8, 255u8]);
}

#[test]
fn encodes_looping_gif_in_memory() {
    let mut sink = GifSink::in_memory(GifSinkOpts::default());
    sink.begin(sink_cfg(8, 4, None)).unwrap();
    for i in 0..3u64 {
        let v = (i * 80) as u8;
        sink.push_frame(FrameIndex(i), &solid(8, 4, [v, v, v, 255]))
            .unwrap();
    }
    sink.end().unwrap();

    let bytes = sink.bytes().unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(netscape_loop_count(bytes), Some(0));

    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    for f in &frames {
        assert_eq!(f.delay().numer_denom_ms(), (70, 1));
        assert_eq!(f.buffer().dimensions(), (8, 4));
    }
}

#[test]
fn finite_loop_count_is_written() {
    let mut sink = GifSink::in_memory(GifSinkOpts::default());
    sink.begin(sink_cfg(2, 2, Some(3))).unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 2, [0, 0, 0, 0]))
        .unwrap();
    sink.end().unwrap();
    assert_eq!(netscape_loop_count(sink.bytes().unwrap()), Some(3));
}

#[test]
fn transparent_pixels_survive_encoding() {
    let mut sink = GifSink::in_memory(GifSinkOpts::default());
    sink.begin(sink_cfg(4, 4, None)).unwrap();
    let mut frame = solid(4, 4, [0, 0, 0, 0]);
    frame.data[0..4].copy_from_slice(&[120, 235, 126, 255]);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.end().unwrap();

    let decoder =
        image::codecs::gif::GifDecoder::new(Cursor::new(sink.bytes().unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    let buf = frames[0].buffer();
    assert_eq!(buf.get_pixel(3, 3).0[3], 0);
    assert_eq!(buf.get_pixel(0, 0).0[3], 255);
}

#[test]
fn rejects_misuse() {
    let mut sink = GifSink::in_memory(GifSinkOpts::default());
    assert!(sink.push_frame(FrameIndex(0), &solid(2, 2, [0; 4])).is_err());
    assert!(sink.end().is_err());

    sink.begin(sink_cfg(2, 2, None)).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &solid(3, 2, [0; 4])).is_err());
    sink.push_frame(FrameIndex(1), &solid(2, 2, [0; 4])).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &solid(2, 2, [0; 4])).is_err());

    let mut empty = GifSink::in_memory(GifSinkOpts::default());
    empty.begin(sink_cfg(2, 2, None)).unwrap();
    assert!(matches!(empty.end(), Err(RainError::Encode(_))));

    let mut slow = GifSink::in_memory(GifSinkOpts {
        speed: 0,
        ..GifSinkOpts::default()
    });
    assert!(slow.begin(sink_cfg(2, 2, None)).is_err());
}

#[test]
fn file_target_creates_parent_directories() {
    let dir = std::env::temp_dir().join(format!("datarain_gif_sink_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("out.gif");

    let mut sink = GifSink::to_file(&path, GifSinkOpts::default());
    sink.begin(sink_cfg(2, 2, None)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 2, [255, 255, 255, 255]))
        .unwrap();
    sink.end().unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(Some(on_disk.as_slice()), sink.bytes());
    let _ = std::fs::remove_dir_all(&dir);
}
