use super::*;

fn vertical(from: Rgba8, to: Rgba8) -> LinearGradient {
    LinearGradient {
        start: Point::new(0.0, 100.0),
        end: Point::new(0.0, 200.0),
        from,
        to,
        blend: GradientBlend::Mask,
    }
}

#[test]
fn gradient_position_is_projected_and_clamped() {
    let g = vertical(Rgba8::TRANSPARENT, Rgba8::TRANSPARENT);
    assert_eq!(g.t_at(Point::new(37.0, 50.0)), 0.0);
    assert!((g.t_at(Point::new(5.0, 150.0)) - 0.5).abs() < 1e-12);
    assert_eq!(g.t_at(Point::new(0.0, 260.0)), 1.0);
}

#[test]
fn degenerate_gradient_uses_start_color() {
    let mut g = vertical(Rgba8::new(1, 2, 3, 4), Rgba8::new(9, 9, 9, 9));
    g.end = g.start;
    assert_eq!(g.t_at(Point::new(10.0, 10.0)), 0.0);
}

#[test]
fn gradient_color_interpolates_channels() {
    let g = vertical(Rgba8::new(0, 0, 0, 255), Rgba8::new(200, 100, 50, 0));
    assert_eq!(g.color_at(0.0), Rgba8::new(0, 0, 0, 255));
    assert_eq!(g.color_at(1.0), Rgba8::new(200, 100, 50, 0));
    assert_eq!(g.color_at(0.5), Rgba8::new(100, 50, 25, 128));
}

#[test]
fn transparent_frame_has_expected_shape() {
    let f = FrameRGBA::transparent(Canvas {
        width: 3,
        height: 2,
    });
    assert_eq!(f.data.len(), 24);
    assert_eq!(f.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(3, 0), None);
}

#[test]
fn straight_export_unpremultiplies() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 64, 128, 0, 0, 0, 0],
        premultiplied: true,
    };
    assert_eq!(frame.to_straight_rgba8(), vec![255, 0, 128, 128, 0, 0, 0, 0]);

    let straight = FrameRGBA {
        premultiplied: false,
        ..frame.clone()
    };
    assert_eq!(straight.to_straight_rgba8(), frame.data);
}
