use super::*;

fn surface(width: u32, height: u32) -> CpuSurface {
    CpuSurface::new(Canvas { width, height }, FontStore::new(None)).unwrap()
}

#[test]
fn rejects_oversized_and_empty_canvas() {
    assert!(
        CpuSurface::new(
            Canvas {
                width: 70_000,
                height: 10
            },
            FontStore::new(None)
        )
        .is_err()
    );
    assert!(
        CpuSurface::new(
            Canvas {
                width: 0,
                height: 10
            },
            FontStore::new(None)
        )
        .is_err()
    );
}

#[test]
fn opaque_rect_fill_covers_only_its_pixels() {
    let mut s = surface(20, 20);
    s.set_fill_style(Rgba8::new(255, 0, 0, 255));
    s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    let f = s.snapshot().unwrap();
    assert!(f.premultiplied);
    assert_eq!(f.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(15, 15), Some([0, 0, 0, 0]));
}

#[test]
fn clear_rect_flushes_pending_draws_first() {
    let mut s = surface(8, 8);
    s.set_fill_style(Rgba8::new(0, 0, 255, 255));
    s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0)).unwrap();
    s.clear_rect(Rect::new(0.0, 0.0, 4.0, 8.0)).unwrap();
    let f = s.snapshot().unwrap();
    assert_eq!(f.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(6, 6), Some([0, 0, 255, 255]));
}

#[test]
fn mask_gradient_fades_alpha_towards_end() {
    let mut s = surface(4, 100);
    s.set_fill_style(Rgba8::new(255, 255, 255, 255));
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 100.0)).unwrap();
    let g = LinearGradient {
        start: Point::new(0.0, 50.0),
        end: Point::new(0.0, 100.0),
        from: Rgba8::new(0, 0, 0, 255),
        to: Rgba8::new(0, 0, 0, 0),
        blend: GradientBlend::Mask,
    };
    s.fill_gradient(Rect::new(0.0, 50.0, 4.0, 100.0), &g).unwrap();
    let f = s.snapshot().unwrap();

    assert_eq!(f.pixel(0, 10), Some([255, 255, 255, 255]));
    let mid = f.pixel(0, 75).unwrap()[3];
    let low = f.pixel(0, 99).unwrap()[3];
    assert!(mid > 100 && mid < 160, "mid alpha {mid}");
    assert!(low < 10, "bottom alpha {low}");
}

#[test]
fn over_gradient_paints_background_band() {
    let mut s = surface(2, 10);
    let g = LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(0.0, 10.0),
        from: Rgba8::new(10, 20, 30, 0),
        to: Rgba8::new(10, 20, 30, 255),
        blend: GradientBlend::Over,
    };
    s.fill_gradient(Rect::new(0.0, 0.0, 2.0, 10.0), &g).unwrap();
    let f = s.snapshot().unwrap();
    assert!(f.pixel(0, 0).unwrap()[3] < 20);
    assert!(f.pixel(1, 9).unwrap()[3] > 230);
}

#[test]
fn fill_text_requires_a_font() {
    let mut s = surface(8, 8);
    assert!(matches!(
        s.fill_text("1", 1.0, 6.0),
        Err(RainError::Render(_))
    ));
}

#[test]
fn text_draws_pixels_with_the_default_font_family() {
    if crate::render::fonts::system_font_db().len() == 0 {
        eprintln!("skipping: no system fonts");
        return;
    }
    let mut s = surface(64, 32);
    s.fonts_mut().family_name("monospace").unwrap();
    s.set_font(&FontSpec::new("monospace", 16.0));
    s.set_fill_style(Rgba8::new(120, 235, 126, 255));
    s.fill_text("10", 8.0, 24.0).unwrap();
    let f = s.snapshot().unwrap();
    let inked = f.data.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(inked > 0);

    let mut again = surface(64, 32);
    again.set_font(&FontSpec::new("monospace", 16.0));
    again.set_fill_style(Rgba8::new(120, 235, 126, 255));
    again.fill_text("10", 8.0, 24.0).unwrap();
    assert_eq!(again.snapshot().unwrap(), f);
}
