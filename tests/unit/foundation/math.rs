use super::*;

#[test]
fn fnv_hash_is_stable_across_write_splits() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"datarain");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'd');
    b.write_bytes(b"atarain");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn rng_is_reproducible_and_in_range() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..64 {
        let ia = a.next_index(8);
        assert_eq!(ia, b.next_index(8));
        assert!(ia < 8);
    }
}

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(1, 127), 0);
}

#[test]
fn over_respects_extremes() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    assert_eq!(over(dst, [1, 2, 3, 255]), [1, 2, 3, 255]);
    // Half-transparent white over transparent stays premultiplied.
    assert_eq!(over([0, 0, 0, 0], [128, 128, 128, 128]), [128, 128, 128, 128]);
}

#[test]
fn unpremultiply_inverts_premul() {
    assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
    assert_eq!(unpremultiply([128, 0, 64, 128]), [255, 0, 128, 128]);
    assert_eq!(unpremultiply([9, 8, 7, 255]), [9, 8, 7, 255]);
}
