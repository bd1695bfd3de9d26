use image::Rgba;

use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn blit_clips_to_destination() {
    let mut dst = RgbaImage::new(4, 4);
    let src = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
    blit_over(&mut dst, &src, -1, 2, 1.0);

    assert_eq!(dst.get_pixel(0, 2).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(1, 3).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(2, 2).0, [0, 0, 0, 0]);
    assert_eq!(dst.get_pixel(0, 1).0, [0, 0, 0, 0]);
}

#[test]
fn blit_fully_outside_is_noop() {
    let mut dst = RgbaImage::new(2, 2);
    let src = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
    blit_over(&mut dst, &src, 5, 5, 1.0);
    blit_over(&mut dst, &src, -2, 0, 1.0);
    assert!(dst.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_clears_transparent() {
    let mut px = vec![100, 50, 200, 255, 10, 20, 30, 0, 200, 100, 50, 128];
    premultiply_in_place(&mut px);
    assert_eq!(&px[..8], &[100, 50, 200, 255, 0, 0, 0, 0]);
    assert_eq!(px[8], ((200u16 * 128 + 127) / 255) as u8);

    unpremultiply_in_place(&mut px);
    assert_eq!(&px[..8], &[100, 50, 200, 255, 0, 0, 0, 0]);
    assert!(px[8].abs_diff(200) <= 2);
    assert!(px[9].abs_diff(100) <= 2);
}
