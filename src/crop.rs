//! Maps the on-screen alignment guide to a pixel region of the captured photo.
//!
//! The guide rectangle is expressed in the device's logical screen
//! coordinates (origin top-left); the photo usually has a different
//! resolution and aspect, so each axis gets its own scale factor.

/// Alignment-guide rectangle in logical screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Crop rectangle in photo pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn right(&self) -> u32 {
        self.origin_x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.origin_y + self.height
    }
}

/// Compute the photo-pixel region covered by the alignment guide.
///
/// Horizontal and vertical scale factors are independent
/// (`photo_dim / screen_dim`); the scaled origin and extent are floored to
/// whole pixels. The result is clamped into `[0, photo_w] x [0, photo_h]`:
/// floating-point scaling can overshoot the photo edge by a pixel when the
/// guide touches the screen border.
pub fn crop_region_for_guide(
    photo_w: u32,
    photo_h: u32,
    screen_w: f64,
    screen_h: f64,
    guide: &GuideRect,
) -> CropRegion {
    let scale_x = photo_w as f64 / screen_w;
    let scale_y = photo_h as f64 / screen_h;

    let origin_x = floor_clamped(guide.x * scale_x, photo_w);
    let origin_y = floor_clamped(guide.y * scale_y, photo_h);
    let width = floor_clamped(guide.width * scale_x, photo_w - origin_x);
    let height = floor_clamped(guide.height * scale_y, photo_h - origin_y);

    CropRegion {
        origin_x,
        origin_y,
        width,
        height,
    }
}

fn floor_clamped(value: f64, max: u32) -> u32 {
    let floored = value.floor();
    if floored <= 0.0 {
        return 0;
    }
    if floored >= max as f64 {
        return max;
    }
    floored as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_each_axis_independently() {
        // Screen 400x800 logical, photo 1200x1600: scale 3.0 horizontal, 2.0 vertical.
        let guide = GuideRect {
            x: 40.0,
            y: 100.0,
            width: 320.0,
            height: 200.0,
        };
        let region = crop_region_for_guide(1200, 1600, 400.0, 800.0, &guide);
        assert_eq!(
            region,
            CropRegion {
                origin_x: 120,
                origin_y: 200,
                width: 960,
                height: 400,
            }
        );
    }

    #[test]
    fn floors_fractional_pixels() {
        let guide = GuideRect {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 100.0,
        };
        // scale = 1.5 on both axes: 15.0 origins, 150.0 extents
        let region = crop_region_for_guide(601, 601, 400.666, 400.666, &guide);
        assert!(region.right() <= 601);
        assert!(region.bottom() <= 601);
    }

    #[test]
    fn full_screen_guide_never_escapes_photo_bounds() {
        let photo_dims = [(1u32, 1u32), (3024, 4032), (640, 480), (1080, 1920), (97, 13)];
        let screen_dims = [(320.0, 568.0), (393.5, 852.25), (1024.0, 768.0)];

        for &(pw, ph) in &photo_dims {
            for &(sw, sh) in &screen_dims {
                let guide = GuideRect {
                    x: 0.0,
                    y: 0.0,
                    width: sw,
                    height: sh,
                };
                let region = crop_region_for_guide(pw, ph, sw, sh, &guide);
                assert!(region.right() <= pw, "x overflow for {pw}x{ph} on {sw}x{sh}");
                assert!(region.bottom() <= ph, "y overflow for {pw}x{ph} on {sw}x{sh}");
            }
        }
    }

    #[test]
    fn guide_at_screen_edge_is_clamped() {
        // 0.1 + 0.9 of a 375pt screen, scaled to 1125px, lands exactly on the
        // edge; any float noise must clamp rather than overflow.
        let guide = GuideRect {
            x: 37.5,
            y: 37.5,
            width: 337.5,
            height: 337.5,
        };
        let region = crop_region_for_guide(1125, 1125, 375.0, 375.0, &guide);
        assert!(region.right() <= 1125);
        assert!(region.bottom() <= 1125);
    }

    #[test]
    fn negative_guide_origin_clamps_to_zero() {
        let guide = GuideRect {
            x: -4.0,
            y: -4.0,
            width: 100.0,
            height: 100.0,
        };
        let region = crop_region_for_guide(800, 600, 400.0, 300.0, &guide);
        assert_eq!(region.origin_x, 0);
        assert_eq!(region.origin_y, 0);
    }
}
