//! In-place rectangle and line drawing.
//!
//! Coordinates are truncated to whole pixels and anything outside the
//! matrix is clipped. 8-bit colors saturate to 0..255.

use scv_core::sample::saturate_u8;
use scv_core::{ColorScalar, Error, PixelMatrix, Point, Rect, Result, SamplesMut};
use tracing::trace;

/// Fails unless `thickness` is usable; `allow_fill` admits negatives.
fn check_thickness(thickness: i32, allow_fill: bool) -> Result<()> {
    if thickness == 0 || (thickness < 0 && !allow_fill) {
        return Err(Error::validation(format!(
            "thickness must be a positive integer{}, got {thickness}",
            if allow_fill { " or negative to fill" } else { "" }
        )));
    }
    Ok(())
}

/// Checks the arguments of [`draw_line`].
pub fn validate_line(from: Point, to: Point, thickness: i32) -> Result<()> {
    check_thickness(thickness, false)?;
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return Err(Error::validation("line end points must be finite"));
    }
    Ok(())
}

/// Checks the arguments of [`draw_rectangle`].
pub fn validate_rectangle(rect: &Rect, thickness: i32) -> Result<()> {
    check_thickness(thickness, true)?;
    if ![rect.x, rect.y, rect.width, rect.height].iter().all(|v| v.is_finite()) {
        return Err(Error::validation("rect values must be finite"));
    }
    Ok(())
}

/// Paints pixels of one matrix with a fixed color.
struct Painter<'a> {
    samples: SamplesMut<'a>,
    width: i64,
    height: i64,
    color: Vec<f64>,
}

impl<'a> Painter<'a> {
    fn new(m: &'a mut PixelMatrix, color: &ColorScalar) -> Self {
        let color = color.to_pixel(m.encoding());
        let (width, height) = (m.width() as i64, m.height() as i64);
        Self {
            samples: m.samples_mut(),
            width,
            height,
            color,
        }
    }

    fn put(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let ch = self.color.len();
        let base = (y * self.width + x) as usize * ch;
        match &mut self.samples {
            SamplesMut::U8(s) => {
                for (d, &c) in s[base..base + ch].iter_mut().zip(&self.color) {
                    *d = saturate_u8(c);
                }
            }
            SamplesMut::F64(s) => s[base..base + ch].copy_from_slice(&self.color),
        }
    }

    /// Fills `[x0, x1] × [y0, y1]`, clipped.
    fn fill(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        let (x0, x1) = (x0.max(0), x1.min(self.width - 1));
        let (y0, y1) = (y0.max(0), y1.min(self.height - 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y);
            }
        }
    }

    fn stamp(&mut self, x: i64, y: i64, thickness: i64) {
        if thickness <= 1 {
            self.put(x, y);
            return;
        }
        let lo = -(thickness / 2);
        let hi = lo + thickness - 1;
        self.fill(x + lo, y + lo, x + hi, y + hi);
    }

    /// 8-connected Bresenham from `(x0, y0)` to `(x1, y1)`.
    fn line(&mut self, (mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64), thickness: i64) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x0, y0, thickness);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Clips segment `a → b` to `[lo, hi]²` (Liang-Barsky). `None` if it misses.
fn clip_segment(a: Point, b: Point, lo: f64, hi_x: f64, hi_y: f64) -> Option<(Point, Point)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-dx, a.x - lo), (dx, hi_x - a.x), (-dy, a.y - lo), (dy, hi_y - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    (t0 <= t1).then(|| {
        (
            Point::new(a.x + t0 * dx, a.y + t0 * dy),
            Point::new(a.x + t1 * dx, a.y + t1 * dy),
        )
    })
}

/// Draws a line from `from` to `to` into `m`.
///
/// ```rust
/// use scv_core::{ColorScalar, Encoding, PixelMatrix, Point};
/// use scv_ops::draw::draw_line;
///
/// let mut m = PixelMatrix::new(3, 3, Encoding::Gray).unwrap();
/// draw_line(&mut m, Point::new(0.0, 0.0), Point::new(2.0, 2.0), &ColorScalar::Gray(9.0), 1).unwrap();
/// assert_eq!(m.to_vec(), vec![9., 0., 0., 0., 9., 0., 0., 0., 9.]);
/// ```
pub fn draw_line(m: &mut PixelMatrix, from: Point, to: Point, color: &ColorScalar, thickness: i32) -> Result<()> {
    validate_line(from, to, thickness)?;
    trace!(?from, ?to, thickness, "draw_line");
    let pad = f64::from(thickness);
    let (w, h) = (m.width() as f64, m.height() as f64);
    let (from, to) = (
        Point::new(from.x.trunc(), from.y.trunc()),
        Point::new(to.x.trunc(), to.y.trunc()),
    );
    let Some((a, b)) = clip_segment(from, to, -pad, w + pad, h + pad) else {
        return Ok(());
    };
    let mut painter = Painter::new(m, color);
    painter.line(
        (a.x.round() as i64, a.y.round() as i64),
        (b.x.round() as i64, b.y.round() as i64),
        i64::from(thickness),
    );
    Ok(())
}

/// Draws the outline of `rect` into `m`, or fills it when `thickness` is
/// negative.
///
/// The outline covers `(x, y)` to `(x + width - 1, y + height - 1)`
/// inclusive.
pub fn draw_rectangle(m: &mut PixelMatrix, rect: &Rect, color: &ColorScalar, thickness: i32) -> Result<()> {
    validate_rectangle(rect, thickness)?;
    let r = rect.map_values(f64::trunc);
    trace!(?rect, thickness, "draw_rectangle");
    let (w, h) = (m.width() as f64, m.height() as f64);
    // Clamp far-away corners so the integer math stays in range.
    let clamp_x = |v: f64| v.clamp(-w - 1.0, 2.0 * w + 1.0) as i64;
    let clamp_y = |v: f64| v.clamp(-h - 1.0, 2.0 * h + 1.0) as i64;
    let (x0, y0) = (clamp_x(r.x), clamp_y(r.y));
    let (x1, y1) = (clamp_x(r.x + r.width - 1.0), clamp_y(r.y + r.height - 1.0));
    if x1 < x0 || y1 < y0 {
        return Ok(());
    }

    let mut painter = Painter::new(m, color);
    if thickness < 0 {
        painter.fill(x0, y0, x1, y1);
        return Ok(());
    }
    let t = i64::from(thickness);
    for (a, b) in [((x0, y0), (x1, y0)), ((x1, y0), (x1, y1)), ((x1, y1), (x0, y1)), ((x0, y1), (x0, y0))] {
        painter.line(a, b, t);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scv_core::{Encoding, ErrorKind};

    const WHITE: ColorScalar = ColorScalar::rgb(255.0, 255.0, 255.0);

    #[test]
    fn test_rectangle_outline_float() {
        let mut m = PixelMatrix::new(4, 4, Encoding::Float).unwrap();
        draw_rectangle(&mut m, &Rect::new(1.0, 1.0, 3.0, 3.0), &WHITE, 1).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            0., 0., 0., 0.,
            0., 255., 255., 255.,
            0., 255., 0., 255.,
            0., 255., 255., 255.,
        ];
        assert_eq!(m.to_vec(), expected);
    }

    #[test]
    fn test_rectangle_filled_bgr() {
        let mut m = PixelMatrix::new(3, 3, Encoding::Bgr).unwrap();
        let red = ColorScalar::rgb(255.0, 0.0, 0.0);
        draw_rectangle(&mut m, &Rect::new(1.0, 0.0, 5.0, 2.0), &red, -1).unwrap();
        let px = m.as_u8().unwrap();
        assert_eq!(&px[3..6], &[0, 0, 255]);
        assert_eq!(&px[0..3], &[0, 0, 0]);
        assert_eq!(&px[24..27], &[0, 0, 0]);
        assert_eq!(&px[15..18], &[0, 0, 255]);
    }

    #[test]
    fn test_rectangle_clipped() {
        let mut m = PixelMatrix::new(3, 3, Encoding::Gray).unwrap();
        draw_rectangle(&mut m, &Rect::new(-1.0, -1.0, 3.0, 3.0), &ColorScalar::Gray(1.0), 1).unwrap();
        assert_eq!(m.to_vec(), vec![0., 1., 0., 1., 1., 0., 0., 0., 0.]);
        draw_rectangle(&mut m, &Rect::new(1e12, 0.0, 3.0, 3.0), &ColorScalar::Gray(9.0), 1).unwrap();
        assert!(m.to_vec().iter().all(|&v| v != 9.0));
    }

    #[test]
    fn test_line_thick() {
        let mut m = PixelMatrix::new(5, 5, Encoding::Gray).unwrap();
        draw_line(&mut m, Point::new(0.0, 2.0), Point::new(4.0, 2.0), &ColorScalar::Gray(7.0), 3).unwrap();
        let v = m.to_vec();
        assert!(v[..5].iter().all(|&x| x == 0.0));
        assert!(v[5..20].iter().all(|&x| x == 7.0));
        assert!(v[20..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_line_far_outside_is_clipped() {
        let mut m = PixelMatrix::new(4, 1, Encoding::Gray).unwrap();
        draw_line(&mut m, Point::new(-1e15, 0.0), Point::new(1e15, 0.0), &ColorScalar::Gray(3.0), 1).unwrap();
        assert_eq!(m.to_vec(), vec![3.0; 4]);
    }

    #[test]
    fn test_line_luma_on_gray() {
        let mut m = PixelMatrix::new(2, 1, Encoding::Gray).unwrap();
        draw_line(&mut m, Point::new(0.0, 0.0), Point::new(1.0, 0.0), &WHITE, 1).unwrap();
        assert_eq!(m.as_u8().unwrap(), &[255, 255]);
    }

    #[test]
    fn test_invalid_thickness() {
        let mut m = PixelMatrix::new(2, 2, Encoding::Gray).unwrap();
        let a = Point::new(0.0, 0.0);
        let err = draw_line(&mut m, a, a, &WHITE, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(draw_line(&mut m, a, a, &WHITE, -1).is_err());
        assert!(draw_rectangle(&mut m, &Rect::new(0.0, 0.0, 1.0, 1.0), &WHITE, 0).is_err());
    }
}
