//! Points, rectangles and colors in surface units.
//!
//! Surface units are PDF points for documents and pixels for raster pages.
//! The y axis points down. Origin translation is a pure function: callers
//! keep per-cell math 0-based and map it onto the page with [`Point::offset`].

/// A position on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Distance from the left edge.
    pub x: f32,
    /// Distance from the top edge.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate a local (origin-relative) point into this origin's space.
    #[must_use]
    pub fn offset(self, local: Point) -> Point {
        Point::new(self.x + local.x, self.y + local.y)
    }

    /// Translate by a delta.
    #[must_use]
    pub fn shifted(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Translate a local rectangle into `origin`'s space.
    #[must_use]
    pub fn at(origin: Point, local: Rect) -> Rect {
        Rect::new(origin.x + local.x, origin.y + local.y, local.width, local.height)
    }

    /// Shrink by `amount` on every side.
    #[must_use]
    pub fn inset(self, amount: f32) -> Rect {
        let amount = amount.min(self.width / 2.0).min(self.height / 2.0);
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - amount * 2.0,
            self.height - amount * 2.0,
        )
    }

    /// Center point.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(self) -> f32 {
        self.x + self.width
    }
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Black ink.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Paper.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Secondary text and guide lines.
    pub const GREY: Color = Color::rgb(120, 120, 120);
    /// Solution highlight outline.
    pub const HIGHLIGHT: Color = Color::rgb(214, 40, 57);

    /// Create a color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `#d62839`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components scaled to `0.0..=1.0`.
    #[must_use]
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_pure_translation() {
        let origin = Point::new(40.0, 100.0);
        assert_eq!(origin.offset(Point::new(0.0, 0.0)), origin);
        assert_eq!(origin.offset(Point::new(5.0, 7.5)), Point::new(45.0, 107.5));
    }

    #[test]
    fn test_rect_at_and_inset() {
        let r = Rect::at(Point::new(10.0, 20.0), Rect::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(r, Rect::new(10.0, 20.0, 30.0, 30.0));
        let inner = r.inset(5.0);
        assert_eq!(inner, Rect::new(15.0, 25.0, 20.0, 20.0));
        assert_eq!(inner.center(), r.center());
    }

    #[test]
    fn test_inset_never_inverts() {
        let r = Rect::new(0.0, 0.0, 4.0, 10.0).inset(10.0);
        assert!(r.width >= 0.0);
        assert!(r.height >= 0.0);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::HIGHLIGHT.to_hex(), "#d62839");
        assert_eq!(Color::BLACK.to_unit(), (0.0, 0.0, 0.0));
    }
}
