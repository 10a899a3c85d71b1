//! Geometric primitives for layout analysis.
//!
//! This module provides basic geometric types and operations used throughout
//! the layout analysis algorithms.

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// let center = rect.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle intersects with another.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let r3 = Rect::new(200.0, 200.0, 100.0, 100.0);
    ///
    /// assert!(r1.intersects(&r2));
    /// assert!(!r1.intersects(&r3));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Check if this rectangle contains a point.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::{Rect, Point};
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let p1 = Point::new(50.0, 50.0);
    /// let p2 = Point::new(150.0, 150.0);
    ///
    /// assert!(rect.contains_point(&p1));
    /// assert!(!rect.contains_point(&p2));
    /// ```
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
    /// let r2 = Rect::new(25.0, 25.0, 50.0, 50.0);
    /// let union = r1.union(&r2);
    ///
    /// assert_eq!(union.x, 0.0);
    /// assert_eq!(union.y, 0.0);
    /// assert_eq!(union.right(), 75.0);
    /// assert_eq!(union.bottom(), 75.0);
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Compute the area of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.area(), 5000.0);
    /// ```
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Scale a rectangle's position and dimensions by independent x/y
    /// factors. Used to reconcile PDF-space and HTML-space coordinates
    /// (`sx = html_w / pdf_w`, `sy = html_h / pdf_h`); both spaces are
    /// top-left origin, so this is pure axis scaling, never a y-flip.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookpack::geometry::Rect;
    ///
    /// let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    /// let scaled = r.transform(2.0, 1.5);
    /// assert_eq!(scaled, Rect::new(20.0, 30.0, 200.0, 75.0));
    /// ```
    pub fn transform(&self, sx: f32, sy: f32) -> Rect {
        Rect {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    /// Whether this rectangle lies entirely within `bounds` (inclusive).
    pub fn is_within(&self, bounds: &Rect) -> bool {
        self.left() >= bounds.left()
            && self.top() >= bounds.top()
            && self.right() <= bounds.right()
            && self.bottom() <= bounds.bottom()
    }
}

/// The axis-aligned intersection of two rectangles, or `None` if they do
/// not overlap.
///
/// # Examples
///
/// ```
/// use bookpack::geometry::{Rect, intersect};
///
/// let a = Rect::new(0.0, 0.0, 100.0, 100.0);
/// let b = Rect::new(50.0, 50.0, 100.0, 100.0);
/// let i = intersect(&a, &b).unwrap();
/// assert_eq!(i, Rect::new(50.0, 50.0, 50.0, 50.0));
/// ```
pub fn intersect(a: &Rect, b: &Rect) -> Option<Rect> {
    let x0 = a.left().max(b.left());
    let y0 = a.top().max(b.top());
    let x1 = a.right().min(b.right());
    let y1 = a.bottom().min(b.bottom());
    if x1 > x0 && y1 > y0 {
        Some(Rect::from_points(x0, y0, x1, y1))
    } else {
        None
    }
}

/// Intersection-over-union of two rectangles, in `[0, 1]`.
///
/// IoU is the wrong measure for containment-style dedup: a small raster
/// fully inside a much larger vector region has a low IoU even though the
/// raster is entirely duplicated. See [`overlap_ratio_of`] for that case.
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    let inter = match intersect(a, b) {
        Some(r) => r.area(),
        None => return 0.0,
    };
    let union_area = a.area() + b.area() - inter;
    if union_area <= 0.0 {
        0.0
    } else {
        inter / union_area
    }
}

/// `area(a ∩ b) / area(a)` — the fraction of `a` covered by `b`.
///
/// Preferred over [`iou`] for raster↔vector dedup (§4.1, §4.8): it
/// correctly flags "raster fully inside vector" even when the vector
/// region is much larger than the raster, a case IoU hides.
///
/// # Examples
///
/// ```
/// use bookpack::geometry::{Rect, overlap_ratio_of};
///
/// let raster = Rect::new(100.0, 100.0, 300.0, 300.0);
/// let vector = Rect::new(80.0, 50.0, 600.0, 400.0);
/// assert!((overlap_ratio_of(&raster, &vector) - 1.0).abs() < 1e-6);
/// ```
pub fn overlap_ratio_of(a: &Rect, b: &Rect) -> f32 {
    if a.area() <= 0.0 {
        return 0.0;
    }
    match intersect(a, b) {
        Some(r) => r.area() / a.area(),
        None => 0.0,
    }
}

/// Compute the Euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use bookpack::geometry::{Point, euclidean_distance};
///
/// let p1 = Point::new(0.0, 0.0);
/// let p2 = Point::new(3.0, 4.0);
///
/// assert_eq!(euclidean_distance(&p1, &p2), 5.0);
/// ```
pub fn euclidean_distance(p1: &Point, p2: &Point) -> f32 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}
