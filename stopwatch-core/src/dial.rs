//! Geometry of the circular progress dial: one revolution per minute with
//! sixty tick marks around the rim.

pub const MS_PER_REVOLUTION: u64 = 60_000;
pub const MARKER_COUNT: u32 = 60;
pub const DEGREES_PER_MARKER: f32 = 6.0;
const MARKER_LEN: f32 = 15.0;
const MAJOR_MARKER_LEN: f32 = 25.0;

/// Arc length in degrees for the given elapsed time, in `[0, 360)`.
pub fn sweep_angle(elapsed_ms: u64) -> f32 {
    ((elapsed_ms % MS_PER_REVOLUTION) as f64 / MS_PER_REVOLUTION as f64 * 360.0) as f32
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Degrees clockwise from 12 o'clock.
    pub angle: f32,
    /// Every fifth marker is drawn longer.
    pub major: bool,
    pub outer: Point,
    pub inner: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dial {
    pub center: Point,
    pub radius: f32,
}

impl Dial {
    /// Fit a dial into a `width` x `height` area, leaving room for the stroke.
    pub fn fit(width: f32, height: f32, stroke_width: f32) -> Self {
        Self {
            center: Point { x: width / 2.0, y: height / 2.0 },
            radius: (width.min(height) / 2.0 - stroke_width).max(0.0),
        }
    }

    /// Point on a circle of radius `r` at `angle` degrees clockwise from the top.
    pub fn point_at(&self, angle: f32, r: f32) -> Point {
        let rad = (angle - 90.0).to_radians();
        Point {
            x: self.center.x + r * rad.cos(),
            y: self.center.y + r * rad.sin(),
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = Marker> + '_ {
        (0..MARKER_COUNT).map(move |i| {
            let angle = i as f32 * DEGREES_PER_MARKER;
            let major = i % 5 == 0;
            let len = if major { MAJOR_MARKER_LEN } else { MARKER_LEN };
            Marker {
                angle,
                major,
                outer: self.point_at(angle, self.radius),
                inner: self.point_at(angle, self.radius - len),
            }
        })
    }

    /// Where the progress arc currently ends.
    pub fn hand(&self, elapsed_ms: u64) -> Point {
        self.point_at(sweep_angle(elapsed_ms), self.radius)
    }
}

/// Index of the marker the arc has most recently passed.
pub fn marker_index(elapsed_ms: u64) -> u32 {
    ((elapsed_ms % MS_PER_REVOLUTION) / (MS_PER_REVOLUTION / MARKER_COUNT as u64)) as u32
}
