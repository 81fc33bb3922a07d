//////////////////////////////////////////////////////////////////////
// define some constants for Penrose tiles

pub const PHI: f64 = 1.618033988749895;
pub const PI: f64 = std::f64::consts::PI;

//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

pub type Vec2d = nalgebra::Vector2<f64>;
pub type Vec3d = nalgebra::Vector3<f64>;
pub type Point2d = nalgebra::geometry::Point2<f64>;

//////////////////////////////////////////////////////////////////////
// Rect2d type has lower-left p0 and upper-right p1

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Rect2d {

    pub p0: Point2d,
    pub p1: Point2d

}

impl Rect2d {

    // empty rectangle has p0 > p1
    pub fn empty() -> Self {

        let p0 = Point2d::new(f64::MAX, f64::MAX);
        let p1 = -p0;

        Rect2d { p0: p0, p1: p1 }

    }

    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    // expand this rect to include the given point
    pub fn expand(&mut self, p: &Point2d) {
        self.p0 = self.p0.inf(p);
        self.p1 = self.p1.sup(p);
    }

}

//////////////////////////////////////////////////////////////////////
// point on a circle of given radius at the given angle (radians)

pub fn polar_to_cartesian(radius: f64, angle: f64) -> Point2d {
    Point2d::new(radius * angle.cos(), radius * angle.sin())
}

//////////////////////////////////////////////////////////////////////
// signed area of triangle (p0, p1, p2), positive when counterclockwise

pub fn tri_signed_area(p0: &Point2d, p1: &Point2d, p2: &Point2d) -> f64 {

    let u = p1 - p0;
    let v = p2 - p0;

    0.5 * (u.x * v.y - u.y * v.x)

}

pub fn tri_area(p0: &Point2d, p1: &Point2d, p2: &Point2d) -> f64 {
    tri_signed_area(p0, p1, p2).abs()
}

//////////////////////////////////////////////////////////////////////
// map an unscaled, origin-centered point into pixel space

pub fn to_pixel_space(vertex: &Point2d, scale: f64, offset: &Vec2d) -> Point2d {
    Point2d::from(vertex.coords * scale + offset)
}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn phi_constants_agree() {

        let phi = (1.0 + 5f64.sqrt()) / 2.0;

        assert!((PHI - phi).abs() < 1e-15);
        assert!((PHI - 1.0 / PHI - 1.0).abs() < 1e-15);

    }

    #[test]
    fn rect_expands_to_cover_points() {

        let mut rect = Rect2d::empty();
        assert!(rect.is_empty());

        rect.expand(&Point2d::new(-1.0, 2.0));
        rect.expand(&Point2d::new(3.0, -2.0));

        assert!(!rect.is_empty());
        assert_eq!(rect.p0, Point2d::new(-1.0, -2.0));
        assert_eq!(rect.p1, Point2d::new(3.0, 2.0));

    }

    #[test]
    fn signed_area_follows_winding() {

        let p0 = Point2d::new(0.0, 0.0);
        let p1 = Point2d::new(2.0, 0.0);
        let p2 = Point2d::new(0.0, 3.0);

        assert_eq!(tri_signed_area(&p0, &p1, &p2), 3.0);
        assert_eq!(tri_signed_area(&p0, &p2, &p1), -3.0);
        assert_eq!(tri_area(&p0, &p2, &p1), 3.0);

    }

    #[test]
    fn polar_points_land_on_circle() {

        for i in 0..20 {
            let p = polar_to_cartesian(2.5, i as f64 * PI / 10.0);
            assert!((p.coords.norm() - 2.5).abs() < 1e-12);
        }

        let p = polar_to_cartesian(1.0, 0.5 * PI);
        assert!(p.x.abs() < 1e-15);
        assert!((p.y - 1.0).abs() < 1e-15);

    }

    #[test]
    fn pixel_space_scales_then_offsets() {

        let offset = Vec2d::new(200.0, 150.0);

        let origin = to_pixel_space(&Point2d::origin(), 50.0, &offset);
        assert_eq!(origin, Point2d::new(200.0, 150.0));

        let p = to_pixel_space(&Point2d::new(1.0, -0.5), 50.0, &offset);
        assert_eq!(p, Point2d::new(250.0, 125.0));

    }

}
