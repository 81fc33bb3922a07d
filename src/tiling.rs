//////////////////////////////////////////////////////////////////////
// Penrose P2 tiling by golden-ratio subdivision of half-rhombi

use log::{debug, info};

use crate::errors::*;
use crate::geometry::*;

// number of spokes in the seed wheel
const SPOKES: usize = 10;

//////////////////////////////////////////////////////////////////////
// the two rhombus shapes a half-tile can belong to

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum RhombusClass {
    Fat,
    Thin
}

//////////////////////////////////////////////////////////////////////
// half-rhombus triangle.
//
// vertex order matters: the subdivision rule below reads A as the
// apex, so (a, b, c) must never be permuted.

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Triangle {

    pub class: RhombusClass,
    pub a:     Point2d,
    pub b:     Point2d,
    pub c:     Point2d

}

impl Triangle {

    pub fn new(class: RhombusClass, a: Point2d, b: Point2d, c: Point2d) -> Self {
        Triangle { class: class, a: a, b: b, c: c }
    }

    pub fn points(&self) -> [Point2d; 3] {
        [self.a, self.b, self.c]
    }

    pub fn area(&self) -> f64 {
        tri_area(&self.a, &self.b, &self.c)
    }

    // number of children produced by one subdivision
    pub fn child_count(&self) -> usize {
        match self.class {
            RhombusClass::Fat => 2,
            RhombusClass::Thin => 3
        }
    }

    // push the 2 (fat) or 3 (thin) children of this triangle
    pub fn subdivide_into(&self, out: &mut Vec<Triangle>) {

        let (a, b, c) = (self.a, self.b, self.c);

        match self.class {

            RhombusClass::Fat => {

                let p = a + (b - a) / PHI;

                out.push(Triangle::new(RhombusClass::Fat, c, p, b));
                out.push(Triangle::new(RhombusClass::Thin, p, c, a));

            }

            RhombusClass::Thin => {

                let q = b + (a - b) / PHI;
                let r = b + (c - b) / PHI;

                out.push(Triangle::new(RhombusClass::Thin, r, c, a));
                out.push(Triangle::new(RhombusClass::Thin, q, r, b));
                out.push(Triangle::new(RhombusClass::Fat, r, q, a));

            }

        }

    }

}

//////////////////////////////////////////////////////////////////////
// one generation of the tiling

#[derive(Debug, PartialEq, Clone, Default)]
pub struct TilingMesh {
    triangles: Vec<Triangle>
}

impl TilingMesh {

    // generation 0: ten fat triangles around the origin
    pub fn seed_wheel() -> Self {

        let a = Point2d::origin();

        let mut triangles = Vec::with_capacity(SPOKES);

        for i in 0..SPOKES {

            let reverse = if i % 2 == 0 { 1.0 } else { -1.0 };
            let spoke = 2.0 * i as f64;

            let b = polar_to_cartesian(1.0, (spoke - reverse) * PI / SPOKES as f64);
            let c = polar_to_cartesian(1.0, (spoke + reverse) * PI / SPOKES as f64);

            triangles.push(Triangle::new(RhombusClass::Fat, a, b, c));

        }

        TilingMesh { triangles: triangles }

    }

    // replace every triangle with its children, in order
    pub fn subdivide(&self) -> Result<TilingMesh> {

        let count = self.triangles.iter().try_fold(0usize, |sum, t| {
            sum.checked_add(t.child_count())
        });

        let count = match count {
            Some(count) => count,
            None => bail!(ErrorKind::ResourceExhaustion(
                "triangle count overflows usize".to_string()))
        };

        let mut triangles: Vec<Triangle> = Vec::new();

        if triangles.try_reserve_exact(count).is_err() {
            bail!(ErrorKind::ResourceExhaustion(
                format!("can't allocate {:} triangles", count)));
        }

        for tri in &self.triangles {
            tri.subdivide_into(&mut triangles);
        }

        debug_assert!(triangles.len() == count);

        Ok(TilingMesh { triangles: triangles })

    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    // (fat, thin) triangle counts
    pub fn class_counts(&self) -> (usize, usize) {

        let fat = self.triangles.iter()
            .filter(|t| t.class == RhombusClass::Fat)
            .count();

        (fat, self.triangles.len() - fat)

    }

    pub fn total_area(&self) -> f64 {
        self.triangles.iter().map(|t| t.area()).sum()
    }

    pub fn bounds(&self) -> Rect2d {

        let mut rect = Rect2d::empty();

        for tri in &self.triangles {
            for p in &tri.points() {
                rect.expand(p);
            }
        }

        rect

    }

}

impl<'a> IntoIterator for &'a TilingMesh {

    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }

}

//////////////////////////////////////////////////////////////////////
// builds the seed wheel and subdivides it a fixed number of times.
// the resulting mesh never changes afterwards.

#[derive(Debug, Clone)]
pub struct TilingGenerator {
    iterations: usize,
    mesh: TilingMesh
}

impl TilingGenerator {

    pub fn new(iterations: i32) -> Result<TilingGenerator> {

        if iterations < 0 {
            invalid_argument!("iteration count must be >= 0, got {:}", iterations);
        }

        let iterations = iterations as usize;

        let mut mesh = TilingMesh::seed_wheel();

        for generation in 0..iterations {

            mesh = mesh.subdivide()
                .chain_err(|| format!("while building generation {:}", generation + 1))?;

            let (fat, thin) = mesh.class_counts();
            debug!("generation {:}: {:} fat, {:} thin", generation + 1, fat, thin);

        }

        info!("built penrose tiling with {:} triangles after {:} iterations",
              mesh.len(), iterations);

        Ok(TilingGenerator {
            iterations: iterations,
            mesh: mesh
        })

    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn mesh(&self) -> &TilingMesh {
        &self.mesh
    }

}

//////////////////////////////////////////////////////////////////////
