//! Separating axis test for oriented bounding boxes
//!
//! Two convex boxes are disjoint iff some axis exists on which their
//! projections do not overlap. For boxes only 15 candidates need checking:
//! the 3 face normals of each box and the 9 cross products of one box's
//! edge directions with the other's.
//!
//! All quantities are expressed in the frame of the first box (`a`), so the
//! relative rotation `R[i][j] = a_i · b_j` and the translation `t` are the
//! only values computed from world data.

use std::fmt;

use crate::foundation::math::{transform_point, Mat3, Mat4, Quat, Rotation3, Vec3};

/// Added to every |R[i][j]| used as a projection coefficient.
///
/// Near-parallel edge pairs produce a cross product close to zero; without
/// the padding, rounding can report separation on that degenerate axis.
pub const SAT_EPSILON: f32 = f32::EPSILON;

/// One of a box's three local axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Local X
    X,
    /// Local Y
    Y,
    /// Local Z
    Z,
}

impl Axis {
    /// All axes in index order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Column index of this axis
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Identity of the axis that proved two boxes disjoint
///
/// `A` is the box the test was invoked on, `B` the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeparatingAxis {
    /// Face normal of box A
    FaceA(Axis),
    /// Face normal of box B
    FaceB(Axis),
    /// Cross product of an edge of A with an edge of B (`A_i × B_j`)
    Edge(Axis, Axis),
}

impl SeparatingAxis {
    /// Position of this axis in the test order, 1 through 15
    pub fn code(self) -> u32 {
        let code = match self {
            SeparatingAxis::FaceA(a) => a.index(),
            SeparatingAxis::FaceB(b) => 3 + b.index(),
            SeparatingAxis::Edge(a, b) => 6 + a.index() * 3 + b.index(),
        };
        code as u32 + 1
    }

    /// True for the six face-normal axes
    pub fn is_face(self) -> bool {
        !matches!(self, SeparatingAxis::Edge(..))
    }
}

impl fmt::Display for SeparatingAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeparatingAxis::FaceA(a) => write!(f, "A.{}", a.label()),
            SeparatingAxis::FaceB(b) => write!(f, "B.{}", b.label()),
            SeparatingAxis::Edge(a, b) => write!(f, "A.{} x B.{}", a.label(), b.label()),
        }
    }
}

/// An oriented box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObbFrame {
    /// World-space center
    pub center: Vec3,
    /// Unit-length local axes in world space
    pub axes: [Vec3; 3],
    /// Half extent along each local axis
    pub half_extents: Vec3,
}

impl ObbFrame {
    /// Create a frame from explicit axes
    pub fn new(center: Vec3, axes: [Vec3; 3], half_extents: Vec3) -> Self {
        Self { center, axes, half_extents }
    }

    /// A box aligned with the world axes
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center, [Vec3::x(), Vec3::y(), Vec3::z()], half_extents)
    }

    /// Place a local-space box in the world through a model matrix
    ///
    /// The columns of the matrix's linear part give the world axes; their
    /// lengths scale the half extents. A collapsed column keeps the matching
    /// world axis with zero extent.
    pub fn from_transform(model: &Mat4, local_center: &Vec3, local_half_extents: &Vec3) -> Self {
        let basis = [Vec3::x(), Vec3::y(), Vec3::z()];
        let mut axes = basis;
        let mut half_extents = Vec3::zeros();

        for i in 0..3 {
            let column: Vec3 = model.fixed_view::<3, 1>(0, i).into_owned();
            let length = column.magnitude();
            if length > f32::EPSILON {
                axes[i] = column / length;
                half_extents[i] = local_half_extents[i] * length;
            }
        }

        Self {
            center: transform_point(model, local_center),
            axes,
            half_extents,
        }
    }

    /// Orientation of the frame as a quaternion (for visualization)
    pub fn rotation(&self) -> Quat {
        let matrix = Mat3::from_columns(&self.axes);
        Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(matrix))
    }
}

/// Run the 15-axis test of `a` against `b`
///
/// Returns `None` when no axis separates the boxes (they overlap), or the
/// first separating axis found. Faces of `a` are tried first, then faces of
/// `b`, then the edge crosses `A_i × B_j` in row-major order.
pub fn separating_axis_test(a: &ObbFrame, b: &ObbFrame) -> Option<SeparatingAxis> {
    let ea = a.half_extents;
    let eb = b.half_extents;

    let mut r = [[0.0_f32; 3]; 3];
    let mut abs_r = [[0.0_f32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = a.axes[i].dot(&b.axes[j]);
            abs_r[i][j] = r[i][j].abs() + SAT_EPSILON;
        }
    }

    let d = b.center - a.center;
    let t = [d.dot(&a.axes[0]), d.dot(&a.axes[1]), d.dot(&a.axes[2])];

    for axis in Axis::ALL {
        let i = axis.index();
        let ra = ea[i];
        let rb = eb[0] * abs_r[i][0] + eb[1] * abs_r[i][1] + eb[2] * abs_r[i][2];
        if t[i].abs() > ra + rb {
            return Some(SeparatingAxis::FaceA(axis));
        }
    }

    for axis in Axis::ALL {
        let j = axis.index();
        let ra = ea[0] * abs_r[0][j] + ea[1] * abs_r[1][j] + ea[2] * abs_r[2][j];
        let rb = eb[j];
        let distance = t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j];
        if distance.abs() > ra + rb {
            return Some(SeparatingAxis::FaceB(axis));
        }
    }

    for axis_a in Axis::ALL {
        let i = axis_a.index();
        let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
        for axis_b in Axis::ALL {
            let j = axis_b.index();
            let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);

            let ra = ea[i1] * abs_r[i2][j] + ea[i2] * abs_r[i1][j];
            let rb = eb[j1] * abs_r[i][j2] + eb[j2] * abs_r[i][j1];
            let distance = t[i2] * r[i1][j] - t[i1] * r[i2][j];
            if distance.abs() > ra + rb {
                return Some(SeparatingAxis::Edge(axis_a, axis_b));
            }
        }
    }

    None
}
