use rand::Rng;

/// Circle described by its center and radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    /// Closed test; points on the circumference are inside.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.radius * 2.0, self.radius * 2.0)
    }
}

/// Axis-aligned rectangle. `x`/`y` is the center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_left_top(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left + width / 2.0, top + height / 2.0, width, height)
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Squared distance from the point to the closest point of the rectangle.
    pub fn squared_distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = (x - self.x).abs() - self.width / 2.0;
        let dy = (y - self.y).abs() - self.height / 2.0;
        f32::max(dx, 0.0).powi(2) + f32::max(dy, 0.0).powi(2)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Random point inside the rectangle, kept `margin` away from every edge.
    /// Collapses onto the left/top edge when the margin does not fit.
    pub fn random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> (f32, f32) {
        (
            safe_randf32(rng, self.left() + margin, self.right() - margin),
            safe_randf32(rng, self.top() + margin, self.bottom() - margin),
        )
    }
}

fn safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Query shapes shared by the quadtree and its callers.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeEnum {
    Circle(Circle),
    Rectangle(Rectangle),
}

impl ShapeEnum {
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        match self {
            ShapeEnum::Circle(circle) => circle.contains_point(x, y),
            ShapeEnum::Rectangle(rectangle) => rectangle.contains_point(x, y),
        }
    }

    pub fn bounding_box(&self) -> Rectangle {
        match self {
            ShapeEnum::Circle(circle) => circle.bounding_box(),
            ShapeEnum::Rectangle(rectangle) => *rectangle,
        }
    }
}
