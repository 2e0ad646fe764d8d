/// Pitch program: inside the altitude band `(start_height, end_height)` the
/// thrust vector is tilted `pitch_angle` degrees off the velocity vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityTurn {
    pub start_height: f64, // m
    pub end_height: f64,   // m
    pub pitch_angle: f64,  // degrees
}

impl GravityTurn {
    pub fn new(start_height: f64, end_height: f64, pitch_angle: f64) -> Self {
        GravityTurn {
            start_height,
            end_height,
            pitch_angle,
        }
    }

    /// Purely vertical ascent.
    pub fn none() -> Self {
        GravityTurn::new(0.0, 0.0, 0.0)
    }

    pub fn is_active(&self, height: f64) -> bool {
        self.start_height < height && height < self.end_height
    }

    /// Thrust pitch offset in radians at `height`.
    pub fn pitch_offset(&self, height: f64) -> f64 {
        if self.is_active(height) {
            self.pitch_angle.to_radians()
        } else {
            0.0
        }
    }
}

impl Default for GravityTurn {
    fn default() -> Self {
        GravityTurn::none()
    }
}
