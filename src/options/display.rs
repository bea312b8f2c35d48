use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Surface colors and shading for the demo rasterizer.
pub struct DisplayOptions {
    /// Clear color behind the model (linear RGB).
    #[schemars(skip)]
    pub background_color: [f32; 3],
    /// Base color of loaded meshes (linear RGB).
    #[schemars(skip)]
    pub model_color: [f32; 3],
    /// Ambient light floor applied to every face.
    #[schemars(
        title = "Ambient",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.05)
    )]
    pub ambient: f32,
    /// Light from the eye position instead of a fixed world direction.
    #[schemars(title = "Headlight")]
    pub headlight: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0],
            model_color: [0.8, 0.8, 0.8],
            ambient: 0.25,
            headlight: true,
        }
    }
}

impl DisplayOptions {
    /// Background as a wgpu-ready `[r, g, b, a]` quadruple.
    #[must_use]
    pub fn clear_color(&self) -> [f64; 4] {
        let [r, g, b] = self.background_color;
        [f64::from(r), f64::from(g), f64::from(b), 1.0]
    }
}
