//! Island land maps and their generation.
//!
//! A [`LandMap`] is what a game is built from: the grid bounds plus one
//! [`LandCell`] per land position, carrying the initial soil moisture and
//! temperature readings for that cell. Cells absent from the map are water.
//!
//! [`IslandGenerator`] produces a bean-shaped island at a random size and
//! position inside the grid. The outline is the polar curve
//! `r = 1 + e * sin(theta)` with its vertical axis squashed, normalised to
//! the unit square, scaled by a random factor, and rasterised by sampling
//! each cell centre on an evenly spaced lattice over `[0, 1]`.

use farmit_types::GridCoord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::grid::GridBounds;

/// Names of the layers a generated map carries, in storage order.
pub const MAP_LAYERS: [&str; 3] = ["mask", "soil_moisture", "soil_temperature"];

/// Number of vertices used to sample the bean outline when computing its
/// bounding box.
const OUTLINE_SAMPLES: u32 = 240;

/// Horizontal offset of the bean outline relative to its radius.
const OUTLINE_X_OFFSET: f64 = 0.15;

/// One land cell of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandCell {
    /// Grid position.
    pub coord: GridCoord,
    /// Climate zone id.
    pub zone_id: u32,
    /// Initial soil moisture.
    pub humidity: f64,
    /// Initial soil temperature.
    pub temperature: f64,
    /// Whether the cell starts as woodland.
    pub forest: bool,
}

/// Land cells of a grid, in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandMap {
    bounds: GridBounds,
    cells: Vec<LandCell>,
}

impl LandMap {
    /// Build a map from row-major layers covering the whole grid.
    ///
    /// Every layer must have exactly `rows * cols` entries. Cells where
    /// `mask` is `false` are water and their readings are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LayerShape`] if a layer has the wrong length.
    pub fn from_layers(
        bounds: GridBounds,
        zone_id: u32,
        mask: &[bool],
        humidity: &[f64],
        temperature: &[f64],
    ) -> Result<Self, WorldError> {
        let expected = bounds.cell_count();
        for actual in [mask.len(), humidity.len(), temperature.len()] {
            if actual != expected {
                return Err(WorldError::LayerShape { expected, actual });
            }
        }
        let cells = bounds
            .coords()
            .zip(mask.iter().zip(humidity.iter().zip(temperature)))
            .filter(|&(_, (&land, _))| land)
            .map(|(coord, (_, (&humidity, &temperature)))| LandCell {
                coord,
                zone_id,
                humidity,
                temperature,
                forest: false,
            })
            .collect();
        Ok(Self { bounds, cells })
    }

    /// Build a map where every cell is land with the same readings.
    pub fn uniform(bounds: GridBounds, zone_id: u32, humidity: f64, temperature: f64) -> Self {
        let cells = bounds
            .coords()
            .map(|coord| LandCell {
                coord,
                zone_id,
                humidity,
                temperature,
                forest: false,
            })
            .collect();
        Self { bounds, cells }
    }

    /// Mark the given coordinates as forest. Water coordinates are ignored.
    #[must_use]
    pub fn with_forests(mut self, forests: &[GridCoord]) -> Self {
        for cell in &mut self.cells {
            if forests.contains(&cell.coord) {
                cell.forest = true;
            }
        }
        self
    }

    /// Grid dimensions.
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Land cells in row-major order.
    pub fn cells(&self) -> &[LandCell] {
        &self.cells
    }

    /// Number of land cells.
    pub fn land_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether `coord` is land.
    pub fn is_land(&self, coord: GridCoord) -> bool {
        self.cells.iter().any(|c| c.coord == coord)
    }
}

/// Anything that can produce the land map for a new game.
pub trait MapSource {
    /// Produce the map for the next game.
    fn land_map(&mut self) -> Result<LandMap, WorldError>;
}

impl MapSource for LandMap {
    fn land_map(&mut self) -> Result<LandMap, WorldError> {
        Ok(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Island generation
// ---------------------------------------------------------------------------

/// Parameters of the bean-shaped island generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IslandParams {
    /// Grid height.
    pub rows: u32,
    /// Grid width.
    pub cols: u32,
    /// Smallest island size as a fraction of the grid.
    pub scale_min: f64,
    /// Largest island size as a fraction of the grid.
    pub scale_max: f64,
    /// Outline asymmetry (bulge).
    pub eccentricity: f64,
    /// Vertical squash of the outline.
    pub squash: f64,
    /// Zone id given to every generated cell.
    pub zone_id: u32,
    /// Mean initial soil moisture.
    pub humidity: f64,
    /// Mean initial soil temperature.
    pub temperature: f64,
    /// Maximum random deviation applied to each initial reading.
    pub jitter: f64,
    /// Probability that a land cell starts as forest.
    pub forest_ratio: f64,
}

impl Default for IslandParams {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 40,
            scale_min: 0.2,
            scale_max: 0.4,
            eccentricity: 0.35,
            squash: 0.75,
            zone_id: 1,
            humidity: 0.3,
            temperature: 15.0,
            jitter: 0.05,
            forest_ratio: 0.1,
        }
    }
}

impl IslandParams {
    fn validate(&self) -> Result<GridBounds, WorldError> {
        let bounds = GridBounds::new(self.rows, self.cols)?;
        let invalid = |reason: &str| {
            Err(WorldError::InvalidIsland {
                reason: reason.to_owned(),
            })
        };
        if !(self.scale_min > 0.0 && self.scale_min <= self.scale_max && self.scale_max <= 1.0) {
            return invalid("scale range must satisfy 0 < scale_min <= scale_max <= 1");
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return invalid("eccentricity must be in [0, 1)");
        }
        if self.squash <= 0.0 {
            return invalid("squash must be positive");
        }
        if !(0.0..=1.0).contains(&self.forest_ratio) {
            return invalid("forest_ratio must be in [0, 1]");
        }
        if !(self.jitter >= 0.0 && self.jitter.is_finite()) {
            return invalid("jitter must be a non-negative number");
        }
        Ok(bounds)
    }
}

/// Axis-aligned bounding box of the un-normalised outline.
#[derive(Debug, Clone, Copy)]
struct Outline {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
}

/// Seeded generator of bean-shaped islands.
#[derive(Debug, Clone)]
pub struct IslandGenerator {
    params: IslandParams,
    bounds: GridBounds,
    rng: StdRng,
}

impl IslandGenerator {
    /// Create a generator. With a seed, the sequence of islands is
    /// reproducible; without one, the generator is seeded from the OS.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] or
    /// [`WorldError::InvalidIsland`] if the parameters are out of range.
    pub fn new(params: IslandParams, seed: Option<u64>) -> Result<Self, WorldError> {
        let bounds = params.validate()?;
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Ok(Self {
            params,
            bounds,
            rng,
        })
    }

    /// Generate one island.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidIsland`] if the island ends up covering
    /// no cell of the grid.
    pub fn generate(&mut self) -> Result<LandMap, WorldError> {
        let p = self.params;
        let outline = self.outline();
        let scale = self.rng.random_range(p.scale_min..=p.scale_max);
        let max_offset = 1.0 - scale;
        let cx = self.rng.random_range(0.0..=max_offset);
        let cy = self.rng.random_range(0.0..=max_offset);

        let mut cells = Vec::new();
        for coord in self.bounds.coords() {
            let x = lattice(coord.col, self.bounds.cols());
            // Row 0 is the top of the map.
            let y = 1.0 - lattice(coord.row, self.bounds.rows());
            if !self.contains(outline, (x - cx) / scale, (y - cy) / scale) {
                continue;
            }
            let humidity = (p.humidity + self.jitter()).max(0.0);
            let temperature = p.temperature + self.jitter();
            let forest = self.rng.random_bool(p.forest_ratio);
            cells.push(LandCell {
                coord,
                zone_id: p.zone_id,
                humidity,
                temperature,
                forest,
            });
        }

        if cells.is_empty() {
            return Err(WorldError::InvalidIsland {
                reason: "island does not cover any grid cell".to_owned(),
            });
        }
        debug!(
            rows = self.bounds.rows(),
            cols = self.bounds.cols(),
            scale,
            land_cells = cells.len(),
            "island generated"
        );
        Ok(LandMap {
            bounds: self.bounds,
            cells,
        })
    }

    fn jitter(&mut self) -> f64 {
        let j = self.params.jitter;
        self.rng.random_range(-j..=j)
    }

    /// Point on the raw outline at angle `theta`.
    fn outline_point(&self, theta: f64) -> (f64, f64) {
        let r = theta.sin().mul_add(self.params.eccentricity, 1.0);
        (
            r.mul_add(theta.cos(), OUTLINE_X_OFFSET),
            self.params.squash * r * theta.sin(),
        )
    }

    fn outline(&self) -> Outline {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for k in 0..OUTLINE_SAMPLES {
            let theta = std::f64::consts::TAU * f64::from(k) / f64::from(OUTLINE_SAMPLES);
            let (x, y) = self.outline_point(theta);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        Outline {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Whether the normalised point `(u, v)` lies inside the outline.
    fn contains(&self, outline: Outline, u: f64, v: f64) -> bool {
        if !((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)) {
            return false;
        }
        let x = u.mul_add(outline.width, outline.min_x) - OUTLINE_X_OFFSET;
        let y = v.mul_add(outline.height, outline.min_y) / self.params.squash;
        let theta = y.atan2(x);
        x.hypot(y) < theta.sin().mul_add(self.params.eccentricity, 1.0)
    }
}

impl MapSource for IslandGenerator {
    fn land_map(&mut self) -> Result<LandMap, WorldError> {
        self.generate()
    }
}

/// Position of sample `index` on an evenly spaced lattice of `count` points
/// spanning `[0, 1]`.
fn lattice(index: u32, count: u32) -> f64 {
    match count.checked_sub(1) {
        Some(last) if last > 0 => f64::from(index) / f64::from(last),
        _ => 0.0,
    }
}
