use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    core::{HasBoundingBox, HasPosition, Position, Rect, Wall, WorldConfig},
    engine::DeathCause,
};

/// Which hazard a rectangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Static strip along the top edge.
    Top,
    /// Static strip along the bottom edge.
    Bottom,
    /// Upper piece of a side pair, from the top edge down to the gap.
    SideUpper(Wall),
    /// Lower piece of a side pair, from the gap down to the bottom edge.
    SideLower(Wall),
}

impl HazardKind {
    #[must_use]
    pub const fn death_cause(self) -> DeathCause {
        match self {
            Self::Top => DeathCause::TopHazard,
            Self::Bottom => DeathCause::BottomHazard,
            Self::SideUpper(wall) | Self::SideLower(wall) => DeathCause::SideHazard(wall),
        }
    }
}

/// A hazard rectangle. Touching one is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub rect: Rect,
}

impl HasPosition for Hazard {
    fn position(&self) -> Position {
        self.rect.position()
    }
}

impl HasBoundingBox for Hazard {
    fn bounding_box(&self) -> Rect {
        self.rect
    }
}

/// The pair of hazard pieces mounted on one side wall.
///
/// `top_y` is where the upper piece's spiked tip starts and `bottom_y` is
/// where the lower piece starts; the passable gap is
/// `[top_y + piece_height, bottom_y)`. The upper piece extends up to the top
/// edge of the playfield and the lower piece down to the bottom edge, so the
/// gap is the only way through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidePair {
    pub wall: Wall,
    pub x: f64,
    pub top_y: f64,
    pub bottom_y: f64,
    pub extended: bool,
}

/// Static and movable hazards of the course, plus the gap placement rule.
///
/// # Gap Placement
///
/// [`HazardField::reconfigure`] is called each time the population finishes
/// a bounce. For bounce score `s`:
///
/// ```text
/// gap_min  = agent_height * gap_min_factor
/// gap_size = max(gap_min, H / 2 - s * gap_shrink_per_point)
/// a        = 2 * piece_height
/// b        = (H - gap_size) - a
/// random_y ~ U{a..=b}                  (integer)
/// top_y    = random_y - piece_height
/// bottom_y = random_y + gap_size
/// ```
///
/// The pair on the wall being approached is extended to those positions; the
/// pair on the wall left behind is pushed off-screen by its own width so it
/// cannot be hit early.
#[derive(Debug, Clone)]
pub struct HazardField {
    width: f64,
    height: f64,
    wall_width: f64,
    piece_width: f64,
    piece_height: f64,
    gap_min: f64,
    gap_shrink_per_point: f64,
    top: Rect,
    bottom: Rect,
    pairs: [SidePair; 2],
    gap_top: f64,
    gap_size: f64,
}

impl HazardField {
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let mut this = Self {
            width: config.playfield_width,
            height: config.playfield_height,
            wall_width: config.wall_width,
            piece_width: config.hazard_piece_width,
            piece_height: config.hazard_piece_height,
            gap_min: config.gap_min(),
            gap_shrink_per_point: config.gap_shrink_per_point,
            top: Rect::new(0.0, 0.0, config.playfield_width, config.static_hazard_height),
            bottom: Rect::new(
                0.0,
                config.playfield_height - config.static_hazard_height,
                config.playfield_width,
                config.static_hazard_height,
            ),
            pairs: Wall::ALL.map(|wall| SidePair {
                wall,
                x: 0.0,
                top_y: 0.0,
                bottom_y: 0.0,
                extended: false,
            }),
            gap_top: 0.0,
            gap_size: 0.0,
        };
        this.reset_to_default();
        this
    }

    /// Restores the initial placement: gap centered, both pairs off-screen.
    pub fn reset_to_default(&mut self) {
        self.gap_size = self.gap_size_for(0);
        self.gap_top = (self.height - self.gap_size) / 2.0;
        for wall in Wall::ALL {
            self.place_pair(wall, false);
        }
    }

    /// Gap size the placement rule uses for a given bounce score.
    ///
    /// Never smaller than [`WorldConfig::gap_min`], however large the score.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn gap_size_for(&self, score: u64) -> f64 {
        let shrunk = self.height / 2.0 - score as f64 * self.gap_shrink_per_point;
        f64::max(self.gap_min, shrunk)
    }

    /// Draws a new gap and moves it to the wall being approached.
    ///
    /// `approaching` is `None` when no agent is alive; nothing changes then.
    /// Returns `true` if the field was reconfigured.
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn reconfigure<R>(&mut self, score: u64, approaching: Option<Wall>, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let Some(wall) = approaching else {
            return false;
        };

        let gap_size = self.gap_size_for(score);
        let a = self.piece_height * 2.0;
        let b = (self.height - gap_size) - a;
        let (lo, hi) = (a.ceil() as i64, b.floor() as i64);
        let random_y = if lo <= hi {
            rng.random_range(lo..=hi) as f64
        } else {
            log::warn!("gap placement range [{a}, {b}] is empty, pinning gap at {a}");
            a
        };

        self.gap_size = gap_size;
        self.gap_top = random_y;
        self.place_pair(wall, true);
        self.place_pair(wall.opposite(), false);
        log::debug!(
            "hazard gap moved to {wall:?} wall: [{random_y}, {}) at score {score}",
            random_y + gap_size
        );
        true
    }

    fn place_pair(&mut self, wall: Wall, extended: bool) {
        let x = match (wall, extended) {
            (Wall::Left, true) => self.wall_width,
            (Wall::Left, false) => -self.piece_width,
            (Wall::Right, true) => self.width - self.wall_width - self.piece_width,
            (Wall::Right, false) => self.width,
        };
        self.pairs[wall.index()] = SidePair {
            wall,
            x,
            top_y: self.gap_top - self.piece_height,
            bottom_y: self.gap_top + self.gap_size,
            extended,
        };
    }

    #[must_use]
    pub fn gap_top(&self) -> f64 {
        self.gap_top
    }

    #[must_use]
    pub fn gap_size(&self) -> f64 {
        self.gap_size
    }

    #[must_use]
    pub fn gap_min(&self) -> f64 {
        self.gap_min
    }

    #[must_use]
    pub fn pair(&self, wall: Wall) -> &SidePair {
        &self.pairs[wall.index()]
    }

    /// The wall whose pair is currently extended, if any.
    #[must_use]
    pub fn active_wall(&self) -> Option<Wall> {
        self.pairs.iter().find(|p| p.extended).map(|p| p.wall)
    }

    #[must_use]
    pub fn static_top(&self) -> Hazard {
        Hazard {
            kind: HazardKind::Top,
            rect: self.top,
        }
    }

    #[must_use]
    pub fn static_bottom(&self) -> Hazard {
        Hazard {
            kind: HazardKind::Bottom,
            rect: self.bottom,
        }
    }

    #[must_use]
    pub fn side_upper(&self, wall: Wall) -> Hazard {
        let pair = self.pair(wall);
        Hazard {
            kind: HazardKind::SideUpper(wall),
            rect: Rect::new(pair.x, 0.0, self.piece_width, pair.top_y + self.piece_height),
        }
    }

    #[must_use]
    pub fn side_lower(&self, wall: Wall) -> Hazard {
        let pair = self.pair(wall);
        Hazard {
            kind: HazardKind::SideLower(wall),
            rect: Rect::new(
                pair.x,
                pair.bottom_y,
                self.piece_width,
                self.height - pair.bottom_y,
            ),
        }
    }

    /// Every hazard rectangle: static top and bottom, then both side pairs.
    pub fn hazards(&self) -> impl Iterator<Item = Hazard> + '_ {
        [self.static_top(), self.static_bottom()]
            .into_iter()
            .chain(
                Wall::ALL
                    .into_iter()
                    .flat_map(|wall| [self.side_upper(wall), self.side_lower(wall)]),
            )
    }
}
