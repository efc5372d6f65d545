//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used by the simulation core,
//! the AI planner and the session layer. All types are plain data with no
//! external dependencies so a renderer or audio layer can consume them without
//! pulling in the game logic.
//!
//! # Board Dimensions
//!
//! The default playfield is 20 rows by 10 columns. Rows are indexed top to
//! bottom (`0` is the top row), columns left to right. Dimensions are chosen per
//! session and fixed for its lifetime.
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `LOCK_DELAY_MS` | 500 | Time a landed piece may rest before it locks |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per piece |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Row interval while soft dropping |
//! | `GARBAGE_TIMEOUT_MS` | 8000 | Warning period before pending garbage is injected |
//! | `WIND_INTERVAL_MS` | 500 | Interval between wind pushes |
//! | `DISORIENTED_DURATION_MS` | 10000 | Duration of the disoriented effect |
//! | `BLIND_DURATION_MS` | 10000 | Duration of the blind effect |
//!
//! # Difficulty Ramp
//!
//! Fall interval and the advanced/special probabilities are interpolated from
//! the score between fixed breakpoints:
//!
//! | Quantity | Score range | Value range |
//! |----------|-------------|-------------|
//! | fall interval | 0 → 800 | 1000ms → 166.7ms |
//! | fall interval (classic) | 0 → 800 | 1000ms → 16.7ms |
//! | advanced weight | 100 → 800 | 0 → 1/3 |
//! | special weight | 400 → 800 | 0 → 1/20 |
//!
//! # Examples
//!
//! ```
//! use tetron_types::{GameAction, Rotation, ShapeId, DEFAULT_COLUMN_COUNT, DEFAULT_ROW_COUNT};
//!
//! let shape = ShapeId::from_str("t").unwrap();
//! assert_eq!(shape, ShapeId::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(DEFAULT_ROW_COUNT, 20);
//! assert_eq!(DEFAULT_COLUMN_COUNT, 10);
//! ```

/// Default board height in rows
pub const DEFAULT_ROW_COUNT: usize = 20;

/// Default board width in columns
pub const DEFAULT_COLUMN_COUNT: usize = 10;

/// Smallest accepted board dimension (the widest catalog footprint is 5×5)
pub const MIN_BOARD_DIMENSION: usize = 5;

/// Largest accepted board dimension
pub const MAX_BOARD_DIMENSION: usize = 64;

/// Default number of entries shown in the next queue
pub const NEXT_QUEUE_LENGTH: usize = 5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u64 = 16;

/// Time a landed piece may rest before it is forced to lock
pub const LOCK_DELAY_MS: u64 = 500;

/// Maximum number of lock timer resets per piece
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Row interval while soft drop is held
pub const SOFT_DROP_INTERVAL_MS: u64 = 50;

/// Ghost and heavy pieces fall this many times faster than normal gravity
pub const FAST_FALL_DIVISOR: f64 = 2.0;

/// Maximum number of pending garbage lines per game
pub const GARBAGE_CAP: u32 = 12;

/// Time between receiving garbage and injecting it on a later lock
pub const GARBAGE_TIMEOUT_MS: u64 = 8000;

/// Extra garbage lines sent for a perfect clear
pub const PERFECT_CLEAR_ATTACK: u32 = 4;

/// Duration of the disoriented effect
pub const DISORIENTED_DURATION_MS: u64 = 10_000;

/// Duration of the blind effect
pub const BLIND_DURATION_MS: u64 = 10_000;

/// Interval between wind pushes
pub const WIND_INTERVAL_MS: u64 = 500;

/// Stage score thresholds. The last value wins the game.
pub const SCORE_THRESHOLDS: [u32; 3] = [400, 800, 1000];

/// Stage survivor thresholds. The last value wins the game.
pub const SURVIVOR_THRESHOLDS: [usize; 3] = [50, 10, 1];

/// Fall interval at the start and end of the ramp
pub const FALL_INTERVAL_RANGE_MS: (f64, f64) = (1000.0, 1000.0 / 6.0);

/// Fall interval range in classic mode
pub const CLASSIC_FALL_INTERVAL_RANGE_MS: (f64, f64) = (1000.0, 1000.0 / 60.0);

/// Score at which the difficulty ramp ends (second to last stage threshold)
pub const RAMP_END_SCORE: u32 = SCORE_THRESHOLDS[SCORE_THRESHOLDS.len() - 2];

/// Score at which the advanced-piece probability starts rising
pub const ADVANCED_RAMP_START_SCORE: u32 = 100;

/// Advanced-piece probability range
pub const ADVANCED_WEIGHT_RANGE: (f64, f64) = (0.0, 1.0 / 3.0);

/// Score at which the special-effect probability starts rising
pub const SPECIAL_RAMP_START_SCORE: u32 = SCORE_THRESHOLDS[0];

/// Special-effect probability range
pub const SPECIAL_WEIGHT_RANGE: (f64, f64) = (0.0, 1.0 / 20.0);

/// Mean of the AI decision delay
pub const AI_DELAY_MEAN_MS: f64 = 1500.0;

/// Standard deviation of the AI decision delay
pub const AI_DELAY_STD_MS: f64 = 100.0;

/// Frame score multiplier in twin mode when both players score together
pub const TWIN_SCORE_MULTIPLIER: u32 = 3;

/// Number of AI opponents in a default battle session
pub const BATTLE_OPPONENTS: usize = 98;


/// Display color family of a locked cell.
///
/// The core never draws anything; the category only tells a renderer which
/// palette entry to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
    Pink,
    /// Injected garbage and faded special blocks
    Garbage,
    Ghost,
    Heavy,
    Zombie,
}

impl ColorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCategory::Cyan => "cyan",
            ColorCategory::Blue => "blue",
            ColorCategory::Orange => "orange",
            ColorCategory::Yellow => "yellow",
            ColorCategory::Green => "green",
            ColorCategory::Purple => "purple",
            ColorCategory::Red => "red",
            ColorCategory::Pink => "pink",
            ColorCategory::Garbage => "garbage",
            ColorCategory::Ghost => "ghost",
            ColorCategory::Heavy => "heavy",
            ColorCategory::Zombie => "zombie",
        }
    }

    /// Colors that only mark a special piece and fade to garbage once the next piece locks
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ColorCategory::Ghost | ColorCategory::Heavy | ColorCategory::Zombie
        )
    }
}

/// Which T-spin corner a marker cell represents.
///
/// - **Front**: the two corners on the side the T's stem points to
/// - **Back**: the two corners on the flat side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    Front,
    Back,
}

/// A cell of the board or of a piece footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Locked(ColorCategory),
    /// Drop-shadow marker showing where the current piece would land
    Preview,
    /// T-spin corner marker; only ever present in a T footprint
    CornerMarker(Corner),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Occupied cells are the only ones that collide or get written on lock.
    pub fn is_locked(&self) -> bool {
        matches!(self, Cell::Locked(_))
    }

    /// Compact byte form used by snapshots and hashing
    pub fn as_u8(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Locked(color) => 1 + *color as u8,
            Cell::Preview => 100,
            Cell::CornerMarker(Corner::Front) => 101,
            Cell::CornerMarker(Corner::Back) => 102,
        }
    }
}

/// Kick table family a shape rotates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickFamily {
    /// J, L, S, T, Z and their variants
    Jlstz,
    /// I and its variants
    I,
    /// O and its variants: rotation happens in place only
    O,
    /// Everything else
    Other,
}

/// Every shape the generator can produce, plus the zombie marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeId {
    // Classic tetriminos
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    // Advanced shapes
    /// 1×5 bar
    I5,
    /// 1×3 bar
    I3,
    /// 3×3 J corner
    J3,
    /// 3-cell J
    J2,
    /// J with a 4-wide base
    J4,
    /// 3×3 L corner
    L3,
    /// 3-cell L
    L2,
    /// L with a 4-wide base
    L4,
    /// 2×3 block
    O6,
    /// 2×4 block
    O8,
    /// 3×3 ring
    ORing,
    /// 5-cell S
    S5,
    /// Plus sign
    TPlus,
    /// Capital T
    TCapital,
    /// 5-cell Z
    Z5,
    /// 3×3 box with five random cells, generated when it becomes active
    RandomSparse,
    /// Single cell
    Period,
    /// Two diagonal cells
    Comma,
    /// Two cells with a gap
    Colon,
    /// Four cells in two columns
    Quote,
    /// Silhouette of the empty space above the stack, generated when it becomes active
    Freebie,
    // Special markers
    /// Chunk carved out of the stack by the zombie effect
    Zombie,
}

impl ShapeId {
    /// The seven classic tetriminos
    pub const CLASSIC: [ShapeId; 7] = [
        ShapeId::I,
        ShapeId::J,
        ShapeId::L,
        ShapeId::O,
        ShapeId::S,
        ShapeId::T,
        ShapeId::Z,
    ];

    /// Advanced shapes unlocked by the difficulty ramp
    pub const ADVANCED: [ShapeId; 21] = [
        ShapeId::I5,
        ShapeId::I3,
        ShapeId::J3,
        ShapeId::J2,
        ShapeId::J4,
        ShapeId::L3,
        ShapeId::L2,
        ShapeId::L4,
        ShapeId::O6,
        ShapeId::O8,
        ShapeId::ORing,
        ShapeId::S5,
        ShapeId::TPlus,
        ShapeId::TCapital,
        ShapeId::Z5,
        ShapeId::RandomSparse,
        ShapeId::Period,
        ShapeId::Comma,
        ShapeId::Colon,
        ShapeId::Quote,
        ShapeId::Freebie,
    ];

    /// Kick table family, decided by the shape's group
    pub fn kick_family(&self) -> KickFamily {
        match self {
            ShapeId::I | ShapeId::I5 | ShapeId::I3 => KickFamily::I,
            ShapeId::O | ShapeId::O6 | ShapeId::O8 | ShapeId::ORing => KickFamily::O,
            ShapeId::J
            | ShapeId::J3
            | ShapeId::J2
            | ShapeId::J4
            | ShapeId::L
            | ShapeId::L3
            | ShapeId::L2
            | ShapeId::L4
            | ShapeId::S
            | ShapeId::S5
            | ShapeId::T
            | ShapeId::TPlus
            | ShapeId::TCapital
            | ShapeId::Z
            | ShapeId::Z5 => KickFamily::Jlstz,
            _ => KickFamily::Other,
        }
    }

    pub fn color(&self) -> ColorCategory {
        match self {
            ShapeId::I | ShapeId::I5 | ShapeId::I3 => ColorCategory::Cyan,
            ShapeId::J | ShapeId::J3 | ShapeId::J2 | ShapeId::J4 => ColorCategory::Blue,
            ShapeId::L | ShapeId::L3 | ShapeId::L2 | ShapeId::L4 => ColorCategory::Orange,
            ShapeId::O | ShapeId::O6 | ShapeId::O8 | ShapeId::ORing => ColorCategory::Yellow,
            ShapeId::S | ShapeId::S5 => ColorCategory::Green,
            ShapeId::T | ShapeId::TPlus | ShapeId::TCapital => ColorCategory::Purple,
            ShapeId::Z | ShapeId::Z5 => ColorCategory::Red,
            ShapeId::Zombie => ColorCategory::Zombie,
            _ => ColorCategory::Pink,
        }
    }

    /// Shapes whose footprint depends on state at activation time
    pub fn is_deferred(&self) -> bool {
        matches!(self, ShapeId::Freebie | ShapeId::RandomSparse)
    }

    /// Freebies never earn combo or perfect-clear bonuses
    pub fn is_scoring(&self) -> bool {
        !matches!(self, ShapeId::Freebie)
    }

    /// Parse shape from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::CLASSIC
            .iter()
            .chain(Self::ADVANCED.iter())
            .chain(std::iter::once(&ShapeId::Zombie))
            .copied()
            .find(|shape| shape.as_str() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::I => "i",
            ShapeId::J => "j",
            ShapeId::L => "l",
            ShapeId::O => "o",
            ShapeId::S => "s",
            ShapeId::T => "t",
            ShapeId::Z => "z",
            ShapeId::I5 => "i5",
            ShapeId::I3 => "i3",
            ShapeId::J3 => "j3",
            ShapeId::J2 => "j2",
            ShapeId::J4 => "j4",
            ShapeId::L3 => "l3",
            ShapeId::L2 => "l2",
            ShapeId::L4 => "l4",
            ShapeId::O6 => "o6",
            ShapeId::O8 => "o8",
            ShapeId::ORing => "oring",
            ShapeId::S5 => "s5",
            ShapeId::TPlus => "tplus",
            ShapeId::TCapital => "tcapital",
            ShapeId::Z5 => "z5",
            ShapeId::RandomSparse => "random",
            ShapeId::Period => "period",
            ShapeId::Comma => "comma",
            ShapeId::Colon => "colon",
            ShapeId::Quote => "quote",
            ShapeId::Freebie => "freebie",
            ShapeId::Zombie => "zombie",
        }
    }
}

/// Special effect attached to a spawned piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Passes through locked cells
    Ghost,
    /// Crushes the stack beneath it on lock
    Heavy,
    /// Timed: the renderer flips the playfield
    Disoriented,
    /// Timed: the renderer hides the stack colors
    Blind,
    /// Pushes the piece sideways at a fixed interval
    Wind,
    /// The piece is carved out of the stack and falls upward
    Zombie,
    /// The lock writes nothing to the board
    Fake,
}

impl Effect {
    pub const ALL: [Effect; 7] = [
        Effect::Ghost,
        Effect::Heavy,
        Effect::Disoriented,
        Effect::Blind,
        Effect::Wind,
        Effect::Zombie,
        Effect::Fake,
    ];

    /// Effects that outlive the piece they were drawn with
    pub fn is_timed(&self) -> bool {
        matches!(self, Effect::Disoriented | Effect::Blind)
    }

    /// Effects that double the fall speed
    pub fn is_fast_fall(&self) -> bool {
        matches!(self, Effect::Ghost | Effect::Heavy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Ghost => "ghost",
            Effect::Heavy => "heavy",
            Effect::Disoriented => "disoriented",
            Effect::Blind => "blind",
            Effect::Wind => "wind",
            Effect::Zombie => "zombie",
            Effect::Fake => "fake",
        }
    }
}

/// Rotation states
///
/// - **North**: Spawn orientation (0)
/// - **East**: Rotated 90° clockwise (R)
/// - **South**: Rotated 180° (2)
/// - **West**: Rotated 90° counter-clockwise (L)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetron_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Clockwise angle in degrees, always one of 0, 90, 180, 270
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::North => 0,
            Rotation::East => 90,
            Rotation::South => 180,
            Rotation::West => 270,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// T-Spin classification of the last successful rotation
///
/// - **None**: Not a T-spin
/// - **Mini**: both back corners and at least one front corner covered
/// - **Full**: both front corners and at least one back corner covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Returns `None` for `TSpinKind::None`, `Some("mini")` for Mini,
    /// and `Some("full")` for Full.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }
}

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// One human player
    #[default]
    Solo,
    /// Two human players sharing a score, hard drops in lock-step
    Twin,
    /// One human against one AI
    Versus,
    /// One human against many AIs, won by elimination
    Battle,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solo" => Some(GameMode::Solo),
            "twin" => Some(GameMode::Twin),
            "versus" | "1v1" => Some(GameMode::Versus),
            "battle" | "99" => Some(GameMode::Battle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Solo => "solo",
            GameMode::Twin => "twin",
            GameMode::Versus => "versus",
            GameMode::Battle => "battle",
        }
    }

    /// Modes whose stages and win condition follow the shared score
    pub fn is_score_driven(&self) -> bool {
        matches!(self, GameMode::Solo | GameMode::Twin)
    }
}

/// Primitive actions a human input layer or the AI planner can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Start accelerated falling
    SoftDropStart,
    /// Return to normal gravity
    SoftDropStop,
    /// Drop and lock immediately
    HardDrop,
    /// Swap with the hold slot (once per lock cycle)
    Hold,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tetron_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "softdropstart" => Some(GameAction::SoftDropStart),
            "softdropstop" => Some(GameAction::SoftDropStop),
            "harddrop" => Some(GameAction::HardDrop),
            "hold" => Some(GameAction::Hold),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::SoftDropStart => "softDropStart",
            GameAction::SoftDropStop => "softDropStop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "hold",
        }
    }
}
