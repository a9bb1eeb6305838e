//! Widget kinds, size classes and the placed widget record.
//!
//! Kind → supported sizes and size → cell footprint are static lookup tables indexed by the
//! enum discriminant. The serde tags are the camelCase names already present in persisted blobs.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::position::{CellRect, Position};

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

/// Opaque, unique widget identity. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Size classes
// ────────────────────────────────────────────────────────────────────────────

/// Footprint of a widget in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSize {
    pub width: usize,
    pub height: usize,
}

impl CellSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn area(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeClass {
    Small,
    MediumHorizontal,
    MediumVertical,
    Large,
    ExtraLarge,
}

/// Indexed by `SizeClass as usize`.
const CELL_SIZES: [CellSize; 5] = [
    CellSize::new(1, 1), // Small
    CellSize::new(2, 1), // MediumHorizontal
    CellSize::new(1, 2), // MediumVertical
    CellSize::new(2, 2), // Large
    CellSize::new(3, 2), // ExtraLarge
];

impl SizeClass {
    pub const ALL: [SizeClass; 5] = [
        SizeClass::Small,
        SizeClass::MediumHorizontal,
        SizeClass::MediumVertical,
        SizeClass::Large,
        SizeClass::ExtraLarge,
    ];

    pub const fn cells(self) -> CellSize {
        CELL_SIZES[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::MediumHorizontal => "mediumHorizontal",
            SizeClass::MediumVertical => "mediumVertical",
            SizeClass::Large => "large",
            SizeClass::ExtraLarge => "extraLarge",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Widget kinds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    GForceDot,
    Speedometer,
    SpeedGauge,
    Seismograph,
    UnitToggle,
}

/// Indexed by `WidgetKind as usize`. The first entry is the default size for a new widget.
const SUPPORTED_SIZES: [&[SizeClass]; 5] = [
    &[SizeClass::MediumHorizontal, SizeClass::Large], // GForceDot
    &[SizeClass::Large, SizeClass::ExtraLarge],       // Speedometer
    &[SizeClass::Small, SizeClass::MediumHorizontal], // SpeedGauge
    &[
        SizeClass::MediumVertical,
        SizeClass::Large,
        SizeClass::ExtraLarge,
    ], // Seismograph
    &[SizeClass::MediumHorizontal],                   // UnitToggle
];

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::GForceDot,
        WidgetKind::Speedometer,
        WidgetKind::SpeedGauge,
        WidgetKind::Seismograph,
        WidgetKind::UnitToggle,
    ];

    /// Sizes this kind can be shown at, in preference order. Never empty.
    pub const fn supported_sizes(self) -> &'static [SizeClass] {
        SUPPORTED_SIZES[self as usize]
    }

    pub fn default_size(self) -> SizeClass {
        self.supported_sizes()[0]
    }

    pub fn supports(self, size: SizeClass) -> bool {
        self.supported_sizes().contains(&size)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::GForceDot => "gForceDot",
            WidgetKind::Speedometer => "speedometer",
            WidgetKind::SpeedGauge => "speedGauge",
            WidgetKind::Seismograph => "seismograph",
            WidgetKind::UnitToggle => "unitToggle",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-widget theme override. Resolving it to colours is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetTheme {
    BmwLeather,
    RacingFlat,
    HighContrast,
}

// ────────────────────────────────────────────────────────────────────────────
// Placed widget
// ────────────────────────────────────────────────────────────────────────────

/// A widget placed on the grid. Only the layout engine mutates `size` and `position`;
/// callers receive borrowed or cloned snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub size: SizeClass,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<WidgetTheme>,
}

impl Widget {
    pub fn cells(&self) -> CellSize {
        self.size.cells()
    }

    pub fn rect(&self) -> CellRect {
        CellRect::at(self.position, self.cells())
    }

    /// Copy of this widget at another position (identity, kind, size and theme unchanged).
    pub fn with_position(&self, position: Position) -> Widget {
        Widget {
            position,
            ..self.clone()
        }
    }
}
