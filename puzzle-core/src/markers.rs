//! Dot-to-dot marker points and the board they are edited on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PuzzleError, PuzzleResult};

/// Stable handle for a marker, independent of its position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(Uuid);

impl MarkerId {
    /// Create a new unique marker ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A numbered dot, in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    /// Drag handle.
    #[serde(default)]
    pub id: MarkerId,
    /// X position (pixels from left of the board).
    pub x: f32,
    /// Y position (pixels from top of the board).
    pub y: f32,
}

impl MarkerPoint {
    /// Create a marker at a position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            id: MarkerId::new(),
            x,
            y,
        }
    }

    fn distance_sq(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx.mul_add(dx, dy * dy)
    }
}

/// Interactive editing surface for dot-to-dot markers.
///
/// Sequence order is numbering order: the first marker is dot 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerBoard {
    /// Board width in pixels.
    pub width: f32,
    /// Board height in pixels.
    pub height: f32,
    #[serde(default)]
    markers: Vec<MarkerPoint>,
}

impl MarkerBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            markers: Vec::new(),
        }
    }

    /// Append a marker at a point, clamped to the board.
    pub fn add(&mut self, x: f32, y: f32) -> MarkerId {
        let marker = MarkerPoint::new(x.clamp(0.0, self.width), y.clamp(0.0, self.height));
        let id = marker.id;
        self.markers.push(marker);
        tracing::trace!("Marker {} added at ({}, {})", self.markers.len(), marker.x, marker.y);
        id
    }

    /// Find the topmost marker within `radius` of a point.
    ///
    /// Later markers are drawn on top, so they win ties.
    #[must_use]
    pub fn marker_at(&self, x: f32, y: f32, radius: f32) -> Option<MarkerId> {
        let limit = radius * radius;
        self.markers
            .iter()
            .rev()
            .filter(|m| m.distance_sq(x, y) <= limit)
            .min_by(|a, b| a.distance_sq(x, y).total_cmp(&b.distance_sq(x, y)))
            .map(|m| m.id)
    }

    /// Move a marker to a new position, clamped to the board.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker is not on the board.
    pub fn drag(&mut self, id: MarkerId, x: f32, y: f32) -> PuzzleResult<()> {
        let (width, height) = (self.width, self.height);
        let marker = self
            .markers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PuzzleError::MarkerNotFound(id.to_string()))?;
        marker.x = x.clamp(0.0, width);
        marker.y = y.clamp(0.0, height);
        Ok(())
    }

    /// Remove a marker; later markers are renumbered.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker is not on the board.
    pub fn remove(&mut self, id: MarkerId) -> PuzzleResult<MarkerPoint> {
        let index = self
            .position(id)
            .ok_or_else(|| PuzzleError::MarkerNotFound(id.to_string()))?;
        Ok(self.markers.remove(index))
    }

    /// Move a marker to a new place in the numbering sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker is missing or `new_index` is past the end.
    pub fn reorder(&mut self, id: MarkerId, new_index: usize) -> PuzzleResult<()> {
        if new_index >= self.markers.len() {
            return Err(PuzzleError::InvalidMarker(format!(
                "index {new_index} out of range for {} markers",
                self.markers.len()
            )));
        }
        let index = self
            .position(id)
            .ok_or_else(|| PuzzleError::MarkerNotFound(id.to_string()))?;
        let marker = self.markers.remove(index);
        self.markers.insert(new_index, marker);
        Ok(())
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// 1-based dot number of a marker.
    #[must_use]
    pub fn number_of(&self, id: MarkerId) -> Option<usize> {
        self.position(id).map(|i| i + 1)
    }

    /// Markers in numbering order.
    #[must_use]
    pub fn markers(&self) -> &[MarkerPoint] {
        &self.markers
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the board has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn position(&self, id: MarkerId) -> Option<usize> {
        self.markers.iter().position(|m| m.id == id)
    }
}
