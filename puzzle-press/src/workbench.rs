//! One generation from request to saved output.
//!
//! ```text
//! generate(request, style)
//!   ├─ gate      (Busy if another generation runs)
//!   ├─ fetch     (failure ⇒ nothing to render)
//!   ├─ fonts     (await provisioning)
//!   ├─ compose   (synchronous drawing)
//!   └─ emit      (one save at a time)
//! ```
//!
//! Render and sink failures are alerted before they are returned. The gate
//! is released on every exit path.

use std::path::PathBuf;
use std::sync::Arc;

use puzzle_core::{GenerationRequest, PuzzleKind, PuzzlePayload, StyleParameters};
use puzzle_renderer::compose::dot_to_dot::render_preview;
use puzzle_renderer::export::file_base;
use puzzle_renderer::PuzzleComposer;

use crate::emit::{Emitter, Notifier};
use crate::error::PressResult;
use crate::gate::LoadingGate;
use crate::source::PuzzleSource;

/// Result of a generation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No data, or data with nothing to draw.
    NothingToRender,
    /// Output was written.
    Emitted {
        /// Kind of puzzle emitted.
        kind: PuzzleKind,
        /// Written paths in emission order.
        paths: Vec<PathBuf>,
    },
}

/// Orchestrates fetching, composing and emitting.
pub struct Workbench {
    source: Arc<dyn PuzzleSource>,
    composer: PuzzleComposer,
    emitter: Emitter,
    notifier: Arc<dyn Notifier>,
    gate: LoadingGate,
}

impl Workbench {
    /// Create a workbench with its own loading gate.
    #[must_use]
    pub fn new(
        source: Arc<dyn PuzzleSource>,
        composer: PuzzleComposer,
        emitter: Emitter,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            composer,
            emitter,
            notifier,
            gate: LoadingGate::new(),
        }
    }

    /// Share an existing loading gate.
    #[must_use]
    pub fn with_gate(mut self, gate: LoadingGate) -> Self {
        self.gate = gate;
        self
    }

    /// The loading gate.
    #[must_use]
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// Fetch, compose and emit one request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PressError::Busy`] while another generation runs,
    /// or the render/sink failure that stopped this one.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        style: &StyleParameters,
    ) -> PressResult<Outcome> {
        let _guard = self.gate.try_acquire()?;
        let Some(payload) = self.fetch(request).await else {
            return Ok(Outcome::NothingToRender);
        };
        self.render(&payload, style).await
    }

    /// Compose and emit a payload already at hand, such as a marker board
    /// edited locally.
    ///
    /// # Errors
    ///
    /// As [`Self::generate`].
    pub async fn generate_from(
        &self,
        payload: &PuzzlePayload,
        style: &StyleParameters,
    ) -> PressResult<Outcome> {
        let _guard = self.gate.try_acquire()?;
        self.render(payload, style).await
    }

    /// Save the interactive preview of a dot-to-dot request's board.
    ///
    /// Other kinds have no preview.
    ///
    /// # Errors
    ///
    /// As [`Self::generate`].
    pub async fn preview(
        &self,
        request: &GenerationRequest,
        style: &StyleParameters,
        background: Option<&str>,
    ) -> PressResult<Outcome> {
        let _guard = self.gate.try_acquire()?;
        let Some(PuzzlePayload::DotToDot(puzzle)) = self.fetch(request).await else {
            tracing::info!("Only dot-to-dot puzzles have a preview");
            return Ok(Outcome::NothingToRender);
        };

        let result = async {
            let fonts = self
                .composer
                .provisioner()
                .ensure_fonts_ready([style.font_family.as_str()])
                .await;
            let preview = render_preview(
                &puzzle.board,
                &fonts,
                style.font_family.as_str(),
                background,
            )?;
            let name = format!("{}_preview.png", file_base(style, PuzzleKind::DotToDot));
            let path = self.emitter.sink().save_file(&name, preview.png).await?;
            Ok(Outcome::Emitted {
                kind: PuzzleKind::DotToDot,
                paths: vec![path],
            })
        }
        .await;
        self.alert_on_error(PuzzleKind::DotToDot, result)
    }

    async fn fetch(&self, request: &GenerationRequest) -> Option<PuzzlePayload> {
        match self.source.fetch(request).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("No {} data: {e}", request.kind);
                None
            }
        }
    }

    async fn render(&self, payload: &PuzzlePayload, style: &StyleParameters) -> PressResult<Outcome> {
        let kind = payload.kind();
        let result = async {
            let Some(artifact) = self.composer.compose(payload, style).await? else {
                return Ok(Outcome::NothingToRender);
            };
            tracing::debug!("Composed {kind}: {} output units", artifact.unit_count());
            let paths = self.emitter.emit(&artifact).await?;
            Ok(Outcome::Emitted { kind, paths })
        }
        .await;
        self.alert_on_error(kind, result)
    }

    fn alert_on_error(&self, kind: PuzzleKind, result: PressResult<Outcome>) -> PressResult<Outcome> {
        if let Err(e) = &result {
            self.notifier.alert(&format!("Could not generate {kind}: {e}"));
        }
        result
    }
}
