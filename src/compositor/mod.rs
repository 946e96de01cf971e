//! Frame orchestration: resolve the pass list, draw passes leaves first, composite the root.

pub(crate) mod frame;
pub(crate) mod lower;
pub(crate) mod occlusion;
pub(crate) mod resolve;

use std::collections::HashMap;
use std::sync::Arc;

use crate::compositor::frame::{FrameOutput, FrameRequest, FrameState, FrameStats};
use crate::compositor::lower::{Lowering, PassBuffer, draw_quad};
use crate::compositor::occlusion::visible_quads;
use crate::compositor::resolve::resolve;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::ids::{RenderPassId, ResourceId};
use crate::geometry::rect::{Offset, RectI, Size};
use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend};
use crate::render::settings::RenderSettings;
use crate::render::surface::Surface;
use crate::resource::provider::{
    ResourceFormat, ResourceProvider, SharedResourceProvider, TextureUsage,
};
use crate::scene::pass::RenderPass;

/// Draws pass lists into pixels with an injected backend.
///
/// A frame either completes or fails as a whole: on failure no pixels are returned and every
/// intermediate buffer the frame allocated is released.
pub struct Compositor {
    backend: Box<dyn RenderBackend>,
    resources: SharedResourceProvider,
    settings: RenderSettings,
    state: FrameState,
    trace: Vec<FrameState>,
    margin_override: Option<Offset>,
}

#[derive(Clone, Copy, Debug, Default)]
struct PassCounts {
    drawn: u32,
    culled: u32,
}

impl Compositor {
    pub fn new(
        backend: Box<dyn RenderBackend>,
        resources: SharedResourceProvider,
        settings: RenderSettings,
    ) -> Self {
        Self {
            backend,
            resources,
            settings,
            state: FrameState::Idle,
            trace: Vec::new(),
            margin_override: None,
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn resources(&self) -> &SharedResourceProvider {
        &self.resources
    }

    /// State reached by the most recent frame (`Idle` before the first one).
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Every state the most recent frame went through, in order.
    pub fn last_trace(&self) -> &[FrameState] {
        &self.trace
    }

    /// Override the intermediate buffer margin per axis. Output must not change.
    pub fn set_enlarge_pass_texture_amount_for_testing(&mut self, amount: Offset) {
        self.margin_override = Some(Offset::new(amount.x.max(0), amount.y.max(0)));
    }

    fn enter(&mut self, state: FrameState) {
        tracing::debug!(%state, "frame state");
        self.state = state;
        self.trace.push(state);
    }

    fn margin(&self) -> TesseraResult<Offset> {
        if let Some(m) = self.margin_override {
            return Ok(m);
        }
        let m = i32::try_from(self.settings.pass_margin).map_err(|_| {
            TesseraError::validation(format!(
                "pass margin {} is too large",
                self.settings.pass_margin
            ))
        })?;
        Ok(Offset::new(m, m))
    }

    fn check_target(&self, size: Size) -> TesseraResult<()> {
        let max = self.backend.caps().max_texture_size;
        if size.width > max || size.height > max {
            return Err(TesseraError::backend_unavailable(format!(
                "{}x{} target exceeds the {max} px limit of the {:?} backend",
                size.width,
                size.height,
                self.backend.kind()
            )));
        }
        Ok(())
    }

    /// Render one frame.
    #[tracing::instrument(skip(self, request), fields(root = %request.root, backend = ?self.backend.kind()))]
    pub fn draw_frame(&mut self, request: &FrameRequest) -> TesseraResult<FrameOutput> {
        self.trace.clear();
        let resources = Arc::clone(&self.resources);
        let mut provider = resources.write();
        let mut allocated = Vec::new();
        let result = self.run(&mut provider, request, &mut allocated);
        for id in allocated {
            if let Err(e) = provider.delete_resource(id) {
                tracing::warn!(%id, error = %e, "failed to release pass buffer");
            }
        }
        match &result {
            Ok(out) => {
                tracing::debug!(
                    passes = out.stats.passes_drawn,
                    quads = out.stats.quads_drawn,
                    culled = out.stats.quads_culled,
                    "frame done"
                );
                self.enter(FrameState::Done);
            }
            Err(e) => {
                tracing::debug!(error = %e, "frame failed");
                self.enter(FrameState::Failed);
            }
        }
        result
    }

    fn run(
        &mut self,
        provider: &mut ResourceProvider,
        request: &FrameRequest,
        allocated: &mut Vec<ResourceId>,
    ) -> TesseraResult<FrameOutput> {
        self.enter(FrameState::Resolving);
        let resolved = resolve(request, provider)?;
        let margin = self.margin()?;
        let passes = &request.passes;
        let mut stats = FrameStats::default();
        let mut buffers: HashMap<RenderPassId, PassBuffer> = HashMap::new();

        for &i in resolved.draw_order.iter().filter(|&&i| i != resolved.root) {
            let pass = &passes[i];
            self.enter(FrameState::Drawing(pass.id));
            let out = pass.output_rect;
            let size = buffer_size(out, margin)?;
            self.check_target(size)?;
            let id = provider.create_resource(size, ResourceFormat::Rgba8, TextureUsage::Framebuffer)?;
            allocated.push(id);
            stats.intermediate_bytes += size.area() * 4;

            let (_, pixels) = provider.take_framebuffer(id)?;
            let mut surface = Surface::from_pixels(size.width, size.height, pixels)?;
            surface.clear([0; 4]);
            let origin = pass_origin(out, margin)?;
            let drawn = self.draw_pass(provider, &buffers, pass, &mut surface, origin);
            provider.restore_framebuffer(id, surface.data)?;
            let counts = drawn?;

            self.enter(FrameState::Compositing(pass.id));
            stats.passes_drawn += 1;
            stats.quads_drawn += counts.drawn;
            stats.quads_culled += counts.culled;
            buffers.insert(
                pass.id,
                PassBuffer {
                    resource: id,
                    content: RectI::new(margin.x, margin.y, out.width, out.height),
                },
            );
        }

        let root = &passes[resolved.root];
        self.enter(FrameState::Drawing(root.id));
        let (surface_size, offset) = match request.expanded_viewport {
            Some(e) => (e.surface_size, e.offset),
            None => (request.viewport, Offset::default()),
        };
        self.check_target(surface_size)?;
        let mut surface = Surface::new(surface_size.width, surface_size.height)?;
        if !root.has_transparent_background {
            surface.clear(self.settings.root_clear_premul());
        }
        let origin = offset.checked_neg().ok_or_else(|| {
            TesseraError::out_of_bounds(format!("root offset {offset:?} cannot be negated"))
        })?;
        let counts = self.draw_pass(provider, &buffers, root, &mut surface, origin)?;
        self.enter(FrameState::Compositing(root.id));
        stats.passes_drawn += 1;
        stats.quads_drawn += counts.drawn;
        stats.quads_culled += counts.culled;

        let frame = if request.expanded_viewport.is_some() {
            surface.crop(RectI::from_size(request.viewport).offset(offset))?
        } else {
            surface
        };
        let frame = FrameRGBA::from_surface(frame);

        let readback = match resolved.readback {
            None => None,
            Some(i) if i == resolved.root => Some(frame.clone()),
            Some(i) => {
                let pass = &passes[i];
                let buffer = buffers.get(&pass.id).ok_or_else(|| {
                    TesseraError::validation(format!("readback pass {} was not drawn", pass.id))
                })?;
                Some(FrameRGBA {
                    width: buffer.content.width as u32,
                    height: buffer.content.height as u32,
                    data: provider.read_pixels(buffer.resource, buffer.content)?,
                    premultiplied: true,
                })
            }
        };

        Ok(FrameOutput {
            frame,
            readback,
            stats,
        })
    }

    /// Draw the quads of `pass` into `target`, back to front.
    fn draw_pass(
        &mut self,
        provider: &ResourceProvider,
        buffers: &HashMap<RenderPassId, PassBuffer>,
        pass: &RenderPass,
        target: &mut Surface,
        origin: Offset,
    ) -> TesseraResult<PassCounts> {
        let keep = if self.settings.occlusion_culling {
            visible_quads(pass)
        } else {
            vec![true; pass.quad_list.len()]
        };
        let mut cx = Lowering {
            backend: self.backend.as_mut(),
            provider,
            buffers,
        };
        let mut counts = PassCounts::default();
        for (index, keep) in keep.into_iter().enumerate() {
            if !keep {
                counts.culled += 1;
                continue;
            }
            if draw_quad(&mut cx, pass, index, target, origin)? {
                counts.drawn += 1;
            }
        }
        Ok(counts)
    }
}

/// Device position of a pass buffer's top-left texel.
fn pass_origin(output: RectI, margin: Offset) -> TesseraResult<Offset> {
    match (output.x.checked_sub(margin.x), output.y.checked_sub(margin.y)) {
        (Some(x), Some(y)) => Ok(Offset::new(x, y)),
        _ => Err(TesseraError::out_of_bounds(format!(
            "pass buffer origin for {output:?} with margin {margin:?} overflows"
        ))),
    }
}

fn buffer_size(output: RectI, margin: Offset) -> TesseraResult<Size> {
    let grow = |len: i32, m: i32| {
        m.checked_mul(2)
            .and_then(|m2| len.checked_add(m2))
            .and_then(|v| u32::try_from(v).ok())
    };
    match (grow(output.width, margin.x), grow(output.height, margin.y)) {
        (Some(w), Some(h)) => Ok(Size::new(w, h)),
        _ => Err(TesseraError::allocation(format!(
            "pass buffer for {output:?} with margin {margin:?} overflows"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/mod.rs"]
mod tests;
