//! Pass list validation and dependency ordering.

use std::collections::{HashMap, HashSet};

use crate::compositor::frame::FrameRequest;
use crate::foundation::error::{SceneError, TesseraError, TesseraResult};
use crate::foundation::ids::RenderPassId;
use crate::geometry::rect::RectI;
use crate::resource::provider::ResourceProvider;
use crate::scene::pass::RenderPass;
use crate::scene::quad::QuadMaterial;

/// The passes a frame will draw, in list order, with the root last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ResolvedFrame {
    /// Indices into the request's pass list.
    pub(crate) draw_order: Vec<usize>,
    pub(crate) root: usize,
    pub(crate) readback: Option<usize>,
}

fn geometry(msg: impl Into<String>) -> TesseraError {
    SceneError::InvalidGeometry(msg.into()).into()
}

/// Check every structural invariant of `request` and pick the passes to draw.
///
/// Only passes reachable from the root (plus the readback pass and whatever it reaches) are
/// drawn. Resource ids are checked against `provider` for those passes only.
pub(crate) fn resolve(
    request: &FrameRequest,
    provider: &ResourceProvider,
) -> TesseraResult<ResolvedFrame> {
    let passes = &request.passes;
    if passes.is_empty() {
        return Err(SceneError::EmptyPassList.into());
    }
    if request.viewport.is_empty() {
        return Err(geometry(format!(
            "viewport {}x{} has zero area",
            request.viewport.width, request.viewport.height
        )));
    }
    if let Some(expanded) = request.expanded_viewport {
        let surface = RectI::from_size(expanded.surface_size);
        let viewport = RectI::from_size(request.viewport)
            .checked_offset(expanded.offset)
            .ok_or_else(|| {
                geometry(format!(
                    "expanded viewport offset {:?} overflows",
                    expanded.offset
                ))
            })?;
        if !surface.contains(viewport) {
            return Err(geometry(format!(
                "viewport {viewport:?} does not fit the expanded surface {surface:?}"
            )));
        }
    }

    let mut index: HashMap<RenderPassId, usize> = HashMap::with_capacity(passes.len());
    for (i, pass) in passes.iter().enumerate() {
        validate_pass(pass, &index)?;
        if index.insert(pass.id, i).is_some() {
            return Err(SceneError::DuplicatePassId(pass.id).into());
        }
    }

    let root = *index
        .get(&request.root)
        .ok_or(SceneError::MissingRootPass(request.root))?;
    let readback = match request.readback {
        Some(id) => Some(*index.get(&id).ok_or(SceneError::MissingReadbackPass(id))?),
        None => None,
    };

    let mut reachable: HashSet<usize> = HashSet::new();
    let mut stack: Vec<usize> = std::iter::once(root).chain(readback).collect();
    while let Some(i) = stack.pop() {
        if !reachable.insert(i) {
            continue;
        }
        // References were checked to resolve above.
        stack.extend(passes[i].referenced_passes().filter_map(|id| index.get(&id).copied()));
    }

    let mut draw_order: Vec<usize> = reachable.into_iter().filter(|&i| i != root).collect();
    draw_order.sort_unstable();
    draw_order.push(root);

    for &i in &draw_order {
        if i != root && passes[i].output_rect.is_empty() {
            return Err(geometry(format!(
                "pass {} has an empty output rect",
                passes[i].id
            )));
        }
        for quad in &passes[i].quad_list {
            for id in quad.resource_ids() {
                if !provider.contains(id) {
                    return Err(TesseraError::InvalidResource(id));
                }
            }
        }
    }

    tracing::trace!(
        passes = passes.len(),
        drawn = draw_order.len(),
        "resolved pass list"
    );
    Ok(ResolvedFrame {
        draw_order,
        root,
        readback,
    })
}

/// Validate one pass against the passes listed before it.
fn validate_pass(pass: &RenderPass, earlier: &HashMap<RenderPassId, usize>) -> TesseraResult<()> {
    if !pass.transform_to_root_target.is_finite() {
        return Err(geometry(format!(
            "pass {} has a non-finite transform to its root target",
            pass.id
        )));
    }
    for sqs in &pass.shared_quad_state_list {
        if !sqs.content_to_target_transform.is_finite() {
            return Err(geometry(format!(
                "pass {} has a shared quad state with a non-finite transform",
                pass.id
            )));
        }
    }

    let len = pass.shared_quad_state_list.len();
    for (qi, quad) in pass.quad_list.iter().enumerate() {
        if quad.shared_quad_state >= len {
            return Err(SceneError::SharedQuadStateOutOfRange {
                pass: pass.id,
                quad: qi,
                index: quad.shared_quad_state,
                len,
            }
            .into());
        }
        let QuadMaterial::RenderPass(rp) = &quad.material else {
            continue;
        };
        if rp.render_pass_id == pass.id {
            return Err(SceneError::SelfReference(pass.id).into());
        }
        if !earlier.contains_key(&rp.render_pass_id) {
            return Err(SceneError::DanglingPassReference {
                pass: pass.id,
                referenced: rp.render_pass_id,
            }
            .into());
        }
        rp.filters.validate()?;
        rp.background_filters.validate()?;
        if let Some(filter) = &rp.filter {
            filter.to_operations().validate()?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/resolve.rs"]
mod tests;
