use std::collections::HashMap;

use crate::compositor::frame::FrameRequest;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::ids::{RenderPassId, ResourceId};
use crate::geometry::rect::{Offset, RectI, Size};
use crate::resource::provider::{ResourceFormat, ResourceProvider, TextureUsage};
use crate::scene::pass::RenderPassList;
use crate::scene::quad::QuadMaterial;

/// A serialized frame: the pass list plus the resources its quads sample.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDocument {
    pub viewport: Size,
    pub root: RenderPassId,
    #[serde(default)]
    pub readback: Option<RenderPassId>,
    #[serde(default)]
    pub resources: Vec<ResourceUpload>,
    pub passes: RenderPassList,
}

/// A resource to create before drawing. `id` is the name quads use inside the document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResourceUpload {
    pub id: ResourceId,
    pub size: Size,
    pub format: ResourceFormat,
    pub data: ResourceData,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceData {
    /// One texel repeated over the whole resource.
    Fill(Vec<u8>),
    /// Tightly packed texels, row by row.
    Bytes(Vec<u8>),
}

impl SceneDocument {
    pub fn from_json(s: &str) -> TesseraResult<Self> {
        serde_json::from_str(s).map_err(|e| TesseraError::serde(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> TesseraResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TesseraError::serde(e.to_string()))
    }

    /// Create and fill every declared resource, then rewrite quads to the ids the provider
    /// handed out. On error the document is left untouched and every resource created by this
    /// call is deleted again.
    pub fn upload_resources(&mut self, provider: &mut ResourceProvider) -> TesseraResult<()> {
        let mut remap = HashMap::with_capacity(self.resources.len());
        let result = self
            .create_all(provider, &mut remap)
            .and_then(|()| remapped_passes(&self.passes, &remap));
        match result {
            Ok(passes) => {
                self.passes = passes;
                self.resources.clear();
                Ok(())
            }
            Err(e) => {
                for id in remap.into_values() {
                    if let Err(err) = provider.delete_resource(id) {
                        tracing::warn!(%id, error = %err, "failed to release scene resource");
                    }
                }
                Err(e)
            }
        }
    }

    fn create_all(
        &self,
        provider: &mut ResourceProvider,
        remap: &mut HashMap<ResourceId, ResourceId>,
    ) -> TesseraResult<()> {
        for upload in &self.resources {
            if remap.contains_key(&upload.id) {
                return Err(TesseraError::validation(format!(
                    "resource {} declared twice",
                    upload.id
                )));
            }
            let bpp = upload.format.bytes_per_texel();
            if let ResourceData::Fill(texel) = &upload.data
                && texel.len() != bpp
            {
                return Err(TesseraError::validation(format!(
                    "resource {} fill texel has {} bytes, format {:?} needs {bpp}",
                    upload.id,
                    texel.len(),
                    upload.format
                )));
            }
            // Size limits are checked here, before any fill buffer is built.
            let id = provider.create_resource(upload.size, upload.format, TextureUsage::Any)?;
            remap.insert(upload.id, id);

            let rect = RectI::from_size(upload.size);
            match &upload.data {
                ResourceData::Fill(texel) => {
                    let bytes = texel.repeat(upload.size.area() as usize);
                    provider.set_pixels(id, &bytes, rect, rect, Offset::ZERO)?;
                }
                ResourceData::Bytes(bytes) => {
                    provider.set_pixels(id, bytes, rect, rect, Offset::ZERO)?;
                }
            }
        }
        Ok(())
    }

    /// The draw request for this document.
    pub fn frame_request(&self) -> FrameRequest {
        FrameRequest {
            passes: self.passes.clone(),
            root: self.root,
            viewport: self.viewport,
            readback: self.readback,
            expanded_viewport: None,
        }
    }
}

/// Copy of `passes` with every resource id translated through `remap`.
fn remapped_passes(
    passes: &RenderPassList,
    remap: &HashMap<ResourceId, ResourceId>,
) -> TesseraResult<RenderPassList> {
    let lookup = |id: &mut ResourceId| -> TesseraResult<()> {
        let declared = *id;
        *id = *remap
            .get(&declared)
            .ok_or(TesseraError::InvalidResource(declared))?;
        Ok(())
    };
    let mut passes = passes.clone();
    for pass in &mut passes {
        for quad in &mut pass.quad_list {
            match &mut quad.material {
                QuadMaterial::SolidColor(_) | QuadMaterial::Picture(_) => {}
                QuadMaterial::RenderPass(rp) => {
                    if let Some(mask) = rp.mask_resource_id.as_mut() {
                        lookup(mask)?;
                    }
                }
                QuadMaterial::YuvVideo(y) => {
                    lookup(&mut y.y_plane)?;
                    lookup(&mut y.u_plane)?;
                    lookup(&mut y.v_plane)?;
                    if let Some(a) = y.a_plane.as_mut() {
                        lookup(a)?;
                    }
                }
                QuadMaterial::Texture(t) => lookup(&mut t.resource_id)?,
            }
        }
    }
    Ok(passes)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
