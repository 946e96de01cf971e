use crate::foundation::core::{BezPath, Rect};

/// A recorded list of drawing commands, played back in order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Picture {
    pub ops: Vec<PictureOp>,
}

/// Colors are straight (non-premultiplied) RGBA.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PictureOp {
    FillRect { rect: Rect, color: [u8; 4] },
    FillPath { path: BezPath, color: [u8; 4] },
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_rect(mut self, rect: Rect, color: [u8; 4]) -> Self {
        self.ops.push(PictureOp::FillRect { rect, color });
        self
    }

    pub fn fill_path(mut self, path: BezPath, color: [u8; 4]) -> Self {
        self.ops.push(PictureOp::FillPath { path, color });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
