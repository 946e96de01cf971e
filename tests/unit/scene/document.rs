use super::*;

const DOC: &str = r#"{
  "viewport": {"width": 4, "height": 4},
  "root": {"layer_id": 1, "index": 1},
  "resources": [
    {"id": 40, "size": {"width": 2, "height": 2}, "format": "Rgba8", "data": {"fill": [0, 255, 0, 255]}},
    {"id": 41, "size": {"width": 1, "height": 2}, "format": "Luminance8", "data": {"bytes": [7, 9]}}
  ],
  "passes": [{
    "id": {"layer_id": 1, "index": 1},
    "output_rect": {"x": 0, "y": 0, "width": 4, "height": 4},
    "shared_quad_state_list": [{"content_bounds": {"x": 0, "y": 0, "width": 4, "height": 4}}],
    "quad_list": [{
      "shared_quad_state": 0,
      "rect": {"x": 0, "y": 0, "width": 4, "height": 4},
      "visible_rect": {"x": 0, "y": 0, "width": 4, "height": 4},
      "material": {"kind": "texture", "resource_id": 40}
    }]
  }]
}"#;

#[test]
fn parses_with_defaults() {
    let doc = SceneDocument::from_json(DOC).unwrap();
    assert_eq!(doc.readback, None);
    let pass = &doc.passes[0];
    assert!(pass.has_transparent_background);
    assert_eq!(pass.shared_quad_state_list[0].opacity, 1.0);
    assert!(!pass.shared_quad_state_list[0].is_clipped);
}

#[test]
fn upload_creates_resources_and_rewrites_ids() {
    let mut doc = SceneDocument::from_json(DOC).unwrap();
    let mut provider = ResourceProvider::default();
    doc.upload_resources(&mut provider).unwrap();

    assert_eq!(provider.len(), 2);
    let QuadMaterial::Texture(t) = &doc.passes[0].quad_list[0].material else {
        panic!("expected a texture quad");
    };
    assert_eq!(t.resource_id, ResourceId(1));
    assert_eq!(
        provider
            .read_pixels(ResourceId(1), RectI::new(1, 1, 1, 1))
            .unwrap(),
        vec![0, 255, 0, 255]
    );
    assert_eq!(
        provider
            .read_pixels(ResourceId(2), RectI::new(0, 0, 1, 2))
            .unwrap(),
        vec![7, 9]
    );
    assert!(doc.resources.is_empty());
}

#[test]
fn undeclared_resources_are_rejected() {
    let mut doc = SceneDocument::from_json(DOC).unwrap();
    doc.resources.remove(0);
    let err = doc
        .upload_resources(&mut ResourceProvider::default())
        .unwrap_err();
    assert!(matches!(err, TesseraError::InvalidResource(ResourceId(40))));
}

#[test]
fn fill_texel_must_match_format() {
    let mut doc = SceneDocument::from_json(DOC).unwrap();
    doc.resources[0].data = ResourceData::Fill(vec![1, 2, 3]);
    let err = doc
        .upload_resources(&mut ResourceProvider::default())
        .unwrap_err();
    assert!(matches!(err, TesseraError::Validation(_)));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SceneDocument::from_json("{").unwrap_err();
    assert!(matches!(err, TesseraError::Serde(_)));
}

#[test]
fn frame_request_carries_root_and_viewport() {
    let doc = SceneDocument::from_json(DOC).unwrap();
    let req = doc.frame_request();
    assert_eq!(req.root, RenderPassId::new(1, 1));
    assert_eq!(req.viewport, Size::new(4, 4));
    assert_eq!(req.passes.len(), 1);
    let json = doc.to_json_pretty().unwrap();
    assert_eq!(SceneDocument::from_json(&json).unwrap(), doc);
}

#[test]
fn failed_upload_releases_what_it_created() {
    let mut doc = SceneDocument::from_json(DOC).unwrap();
    doc.resources[1].size = Size::new(1 << 20, 1);
    let original = doc.clone();
    let mut provider = ResourceProvider::new(crate::resource::provider::ResourceProviderOpts {
        max_resource_size: 64,
        ..Default::default()
    });
    let err = doc.upload_resources(&mut provider).unwrap_err();
    assert!(matches!(err, TesseraError::Allocation(_)));
    assert!(provider.is_empty());
    assert_eq!(doc, original);
}

#[test]
fn unresolved_quad_ids_release_uploaded_resources() {
    let mut doc = SceneDocument::from_json(DOC).unwrap();
    doc.resources.remove(0);
    let original = doc.clone();
    let mut provider = ResourceProvider::default();
    let err = doc.upload_resources(&mut provider).unwrap_err();
    assert!(matches!(err, TesseraError::InvalidResource(ResourceId(40))));
    assert!(provider.is_empty());
    assert_eq!(provider.pool_stats().retained_buffers, 1);
    assert_eq!(doc, original);
}
