use super::*;

#[test]
fn defaults() {
    let s = RenderSettings::default();
    assert_eq!(s.pass_margin, 1);
    assert!(s.occlusion_culling);
    assert_eq!(s.max_texture_size, 8192);
    assert!(s.hardware_available);
    assert_eq!(s.root_clear_premul(), [0, 0, 0, 255]);
}

#[test]
fn builders_chain() {
    let s = RenderSettings::default()
        .with_pass_margin(4)
        .with_occlusion_culling(false)
        .with_max_texture_size(64)
        .with_hardware_available(false)
        .with_root_clear_rgba([10, 20, 30, 0]);
    assert_eq!(s.pass_margin, 4);
    assert!(!s.occlusion_culling);
    assert_eq!(s.max_texture_size, 64);
    assert!(!s.hardware_available);
    assert_eq!(s.root_clear_premul(), [10, 20, 30, 255]);
}

#[test]
fn unset_variables_leave_settings_alone() {
    assert_eq!(env_parse::<u32>("TESSERA_TEST_UNSET_VARIABLE"), None);
    assert_eq!(env_flag("TESSERA_TEST_UNSET_VARIABLE"), None);
}
