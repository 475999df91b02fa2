//! Camera Frame Tests
//!
//! Tests for:
//! - Direct rendering without owned targets (opaque, skybox, transparent)
//! - Silent culling abort with nothing allocated or submitted
//! - Transient accounting: every allocation released once, no use after release
//! - Reverse-order release of frame targets
//! - Depth-only pre-pass for MSAA and editor cameras
//! - Opaque / depth copies and the re-bind that follows them
//! - Final blit at non-default render scale
//! - Clear policy and post-processing override precedence
//! - Multi-camera frames and pooled texture reuse

use std::collections::HashSet;

use glam::{Mat4, Vec4};

use lumen::renderer::camera_renderer::{CAMERA_COLOR_TEXTURE, CAMERA_DEPTH_ATTACHMENT};
use lumen::renderer::color_grading_lut::COLOR_GRADING_LUT;
use lumen::renderer::culling::{Culler, CullingParameters, StaticCuller, VisibleGeometrySet};
use lumen::renderer::environment::{EditorEnvironment, MobileEnvironment};
use lumen::renderer::graph::command::{
    ClearFlags, LoadAction, Material, RenderCommand, RenderQueueRange, RenderTargetId, ShaderTag,
    TransientTextureId,
};
use lumen::renderer::graph::passes::copy_color::CAMERA_OPAQUE_TEXTURE;
use lumen::renderer::graph::passes::depth_prepass::CAMERA_DEPTH_TEXTURE;
use lumen::renderer::settings::MsaaMode;
use lumen::renderer::{
    CameraRenderer, DefaultEnvironment, FrameServices, NoShadows, RecordingBackend, RenderPipeline,
    RendererSettings,
};
use lumen::scene::{
    Camera, CameraClearFlags, CameraOverrides, CameraType, TargetTexture, VisibleLight,
};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Draw {
    Geometry(RenderQueueRange, ShaderTag),
    Skybox,
    Procedural(Material, u32),
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn visible_set() -> VisibleGeometrySet {
    let mut geometry = VisibleGeometrySet::new(vec![VisibleLight::directional(
        1,
        Vec4::ONE,
        1.0,
        Mat4::IDENTITY,
    )]);
    geometry.renderer_count = 12;
    geometry
}

fn pipeline(settings: RendererSettings) -> RenderPipeline<RecordingBackend> {
    RenderPipeline::new(settings, RecordingBackend::new())
        .expect("valid settings")
        .with_culler(StaticCuller::new(visible_set()))
}

fn no_post() -> CameraOverrides {
    CameraOverrides {
        post_processing: false,
        require_depth_texture: false,
        require_opaque_texture: false,
        ..Default::default()
    }
}

fn with_post() -> CameraOverrides {
    CameraOverrides {
        post_processing: true,
        ..Default::default()
    }
}

/// Renders a single camera and returns its recorded commands.
fn record(settings: RendererSettings, camera: Camera) -> Vec<RenderCommand> {
    init_logger();
    let mut pipeline = pipeline(settings);
    assert_eq!(pipeline.render(&[camera]), 1);
    let mut submissions = pipeline.backend_mut().take_submissions();
    assert_eq!(submissions.len(), 1);
    submissions.remove(0).commands().to_vec()
}

fn draws(commands: &[RenderCommand]) -> Vec<Draw> {
    commands
        .iter()
        .filter_map(|command| match command {
            RenderCommand::DrawRenderers { drawing, filtering } => Some(Draw::Geometry(
                filtering.queue_range,
                drawing.shader_tags[0],
            )),
            RenderCommand::DrawSkybox => Some(Draw::Skybox),
            RenderCommand::DrawProcedural { material, pass } => {
                Some(Draw::Procedural(*material, *pass))
            }
            _ => None,
        })
        .collect()
}

fn allocations(commands: &[RenderCommand]) -> Vec<(TransientTextureId, &'static str)> {
    commands
        .iter()
        .filter_map(|command| match command {
            RenderCommand::AllocateTransient { id, desc } => Some((*id, desc.label)),
            _ => None,
        })
        .collect()
}

fn releases(commands: &[RenderCommand]) -> Vec<TransientTextureId> {
    commands
        .iter()
        .filter_map(|command| match command {
            RenderCommand::ReleaseTransient { id } => Some(*id),
            _ => None,
        })
        .collect()
}

fn render_targets(commands: &[RenderCommand]) -> Vec<&RenderCommand> {
    commands
        .iter()
        .filter(|command| matches!(command, RenderCommand::SetRenderTarget { .. }))
        .collect()
}

/// Every allocation released exactly once, nothing referenced while not live.
fn assert_transient_discipline(commands: &[RenderCommand]) {
    let mut live = HashSet::new();
    let check = |live: &HashSet<TransientTextureId>, target: &RenderTargetId| {
        if let RenderTargetId::Transient(id) = target {
            assert!(live.contains(id), "{id:?} referenced while not live");
        }
    };
    for command in commands {
        match command {
            RenderCommand::AllocateTransient { id, .. } => assert!(live.insert(*id)),
            RenderCommand::ReleaseTransient { id } => {
                assert!(live.remove(id), "{id:?} released while not live");
            }
            RenderCommand::SetRenderTarget { color, depth, .. } => {
                check(&live, color);
                if let Some(depth) = depth {
                    check(&live, &depth.target);
                }
            }
            RenderCommand::SetGlobalTexture { texture, .. } => check(&live, texture),
            _ => {}
        }
    }
    assert!(live.is_empty(), "leaked: {live:?}");
}

// ============================================================================
// Direct Rendering
// ============================================================================

#[test]
fn camera_without_post_draws_directly() {
    let commands = record(
        RendererSettings::default(),
        Camera::new("main", 1280, 720).with_overrides(no_post()),
    );

    assert!(allocations(&commands).is_empty());
    assert_eq!(
        draws(&commands),
        vec![
            Draw::Geometry(RenderQueueRange::Opaque, ShaderTag::SRP_DEFAULT_UNLIT),
            Draw::Skybox,
            Draw::Geometry(RenderQueueRange::Transparent, ShaderTag::SRP_DEFAULT_UNLIT),
        ]
    );

    let targets = render_targets(&commands);
    assert_eq!(targets.len(), 1);
    match targets[0] {
        RenderCommand::SetRenderTarget { color, depth, .. } => {
            assert_eq!(*color, RenderTargetId::CameraTarget);
            assert!(depth.is_none());
        }
        _ => unreachable!(),
    }
    assert!(commands.iter().any(|c| matches!(c, RenderCommand::SetViewport(_))));
}

#[test]
fn geometry_draws_use_lit_and_unlit_tags() {
    let commands = record(
        RendererSettings::default(),
        Camera::new("main", 64, 64).with_overrides(CameraOverrides {
            rendering_layer_mask: 0b101,
            ..no_post()
        }),
    );
    let opaque = commands
        .iter()
        .find_map(|c| match c {
            RenderCommand::DrawRenderers { drawing, filtering } => Some((drawing, filtering)),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        opaque.0.shader_tags.as_slice(),
        &[ShaderTag::SRP_DEFAULT_UNLIT, ShaderTag::CUSTOM_LIT]
    );
    assert_eq!(opaque.1.rendering_layer_mask, 0b101);
}

#[test]
fn skybox_skipped_without_skybox_material() {
    let mut camera = Camera::new("main", 64, 64).with_overrides(no_post());
    camera.has_skybox = false;
    let commands = record(RendererSettings::default(), camera);
    assert!(!draws(&commands).contains(&Draw::Skybox));
    match render_targets(&commands)[0] {
        RenderCommand::SetRenderTarget { clear, .. } => assert_eq!(*clear, ClearFlags::ALL),
        _ => unreachable!(),
    }
}

// ============================================================================
// Culling Abort
// ============================================================================

struct FailingCuller;

impl Culler for FailingCuller {
    fn try_cull(&mut self, _: &Camera, _: &CullingParameters) -> Option<VisibleGeometrySet> {
        None
    }
}

#[test]
fn culling_failure_skips_camera_silently() {
    init_logger();
    let mut pipeline = RenderPipeline::new(RendererSettings::default(), RecordingBackend::new())
        .expect("valid settings")
        .with_culler(FailingCuller);
    let submitted = pipeline.render(&[Camera::new("main", 640, 480).with_overrides(with_post())]);
    assert_eq!(submitted, 0);
    assert!(pipeline.backend().submissions().is_empty());
    assert_eq!(pipeline.backend().pool().created_count(), 0);
}

#[test]
fn degenerate_camera_is_skipped_but_others_render() {
    init_logger();
    let mut pipeline = pipeline(RendererSettings::default());
    let mut broken = Camera::new("broken", 640, 480);
    broken.far_clip = broken.near_clip;
    let cameras = [broken, Camera::new("ok", 640, 480)];
    assert_eq!(pipeline.render(&cameras), 1);
    assert_eq!(pipeline.backend().submissions().len(), 1);
}

#[test]
fn shadow_distance_reaches_culler() {
    init_logger();
    let mut settings = RendererSettings::default();
    settings.shadows.max_distance = 50.0;
    let mut camera = Camera::new("main", 64, 64).with_overrides(no_post());
    camera.far_clip = 30.0;

    let mut culler = StaticCuller::new(visible_set());
    let mut shadows = NoShadows;
    let mut backend = RecordingBackend::new();
    let mut renderer = CameraRenderer::new(&settings);
    {
        let mut services = FrameServices {
            env: &DefaultEnvironment,
            culler: &mut culler,
            shadows: &mut shadows,
            backend: &mut backend,
        };
        assert!(renderer.render(&camera, &settings, &mut services));

        let no_shadows = camera.clone().with_overrides(CameraOverrides {
            render_shadows: false,
            ..no_post()
        });
        assert!(renderer.render(&no_shadows, &settings, &mut services));
    }

    assert_eq!(culler.requests.len(), 2);
    assert_eq!(culler.requests[0].shadow_distance, 30.0);
    assert!(culler.requests[0].cull_shadow_casters);
    assert_eq!(culler.requests[1].shadow_distance, 0.0);
    assert!(!culler.requests[1].cull_shadow_casters);
    assert_eq!(backend.submissions().len(), 2);
}

// ============================================================================
// Owned Targets & Copies
// ============================================================================

#[test]
fn depth_and_opaque_requests_allocate_targets_and_copies() {
    let commands = record(
        RendererSettings::default(),
        Camera::new("main", 320, 240).with_overrides(CameraOverrides {
            require_depth_texture: true,
            require_opaque_texture: true,
            ..no_post()
        }),
    );
    assert_transient_discipline(&commands);

    let labels: Vec<_> = allocations(&commands).iter().map(|(_, l)| *l).collect();
    assert_eq!(
        labels,
        vec![
            CAMERA_COLOR_TEXTURE,
            CAMERA_DEPTH_ATTACHMENT,
            CAMERA_OPAQUE_TEXTURE,
            CAMERA_DEPTH_TEXTURE
        ]
    );

    // Colour target carries no depth buffer when a separate depth target exists.
    let color_desc = commands
        .iter()
        .find_map(|c| match c {
            RenderCommand::AllocateTransient { desc, .. } if desc.label == CAMERA_COLOR_TEXTURE => {
                Some(desc.clone())
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(color_desc.depth_bits, 0);

    // Bind, two copy blits, re-bind without clearing, final blit.
    let targets = render_targets(&commands);
    assert_eq!(targets.len(), 5);
    match targets[3] {
        RenderCommand::SetRenderTarget {
            clear,
            color_load,
            depth,
            ..
        } => {
            assert_eq!(*clear, ClearFlags::empty());
            assert_eq!(*color_load, LoadAction::Load);
            assert_eq!(depth.map(|d| d.load), Some(LoadAction::Load));
        }
        _ => unreachable!(),
    }

    assert_eq!(
        draws(&commands),
        vec![
            Draw::Geometry(RenderQueueRange::Opaque, ShaderTag::SRP_DEFAULT_UNLIT),
            Draw::Skybox,
            Draw::Procedural(Material::Blit, 0),
            Draw::Procedural(Material::Blit, 0),
            Draw::Geometry(RenderQueueRange::Transparent, ShaderTag::SRP_DEFAULT_UNLIT),
            Draw::Procedural(Material::Blit, 0),
        ]
    );
}

#[test]
fn frame_targets_are_released_in_reverse_order() {
    let commands = record(
        RendererSettings::default(),
        Camera::new("main", 320, 240).with_overrides(CameraOverrides {
            require_depth_texture: true,
            require_opaque_texture: true,
            ..with_post()
        }),
    );
    assert_transient_discipline(&commands);

    let frame_labels = [
        COLOR_GRADING_LUT,
        CAMERA_COLOR_TEXTURE,
        CAMERA_DEPTH_ATTACHMENT,
        CAMERA_OPAQUE_TEXTURE,
        CAMERA_DEPTH_TEXTURE,
    ];
    let frame_ids: Vec<_> = allocations(&commands)
        .into_iter()
        .filter(|(_, label)| frame_labels.contains(label))
        .map(|(id, _)| id)
        .collect();
    assert_eq!(frame_ids.len(), frame_labels.len());

    let released = releases(&commands);
    let tail = &released[released.len() - frame_ids.len()..];
    let expected: Vec<_> = frame_ids.iter().rev().copied().collect();
    assert_eq!(tail, expected.as_slice());
}

#[test]
fn render_scale_adds_final_blit_into_viewport() {
    let settings = RendererSettings {
        render_scale: 0.5,
        ..Default::default()
    };
    let commands = record(settings, Camera::new("main", 800, 600).with_overrides(no_post()));
    assert_transient_discipline(&commands);

    let allocated = allocations(&commands);
    assert_eq!(allocated.len(), 1);
    match commands
        .iter()
        .find(|c| matches!(c, RenderCommand::AllocateTransient { .. }))
    {
        Some(RenderCommand::AllocateTransient { desc, .. }) => {
            assert_eq!((desc.width, desc.height), (400, 300));
            assert_eq!(desc.depth_bits, 32);
        }
        _ => unreachable!(),
    }

    assert_eq!(
        draws(&commands).last(),
        Some(&Draw::Procedural(Material::Blit, 0))
    );
    let last_target = render_targets(&commands).last().copied().cloned();
    match last_target {
        Some(RenderCommand::SetRenderTarget { color, .. }) => {
            assert_eq!(color, RenderTargetId::CameraTarget);
        }
        _ => unreachable!(),
    }
}

#[test]
fn render_scale_ignored_for_scene_view() {
    let settings = RendererSettings {
        render_scale: 0.5,
        ..Default::default()
    };
    let camera = Camera::new("scene", 800, 600)
        .with_type(CameraType::SceneView)
        .with_overrides(no_post());
    let commands = record(settings, camera);
    // Only the editor depth pre-pass target.
    let labels: Vec<_> = allocations(&commands).iter().map(|(_, l)| *l).collect();
    assert_eq!(labels, vec![CAMERA_DEPTH_TEXTURE]);
}

#[test]
fn target_texture_is_final_destination() {
    let camera = Camera::new("rt", 1, 1)
        .with_target_texture(TargetTexture {
            id: 42,
            width: 256,
            height: 256,
            format: wgpu::TextureFormat::Rgba8Unorm,
            msaa_samples: 1,
            depth_bits: 24,
        })
        .with_overrides(CameraOverrides {
            require_opaque_texture: true,
            ..no_post()
        });
    let commands = record(RendererSettings::default(), camera);
    let last = render_targets(&commands).last().copied().cloned();
    match last {
        Some(RenderCommand::SetRenderTarget { color, .. }) => {
            assert_eq!(color, RenderTargetId::Texture(42));
        }
        _ => unreachable!(),
    }
}

// ============================================================================
// Depth Pre-Pass
// ============================================================================

#[test]
fn msaa_depth_request_runs_depth_prepass() {
    let settings = RendererSettings {
        msaa: MsaaMode::X4,
        ..Default::default()
    };
    let commands = record(
        settings,
        Camera::new("main", 320, 240).with_overrides(CameraOverrides {
            require_depth_texture: true,
            ..no_post()
        }),
    );
    assert_transient_discipline(&commands);

    let draws = draws(&commands);
    assert_eq!(
        draws[0],
        Draw::Geometry(RenderQueueRange::Opaque, ShaderTag::DEPTH_ONLY)
    );
    let labels: Vec<_> = allocations(&commands).iter().map(|(_, l)| *l).collect();
    assert_eq!(labels, vec![CAMERA_DEPTH_TEXTURE]);
    assert!(!labels.contains(&CAMERA_DEPTH_ATTACHMENT));
}

#[test]
fn preview_camera_always_runs_depth_prepass() {
    let camera = Camera::new("preview", 128, 128)
        .with_type(CameraType::Preview)
        .with_overrides(no_post());
    let commands = record(RendererSettings::default(), camera);
    assert!(draws(&commands).contains(&Draw::Geometry(
        RenderQueueRange::Opaque,
        ShaderTag::DEPTH_ONLY
    )));
    assert_transient_discipline(&commands);
}

// ============================================================================
// Clear Policy & Overrides
// ============================================================================

/// Clear of the camera's main bind: the last target set before the opaque
/// geometry draw. Earlier binds (LUT bake, depth pre-pass) are skipped.
fn camera_clear(commands: &[RenderCommand]) -> (ClearFlags, wgpu::Color) {
    let opaque = commands
        .iter()
        .position(|command| {
            matches!(
                command,
                RenderCommand::DrawRenderers { drawing, filtering }
                    if filtering.queue_range == RenderQueueRange::Opaque
                        && drawing.shader_tags[0] != ShaderTag::DEPTH_ONLY
            )
        })
        .expect("opaque geometry drawn");
    commands[..opaque]
        .iter()
        .rev()
        .find_map(|command| match command {
            RenderCommand::SetRenderTarget {
                clear, clear_color, ..
            } => Some((*clear, *clear_color)),
            _ => None,
        })
        .expect("target bound before opaque geometry")
}

#[test]
fn skybox_camera_clears_depth_only() {
    let commands = record(
        RendererSettings::default(),
        Camera::new("main", 64, 64).with_overrides(no_post()),
    );
    let (clear, color) = camera_clear(&commands);
    assert_eq!(clear, ClearFlags::DEPTH);
    assert_eq!(color, wgpu::Color::TRANSPARENT);
}

#[test]
fn color_clear_uses_linear_background() {
    let mut camera = Camera::new("main", 64, 64).with_overrides(no_post());
    camera.clear_flags = CameraClearFlags::Color;
    camera.background_color = Vec4::new(0.5, 0.0, 1.0, 1.0);
    let (clear, color) = camera_clear(&record(RendererSettings::default(), camera));
    assert_eq!(clear, ClearFlags::ALL);
    assert!((color.r - 0.214).abs() < 1e-3);
    assert!((color.b - 1.0).abs() < 1e-6);
}

#[test]
fn nothing_clear_preserves_both_attachments() {
    let mut camera = Camera::new("main", 64, 64).with_overrides(no_post());
    camera.clear_flags = CameraClearFlags::Nothing;
    let commands = record(RendererSettings::default(), camera);
    let (clear, _) = camera_clear(&commands);
    assert!(clear.is_empty());
}

#[test]
fn post_processing_forces_full_clear() {
    let commands = record(
        RendererSettings::default(),
        Camera::new("main", 64, 64).with_overrides(CameraOverrides {
            require_depth_texture: false,
            require_opaque_texture: false,
            ..with_post()
        }),
    );
    assert_eq!(camera_clear(&commands).0, ClearFlags::ALL);
}

#[test]
fn camera_without_override_never_post_processes() {
    let commands = record(RendererSettings::default(), Camera::new("main", 64, 64));
    let labels: Vec<_> = allocations(&commands).iter().map(|(_, l)| *l).collect();
    assert!(!labels.contains(&COLOR_GRADING_LUT));
    assert!(labels.contains(&CAMERA_OPAQUE_TEXTURE));
    assert!(labels.contains(&CAMERA_DEPTH_TEXTURE));
}

#[test]
fn environment_policies_gate_post_and_clear() {
    init_logger();
    let camera = Camera::new("scene", 64, 64)
        .with_type(CameraType::SceneView)
        .with_overrides(CameraOverrides {
            require_depth_texture: false,
            require_opaque_texture: false,
            ..with_post()
        });

    let mut editor = pipeline(RendererSettings::default()).with_environment(EditorEnvironment {
        scene_view_image_effects: false,
    });
    editor.render(std::slice::from_ref(&camera));
    let commands = editor.backend().last_submission().unwrap().commands().to_vec();
    assert!(
        !allocations(&commands)
            .iter()
            .any(|(_, label)| *label == COLOR_GRADING_LUT)
    );
    assert_eq!(camera_clear(&commands).0, ClearFlags::ALL);

    let mut low_end = pipeline(RendererSettings::default())
        .with_environment(MobileEnvironment { low_end: true });
    low_end.render(std::slice::from_ref(&camera));
    let commands = low_end.backend().last_submission().unwrap().commands().to_vec();
    assert!(
        !allocations(&commands)
            .iter()
            .any(|(_, label)| *label == COLOR_GRADING_LUT)
    );
}

// ============================================================================
// Multi-Camera Frames
// ============================================================================

#[test]
fn cameras_submit_independently_and_share_pool() {
    init_logger();
    let mut pipeline = pipeline(RendererSettings::default());
    let cameras = [
        Camera::new("left", 640, 480).with_overrides(with_post()),
        Camera::new("right", 640, 480).with_overrides(with_post()),
    ];
    assert_eq!(pipeline.render(&cameras), 2);

    let backend = pipeline.backend();
    assert_eq!(backend.submissions().len(), 2);
    for submission in backend.submissions() {
        assert!(submission.check_balanced().is_ok());
        assert_transient_discipline(submission.commands());
    }
    assert_eq!(backend.pool().in_use_count(), 0);

    let allocated: usize = backend
        .submissions()
        .iter()
        .map(|s| allocations(s.commands()).len())
        .sum();
    assert!(backend.pool().created_count() < allocated);
    assert_eq!(backend.frame_count(), 1);
}

#[test]
fn pooled_textures_survive_between_frames() {
    init_logger();
    let mut pipeline = pipeline(RendererSettings::default());
    let cameras = [Camera::new("main", 640, 480).with_overrides(with_post())];
    pipeline.render(&cameras);
    let created = pipeline.backend().pool().created_count();
    pipeline.render(&cameras);
    assert_eq!(pipeline.backend().pool().created_count(), created);
}

#[test]
fn long_running_pipeline_retains_only_last_frame() {
    init_logger();
    let mut pipeline = pipeline(RendererSettings::default());
    let cameras = [
        Camera::new("left", 320, 240).with_overrides(with_post()),
        Camera::new("right", 320, 240).with_overrides(no_post()),
    ];
    for _ in 0..5 {
        assert_eq!(pipeline.render(&cameras), 2);
    }

    let backend = pipeline.backend();
    assert_eq!(backend.frame_count(), 5);
    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 2);
    let bakes_lut = |i: usize| {
        allocations(submissions[i].commands())
            .iter()
            .any(|(_, label)| *label == COLOR_GRADING_LUT)
    };
    assert!(bakes_lut(0));
    assert!(!bakes_lut(1));
}

#[test]
fn render_scale_churn_keeps_pool_bounded() {
    init_logger();
    let mut pipeline = RenderPipeline::new(
        RendererSettings::default(),
        RecordingBackend::new().with_max_idle_frames(1),
    )
    .expect("valid settings")
    .with_culler(StaticCuller::new(visible_set()));
    let cameras = [Camera::new("main", 640, 480)];

    pipeline.render(&cameras);
    let per_frame = pipeline.backend().pool().total_texture_count();
    assert!(per_frame > 0);

    for frame in 0..40 {
        let settings = RendererSettings {
            render_scale: 0.5 + (frame % 20) as f32 * 0.05,
            ..Default::default()
        };
        pipeline.set_settings(settings).expect("scale in range");
        assert_eq!(pipeline.render(&cameras), 1);
        assert!(pipeline.backend().pool().total_texture_count() <= 2 * per_frame);
    }

    assert!(pipeline.backend().pool().created_count() > 40);
    assert_eq!(pipeline.backend().pool().in_use_count(), 0);
}

#[test]
fn cleared_attachments_are_never_loaded() {
    let mut camera = Camera::new("main", 640, 480).with_overrides(with_post());
    camera.clear_flags = CameraClearFlags::Color;
    let commands = record(RendererSettings::default(), camera);

    let mut clearing_binds = 0;
    for command in render_targets(&commands) {
        if let RenderCommand::SetRenderTarget {
            color_load,
            depth,
            clear,
            ..
        } = command
        {
            if clear.contains(ClearFlags::COLOR) {
                clearing_binds += 1;
                assert_eq!(*color_load, LoadAction::DontCare);
            }
            if let Some(depth) = depth
                && clear.contains(ClearFlags::DEPTH)
            {
                assert_eq!(depth.load, LoadAction::DontCare);
            }
        }
    }
    assert_eq!(clearing_binds, 1);
}
