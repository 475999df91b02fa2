//! Post-Effect Stack Tests
//!
//! Tests for:
//! - Stage order and explicit ping-pong source/destination
//! - Bloom pyramid pass sequence and handle release
//! - Kawase blur parity (last iteration lands in the destination)
//! - Depth-of-field pass chain
//! - FXAA versus plain copy as the single write of the camera target
//! - Uber material keyword reset between frames
//! - Colour-grading LUT parameters and soft-knee threshold

use std::collections::HashMap;

use glam::{Mat4, Vec4};

use lumen::renderer::color_grading_lut::ColorGradingLut;
use lumen::renderer::culling::{StaticCuller, VisibleGeometrySet};
use lumen::renderer::graph::command::{
    CommandBuffer, DofPass, Material, PixelRect, PostFxPass, RenderCommand, RenderTargetId,
    TransientTextureDesc, TransientTextureId,
};
use lumen::renderer::graph::context::PostFxContext;
use lumen::renderer::graph::passes::PostFxStack;
use lumen::renderer::graph::passes::blur::BLUR_RADIUS;
use lumen::renderer::graph::passes::post_fx_stack::POST_FX_TEMP_TEXTURE;
use lumen::renderer::graph::passes::uber::COLOR_GRADING_LUT_PARAMETERS;
use lumen::renderer::{RecordingBackend, RenderPipeline, RendererSettings};
use lumen::resources::bloom::{BLOOM_SCATTER_KEYWORD, bloom_mip_count, soft_knee_threshold};
use lumen::resources::tone_mapping::VIGNETTE_KEYWORD;
use lumen::resources::{LuminanceMode, PostEffectSettings};
use lumen::scene::{Camera, CameraOverrides, VisibleLight};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Helpers
// ============================================================================

const CAMERA_COLOR: &str = "_CameraColorTexture";

fn camera_desc(width: u32, height: u32) -> TransientTextureDesc {
    TransientTextureDesc {
        width,
        height,
        format: wgpu::TextureFormat::Rg11b10Ufloat,
        msaa_samples: 1,
        depth_bits: 0,
        filter: wgpu::FilterMode::Linear,
        label: CAMERA_COLOR,
    }
}

/// Runs the stack on a fresh camera colour target and releases it.
fn run_stack(settings: &PostEffectSettings, width: u32, height: u32) -> CommandBuffer {
    let mut cmd = CommandBuffer::new("post");
    let desc = camera_desc(width, height);
    let color = cmd.get_temporary(desc.clone());
    {
        let mut ctx = PostFxContext::new(
            &mut cmd,
            settings,
            &desc,
            RenderTargetId::CameraTarget,
            PixelRect::new(0.0, 0.0, width as f32, height as f32),
            None,
        );
        PostFxStack::render(&mut ctx, color);
    }
    cmd.release_temporary(color);
    cmd
}

/// A full-screen draw together with the colour target bound for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Draw {
    material: Material,
    pass: u32,
    target: RenderTargetId,
}

fn procedural_draws(cmd: &CommandBuffer) -> Vec<Draw> {
    let mut target = RenderTargetId::CameraTarget;
    let mut draws = Vec::new();
    for command in cmd.commands() {
        match command {
            RenderCommand::SetRenderTarget { color, .. } => target = *color,
            RenderCommand::DrawProcedural { material, pass } => draws.push(Draw {
                material: *material,
                pass: *pass,
                target,
            }),
            _ => {}
        }
    }
    draws
}

fn labels(cmd: &CommandBuffer) -> HashMap<TransientTextureId, &'static str> {
    cmd.commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::AllocateTransient { id, desc } => Some((*id, desc.label)),
            _ => None,
        })
        .collect()
}

fn label_of(labels: &HashMap<TransientTextureId, &'static str>, target: RenderTargetId) -> &'static str {
    match target {
        RenderTargetId::Transient(id) => labels[&id],
        RenderTargetId::CameraTarget => "CameraTarget",
        RenderTargetId::Texture(_) => "Texture",
    }
}

fn post(pass: PostFxPass) -> (Material, u32) {
    (Material::PostFx, pass.index())
}

fn pass_list(draws: &[Draw]) -> Vec<(Material, u32)> {
    draws.iter().map(|d| (d.material, d.pass)).collect()
}

// ============================================================================
// Stage Order & Ping-Pong
// ============================================================================

#[test]
fn minimal_stack_composites_then_copies() {
    let cmd = run_stack(&PostEffectSettings::minimal(), 320, 180);
    assert!(cmd.check_balanced().is_ok());

    let draws = procedural_draws(&cmd);
    assert_eq!(
        pass_list(&draws),
        vec![(Material::Uber, 0), post(PostFxPass::Copy)]
    );

    let labels = labels(&cmd);
    assert_eq!(label_of(&labels, draws[0].target), POST_FX_TEMP_TEXTURE);
    assert_eq!(draws[1].target, RenderTargetId::CameraTarget);
}

#[test]
fn camera_target_written_exactly_once() {
    let mut settings = PostEffectSettings::default();
    settings.bloom.intensity = 1.0;
    settings.depth_stripes = true;
    settings.depth_of_field.enabled = true;
    let cmd = run_stack(&settings, 640, 360);

    let final_writes = procedural_draws(&cmd)
        .into_iter()
        .filter(|d| d.target == RenderTargetId::CameraTarget)
        .count();
    assert_eq!(final_writes, 1);
    assert!(cmd.check_balanced().is_ok());
}

#[test]
fn stages_alternate_between_colour_and_shared_temp() {
    let mut settings = PostEffectSettings::minimal();
    settings.depth_stripes = true;
    settings.blur.max_iterations = 1;
    let cmd = run_stack(&settings, 320, 180);

    let labels = labels(&cmd);
    let targets: Vec<_> = procedural_draws(&cmd)
        .iter()
        .map(|d| label_of(&labels, d.target))
        .collect();
    assert_eq!(
        targets,
        vec![
            POST_FX_TEMP_TEXTURE, // stripes: colour -> temp
            CAMERA_COLOR,         // blur: temp -> colour
            POST_FX_TEMP_TEXTURE, // uber: colour -> temp
            "CameraTarget",       // final copy
        ]
    );

    let temps = labels
        .values()
        .filter(|label| **label == POST_FX_TEMP_TEXTURE)
        .count();
    assert_eq!(temps, 1);
}

// ============================================================================
// Bloom
// ============================================================================

#[test]
fn bloom_pyramid_pass_sequence() {
    let mut settings = PostEffectSettings::minimal();
    settings.bloom.intensity = 1.0;
    let cmd = run_stack(&settings, 1920, 1080);
    assert!(cmd.check_balanced().is_ok());

    let mip_count = bloom_mip_count(960, 540, settings.bloom.diffusion, 16);
    assert_eq!(mip_count, 5);

    let mut expected = vec![post(PostFxPass::BloomPrefilter)];
    for _ in 1..mip_count {
        expected.push(post(PostFxPass::BloomHorizontal));
        expected.push(post(PostFxPass::BloomVertical));
    }
    for _ in 1..mip_count {
        expected.push(post(PostFxPass::BloomScatter));
    }
    expected.push((Material::Uber, 0));
    expected.push(post(PostFxPass::Copy));

    assert_eq!(pass_list(&procedural_draws(&cmd)), expected);
}

#[test]
fn bloom_pyramid_starts_at_half_resolution() {
    let mut settings = PostEffectSettings::minimal();
    settings.bloom.intensity = 1.0;
    let cmd = run_stack(&settings, 1920, 1080);

    let sizes: Vec<_> = cmd
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::AllocateTransient { desc, .. } if desc.label == "_BloomMipDown" => {
                Some((desc.width, desc.height))
            }
            _ => None,
        })
        .collect();
    assert_eq!(sizes[0], (960, 540));
    assert_eq!(sizes[1], (480, 270));
    assert_eq!(sizes.len(), 5);
}

#[test]
fn bloom_handles_are_all_released() {
    let mut settings = PostEffectSettings::minimal();
    settings.bloom.intensity = 2.0;
    let cmd = run_stack(&settings, 1280, 720);

    let labels = labels(&cmd);
    let bloom_ids: Vec<_> = labels
        .iter()
        .filter(|(_, label)| label.starts_with("_BloomMip"))
        .map(|(id, _)| *id)
        .collect();
    assert!(!bloom_ids.is_empty());

    let released: Vec<_> = cmd
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::ReleaseTransient { id } => Some(*id),
            _ => None,
        })
        .collect();
    for id in bloom_ids {
        assert_eq!(released.iter().filter(|r| **r == id).count(), 1);
    }
}

#[test]
fn single_level_bloom_copies_into_output() {
    let mut settings = PostEffectSettings::minimal();
    settings.bloom.intensity = 1.0;
    let cmd = run_stack(&settings, 8, 8);

    assert_eq!(
        pass_list(&procedural_draws(&cmd)),
        vec![
            post(PostFxPass::BloomPrefilter),
            post(PostFxPass::Copy),
            (Material::Uber, 0),
            post(PostFxPass::Copy),
        ]
    );
    assert!(cmd.check_balanced().is_ok());
}

#[test]
fn soft_knee_threshold_vector() {
    let v = soft_knee_threshold(1.0, 0.5);
    assert!(approx(v.x, 1.0));
    assert!(approx(v.y, -0.5));
    assert!(approx(v.z, 1.0));
    assert!(approx(v.w, 0.49999));

    let hard = soft_knee_threshold(0.8, 0.0);
    assert!(approx(hard.y, -0.8));
    assert!(approx(hard.z, 0.0));
}

// ============================================================================
// Blur
// ============================================================================

#[test]
fn blur_last_iteration_lands_in_destination() {
    for iterations in [1u32, 2, 3, 4] {
        let mut settings = PostEffectSettings::minimal();
        settings.blur.max_iterations = iterations;
        let cmd = run_stack(&settings, 320, 180);
        let labels = labels(&cmd);

        let blur_targets: Vec<_> = procedural_draws(&cmd)
            .iter()
            .filter(|d| (d.material, d.pass) == post(PostFxPass::Blur))
            .map(|d| label_of(&labels, d.target))
            .collect();
        assert_eq!(blur_targets.len(), iterations as usize);
        assert_eq!(blur_targets.last(), Some(&POST_FX_TEMP_TEXTURE));
        for pair in blur_targets.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }

        let has_temp = labels.values().any(|label| *label == "_BlurTemp");
        assert_eq!(has_temp, iterations > 1);
        assert!(cmd.check_balanced().is_ok());
    }
}

#[test]
fn blur_radius_grows_per_iteration() {
    let mut settings = PostEffectSettings::minimal();
    settings.blur.max_iterations = 3;
    settings.blur.radius = 1.5;
    let cmd = run_stack(&settings, 64, 64);

    let radii: Vec<_> = cmd
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::SetGlobalFloat { name, value } if *name == BLUR_RADIUS => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(radii, vec![1.5, 2.5, 3.5]);
}

// ============================================================================
// Depth of Field
// ============================================================================

#[test]
fn depth_of_field_runs_five_passes() {
    let mut settings = PostEffectSettings::minimal();
    settings.depth_of_field.enabled = true;
    let cmd = run_stack(&settings, 640, 360);
    assert!(cmd.check_balanced().is_ok());

    let dof: Vec<_> = procedural_draws(&cmd)
        .into_iter()
        .filter(|d| d.material == Material::DepthOfField)
        .collect();
    let passes: Vec<_> = dof.iter().map(|d| d.pass).collect();
    assert_eq!(
        passes,
        vec![
            DofPass::CircleOfConfusion.index(),
            DofPass::Downsample.index(),
            DofPass::ScatterHorizontal.index(),
            DofPass::ScatterVertical.index(),
            DofPass::Composite.index(),
        ]
    );

    let labels = labels(&cmd);
    assert_eq!(label_of(&labels, dof[0].target), "_CoCTexture");
    assert_eq!(label_of(&labels, dof[4].target), POST_FX_TEMP_TEXTURE);

    let half: Vec<_> = cmd
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::AllocateTransient { desc, .. } if desc.label.starts_with("_DoFP") => {
                Some((desc.width, desc.height))
            }
            _ => None,
        })
        .collect();
    assert_eq!(half, vec![(320, 180), (320, 180)]);
}

#[test]
fn depth_of_field_disabled_records_nothing() {
    let cmd = run_stack(&PostEffectSettings::minimal(), 640, 360);
    assert!(
        !procedural_draws(&cmd)
            .iter()
            .any(|d| d.material == Material::DepthOfField)
    );
}

// ============================================================================
// Final Stage
// ============================================================================

#[test]
fn fxaa_presents_when_enabled() {
    let settings = PostEffectSettings::default();
    assert!(settings.fxaa.is_enabled());
    let cmd = run_stack(&settings, 320, 180);

    let last = *procedural_draws(&cmd).last().unwrap();
    assert_eq!((last.material, last.pass), post(PostFxPass::Fxaa));
    assert_eq!(last.target, RenderTargetId::CameraTarget);

    let threshold_set = cmd.commands().iter().any(|command| {
        matches!(command, RenderCommand::SetGlobalVector { name, .. } if *name == "_ContrastThreshold")
    });
    assert!(threshold_set);
}

#[test]
fn final_write_loads_target_inside_viewport() {
    let mut settings = PostEffectSettings::minimal();
    settings.fxaa.luminance_source = LuminanceMode::None;
    let cmd = run_stack(&settings, 320, 180);

    let commands = cmd.commands();
    let final_bind = commands
        .iter()
        .rposition(|c| {
            matches!(
                c,
                RenderCommand::SetRenderTarget {
                    color: RenderTargetId::CameraTarget,
                    ..
                }
            )
        })
        .unwrap();
    match &commands[final_bind] {
        RenderCommand::SetRenderTarget { color_load, .. } => {
            assert_eq!(*color_load, lumen::renderer::graph::LoadAction::Load);
        }
        _ => unreachable!(),
    }
    assert_eq!(
        commands[final_bind + 1],
        RenderCommand::SetViewport(PixelRect::new(0.0, 0.0, 320.0, 180.0))
    );
}

// ============================================================================
// Uber Keywords & LUT (through the pipeline)
// ============================================================================

fn post_pipeline(post_fx: PostEffectSettings) -> RenderPipeline<RecordingBackend> {
    let _ = env_logger::builder().is_test(true).try_init();
    let settings = RendererSettings {
        post_fx: Some(post_fx),
        ..Default::default()
    };
    let geometry = VisibleGeometrySet::new(vec![VisibleLight::directional(
        1,
        Vec4::ONE,
        1.0,
        Mat4::IDENTITY,
    )]);
    RenderPipeline::new(settings, RecordingBackend::new())
        .expect("valid settings")
        .with_culler(StaticCuller::new(geometry))
}

fn post_camera() -> Camera {
    Camera::new("main", 640, 360).with_overrides(CameraOverrides {
        post_processing: true,
        ..Default::default()
    })
}

#[test]
fn uber_keywords_do_not_leak_between_frames() {
    let mut post_fx = PostEffectSettings::minimal();
    post_fx.bloom.intensity = 1.0;
    post_fx.vignette.intensity = 0.5;
    let mut pipeline = post_pipeline(post_fx);
    let cameras = [post_camera()];

    pipeline.render(&cameras);
    let globals = pipeline.backend().globals();
    assert!(globals.material_keyword_enabled(Material::Uber, VIGNETTE_KEYWORD));
    assert!(globals.material_keyword_enabled(Material::Uber, BLOOM_SCATTER_KEYWORD));

    let mut settings = pipeline.settings().clone();
    settings.post_fx = Some(PostEffectSettings::minimal());
    pipeline.set_settings(settings).unwrap();
    pipeline.render(&cameras);

    let globals = pipeline.backend().globals();
    assert!(!globals.material_keyword_enabled(Material::Uber, VIGNETTE_KEYWORD));
    assert!(!globals.material_keyword_enabled(Material::Uber, BLOOM_SCATTER_KEYWORD));
}

#[test]
fn grading_lut_parameters_reach_bake_and_composite() {
    let mut pipeline = post_pipeline(PostEffectSettings::minimal());
    pipeline.render(&[post_camera()]);
    let globals = pipeline.backend().globals();

    // Default resolution is 32: a 1024 × 32 strip.
    let bake = globals.vector(COLOR_GRADING_LUT_PARAMETERS).unwrap();
    assert!(approx(bake.x, 32.0));
    assert!(approx(bake.y, 0.5 / 1024.0));
    assert!(approx(bake.z, 0.5 / 32.0));
    assert!(approx(bake.w, 32.0 / 31.0));

    let sample = globals
        .material_vector(Material::Uber, COLOR_GRADING_LUT_PARAMETERS)
        .unwrap();
    assert!(approx(sample.x, 1.0 / 1024.0));
    assert!(approx(sample.y, 1.0 / 32.0));
    assert!(approx(sample.z, 31.0));
    assert!(approx(sample.w, 0.0));

    let desc = ColorGradingLut::descriptor(32);
    assert_eq!((desc.width, desc.height), (1024, 32));
}

#[test]
fn lut_bake_uses_tone_mapping_pass() {
    let mut post_fx = PostEffectSettings::minimal();
    post_fx.tone_mapping = lumen::resources::ToneMappingMode::Neutral;
    let mut pipeline = post_pipeline(post_fx);
    pipeline.render(&[post_camera()]);

    let submission = pipeline.backend().last_submission().unwrap();
    let first_post = submission.commands().iter().find_map(|command| match command {
        RenderCommand::DrawProcedural {
            material: Material::PostFx,
            pass,
        } => Some(*pass),
        _ => None,
    });
    assert_eq!(first_post, Some(PostFxPass::ColorGradingNeutral.index()));
}
