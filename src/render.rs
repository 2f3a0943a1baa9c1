use miniquad::*;

use crate::camera::Viewport;
use crate::state::bumper::radius_for_level;
use crate::state::{AREA_H, AREA_W, GameState, Pos};

const CIRCLE_SEGMENTS: usize = 32;

const FIELD_COLOR: [f32; 4] = [0.10, 0.11, 0.13, 1.0];
const BORDER_COLOR: [f32; 4] = [0.30, 0.32, 0.36, 1.0];
const BAND_COLOR: [f32; 4] = [0.13, 0.22, 0.15, 1.0];
const SLOT_COLOR: [f32; 4] = [0.16, 0.17, 0.20, 1.0];

#[repr(C)]
struct Uniforms {
    mvp: [f32; 16],
    color: [f32; 4],
}

#[repr(C)]
struct Vertex {
    pos: [f32; 2],
}

pub struct Renderer {
    pub ctx: Box<dyn RenderingBackend>,
    pipeline: Pipeline,
    quad_bindings: Bindings,
    circle_bindings: Bindings,
    circle_index_count: i32,
}

impl Renderer {
    pub fn new() -> Renderer {
        let mut ctx = window::new_rendering_backend();

        // Unit quad at origin (0..1, 0..1)
        let quad_vertices: [Vertex; 4] = [
            Vertex { pos: [0.0, 0.0] },
            Vertex { pos: [1.0, 0.0] },
            Vertex { pos: [1.0, 1.0] },
            Vertex { pos: [0.0, 1.0] },
        ];
        let quad_indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
        let quad_bindings = Bindings {
            vertex_buffers: vec![ctx.new_buffer(
                BufferType::VertexBuffer,
                BufferUsage::Immutable,
                BufferSource::slice(&quad_vertices),
            )],
            index_buffer: ctx.new_buffer(
                BufferType::IndexBuffer,
                BufferUsage::Immutable,
                BufferSource::slice(&quad_indices),
            ),
            images: vec![],
        };

        // Unit circle as a triangle fan around the origin
        let mut circle_vertices: Vec<Vertex> = vec![Vertex { pos: [0.0, 0.0] }];
        for i in 0..=CIRCLE_SEGMENTS {
            let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            circle_vertices.push(Vertex {
                pos: [angle.cos(), angle.sin()],
            });
        }
        let mut circle_indices: Vec<u16> = Vec::new();
        for i in 0..CIRCLE_SEGMENTS as u16 {
            circle_indices.extend_from_slice(&[0, i + 1, i + 2]);
        }
        let circle_index_count = circle_indices.len() as i32;
        let circle_bindings = Bindings {
            vertex_buffers: vec![ctx.new_buffer(
                BufferType::VertexBuffer,
                BufferUsage::Immutable,
                BufferSource::slice(&circle_vertices),
            )],
            index_buffer: ctx.new_buffer(
                BufferType::IndexBuffer,
                BufferUsage::Immutable,
                BufferSource::slice(&circle_indices),
            ),
            images: vec![],
        };

        let shader = ctx
            .new_shader(
                ShaderSource::Glsl {
                    vertex: VERTEX_SHADER,
                    fragment: FRAGMENT_SHADER,
                },
                ShaderMeta {
                    images: vec![],
                    uniforms: UniformBlockLayout {
                        uniforms: vec![
                            UniformDesc::new("mvp", UniformType::Mat4),
                            UniformDesc::new("color", UniformType::Float4),
                        ],
                    },
                },
            )
            .expect("failed to compile shader");

        let pipeline = ctx.new_pipeline(
            &[BufferLayout::default()],
            &[VertexAttribute::new("pos", VertexFormat::Float2)],
            shader,
            PipelineParams {
                color_blend: Some(BlendState::new(
                    Equation::Add,
                    BlendFactor::Value(BlendValue::SourceAlpha),
                    BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
                )),
                cull_face: CullFace::Nothing,
                ..Default::default()
            },
        );

        Renderer {
            ctx,
            pipeline,
            quad_bindings,
            circle_bindings,
            circle_index_count,
        }
    }

    /// Draw the play field. The egui layer (shop panel, floating texts) is
    /// drawn on top by the caller, which also commits the frame.
    pub fn draw(&mut self, state: &GameState, viewport: &Viewport, drag_ghost: Option<(Pos, f32)>) {
        let clear = PassAction::Clear {
            color: Some((0.06, 0.07, 0.08, 1.0)),
            depth: Some(1.0),
            stencil: Some(0),
        };
        self.ctx.begin_default_pass(clear);
        self.ctx.apply_pipeline(&self.pipeline);

        // Field backdrop, border and the collection band at the bottom
        self.draw_rect(viewport, -3.0, -3.0, AREA_W + 6.0, AREA_H + 6.0, BORDER_COLOR);
        self.draw_rect(viewport, 0.0, 0.0, AREA_W, AREA_H, FIELD_COLOR);
        let band = state.tuning.collection_band_height;
        self.draw_rect(viewport, 0.0, AREA_H - band, AREA_W, band, BAND_COLOR);

        // Free slots as faint markers
        for slot in 0..state.field.slot_count() {
            if state.field.is_slot_free(slot) {
                self.draw_circle(viewport, state.field.slot_center(slot), 6.0, SLOT_COLOR);
            }
        }

        // Bumpers, tinted by level
        for active in state.field.active() {
            let level = state.field.bumper(active.id).map_or(1, |b| b.level);
            self.draw_circle(viewport, active.center, active.radius, bumper_color(level));
        }

        // Bodies, greener the more they have bounced
        for body in &state.bodies {
            self.draw_circle(viewport, body.center(), body.radius, body_color(body.hit_count));
        }

        // Translucent ghost under the cursor while dragging a bumper
        if let Some((pos, radius)) = drag_ghost {
            self.draw_circle(viewport, pos, radius, [0.9, 0.9, 0.9, 0.35]);
        }

        self.ctx.end_render_pass();
    }

    fn draw_rect(&mut self, viewport: &Viewport, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let (sx, sy) = viewport.world_to_screen(Pos::new(x, y));
        let model = Self::mat4_mul(
            Self::mat4_translation(sx, sy),
            Self::mat4_scale(w * viewport.zoom, h * viewport.zoom),
        );
        let mvp = Self::mat4_mul(Self::ortho_mvp(viewport), model);

        self.ctx.apply_bindings(&self.quad_bindings);
        self.ctx
            .apply_uniforms(UniformsSource::table(&Uniforms { mvp, color }));
        self.ctx.draw(0, 6, 1);
    }

    fn draw_circle(&mut self, viewport: &Viewport, center: Pos, radius: f32, color: [f32; 4]) {
        let (sx, sy) = viewport.world_to_screen(center);
        let model = Self::mat4_mul(
            Self::mat4_translation(sx, sy),
            Self::mat4_scale(radius * viewport.zoom, radius * viewport.zoom),
        );
        let mvp = Self::mat4_mul(Self::ortho_mvp(viewport), model);

        self.ctx.apply_bindings(&self.circle_bindings);
        self.ctx
            .apply_uniforms(UniformsSource::table(&Uniforms { mvp, color }));
        self.ctx.draw(0, self.circle_index_count, 1);
    }

    fn ortho_mvp(viewport: &Viewport) -> [f32; 16] {
        let l = 0.0;
        let r = viewport.screen_w;
        let t = 0.0;
        let b = viewport.screen_h;
        let n = -1.0;
        let f = 1.0;
        let sx = 2.0 / (r - l);
        let sy = 2.0 / (t - b);
        let sz = -2.0 / (f - n);
        let tx = -((r + l) / (r - l));
        let ty = -((t + b) / (t - b));
        let tz = -((f + n) / (f - n));
        [
            sx, 0.0, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 0.0, sz, 0.0, tx, ty, tz, 1.0,
        ]
    }

    fn mat4_mul(a: [f32; 16], b: [f32; 16]) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a[k * 4 + row] * b[col * 4 + k];
                }
                out[col * 4 + row] = sum;
            }
        }
        out
    }

    fn mat4_translation(tx: f32, ty: f32) -> [f32; 16] {
        [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, tx, ty, 0.0, 1.0,
        ]
    }

    fn mat4_scale(sx: f32, sy: f32) -> [f32; 16] {
        [
            sx, 0.0, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ]
    }
}

fn bumper_color(level: u32) -> [f32; 4] {
    // Shift from blue towards orange as levels rise
    let t = (level.saturating_sub(1) as f32 * 0.18).min(1.0);
    [0.25 + 0.6 * t, 0.45 + 0.15 * t, 0.85 - 0.55 * t, 1.0]
}

fn body_color(hit_count: u32) -> [f32; 4] {
    let t = (hit_count as f32 * 0.12).min(1.0);
    [0.55 - 0.35 * t, 0.70 + 0.25 * t, 0.35, 1.0]
}

const VERTEX_SHADER: &str = r#"#version 100
attribute vec2 pos;
uniform mat4 mvp;
void main() {
    gl_Position = mvp * vec4(pos, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 100
precision mediump float;
uniform vec4 color;
void main() {
    gl_FragColor = color;
}
"#;
