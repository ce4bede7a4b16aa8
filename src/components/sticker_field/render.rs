//! Canvas rendering for the sticker field.
//!
//! One pass per frame: a translucent background fill (previous frames show
//! through, leaving motion trails), then every particle's sticker drawn at
//! its position and rotation. No tint is applied to sprites.

use web_sys::CanvasRenderingContext2d;

use super::field::ParticleField;
use super::sticker::StickerSet;
use super::theme::Theme;

/// Renders the complete field to the canvas.
pub fn render(
	field: &ParticleField,
	ctx: &CanvasRenderingContext2d,
	stickers: &StickerSet,
	theme: &Theme,
) {
	draw_background(field, ctx, theme);

	let size = field.config().sticker_size;
	for p in &field.particles {
		let Some(sticker) = stickers.get(p.sticker) else {
			continue;
		};
		ctx.save();
		let _ = ctx.translate(p.x, p.y);
		let _ = ctx.rotate(p.rot);
		sticker.draw(ctx, size);
		ctx.restore();
	}
}

fn draw_background(field: &ParticleField, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (width, height) = field.extent();
	let alpha = (field.config().trail_alpha / 255.0).clamp(0.0, 1.0);
	ctx.set_fill_style_str(&theme.background.with_alpha(alpha).to_css());
	ctx.fill_rect(0.0, 0.0, width, height);
}
