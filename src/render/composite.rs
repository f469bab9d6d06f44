use crate::{
    foundation::error::{ReelError, ReelResult},
    foundation::math::{mul_div255_u16, mul_div255_u8},
};

pub type PremulRgba8 = [u8; 4];

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

fn opacity_u16(opacity: f64) -> u16 {
    if !opacity.is_finite() {
        return 0;
    }
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

/// Source-over of a premultiplied RGBA pixel onto an opaque RGB pixel.
pub fn over_rgb(dst: [u8; 3], src: PremulRgba8, opacity: f64) -> [u8; 3] {
    let op = opacity_u16(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let sa = mul_div255_u16(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa;

    let mut out = [0u8; 3];
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite a premultiplied RGBA layer (same size) over an RGB8 frame buffer.
pub fn over_rgb_in_place(dst: &mut [u8], src: &[u8], opacity: f64) -> ReelResult<()> {
    if dst.len() % 3 != 0 || src.len() % 4 != 0 || dst.len() / 3 != src.len() / 4 {
        return Err(ReelError::computation(
            "over_rgb_in_place expects matching rgb8 and rgba8 buffers",
        ));
    }
    if opacity_u16(opacity) == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over_rgb([d[0], d[1], d[2]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
