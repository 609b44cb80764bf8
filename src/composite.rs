use crate::error::{VersecardError, VersecardResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over blend of one premultiplied pixel onto another.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Blend a premultiplied RGBA8 layer over `dst` in place.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> VersecardResult<()> {
    if dst.len() != src.len() || dst.len() % 4 != 0 {
        return Err(VersecardError::render_context(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend a uniform semi-transparent black layer over the whole buffer.
///
/// This is the contrast overlay: it guarantees readable text regardless of
/// background content. `alpha` is the overlay opacity (0 = no-op, 255 = black).
pub fn darken_in_place(dst: &mut [u8], alpha: u8) -> VersecardResult<()> {
    if dst.len() % 4 != 0 {
        return Err(VersecardError::render_context(
            "darken_in_place expects an rgba8 buffer",
        ));
    }
    if alpha == 0 {
        return Ok(());
    }
    // Premultiplied black with alpha a is simply [0, 0, 0, a].
    let shade = [0, 0, 0, alpha];
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], shade);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn darken_scales_opaque_pixels() {
        let mut buf = vec![200, 100, 50, 255];
        darken_in_place(&mut buf, 128).unwrap();
        let keep = 255 - 128;
        assert_eq!(buf[0], ((200u32 * keep as u32 + 127) / 255) as u8);
        assert_eq!(buf[3], 255);
    }

    #[test]
    fn darken_alpha_0_is_noop() {
        let mut buf = vec![9, 8, 7, 255, 1, 2, 3, 255];
        let before = buf.clone();
        darken_in_place(&mut buf, 0).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn over_in_place_rejects_mismatched_lengths() {
        let mut dst = vec![0u8; 8];
        let src = vec![0u8; 4];
        assert!(over_in_place(&mut dst, &src).is_err());
    }
}
